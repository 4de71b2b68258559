mod db;
mod errors;
mod models;
mod operations;

use chrono::NaiveDate;
use errors::EditError;
use models::transaction::TransactionMode;
use operations::append::submit_transaction;
use operations::commit;
use operations::edit::{apply_edit, EditField, EditIntent};
use operations::transfer::{export_ledger, import_ledger};
use rust_decimal::Decimal;
use std::io;
use std::path::Path;

pub enum UserCommands {
    Add,
    Edit,
    Print,
    Total,
    Export,
    Import,
    Delete,
    Exit,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("Welcome to the money manager!");
    let mut conn =
        db::connection::establish_connection().expect("Failed to connect to the database");
    print_total(&conn);

    loop {
        println!("Please enter a command (add, edit, print, total, export, import, delete, exit):");

        let input = match read_user_input() {
            Ok(cmd) => cmd,
            Err(e) => {
                println!("Error reading input: {}", e);
                continue;
            }
        };
        let parts: Vec<&str> = input.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }
        let command = match check_for_command(parts[0]) {
            Some(command) => command,
            None => {
                println!("Unknown command '{}'.", parts[0]);
                continue;
            }
        };
        match command {
            UserCommands::Add => {
                println!("Add command selected. Please enter transaction details in the format:\ndate(YYYY-MM-DD), description, amount, mode(Deposit/Withdraw)");
                let input = match read_user_input() {
                    Ok(details) => details,
                    Err(e) => {
                        println!("Error reading input: {}", e);
                        continue;
                    }
                };
                match parse_add_input(&input) {
                    Ok((date, description, amount, mode)) => {
                        match submit_transaction(&conn, &description, mode, amount, date) {
                            Ok(transaction) => {
                                println!("Transaction saved. Total: {}", transaction.balance);
                            }
                            Err(e) => {
                                println!("Error adding transaction: {}", e);
                                println!("Please try again.");
                            }
                        }
                    }
                    Err(e) => println!("Error: {}", e),
                }
            }
            UserCommands::Edit => {
                println!("Edit command selected. Please enter the edit in the format:\nrow, field(description/mode/amount/date), new value");
                let input = match read_user_input() {
                    Ok(details) => details,
                    Err(e) => {
                        println!("Error reading input: {}", e);
                        continue;
                    }
                };
                let intent = match parse_edit_input(&input) {
                    Ok(intent) => intent,
                    Err(e) => {
                        println!("Error: {}", e);
                        continue;
                    }
                };
                match apply_edit(&mut conn, &intent) {
                    Ok(total) => println!("Edit applied. Total: {}", total),
                    Err(EditError::Storage(e)) => {
                        println!("Storage error: {}", e);
                        println!("The ledger will be re-read before the next edit.");
                    }
                    Err(e) => println!("Edit rejected: {}", e),
                }
            }
            UserCommands::Print => {
                let list = db::repository::get_all_transactions(&conn).unwrap_or_else(|_| vec![]);
                if list.is_empty() {
                    println!("The ledger is empty.");
                }
                for (row, transaction) in list.iter().enumerate() {
                    println!(
                        "{}: {} | {} | {} {} | balance {}",
                        row,
                        transaction.date_added,
                        transaction.description,
                        transaction.mode,
                        transaction.trans_amount,
                        transaction.balance
                    );
                }
            }
            UserCommands::Total => print_total(&conn),
            UserCommands::Export => {
                println!("Export command selected. Please enter the file path to export to:");
                let input = match read_user_input() {
                    Ok(details) => details,
                    Err(e) => {
                        println!("Error reading input: {}", e);
                        continue;
                    }
                };
                match export_ledger(&conn, Path::new(&input)) {
                    Ok(count) => println!("Exported {} transactions.", count),
                    Err(e) => println!("Error exporting transactions: {}", e),
                }
            }
            UserCommands::Import => {
                println!("Import command selected. This replaces the entire ledger. Please enter the file path to import from:");
                let input = match read_user_input() {
                    Ok(details) => details,
                    Err(e) => {
                        println!("Error reading input: {}", e);
                        continue;
                    }
                };
                match import_ledger(&conn, Path::new(&input)) {
                    Ok(count) => {
                        println!("Imported {} transactions.", count);
                        print_total(&conn);
                    }
                    Err(e) => println!("Error importing transactions: {}", e),
                }
            }
            UserCommands::Delete => {
                match db::repository::delete_all_transactions(&conn) {
                    Ok(count) => println!("Deleted {} transactions. Total: 0", count),
                    Err(e) => println!("Error deleting transactions: {}", e),
                }
            }
            UserCommands::Exit => {
                println!("Exiting the application.");
                break;
            }
        }
    }
}

fn print_total(conn: &rusqlite::Connection) {
    match commit::current_total(conn) {
        Ok(total) => println!("Total: {}", total),
        Err(e) => println!("Error reading total: {}", e),
    }
}

fn read_user_input() -> Result<String, String> {
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|_| "Failed to read line".to_string())?;
    Ok(input.trim().to_string())
}

fn check_for_command(input: &str) -> Option<UserCommands> {
    match input {
        "add" => Some(UserCommands::Add),
        "edit" => Some(UserCommands::Edit),
        "print" => Some(UserCommands::Print),
        "total" => Some(UserCommands::Total),
        "export" => Some(UserCommands::Export),
        "import" => Some(UserCommands::Import),
        "delete" => Some(UserCommands::Delete),
        "exit" => Some(UserCommands::Exit),
        _ => None,
    }
}

fn parse_add_input(input: &str) -> Result<(NaiveDate, String, Decimal, TransactionMode), String> {
    let parts: Vec<&str> = input.split(',').map(|s| s.trim()).collect();
    if parts.len() != 4 {
        return Err(format!(
            "Invalid number of details provided. Expected 4 details separated by commas but got {}",
            parts.len()
        ));
    }

    let date = NaiveDate::parse_from_str(parts[0], "%Y-%m-%d")
        .map_err(|_| "Invalid date format. Please use YYYY-MM-DD.".to_string())?;
    let description = parts[1].to_string();
    let amount = parts[2]
        .parse::<Decimal>()
        .map_err(|_| format!("Invalid amount '{}'. Please provide a valid decimal number.", parts[2]))?;
    let mode = parts[3]
        .parse::<TransactionMode>()
        .map_err(|_| "Invalid mode. Use 'Deposit' or 'Withdraw'.".to_string())?;

    Ok((date, description, amount, mode))
}

fn parse_edit_input(input: &str) -> Result<EditIntent, String> {
    let parts: Vec<&str> = input.splitn(3, ',').collect();
    if parts.len() != 3 {
        return Err("Expected: row, field, new value".to_string());
    }

    let row = parts[0]
        .trim()
        .parse::<usize>()
        .map_err(|_| format!("Invalid row '{}'.", parts[0].trim()))?;
    let field = EditField::from_name(parts[1])
        .ok_or_else(|| format!("Unknown field '{}'.", parts[1].trim()))?;

    Ok(EditIntent {
        row,
        field,
        value: parts[2].trim().to_string(),
    })
}
