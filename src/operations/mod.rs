pub mod append;
pub mod commit;
pub mod edit;
pub mod project;
pub mod transfer;
