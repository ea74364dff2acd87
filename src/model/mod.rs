pub mod history;
pub mod records;
