pub mod forecast;
pub mod inventory;
pub mod reporting;
