pub mod classifier;
pub mod rules;
pub mod stock;
pub mod traits;
