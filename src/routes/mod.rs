pub mod audit;
pub mod errors;
pub mod health;
pub mod health_checks;
pub mod monitoring;
pub mod overview;
pub mod quality;

pub use health_checks::*;
