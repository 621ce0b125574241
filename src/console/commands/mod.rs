pub mod audit;
mod callable;
pub mod errors;
pub mod health;
pub mod overview;
pub mod quality;

pub use callable::*;
