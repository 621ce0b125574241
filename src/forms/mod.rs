pub mod audit;
pub mod range;

pub use audit::*;
pub use range::*;
