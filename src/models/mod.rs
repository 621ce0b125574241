mod audit;
mod monitoring;
mod quality;

pub use audit::*;
pub use monitoring::*;
pub use quality::*;
