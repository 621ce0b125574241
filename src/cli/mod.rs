pub mod context;
pub mod error;
pub mod render;

pub use context::CommandContext;
pub use error::CliError;
