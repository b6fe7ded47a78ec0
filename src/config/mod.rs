mod loader;
mod types;

pub use loader::{ConfigError, MIN_LINE_BUFFER_BYTES};
pub use types::{Config, StreamConfig, TerminalConfig};
