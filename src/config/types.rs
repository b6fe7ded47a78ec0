use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub terminal: TerminalConfig,
    #[serde(default)]
    pub streams: StreamConfig,
}

/// Terminal emulator attached to the slave side of a terminal stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminalConfig {
    /// Program to spawn (default: "/usr/bin/xterm").
    #[serde(default = "default_emulator")]
    pub emulator: String,
    /// Extra arguments placed before the slave argument.
    #[serde(default)]
    pub args: Vec<String>,
    /// Flag prefixed to `<slave path>/<master fd>` (default: "-S").
    #[serde(default = "default_slave_flag")]
    pub slave_flag: String,
}

/// Settings shared by every stream kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Line buffer size; a single read returns at most this minus one bytes
    /// (default: 4080).
    #[serde(default = "default_line_buffer_bytes")]
    pub line_buffer_bytes: usize,
}

fn default_emulator() -> String {
    "/usr/bin/xterm".to_string()
}

fn default_slave_flag() -> String {
    "-S".to_string()
}

fn default_line_buffer_bytes() -> usize {
    4080
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            emulator: default_emulator(),
            args: Vec::new(),
            slave_flag: default_slave_flag(),
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            line_buffer_bytes: default_line_buffer_bytes(),
        }
    }
}
