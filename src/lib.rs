//! External resources as stream values.
//!
//! A [`stream::FileStream`] or [`stream::TerminalStream`] is pulled from with
//! `update` and pushed to with `write`. Written values are flattened to text
//! by the content writer; streaming values are drained batch by batch.

pub mod config;
pub mod error;
pub mod logging;
#[cfg(unix)]
pub mod pty;
pub mod resource;
pub mod stream;
pub mod value;

pub use error::StreamError;
pub use stream::{StreamKind, StreamValue};
pub use value::{Input, Value};
