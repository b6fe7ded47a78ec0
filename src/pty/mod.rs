mod session;

pub use session::{emulator_args, PtySession};
