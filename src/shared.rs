pub mod types;
pub mod settings;
pub mod errors;
pub mod notify;

// Re-export CommandError for convenience
pub use errors::{CommandError, CommandResult};
pub use notify::{Notifier, RecordingNotifier, TracingNotifier};
