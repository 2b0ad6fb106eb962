//! User-visible notifications, kept separate from diagnostic logging.
//!
//! The UI wires its toast presenter in here; the default implementation
//! routes through `tracing` so embedded and test usage still records what
//! the user would have seen.

/// Sink for the notifications hooks raise after each operation.
pub trait Notifier: Send + Sync {
  fn success(&self, message: &str);
  fn error(&self, message: &str);

  fn info(&self, message: &str) {
    self.success(message);
  }
}

/// Default notifier: forwards to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
  fn success(&self, message: &str) {
    tracing::info!(target: "agrostudy::notify", "{message}");
  }

  fn error(&self, message: &str) {
    tracing::warn!(target: "agrostudy::notify", "{message}");
  }
}
