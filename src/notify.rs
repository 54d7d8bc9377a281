//! Blocking user notifications.

/// Surface for alerts and confirmations.
///
/// Both calls block the handler until the user has seen (or answered)
/// the prompt.
pub trait Notifier: Send + Sync {
    /// Show a message the user must acknowledge.
    fn alert(&self, message: &str);

    /// Ask a yes/no question. `true` means the user accepted.
    fn confirm(&self, message: &str) -> bool;
}
