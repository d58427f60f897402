// # Notifier Trait
//
// Delivers the summary of a pass to a human.
//
// ## Implementations
//
// - Mail over local SMTP: `cfddns-notify-mail` crate

use async_trait::async_trait;

/// Trait for pass-summary delivery
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send a message with the given subject and plain-text body
    async fn notify(&self, subject: &str, body: &str) -> Result<(), crate::Error>;
}
