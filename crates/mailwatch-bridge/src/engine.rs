/// New message count of a single mailbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailboxCount {
    /// Display name of the mailbox.
    pub name: String,
    /// Number of new messages in the mailbox.
    pub count: u32,
}

impl MailboxCount {
    pub fn new(name: impl Into<String>, count: u32) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

/// Queries and commands the controller issues to the external mail engine.
///
/// Events travel the other way as [`crate::MessageToController`] values; this
/// trait only covers the calls the controller initiates itself.
pub trait MailEngine: Send + Sync {
    /// Per-mailbox breakdown of new messages, in the engine's own order.
    fn new_message_breakdown(&self) -> Vec<MailboxCount>;

    /// Requests an immediate re-check of every mailbox.
    fn force_update(&self);
}
