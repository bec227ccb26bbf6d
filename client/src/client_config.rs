use std::default::Default;

/// Contains Config properties which will be used by the Client
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Number of posted-but-undrained mails at which a warning is logged,
    /// a sign that the transport stopped calling `take_outgoing()`.
    pub outbox_warning_threshold: usize,
    /// Whether initial property values sent along with a new entity run
    /// their hooks, like any later server update does.
    pub apply_hooks_on_create: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            outbox_warning_threshold: 256,
            apply_hooks_on_create: true,
        }
    }
}
