//! Dispatch configuration.

/// What to do when a key handler returns an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerErrorPolicy {
    /// End the dispatch pass and report the error. Remaining handlers don’t run.
    Abort,
    /// Log the error and keep going as if the handler had returned normally.
    LogAndContinue,
}

impl Default for HandlerErrorPolicy {
    fn default() -> Self {
        HandlerErrorPolicy::Abort
    }
}

/// Dispatcher settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchConfig {
    pub handler_error_policy: HandlerErrorPolicy,
}

impl DispatchConfig {
    pub fn handler_error_policy(mut self, policy: HandlerErrorPolicy) -> Self {
        self.handler_error_policy = policy;
        self
    }
}
