//! Error types.

use crate::events::EventPhase;
use crate::view::ViewId;
use std::error::Error as StdError;
use thiserror::Error;

/// The view tree and the requested operation don’t fit together.
///
/// These are logic bugs in the caller, not runtime conditions worth recovering from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ConfigurationError {
    #[error("no view with id {0} in the tree")]
    NoSuchView(ViewId),
    #[error("view {0} is not reachable from the root")]
    Detached(ViewId),
    #[error("cycle in superview links at view {0}")]
    Cycle(ViewId),
    #[error("the root view cannot be removed")]
    RemoveRoot,
}

/// An error raised by an event handler.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> HandlerError {
        HandlerError {
            message: message.into(),
            source: None,
        }
    }

    /// Wraps an underlying error.
    pub fn with_source<E>(message: impl Into<String>, source: E) -> HandlerError
    where
        E: StdError + Send + Sync + 'static,
    {
        HandlerError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors that end a dispatch pass.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The focus target could not be routed to. No handlers were invoked.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A handler failed and the dispatcher was configured to abort.
    #[error("key handler on view {view} failed during {phase:?}")]
    Handler {
        view: ViewId,
        phase: EventPhase,
        #[source]
        source: HandlerError,
    },
}
