//! Traits for backends.

use crate::events::KeyEvent;
use crate::raw_events::RawKeyEvent;

/// A platform input layer.
///
/// Backends already know which view has focus on their side; they only deliver raw key
/// transitions and get told which of them nobody handled.
pub trait Backend {
    /// Error type.
    type Error;

    /// Returns the next key transition from the queue.
    ///
    /// This method may be called frequently in quick succession.
    fn poll(&mut self) -> Result<Option<RawKeyEvent>, Self::Error>;

    /// Applies the platform’s default behavior for an event that no handler marked as handled,
    /// e.g. inserting a character into a text field.
    fn default_action(&mut self, event: &KeyEvent) -> Result<(), Self::Error>;
}
