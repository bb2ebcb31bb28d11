//! Key events and their handlers.

use crate::error::HandlerError;
use crate::raw_events::{KeyModifiers, KeyTransition, RawKeyEvent};
use core::fmt;
use parking_lot::Mutex;
use std::sync::Arc;

/// Where an event currently is on its way through the view tree.
///
/// Phases are ordered; during one dispatch an event’s phase only ever moves forward.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventPhase {
    /// Travelling from the root down towards the focus target.
    Capturing = 0,
    /// At the focus target.
    AtTarget = 1,
    /// Travelling from the focus target back up to the root.
    Bubbling = 2,
}

/// A key event.
///
/// Handlers receive this mutably, but the only thing they can change is the handled flag: once
/// a handler calls [`KeyEvent::set_handled`], the event stops propagating and the platform will
/// not apply its default behavior for the keystroke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    key: String,
    modifiers: KeyModifiers,
    transition: KeyTransition,
    phase: EventPhase,
    handled: bool,
}

impl KeyEvent {
    pub fn new(raw: RawKeyEvent) -> KeyEvent {
        KeyEvent {
            key: raw.key,
            modifiers: raw.modifiers,
            transition: raw.transition,
            phase: EventPhase::Capturing,
            handled: false,
        }
    }

    /// The logical key identifier.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn modifiers(&self) -> KeyModifiers {
        self.modifiers
    }

    pub fn alt_key(&self) -> bool {
        self.modifiers.alt
    }

    pub fn ctrl_key(&self) -> bool {
        self.modifiers.ctrl
    }

    pub fn shift_key(&self) -> bool {
        self.modifiers.shift
    }

    pub fn meta_key(&self) -> bool {
        self.modifiers.meta
    }

    pub fn transition(&self) -> KeyTransition {
        self.transition
    }

    pub fn phase(&self) -> EventPhase {
        self.phase
    }

    pub fn is_handled(&self) -> bool {
        self.handled
    }

    /// Marks the event as handled. This cannot be undone.
    pub fn set_handled(&mut self) {
        self.handled = true;
    }

    /// Moves the event to a later phase.
    pub(crate) fn advance_phase(&mut self, phase: EventPhase) {
        debug_assert!(
            phase >= self.phase,
            "event phase went backwards: {:?} -> {:?}",
            self.phase,
            phase
        );
        self.phase = phase;
    }
}

type HandlerFn = dyn FnMut(&mut KeyEvent) -> Result<(), HandlerError> + Send;

/// A key event handler.
///
/// Cloning is cheap and yields a handle to the same callback.
pub struct EventHandler(Arc<Mutex<HandlerFn>>);

impl Clone for EventHandler {
    fn clone(&self) -> Self {
        EventHandler(Arc::clone(&self.0))
    }
}

impl EventHandler {
    /// Creates a handler that can’t fail.
    pub fn new<F: 'static + FnMut(&mut KeyEvent) + Send>(mut handler: F) -> Self {
        EventHandler::fallible(move |event| {
            handler(event);
            Ok(())
        })
    }

    /// Creates a handler that may return an error.
    pub fn fallible<F>(handler: F) -> Self
    where
        F: 'static + FnMut(&mut KeyEvent) -> Result<(), HandlerError> + Send,
    {
        EventHandler(Arc::new(Mutex::new(handler)))
    }

    pub(crate) fn call(&self, event: &mut KeyEvent) -> Result<(), HandlerError> {
        let mut handler = self.0.lock();
        (&mut *handler)(event)
    }

    /// Returns true if both handles refer to the same callback.
    pub fn ptr_eq(&self, other: &EventHandler) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "EventHandler<Key>")
    }
}

/// One of the four handler slots on a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerSlot {
    KeyDownCapture,
    KeyDown,
    KeyUpCapture,
    KeyUp,
}

impl HandlerSlot {
    /// The slot that handles the given transition in the given direction.
    ///
    /// `AtTarget` uses the bubble slot.
    pub fn for_event(transition: KeyTransition, phase: EventPhase) -> HandlerSlot {
        match (transition, phase) {
            (KeyTransition::Down, EventPhase::Capturing) => HandlerSlot::KeyDownCapture,
            (KeyTransition::Down, _) => HandlerSlot::KeyDown,
            (KeyTransition::Up, EventPhase::Capturing) => HandlerSlot::KeyUpCapture,
            (KeyTransition::Up, _) => HandlerSlot::KeyUp,
        }
    }
}

/// Key handlers registered on a view.
#[derive(Debug, Clone, Default)]
pub struct KeyHandlers {
    pub key_down_capture: Option<EventHandler>,
    pub key_down: Option<EventHandler>,
    pub key_up_capture: Option<EventHandler>,
    pub key_up: Option<EventHandler>,
}

impl KeyHandlers {
    pub fn get(&self, slot: HandlerSlot) -> Option<&EventHandler> {
        match slot {
            HandlerSlot::KeyDownCapture => self.key_down_capture.as_ref(),
            HandlerSlot::KeyDown => self.key_down.as_ref(),
            HandlerSlot::KeyUpCapture => self.key_up_capture.as_ref(),
            HandlerSlot::KeyUp => self.key_up.as_ref(),
        }
    }

    pub fn slot_mut(&mut self, slot: HandlerSlot) -> &mut Option<EventHandler> {
        match slot {
            HandlerSlot::KeyDownCapture => &mut self.key_down_capture,
            HandlerSlot::KeyDown => &mut self.key_down,
            HandlerSlot::KeyUpCapture => &mut self.key_up_capture,
            HandlerSlot::KeyUp => &mut self.key_up,
        }
    }

    /// Returns true if no slot is filled.
    pub fn is_empty(&self) -> bool {
        self.key_down_capture.is_none()
            && self.key_down.is_none()
            && self.key_up_capture.is_none()
            && self.key_up.is_none()
    }
}
