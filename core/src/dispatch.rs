//! Key event routing.
//!
//! A key event travels in three phases. First it is captured: starting at the root, every
//! ancestor of the focus target gets to see the event through its capture handler. Then the
//! target itself handles it. Finally the event bubbles back up through the same ancestors, this
//! time through their regular handlers.
//!
//! Any handler may mark the event as handled, which ends the dispatch right there. The caller
//! uses the final handled flag to decide whether the platform should apply its default behavior.

use crate::config::{DispatchConfig, HandlerErrorPolicy};
use crate::error::DispatchError;
use crate::events::{EventHandler, EventPhase, HandlerSlot, KeyEvent};
use crate::raw_events::RawKeyEvent;
use crate::view::ViewId;
use crate::view_tree::ViewTree;
use tracing::{debug, debug_span, trace, warn};

/// Progress of a single dispatch pass. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum DispatchState {
    NotStarted,
    Capturing,
    AtTarget,
    Bubbling,
    Done,
}

impl DispatchState {
    fn phase(self) -> Option<EventPhase> {
        match self {
            DispatchState::Capturing => Some(EventPhase::Capturing),
            DispatchState::AtTarget => Some(EventPhase::AtTarget),
            DispatchState::Bubbling => Some(EventPhase::Bubbling),
            DispatchState::NotStarted | DispatchState::Done => None,
        }
    }
}

/// Handlers to run for one event, collected before any of them is invoked.
struct Route {
    capture: Vec<(ViewId, EventHandler)>,
    target: (ViewId, Option<EventHandler>),
    bubble: Vec<(ViewId, EventHandler)>,
}

impl Route {
    fn new(tree: &ViewTree, event: &KeyEvent, target: ViewId) -> Result<Route, DispatchError> {
        let chain = tree.ancestor_chain(target)?;
        let ancestors = &chain[..chain.len() - 1];

        let capture_slot = HandlerSlot::for_event(event.transition(), EventPhase::Capturing);
        let bubble_slot = HandlerSlot::for_event(event.transition(), EventPhase::Bubbling);

        let mut capture = Vec::new();
        let mut bubble = Vec::new();
        for view in ancestors {
            let handlers = tree.handlers(*view)?;
            if let Some(handler) = handlers.get(capture_slot) {
                capture.push((*view, handler.clone()));
            }
            if let Some(handler) = handlers.get(bubble_slot) {
                bubble.push((*view, handler.clone()));
            }
        }
        bubble.reverse();

        let target_handler = tree.handlers(target)?.get(bubble_slot).cloned();

        Ok(Route {
            capture,
            target: (target, target_handler),
            bubble,
        })
    }
}

struct Pass<'a> {
    config: &'a DispatchConfig,
    event: KeyEvent,
    state: DispatchState,
}

impl<'a> Pass<'a> {
    fn enter(&mut self, state: DispatchState) {
        debug_assert!(
            state > self.state,
            "dispatch state went backwards: {:?} -> {:?}",
            self.state,
            state
        );
        self.state = state;
        if let Some(phase) = state.phase() {
            self.event.advance_phase(phase);
        }
    }

    fn is_done(&self) -> bool {
        self.state == DispatchState::Done
    }

    fn invoke(&mut self, view: ViewId, handler: &EventHandler) -> Result<(), DispatchError> {
        let phase = self.event.phase();
        trace!(view = %view, ?phase, "invoking key handler");

        if let Err(err) = handler.call(&mut self.event) {
            match self.config.handler_error_policy {
                HandlerErrorPolicy::Abort => {
                    return Err(DispatchError::Handler {
                        view,
                        phase,
                        source: err,
                    });
                }
                HandlerErrorPolicy::LogAndContinue => {
                    warn!(view = %view, ?phase, error = %err, "key handler failed");
                }
            }
        }

        if self.event.is_handled() {
            debug!(view = %view, ?phase, "key event handled");
            self.enter(DispatchState::Done);
        }
        Ok(())
    }

    fn run(mut self, route: &Route) -> Result<KeyEvent, DispatchError> {
        self.enter(DispatchState::Capturing);
        for (view, handler) in &route.capture {
            self.invoke(*view, handler)?;
            if self.is_done() {
                return Ok(self.event);
            }
        }

        self.enter(DispatchState::AtTarget);
        let (target, target_handler) = &route.target;
        if let Some(handler) = target_handler {
            self.invoke(*target, handler)?;
            if self.is_done() {
                return Ok(self.event);
            }
        }

        self.enter(DispatchState::Bubbling);
        for (view, handler) in &route.bubble {
            self.invoke(*view, handler)?;
            if self.is_done() {
                return Ok(self.event);
            }
        }

        self.enter(DispatchState::Done);
        Ok(self.event)
    }
}

/// Routes key events through a view tree.
///
/// The dispatcher keeps no state between events; each call to [`Dispatcher::dispatch`] runs to
/// completion before returning.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    config: DispatchConfig,
}

impl Dispatcher {
    pub fn new(config: DispatchConfig) -> Dispatcher {
        Dispatcher { config }
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Dispatches a key transition to the focus target.
    ///
    /// Returns `Ok(None)` without doing anything if there is no focus target. Otherwise returns
    /// the event as the last handler left it; check [`KeyEvent::is_handled`] to decide whether
    /// to apply default behavior.
    ///
    /// # Errors
    /// - `DispatchError::Configuration` if the target can’t be reached from the root. No handler
    ///   will have been invoked.
    /// - `DispatchError::Handler` if a handler failed under [`HandlerErrorPolicy::Abort`].
    pub fn dispatch(
        &self,
        tree: &ViewTree,
        raw: RawKeyEvent,
        focus_target: Option<ViewId>,
    ) -> Result<Option<KeyEvent>, DispatchError> {
        let target = match focus_target {
            Some(target) => target,
            None => {
                trace!(key = %raw.key, "no focus target; dropping key event");
                return Ok(None);
            }
        };

        let event = KeyEvent::new(raw);
        let span = debug_span!(
            "dispatch_key",
            key = %event.key(),
            transition = ?event.transition(),
            target = %target
        );
        let _enter = span.enter();

        let route = Route::new(tree, &event, target)?;
        let pass = Pass {
            config: &self.config,
            event,
            state: DispatchState::NotStarted,
        };
        pass.run(&route).map(Some)
    }
}
