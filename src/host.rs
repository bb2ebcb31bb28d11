use crossbeam::channel::{self, Receiver, Sender, TryRecvError};
use keyroute_core::backend::Backend;
use keyroute_core::config::DispatchConfig;
use keyroute_core::error::DispatchError;
use keyroute_core::events::KeyEvent;
use keyroute_core::raw_events::RawKeyEvent;
use keyroute_core::{Dispatcher, ViewId, ViewTree};
use thiserror::Error;
use tracing::{debug, trace};

/// Errors from driving a host.
#[derive(Debug, Error)]
pub enum HostError<E> {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error("backend error: {0}")]
    Backend(E),
}

/// Connects a view tree to a backend.
///
/// Raw key transitions from the backend are dispatched one at a time to whichever view currently
/// has focus; events that no handler marked as handled are handed back to the backend for its
/// default action.
#[derive(Debug)]
pub struct Host<B> {
    tree: ViewTree,
    focus: Option<ViewId>,
    dispatcher: Dispatcher,
    backend: B,
}

impl<B: Backend> Host<B> {
    /// Creates a new Host with a root-only tree and nothing focused.
    pub fn new(backend: B) -> Host<B> {
        Host::with_config(backend, DispatchConfig::default())
    }

    pub fn with_config(backend: B, config: DispatchConfig) -> Host<B> {
        Host {
            tree: ViewTree::new(),
            focus: None,
            dispatcher: Dispatcher::new(config),
            backend,
        }
    }

    pub fn tree(&self) -> &ViewTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut ViewTree {
        &mut self.tree
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// The view that key events are currently routed to.
    pub fn focus(&self) -> Option<ViewId> {
        self.focus
    }

    /// Sets the focus target.
    ///
    /// This is not checked against the tree; dispatching to a view that isn’t in the tree fails
    /// at dispatch time.
    pub fn set_focus(&mut self, focus: Option<ViewId>) {
        trace!(focus = ?focus, "focus changed");
        self.focus = focus;
    }

    /// Dispatches one key transition to the focus target and applies the default action if the
    /// event ends up unhandled.
    ///
    /// Returns `Ok(None)` if nothing is focused.
    pub fn dispatch(&mut self, raw: RawKeyEvent) -> Result<Option<KeyEvent>, HostError<B::Error>> {
        let event = match self.dispatcher.dispatch(&self.tree, raw, self.focus)? {
            Some(event) => event,
            None => return Ok(None),
        };
        if !event.is_handled() {
            debug!(key = %event.key(), "applying default action");
            self.backend
                .default_action(&event)
                .map_err(HostError::Backend)?;
        }
        Ok(Some(event))
    }

    /// Receives all events from the backend and dispatches them in order.
    ///
    /// Each event is dispatched to completion before the next one is received. A failed dispatch
    /// doesn’t stop the others; a backend error while polling does.
    pub fn poll(&mut self) -> Vec<Result<Option<KeyEvent>, HostError<B::Error>>> {
        let mut results = Vec::new();
        loop {
            match self.backend.poll() {
                Ok(Some(raw)) => results.push(self.dispatch(raw)),
                Ok(None) => break,
                Err(err) => {
                    results.push(Err(HostError::Backend(err)));
                    break;
                }
            }
        }
        results
    }
}

/// Errors from a [`ChannelBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChannelError {
    #[error("all input senders have been dropped")]
    Disconnected,
}

type DefaultAction = Box<dyn FnMut(&KeyEvent) + Send>;

/// A backend fed through a channel, so input can arrive from any thread.
pub struct ChannelBackend {
    events: Receiver<RawKeyEvent>,
    default_action: Option<DefaultAction>,
}

impl core::fmt::Debug for ChannelBackend {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_struct("ChannelBackend")
            .field("pending", &self.events.len())
            .finish()
    }
}

/// The sending half of a [`ChannelBackend`].
#[derive(Debug, Clone)]
pub struct InputSender(Sender<RawKeyEvent>);

impl InputSender {
    /// Queues a key transition.
    pub fn send(&self, event: RawKeyEvent) -> Result<(), ChannelError> {
        self.0.send(event).map_err(|_| ChannelError::Disconnected)
    }
}

impl ChannelBackend {
    pub fn new() -> (ChannelBackend, InputSender) {
        let (sender, events) = channel::unbounded();
        (
            ChannelBackend {
                events,
                default_action: None,
            },
            InputSender(sender),
        )
    }

    /// Sets the callback for unhandled events.
    pub fn on_default_action<F: 'static + FnMut(&KeyEvent) + Send>(mut self, action: F) -> Self {
        self.default_action = Some(Box::new(action));
        self
    }
}

impl Backend for ChannelBackend {
    type Error = ChannelError;

    fn poll(&mut self) -> Result<Option<RawKeyEvent>, ChannelError> {
        match self.events.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(ChannelError::Disconnected),
        }
    }

    fn default_action(&mut self, event: &KeyEvent) -> Result<(), ChannelError> {
        if let Some(action) = &mut self.default_action {
            action(event);
        }
        Ok(())
    }
}
