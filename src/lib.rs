//! Keyboard event routing for view trees, wired up to an input backend.
//!
//! See [`keyroute_core`] for how events travel through the tree.

mod host;

pub use host::{ChannelBackend, ChannelError, Host, HostError, InputSender};
pub use keyroute_core::backend::Backend;
pub use keyroute_core::config::{DispatchConfig, HandlerErrorPolicy};
pub use keyroute_core::error::{ConfigurationError, DispatchError, HandlerError};
pub use keyroute_core::events::{EventHandler, EventPhase, HandlerSlot, KeyEvent, KeyHandlers};
pub use keyroute_core::raw_events::{KeyModifiers, KeyTransition, RawKeyEvent};
pub use keyroute_core::{Dispatcher, ViewId, ViewTree};
