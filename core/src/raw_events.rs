//! Raw input, as delivered by the platform input layer.

/// Whether a key went down or came back up.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyTransition {
    /// The key was pressed.
    Down = 0,
    /// The key was released.
    Up = 1,
}

/// Modifier key state.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct KeyModifiers {
    /// Whether any alt key or option key is pressed.
    pub alt: bool,

    /// Whether any control key is pressed.
    pub ctrl: bool,

    /// Whether any shift key is pressed.
    pub shift: bool,

    /// Whether any meta key or command key is pressed.
    pub meta: bool,
}

impl KeyModifiers {
    /// No modifiers pressed.
    pub const NONE: KeyModifiers = KeyModifiers {
        alt: false,
        ctrl: false,
        shift: false,
        meta: false,
    };

    /// Returns true if no modifier key is held.
    pub fn is_empty(&self) -> bool {
        *self == KeyModifiers::NONE
    }
}

/// One physical key transition, before it has been routed anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawKeyEvent {
    /// Logical key identifier, e.g. `"Enter"`, `"a"` or `"ArrowLeft"`.
    ///
    /// Mapping hardware codes to these names is up to the input layer.
    pub key: String,
    pub modifiers: KeyModifiers,
    pub transition: KeyTransition,
}

impl RawKeyEvent {
    /// A key press without modifiers.
    pub fn down(key: impl Into<String>) -> RawKeyEvent {
        RawKeyEvent {
            key: key.into(),
            modifiers: KeyModifiers::NONE,
            transition: KeyTransition::Down,
        }
    }

    /// A key release without modifiers.
    pub fn up(key: impl Into<String>) -> RawKeyEvent {
        RawKeyEvent {
            key: key.into(),
            modifiers: KeyModifiers::NONE,
            transition: KeyTransition::Up,
        }
    }

    pub fn with_modifiers(mut self, modifiers: KeyModifiers) -> RawKeyEvent {
        self.modifiers = modifiers;
        self
    }
}
