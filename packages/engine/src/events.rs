//! Input events fed into the session by the host.

use serde::{Deserialize, Serialize};

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
    pub ctrl: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        alt: false,
        ctrl: false,
        meta: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };

    /// No modifiers at all.
    pub fn is_empty(&self) -> bool {
        !(self.shift || self.alt || self.ctrl || self.meta)
    }

    /// Shift allowed, anything else disqualifies (nudge policy: other
    /// modifiers belong to browser/editor shortcuts).
    pub fn at_most_shift(&self) -> bool {
        !(self.alt || self.ctrl || self.meta)
    }

    /// Force-leaf selection modifier.
    pub fn force_element(&self) -> bool {
        self.alt
    }

    /// Force-group selection modifier.
    pub fn force_group(&self) -> bool {
        self.meta || self.shift
    }

    /// Jump-to-source modifier.
    pub fn jump_to_source(&self) -> bool {
        self.ctrl
    }
}

/// A pointer event in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerEvent {
    pub pointer_id: u32,
    pub x: f64,
    pub y: f64,

    /// Click streak as reported by the host (2 = double click).
    #[serde(default = "one")]
    pub click_count: u8,

    #[serde(default)]
    pub modifiers: Modifiers,
}

fn one() -> u8 {
    1
}

impl PointerEvent {
    pub fn at(pointer_id: u32, x: f64, y: f64) -> Self {
        Self {
            pointer_id,
            x,
            y,
            click_count: 1,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_clicks(mut self, click_count: u8) -> Self {
        self.click_count = click_count;
        self
    }

    pub fn point(&self) -> loupe_common::Point {
        loupe_common::Point::new(self.x, self.y)
    }
}

/// Keys the engine reacts to; everything else arrives as `Other` and is
/// ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Enter,
    Escape,
    Other,
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        match name.as_str() {
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "Enter" => Key::Enter,
            "Escape" => Key::Escape,
            _ => Key::Other,
        }
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        match key {
            Key::ArrowUp => "ArrowUp",
            Key::ArrowDown => "ArrowDown",
            Key::ArrowLeft => "ArrowLeft",
            Key::ArrowRight => "ArrowRight",
            Key::Enter => "Enter",
            Key::Escape => "Escape",
            Key::Other => "Unidentified",
        }
        .to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyEvent {
    pub key: Key,

    #[serde(default)]
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn shifted(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::SHIFT,
        }
    }
}
