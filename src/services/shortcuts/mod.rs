//! Keyboard shortcut mapping for the week grid.

use egui::{Key, Modifiers};
use serde::{Deserialize, Serialize};

use crate::models::someday::BucketKind;
use crate::models::week::WeekDirection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shortcut {
    NewTimed,
    NewAllDay,
    NewSomeday(BucketKind),
    Navigate(WeekDirection),
    Today,
    Discard,
    Submit,
    Delete,
}

impl Shortcut {
    pub fn from_key(key: Key, modifiers: Modifiers) -> Option<Self> {
        // Ctrl+Enter submits the open form
        if modifiers.command && key == Key::Enter {
            return Some(Shortcut::Submit);
        }

        if modifiers.ctrl || modifiers.command || modifiers.alt {
            return None;
        }

        match key {
            Key::C => Some(Shortcut::NewTimed),
            Key::A => Some(Shortcut::NewAllDay),
            Key::W => Some(Shortcut::NewSomeday(BucketKind::Week)),
            Key::M => Some(Shortcut::NewSomeday(BucketKind::Month)),
            Key::J => Some(Shortcut::Navigate(WeekDirection::Backward)),
            Key::K => Some(Shortcut::Navigate(WeekDirection::Forward)),
            Key::T => Some(Shortcut::Today),
            Key::Escape => Some(Shortcut::Discard),
            Key::Delete => Some(Shortcut::Delete),
            _ => None,
        }
    }

    /// Shortcuts that only make sense while a draft is open
    pub fn needs_open_draft(&self) -> bool {
        matches!(self, Shortcut::Submit | Shortcut::Delete)
    }
}
