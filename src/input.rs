//! Keyboard bindings for the scan window.
//!
//! Keys are translated to [`Action`]s and queued, so a burst of key presses
//! between two frames is applied one action per tick, in press order.

use std::collections::VecDeque;

use minifb::Key;

use crate::session::Action;

/// Map a key to its session action.
///
/// - Esc: quit
/// - Space: pause / resume
/// - R: reset
/// - S: save video
/// - F: next filter
pub fn action_for_key(key: Key) -> Option<Action> {
    match key {
        Key::Escape => Some(Action::Terminate),
        Key::Space => Some(Action::TogglePause),
        Key::R => Some(Action::Reset),
        Key::S => Some(Action::Export),
        Key::F => Some(Action::CycleFilter),
        _ => None,
    }
}

/// FIFO of actions waiting to be applied.
#[derive(Debug, Default)]
pub struct ActionQueue {
    pending: VecDeque<Action>,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the actions bound to `keys`, ignoring unbound keys.
    pub fn extend_from_keys(&mut self, keys: &[Key]) {
        self.pending
            .extend(keys.iter().copied().filter_map(action_for_key));
    }

    /// Next action to apply, if any.
    pub fn pop(&mut self) -> Option<Action> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_keys() {
        assert_eq!(action_for_key(Key::Escape), Some(Action::Terminate));
        assert_eq!(action_for_key(Key::Space), Some(Action::TogglePause));
        assert_eq!(action_for_key(Key::R), Some(Action::Reset));
        assert_eq!(action_for_key(Key::S), Some(Action::Export));
        assert_eq!(action_for_key(Key::F), Some(Action::CycleFilter));
    }

    #[test]
    fn test_unbound_keys_ignored() {
        assert_eq!(action_for_key(Key::A), None);
        assert_eq!(action_for_key(Key::Enter), None);
    }

    #[test]
    fn test_queue_preserves_press_order() {
        let mut queue = ActionQueue::new();
        queue.extend_from_keys(&[Key::F, Key::Q, Key::Space, Key::S]);
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.pop(), Some(Action::CycleFilter));
        assert_eq!(queue.pop(), Some(Action::TogglePause));
        assert_eq!(queue.pop(), Some(Action::Export));
        assert_eq!(queue.pop(), None);
        assert!(queue.is_empty());
    }
}
