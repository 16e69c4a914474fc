use std::collections::HashSet;

use crate::coords::Vec2;

use super::types::{
    InputEvent,
    Key,
    KeyState,
    Modifiers,
    MouseButton,
    MouseButtonState,
    PointerButtonEvent,
    PointerMoveEvent,
};

/// Current input state for the display window.
///
/// Holds "is down" information, the pointer position and the drag latch.
/// Only the render loop's polling step mutates it.
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,

    pub focused: bool,

    /// Pointer position in logical pixels.
    pub pointer: Option<Vec2>,

    pub keys_down: HashSet<Key>,

    pub buttons_down: HashSet<MouseButton>,

    /// World position latched when a drag started.
    drag_anchor: Option<Vec2>,
}

impl InputState {
    /// Applies an input event to the current state.
    pub fn apply_event(&mut self, ev: &InputEvent) {
        match ev {
            InputEvent::ModifiersChanged(m) => {
                self.modifiers = *m;
            }

            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Avoid stuck keys/buttons when focus changes mid-press.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                    self.drag_anchor = None;
                }
            }

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.pointer = Some(Vec2::new(*x, *y));
            }

            InputEvent::PointerLeft => {
                self.pointer = None;
            }

            InputEvent::Key { key, state, modifiers, .. } => {
                self.modifiers = *modifiers;
                match state {
                    KeyState::Pressed => {
                        self.keys_down.insert(*key);
                    }
                    KeyState::Released => {
                        self.keys_down.remove(key);
                    }
                }
            }

            InputEvent::PointerButton(PointerButtonEvent { button, state, x, y, modifiers }) => {
                self.pointer = Some(Vec2::new(*x, *y));
                self.modifiers = *modifiers;
                match state {
                    MouseButtonState::Pressed => {
                        self.buttons_down.insert(*button);
                    }
                    MouseButtonState::Released => {
                        self.buttons_down.remove(button);
                        if *button == MouseButton::Left {
                            self.drag_anchor = None;
                        }
                    }
                }
            }

            InputEvent::MouseWheel { modifiers, .. } => {
                self.modifiers = *modifiers;
            }
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }

    #[inline]
    pub fn primary_down(&self) -> bool {
        self.button_down(MouseButton::Left)
    }

    /// Starts a drag at `world`. Ignored while the primary button is up.
    pub fn latch_drag(&mut self, world: Vec2) {
        if self.primary_down() {
            self.drag_anchor = Some(world);
        }
    }

    #[inline]
    pub fn drag_anchor(&self) -> Option<Vec2> {
        self.drag_anchor
    }

    #[inline]
    pub fn release_drag(&mut self) {
        self.drag_anchor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button(state: MouseButtonState, x: f32, y: f32) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state,
            x,
            y,
            modifiers: Modifiers::default(),
        })
    }

    #[test]
    fn pointer_tracks_moves_and_leaves() {
        let mut s = InputState::default();
        s.apply_event(&InputEvent::PointerMoved(PointerMoveEvent { x: 3.0, y: 4.0 }));
        assert_eq!(s.pointer, Some(Vec2::new(3.0, 4.0)));
        s.apply_event(&InputEvent::PointerLeft);
        assert_eq!(s.pointer, None);
    }

    #[test]
    fn drag_latch_follows_primary_button() {
        let mut s = InputState::default();
        s.latch_drag(Vec2::new(1.0, 1.0));
        assert_eq!(s.drag_anchor(), None);

        s.apply_event(&button(MouseButtonState::Pressed, 10.0, 10.0));
        assert!(s.primary_down());
        s.latch_drag(Vec2::new(1.0, 1.0));
        assert_eq!(s.drag_anchor(), Some(Vec2::new(1.0, 1.0)));

        s.apply_event(&button(MouseButtonState::Released, 10.0, 10.0));
        assert!(!s.primary_down());
        assert_eq!(s.drag_anchor(), None);
    }

    #[test]
    fn focus_loss_clears_held_state() {
        let mut s = InputState::default();
        s.apply_event(&button(MouseButtonState::Pressed, 0.0, 0.0));
        s.latch_drag(Vec2::zero());
        s.apply_event(&InputEvent::Key {
            key: Key::ArrowUp,
            state: KeyState::Pressed,
            modifiers: Modifiers::default(),
            repeat: false,
        });
        s.apply_event(&InputEvent::Focused(false));
        assert!(!s.primary_down());
        assert!(!s.key_down(Key::ArrowUp));
        assert_eq!(s.drag_anchor(), None);
    }
}
