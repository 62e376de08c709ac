//! Pointer input for the camera controller
//!
//! Pointer gestures arrive as discrete [`PointerEvent`]s. [`PointerTracker`]
//! builds them from winit or egui events, remembering the cursor, modifier
//! and held-button state those events leave out. Cursor motion with a button
//! held is reported as a `Motion` followed by a `Drag`.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::ModifiersState;

bitflags::bitflags! {
    /// Keyboard modifiers held during a pointer event
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 1;
        const CONTROL = 2;
        const ALT = 4;
        const SUPER = 8;
    }
}

impl Modifiers {
    pub fn from_winit(state: ModifiersState) -> Self {
        let mut modifiers = Modifiers::empty();
        modifiers.set(Modifiers::SHIFT, state.shift_key());
        modifiers.set(Modifiers::CONTROL, state.control_key());
        modifiers.set(Modifiers::ALT, state.alt_key());
        modifiers.set(Modifiers::SUPER, state.super_key());
        modifiers
    }

    pub fn from_egui(state: egui::Modifiers) -> Self {
        let mut modifiers = Modifiers::empty();
        modifiers.set(Modifiers::SHIFT, state.shift);
        modifiers.set(Modifiers::CONTROL, state.ctrl);
        modifiers.set(Modifiers::ALT, state.alt);
        modifiers.set(Modifiers::SUPER, state.mac_cmd);
        modifiers
    }
}

/// Pointer button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
    Other(u16),
}

impl PointerButton {
    pub fn from_winit(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => PointerButton::Primary,
            MouseButton::Right => PointerButton::Secondary,
            MouseButton::Middle => PointerButton::Middle,
            MouseButton::Back => PointerButton::Other(3),
            MouseButton::Forward => PointerButton::Other(4),
            MouseButton::Other(n) => PointerButton::Other(n),
        }
    }

    pub fn from_egui(button: egui::PointerButton) -> Self {
        match button {
            egui::PointerButton::Primary => PointerButton::Primary,
            egui::PointerButton::Secondary => PointerButton::Secondary,
            egui::PointerButton::Middle => PointerButton::Middle,
            egui::PointerButton::Extra1 => PointerButton::Other(3),
            egui::PointerButton::Extra2 => PointerButton::Other(4),
        }
    }
}

/// A discrete pointer gesture, positions in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Button {
        position: Vec2,
        button: PointerButton,
        pressed: bool,
        modifiers: Modifiers,
    },
    Motion {
        position: Vec2,
        delta: Vec2,
        modifiers: Modifiers,
    },
    Drag {
        position: Vec2,
        delta: Vec2,
        button: PointerButton,
        modifiers: Modifiers,
    },
    Scroll {
        position: Vec2,
        delta: Vec2,
    },
    Enter {
        position: Vec2,
        entered: bool,
    },
}

/// Builds [`PointerEvent`]s from winit window events
///
/// winit reports button and wheel events without a cursor position and
/// modifiers arrive as separate events, so both are remembered here.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    cursor: Vec2,
    modifiers: Modifiers,
    /// Held buttons in press order
    held: Vec<PointerButton>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Button a drag is reported for: the earliest one still held
    pub fn dragging(&self) -> Option<PointerButton> {
        self.held.first().copied()
    }

    /// Convert a window event; non-pointer events produce nothing
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> Vec<PointerEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(Vec2::new(position.x as f32, position.y as f32))
            }
            WindowEvent::MouseInput { state, button, .. } => vec![self.mouse_input(*state, *button)],
            WindowEvent::MouseWheel { delta, .. } => vec![self.mouse_wheel(*delta)],
            WindowEvent::CursorEntered { .. } => vec![PointerEvent::Enter {
                position: self.cursor,
                entered: true,
            }],
            WindowEvent::CursorLeft { .. } => vec![PointerEvent::Enter {
                position: self.cursor,
                entered: false,
            }],
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers_changed(modifiers.state());
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    /// Motion to `position`, then a `Drag` while a button is held
    pub fn cursor_moved(&mut self, position: Vec2) -> Vec<PointerEvent> {
        let delta = position - self.cursor;
        self.cursor = position;
        let motion = PointerEvent::Motion {
            position,
            delta,
            modifiers: self.modifiers,
        };
        match self.dragging() {
            Some(button) => vec![
                motion,
                PointerEvent::Drag {
                    position,
                    delta,
                    button,
                    modifiers: self.modifiers,
                },
            ],
            None => vec![motion],
        }
    }

    pub fn mouse_input(&mut self, state: ElementState, button: MouseButton) -> PointerEvent {
        self.button_event(PointerButton::from_winit(button), state == ElementState::Pressed)
    }

    fn button_event(&mut self, button: PointerButton, pressed: bool) -> PointerEvent {
        if pressed {
            if !self.held.contains(&button) {
                self.held.push(button);
            }
        } else {
            self.held.retain(|&held| held != button);
        }
        PointerEvent::Button {
            position: self.cursor,
            button,
            pressed,
            modifiers: self.modifiers,
        }
    }

    pub fn mouse_wheel(&mut self, delta: MouseScrollDelta) -> PointerEvent {
        let delta = match delta {
            MouseScrollDelta::LineDelta(x, y) => Vec2::new(x, y),
            MouseScrollDelta::PixelDelta(pos) => Vec2::new(pos.x as f32, pos.y as f32) / 100.0,
        };
        PointerEvent::Scroll {
            position: self.cursor,
            delta,
        }
    }

    pub fn modifiers_changed(&mut self, state: ModifiersState) {
        self.modifiers = Modifiers::from_winit(state);
    }

    /// Modifiers for hosts that report them out of band (egui motion events carry none)
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    /// Convert an egui input event; egui positions are in points
    pub fn handle_egui_event(
        &mut self,
        event: &egui::Event,
        pixels_per_point: f32,
    ) -> Vec<PointerEvent> {
        match event {
            egui::Event::PointerMoved(pos) => {
                self.cursor_moved(Vec2::new(pos.x, pos.y) * pixels_per_point)
            }
            egui::Event::PointerButton {
                pos,
                button,
                pressed,
                modifiers,
                ..
            } => {
                self.cursor = Vec2::new(pos.x, pos.y) * pixels_per_point;
                self.modifiers = Modifiers::from_egui(*modifiers);
                vec![self.button_event(PointerButton::from_egui(*button), *pressed)]
            }
            egui::Event::MouseWheel { unit, delta, .. } => {
                let delta = Vec2::new(delta.x, delta.y);
                let delta = match unit {
                    egui::MouseWheelUnit::Point => delta * pixels_per_point / 100.0,
                    egui::MouseWheelUnit::Line => delta,
                    egui::MouseWheelUnit::Page => delta * 10.0,
                };
                vec![PointerEvent::Scroll {
                    position: self.cursor,
                    delta,
                }]
            }
            egui::Event::PointerGone => vec![PointerEvent::Enter {
                position: self.cursor,
                entered: false,
            }],
            _ => Vec::new(),
        }
    }
}
