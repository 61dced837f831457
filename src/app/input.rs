use std::path::PathBuf;
use winit::{
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    keyboard::Key,
};

/// Events delivered to [`App`](super::App) hooks.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    KeyPressed(Key),
    KeyReleased(Key),
    MouseMoved {
        x: f64,
        y: f64,
    },
    MouseDragged {
        x: f64,
        y: f64,
        button: MouseButton,
    },
    MousePressed {
        x: f64,
        y: f64,
        button: MouseButton,
    },
    MouseReleased {
        x: f64,
        y: f64,
        button: MouseButton,
    },
    MouseScrolled {
        x: f64,
        y: f64,
        scroll_x: f32,
        scroll_y: f32,
    },
    WindowResized {
        width: u32,
        height: u32,
    },
    Message(String),
    FileDropped {
        path: PathBuf,
        x: f64,
        y: f64,
    },
}

/// Tracks what winit only reports incrementally: the cursor position and held buttons.
#[derive(Debug, Default)]
pub struct InputState {
    cursor: (f64, f64),
    pressed: Vec<MouseButton>,
}

impl InputState {
    pub fn cursor(&self) -> (f64, f64) {
        self.cursor
    }

    pub fn is_pressed(&self, button: MouseButton) -> bool {
        self.pressed.contains(&button)
    }

    /// A move while a button is held is a drag with the first held button.
    pub fn cursor_moved(&mut self, x: f64, y: f64) -> AppEvent {
        self.cursor = (x, y);
        match self.pressed.first() {
            Some(button) => AppEvent::MouseDragged {
                x,
                y,
                button: *button,
            },
            None => AppEvent::MouseMoved { x, y },
        }
    }

    pub fn mouse_button(&mut self, state: ElementState, button: MouseButton) -> AppEvent {
        let (x, y) = self.cursor;
        match state {
            ElementState::Pressed => {
                if !self.pressed.contains(&button) {
                    self.pressed.push(button);
                }
                AppEvent::MousePressed { x, y, button }
            }
            ElementState::Released => {
                self.pressed.retain(|pressed| *pressed != button);
                AppEvent::MouseReleased { x, y, button }
            }
        }
    }

    pub fn mouse_wheel(&self, delta: MouseScrollDelta) -> AppEvent {
        let (scroll_x, scroll_y) = match delta {
            MouseScrollDelta::LineDelta(x, y) => (x, y),
            MouseScrollDelta::PixelDelta(position) => (position.x as f32, position.y as f32),
        };
        let (x, y) = self.cursor;
        AppEvent::MouseScrolled {
            x,
            y,
            scroll_x,
            scroll_y,
        }
    }

    /// Leaving the window releases every button, winit won't report releases outside of it.
    pub fn cursor_left(&mut self) {
        self.pressed.clear();
    }

    pub fn translate(&mut self, event: &WindowEvent) -> Option<AppEvent> {
        let event = match event {
            WindowEvent::KeyboardInput { event, .. } if !event.repeat => match event.state {
                ElementState::Pressed => AppEvent::KeyPressed(event.logical_key.clone()),
                ElementState::Released => AppEvent::KeyReleased(event.logical_key.clone()),
            },
            WindowEvent::CursorMoved { position, .. } => self.cursor_moved(position.x, position.y),
            WindowEvent::CursorLeft { .. } => {
                self.cursor_left();
                return None;
            }
            WindowEvent::MouseInput { state, button, .. } => self.mouse_button(*state, *button),
            WindowEvent::MouseWheel { delta, .. } => self.mouse_wheel(*delta),
            WindowEvent::Resized(size) => AppEvent::WindowResized {
                width: size.width,
                height: size.height,
            },
            WindowEvent::DroppedFile(path) => {
                let (x, y) = self.cursor;
                AppEvent::FileDropped {
                    path: path.clone(),
                    x,
                    y,
                }
            }
            _ => return None,
        };
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::{PhysicalPosition, PhysicalSize};

    #[test]
    fn move_without_button_is_not_a_drag() {
        let mut input = InputState::default();

        assert_eq!(
            input.cursor_moved(3.0, 4.0),
            AppEvent::MouseMoved { x: 3.0, y: 4.0 }
        );
        assert_eq!(input.cursor(), (3.0, 4.0));
    }

    #[test]
    fn move_with_held_button_is_a_drag() {
        let mut input = InputState::default();
        input.cursor_moved(1.0, 1.0);

        assert_eq!(
            input.mouse_button(ElementState::Pressed, MouseButton::Right),
            AppEvent::MousePressed {
                x: 1.0,
                y: 1.0,
                button: MouseButton::Right
            }
        );
        assert_eq!(
            input.cursor_moved(5.0, 6.0),
            AppEvent::MouseDragged {
                x: 5.0,
                y: 6.0,
                button: MouseButton::Right
            }
        );
        assert_eq!(
            input.mouse_button(ElementState::Released, MouseButton::Right),
            AppEvent::MouseReleased {
                x: 5.0,
                y: 6.0,
                button: MouseButton::Right
            }
        );
        assert!(!input.is_pressed(MouseButton::Right));
        assert_eq!(
            input.cursor_moved(7.0, 8.0),
            AppEvent::MouseMoved { x: 7.0, y: 8.0 }
        );
    }

    #[test]
    fn leaving_the_window_releases_buttons() {
        let mut input = InputState::default();
        input.mouse_button(ElementState::Pressed, MouseButton::Left);

        input.cursor_left();

        assert!(!input.is_pressed(MouseButton::Left));
    }

    #[test]
    fn wheel_deltas_are_reported_at_cursor() {
        let mut input = InputState::default();
        input.cursor_moved(10.0, 20.0);

        assert_eq!(
            input.mouse_wheel(MouseScrollDelta::LineDelta(0.0, -2.0)),
            AppEvent::MouseScrolled {
                x: 10.0,
                y: 20.0,
                scroll_x: 0.0,
                scroll_y: -2.0
            }
        );
        assert_eq!(
            input.mouse_wheel(MouseScrollDelta::PixelDelta(PhysicalPosition::new(4.0, 8.0))),
            AppEvent::MouseScrolled {
                x: 10.0,
                y: 20.0,
                scroll_x: 4.0,
                scroll_y: 8.0
            }
        );
    }

    #[test]
    fn translates_window_events() {
        let mut input = InputState::default();

        assert_eq!(
            input.translate(&WindowEvent::Resized(PhysicalSize::new(800, 600))),
            Some(AppEvent::WindowResized {
                width: 800,
                height: 600
            })
        );
        assert_eq!(
            input.translate(&WindowEvent::DroppedFile(PathBuf::from("a.ttf"))),
            Some(AppEvent::FileDropped {
                path: PathBuf::from("a.ttf"),
                x: 0.0,
                y: 0.0
            })
        );
        assert_eq!(input.translate(&WindowEvent::Focused(true)), None);
    }
}
