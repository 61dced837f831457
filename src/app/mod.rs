//! Application lifecycle.
//!
//! [`System`] owns the window, the Vulkan objects and the imgui context, and drives an
//! [`App`] through its hooks: `setup` once before the first frame, then `update` and `draw`
//! every frame, plus input, window and message callbacks as events arrive.

mod input;
mod system;
mod vulkan;

pub use input::*;
pub use system::*;
pub use vulkan::*;

use crate::ShowcaseResult;
use imgui::{Context, Ui};
use std::{path::Path, time::Duration};
use winit::{event::MouseButton, keyboard::Key};

pub trait App {
    /// Called once, before the first frame. Fonts must be registered here, the atlas
    /// texture is rebuilt right after.
    fn setup(&mut self, _imgui: &mut Context, _hidpi_factor: f64) -> ShowcaseResult<()> {
        Ok(())
    }

    fn update(&mut self, _delta: Duration) {}

    fn draw(&mut self, ui: &Ui);

    fn key_pressed(&mut self, _key: &Key) {}

    fn key_released(&mut self, _key: &Key) {}

    fn mouse_moved(&mut self, _x: f64, _y: f64) {}

    fn mouse_dragged(&mut self, _x: f64, _y: f64, _button: MouseButton) {}

    fn mouse_pressed(&mut self, _x: f64, _y: f64, _button: MouseButton) {}

    fn mouse_released(&mut self, _x: f64, _y: f64, _button: MouseButton) {}

    fn mouse_scrolled(&mut self, _x: f64, _y: f64, _scroll_x: f32, _scroll_y: f32) {}

    fn window_resized(&mut self, _width: u32, _height: u32) {}

    fn got_message(&mut self, _message: &str) {}

    fn drag_event(&mut self, _path: &Path, _x: f64, _y: f64) {}

    /// Release Vulkan resources created by the app. The device is idle when called.
    fn destroy(&mut self, _context: &VulkanContext) {}
}

/// Calls the hook of `app` matching `event`.
pub fn dispatch<A: App + ?Sized>(app: &mut A, event: &AppEvent) {
    match event {
        AppEvent::KeyPressed(key) => app.key_pressed(key),
        AppEvent::KeyReleased(key) => app.key_released(key),
        AppEvent::MouseMoved { x, y } => app.mouse_moved(*x, *y),
        AppEvent::MouseDragged { x, y, button } => app.mouse_dragged(*x, *y, *button),
        AppEvent::MousePressed { x, y, button } => app.mouse_pressed(*x, *y, *button),
        AppEvent::MouseReleased { x, y, button } => app.mouse_released(*x, *y, *button),
        AppEvent::MouseScrolled {
            x,
            y,
            scroll_x,
            scroll_y,
        } => app.mouse_scrolled(*x, *y, *scroll_x, *scroll_y),
        AppEvent::WindowResized { width, height } => app.window_resized(*width, *height),
        AppEvent::Message(message) => app.got_message(message),
        AppEvent::FileDropped { path, x, y } => app.drag_event(path, *x, *y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use winit::keyboard::NamedKey;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl App for Recorder {
        fn draw(&mut self, _ui: &Ui) {}

        fn key_pressed(&mut self, key: &Key) {
            self.calls.push(format!("key_pressed {:?}", key));
        }

        fn mouse_dragged(&mut self, x: f64, y: f64, button: MouseButton) {
            self.calls.push(format!("mouse_dragged {x} {y} {:?}", button));
        }

        fn mouse_scrolled(&mut self, _x: f64, _y: f64, scroll_x: f32, scroll_y: f32) {
            self.calls.push(format!("mouse_scrolled {scroll_x} {scroll_y}"));
        }

        fn got_message(&mut self, message: &str) {
            self.calls.push(format!("got_message {message}"));
        }

        fn drag_event(&mut self, path: &Path, _x: f64, _y: f64) {
            self.calls.push(format!("drag_event {}", path.display()));
        }
    }

    #[test]
    fn dispatch_routes_events_to_hooks() {
        let mut app = Recorder::default();

        for event in [
            AppEvent::KeyPressed(Key::Named(NamedKey::Escape)),
            AppEvent::MouseDragged {
                x: 1.0,
                y: 2.0,
                button: MouseButton::Left,
            },
            AppEvent::MouseScrolled {
                x: 0.0,
                y: 0.0,
                scroll_x: 0.0,
                scroll_y: -1.0,
            },
            AppEvent::Message("hello".to_owned()),
            AppEvent::FileDropped {
                path: PathBuf::from("font.ttf"),
                x: 0.0,
                y: 0.0,
            },
        ] {
            dispatch(&mut app, &event);
        }

        assert_eq!(
            app.calls,
            vec![
                "key_pressed Named(Escape)",
                "mouse_dragged 1 2 Left",
                "mouse_scrolled 0 -1",
                "got_message hello",
                "drag_event font.ttf",
            ]
        );
    }

    #[test]
    fn default_hooks_ignore_events() {
        struct Silent;
        impl App for Silent {
            fn draw(&mut self, _ui: &Ui) {}
        }

        let mut app = Silent;
        dispatch(
            &mut app,
            &AppEvent::WindowResized {
                width: 10,
                height: 10,
            },
        );
        dispatch(&mut app, &AppEvent::KeyReleased(Key::Named(NamedKey::Enter)));
    }
}
