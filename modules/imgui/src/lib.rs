//! Immediate-mode debug UI for `glquad`, backed by [imgui](https://github.com/imgui-rs/imgui-rs).
//!
//! `ImGuiLayer` owns the imgui context and its renderer. Feed it every polled
//! event with `handle_event`, and build the widgets of a frame inside `frame`:
//!
//! ```rust,ignore
//! self.ui.frame(info, |ui| {
//!     ui.window("Debug").build(|| {
//!         ui.slider_config("Translation", -1.0, 1.0)
//!             .build_array(&mut translation[..]);
//!     });
//! })?;
//! ```

#[macro_use]
extern crate log;

#[doc(hidden)]
pub use imgui::*;

mod renderer;

use glquad::application::time::FrameInfo;
use glquad::errors::*;
use glquad::video::SharedVisitor;
use glquad::window::events::{Event, InputEvent, MouseButton, WindowEvent};

use self::renderer::Renderer;

pub struct ImGuiLayer {
    renderer: Renderer,
    context: imgui::Context,
}

impl ImGuiLayer {
    pub fn new(video: &SharedVisitor) -> Result<Self> {
        let mut context = imgui::Context::create();
        context.set_ini_filename(None);

        let renderer = Renderer::new(video, &mut context)?;
        info!("Created imgui layer.");

        Ok(ImGuiLayer { renderer, context })
    }

    /// Forwards the mouse input of `event` to imgui.
    pub fn handle_event(&mut self, event: &Event) {
        let io = self.context.io_mut();
        match *event {
            Event::InputDevice(InputEvent::MouseMoved { position }) => {
                io.add_mouse_pos_event([position.0, position.1]);
            }
            Event::InputDevice(InputEvent::MousePressed { button }) => {
                if let Some(button) = from_mouse_button(button) {
                    io.add_mouse_button_event(button, true);
                }
            }
            Event::InputDevice(InputEvent::MouseReleased { button }) => {
                if let Some(button) = from_mouse_button(button) {
                    io.add_mouse_button_event(button, false);
                }
            }
            Event::InputDevice(InputEvent::MouseWheel { delta }) => {
                io.add_mouse_wheel_event([delta.0, delta.1]);
            }
            Event::Window(WindowEvent::LostFocus) => {
                for &button in &[
                    imgui::MouseButton::Left,
                    imgui::MouseButton::Right,
                    imgui::MouseButton::Middle,
                ] {
                    io.add_mouse_button_event(button, false);
                }
            }
            _ => {}
        }
    }

    /// Starts a new ui frame, lets `f` build its widgets and draws the
    /// result over the current framebuffer.
    pub fn frame<F>(&mut self, info: &FrameInfo, f: F) -> Result<()>
    where
        F: FnOnce(&Ui),
    {
        {
            let io = self.context.io_mut();
            let (width, height) = info.dimensions;
            io.display_size = [width as f32, height as f32];
            io.display_framebuffer_scale = [info.device_pixel_ratio; 2];
            if info.delta.as_secs() > 0 || info.delta.subsec_nanos() > 0 {
                io.update_delta_time(info.delta);
            }
        }

        let ui = self.context.new_frame();
        f(ui);

        let draw_data = self.context.render();
        self.renderer.render(draw_data)
    }
}

fn from_mouse_button(button: MouseButton) -> Option<imgui::MouseButton> {
    match button {
        MouseButton::Left => Some(imgui::MouseButton::Left),
        MouseButton::Right => Some(imgui::MouseButton::Right),
        MouseButton::Middle => Some(imgui::MouseButton::Middle),
        MouseButton::Other(0) => Some(imgui::MouseButton::Extra1),
        MouseButton::Other(1) => Some(imgui::MouseButton::Extra2),
        MouseButton::Other(_) => None,
    }
}
