//! Represents an OpenGL context and the window or environment around it.

pub mod events;

mod backends;

use serde::{Deserialize, Serialize};

use crate::errors::*;

use self::events::Event;

pub mod prelude {
    pub use super::events::{Event, InputEvent, MouseButton, WindowEvent};
    pub use super::{Window, WindowParams};
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowParams {
    /// Sets the title of window.
    pub title: String,
    /// Sets the size in *points* of the client area of the window.
    pub size: (u32, u32),
    /// Sets the multisampling level to request. A value of 0 indicates that
    /// multisampling must not be enabled.
    pub multisample: u16,
    /// Specifies whether buffer swaps wait for the vertical sync.
    pub vsync: bool,
    /// The core-profile OpenGL version to request.
    pub gl_version: (u8, u8),
}

impl Default for WindowParams {
    fn default() -> Self {
        WindowParams {
            title: "glquad".to_owned(),
            size: (640, 480),
            multisample: 0,
            vsync: true,
            gl_version: (3, 3),
        }
    }
}

pub struct Window {
    visitor: Box<dyn backends::Visitor>,
}

impl Window {
    /// Opens a window and makes its OpenGL context current on this thread.
    pub fn new(params: &WindowParams) -> Result<Self> {
        let visitor = backends::new(params)?;
        Ok(Window { visitor })
    }

    /// Creates a window without any surface, which reports a close request
    /// after being polled `close_after` times.
    pub fn headless(params: &WindowParams, close_after: Option<u64>) -> Self {
        Window {
            visitor: backends::new_headless(params, close_after),
        }
    }

    /// Size of the client area in points.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        self.visitor.dimensions()
    }

    /// The ratio between the backing framebuffer resolution and the window
    /// size in points.
    #[inline]
    pub fn device_pixel_ratio(&self) -> f32 {
        self.visitor.device_pixel_ratio()
    }

    /// Size of the default framebuffer in pixels.
    pub fn framebuffer_size(&self) -> (u32, u32) {
        let (width, height) = self.dimensions();
        let dpr = self.device_pixel_ratio();
        ((width as f32 * dpr) as u32, (height as f32 * dpr) as u32)
    }

    /// Appends every pending event to `events`.
    #[inline]
    pub fn poll_events(&mut self, events: &mut Vec<Event>) {
        self.visitor.poll_events(events)
    }

    #[inline]
    pub fn swap_buffers(&self) -> Result<()> {
        self.visitor.swap_buffers()
    }
}
