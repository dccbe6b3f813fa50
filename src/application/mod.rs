//! The frame loop.
//!
//! An `Engine` owns the window and the video backend. `Engine::run` drives an
//! `Application` through a single-threaded poll-render-swap cycle until the
//! window asks to be closed:
//!
//! 1. `Application::on_update` renders the frame;
//! 2. the back buffer is swapped, waiting for vsync if requested;
//! 3. pending events are polled and forwarded to `Application::on_event`.

pub mod pulse;
pub mod time;

use std::time::Instant;

use crate::errors::*;
use crate::settings::Settings;
use crate::video::backends;
use crate::video::renderer::SurfaceRect;
use crate::video::SharedVisitor;
use crate::window::events::{Event, WindowEvent};
use crate::window::Window;

use self::time::{FrameInfo, FrameTimer};

pub mod prelude {
    pub use super::pulse::ColorPulse;
    pub use super::time::FrameInfo;
    pub use super::{Application, Engine};
}

pub trait Application {
    /// Renders one frame.
    fn on_update(&mut self, info: &FrameInfo) -> Result<()>;

    /// Receives every polled event, after the engine has handled it.
    fn on_event(&mut self, _: &Event) -> Result<()> {
        Ok(())
    }

    /// Called once after the last frame, while the context is still alive.
    fn on_exit(&mut self) {}
}

pub struct Engine {
    video: SharedVisitor,
    window: Window,
    timer: FrameTimer,
}

impl Engine {
    /// Opens the window described by `settings` and sets up the OpenGL backend.
    pub fn new(settings: &Settings) -> Result<Self> {
        let window = Window::new(&settings.window)?;
        let video = unsafe { backends::new()? };
        Self::with(window, video)
    }

    /// Sets up an engine over existing backends, e.g. a headless window and
    /// a `HeadlessVisitor`.
    pub fn with(window: Window, video: SharedVisitor) -> Result<Self> {
        let (width, height) = window.framebuffer_size();
        unsafe { video.set_viewport(SurfaceRect::new(0, 0, width, height))? };

        Ok(Engine {
            video,
            window,
            timer: FrameTimer::new(),
        })
    }

    #[inline]
    pub fn video(&self) -> &SharedVisitor {
        &self.video
    }

    #[inline]
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Runs `app` until the window is closed or a callback fails. The
    /// application is dropped before the window, so its GPU objects are
    /// released while the context is still alive.
    pub fn run<A: Application>(mut self, mut app: A) -> Result<()> {
        let result = self.run_loop(&mut app);

        app.on_exit();
        drop(app);

        info!("Exited after {} frames.", self.timer.frames());
        result
    }

    fn run_loop<A: Application>(&mut self, app: &mut A) -> Result<()> {
        let mut events = Vec::new();
        let mut alive = true;

        while alive {
            let (index, delta, fps) = self.timer.advance(Instant::now());
            let info = FrameInfo {
                index,
                delta,
                fps,
                dimensions: self.window.dimensions(),
                framebuffer: self.window.framebuffer_size(),
                device_pixel_ratio: self.window.device_pixel_ratio(),
            };

            app.on_update(&info)?;
            self.window.swap_buffers()?;

            events.clear();
            self.window.poll_events(&mut events);

            for event in &events {
                match *event {
                    Event::Window(WindowEvent::Closed) => alive = false,
                    Event::Window(WindowEvent::Resized(..)) => {
                        let (width, height) = self.window.framebuffer_size();
                        debug!("Resized framebuffer to {}x{}.", width, height);
                        unsafe {
                            self.video
                                .set_viewport(SurfaceRect::new(0, 0, width, height))?
                        };
                    }
                    _ => {}
                }

                app.on_event(event)?;
            }
        }

        Ok(())
    }
}
