use glutin::GlContext;

use crate::errors::*;

use super::super::super::events::Event;
use super::super::super::WindowParams;
use super::super::Visitor;
use super::types;

pub struct GlutinVisitor {
    window: glutin::GlWindow,
    events_loop: glutin::EventsLoop,
}

impl GlutinVisitor {
    pub fn new(params: &WindowParams) -> Result<Self> {
        let builder = glutin::WindowBuilder::new()
            .with_title(params.title.clone())
            .with_dimensions(glutin::dpi::LogicalSize::new(
                f64::from(params.size.0),
                f64::from(params.size.1),
            ));

        let (major, minor) = params.gl_version;
        let context = glutin::ContextBuilder::new()
            .with_gl(glutin::GlRequest::Specific(glutin::Api::OpenGl, (major, minor)))
            .with_gl_profile(glutin::GlProfile::Core)
            .with_multisampling(params.multisample)
            .with_vsync(params.vsync);

        let events_loop = glutin::EventsLoop::new();
        let window = glutin::GlWindow::new(builder, context, &events_loop)
            .map_err(|err| format_err!("Failed to create window {:?}: {}", params.title, err))?;

        unsafe {
            window
                .make_current()
                .map_err(|err| format_err!("Failed to activate GL context: {}", err))?;
            gl::load_with(|symbol| window.get_proc_address(symbol) as *const _);
        }

        info!(
            "Created window {:?} ({}x{}, OpenGL {}.{} core, vsync {}).",
            params.title, params.size.0, params.size.1, major, minor, params.vsync
        );

        Ok(GlutinVisitor {
            window,
            events_loop,
        })
    }
}

impl Visitor for GlutinVisitor {
    #[inline]
    fn dimensions(&self) -> (u32, u32) {
        self.window
            .get_inner_size()
            .map(|v| (v.width as u32, v.height as u32))
            .unwrap_or((0, 0))
    }

    #[inline]
    fn device_pixel_ratio(&self) -> f32 {
        self.window.get_hidpi_factor() as f32
    }

    fn poll_events(&mut self, events: &mut Vec<Event>) {
        let window = &self.window;
        self.events_loop.poll_events(|v| {
            if let glutin::Event::WindowEvent {
                event: glutin::WindowEvent::Resized(size),
                ..
            } = v
            {
                window.resize(size.to_physical(window.get_hidpi_factor()));
            }

            if let Some(e) = types::from_event(v) {
                events.push(e);
            }
        });
    }

    #[inline]
    fn swap_buffers(&self) -> Result<()> {
        self.window
            .swap_buffers()
            .map_err(|err| format_err!("Failed to swap buffers: {}", err))
    }
}
