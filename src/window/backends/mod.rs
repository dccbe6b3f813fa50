mod glutin;
mod headless;

use crate::errors::*;

use super::events::Event;
use super::WindowParams;

pub trait Visitor {
    /// Size of the client area in points.
    fn dimensions(&self) -> (u32, u32);
    fn device_pixel_ratio(&self) -> f32;
    fn poll_events(&mut self, events: &mut Vec<Event>);
    fn swap_buffers(&self) -> Result<()>;
}

/// Creates a window with an OpenGL context, makes the context current and
/// loads the GL function pointers.
pub fn new(params: &WindowParams) -> Result<Box<dyn Visitor>> {
    let visitor = self::glutin::GlutinVisitor::new(params)?;
    Ok(Box::new(visitor))
}

pub fn new_headless(params: &WindowParams, close_after: Option<u64>) -> Box<dyn Visitor> {
    Box::new(self::headless::HeadlessVisitor::new(params.size, close_after))
}
