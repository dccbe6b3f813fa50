use crate::errors::*;

use super::super::events::{Event, WindowEvent};
use super::Visitor;

/// A window without a surface. It asks to be closed once it has been polled
/// `close_after` times.
pub struct HeadlessVisitor {
    dimensions: (u32, u32),
    close_after: Option<u64>,
    polls: u64,
}

impl HeadlessVisitor {
    pub fn new(dimensions: (u32, u32), close_after: Option<u64>) -> Self {
        HeadlessVisitor {
            dimensions,
            close_after,
            polls: 0,
        }
    }
}

impl Visitor for HeadlessVisitor {
    #[inline]
    fn dimensions(&self) -> (u32, u32) {
        self.dimensions
    }

    #[inline]
    fn device_pixel_ratio(&self) -> f32 {
        1.0
    }

    fn poll_events(&mut self, events: &mut Vec<Event>) {
        self.polls += 1;
        if self.close_after == Some(self.polls) {
            events.push(Event::Window(WindowEvent::Closed));
        }
    }

    #[inline]
    fn swap_buffers(&self) -> Result<()> {
        Ok(())
    }
}
