//! Submits draw calls. The renderer forwards every request to the backend as
//! is; nothing is batched, sorted or culled.

use crate::errors::*;
use crate::video::assets::{IndexBuffer, Shader, VertexArray};
use crate::video::SharedVisitor;

/// How vertices are assembled into primitives.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Primitive {
    Triangles,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BlendFactor {
    Zero,
    One,
    SourceAlpha,
    OneMinusSourceAlpha,
}

/// A rectangle in framebuffer pixels, origin at the lower-left corner.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SurfaceRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl SurfaceRect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        SurfaceRect {
            x,
            y,
            width,
            height,
        }
    }
}

pub struct Renderer {
    video: SharedVisitor,
    clear_color: [f32; 4],
}

impl Renderer {
    pub fn new(video: &SharedVisitor) -> Self {
        Renderer {
            video: video.clone(),
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }

    #[inline]
    pub fn set_clear_color(&mut self, color: [f32; 4]) {
        self.clear_color = color;
    }

    #[inline]
    pub fn clear_color(&self) -> [f32; 4] {
        self.clear_color
    }

    /// Clears the color buffer of the default framebuffer.
    #[inline]
    pub fn clear(&self) -> Result<()> {
        unsafe { self.video.clear(self.clear_color) }
    }

    /// Binds the three objects and draws every index of `ib` as triangles.
    pub fn draw(&self, va: &VertexArray, ib: &IndexBuffer, shader: &Shader) -> Result<()> {
        self.draw_range(va, ib, shader, 0, ib.count())
    }

    /// Like `draw`, but only submits `count` indices starting at index `first`.
    pub fn draw_range(
        &self,
        va: &VertexArray,
        ib: &IndexBuffer,
        shader: &Shader,
        first: u32,
        count: u32,
    ) -> Result<()> {
        if first.checked_add(count).map_or(true, |end| end > ib.count()) {
            bail!(
                "Index range of {} indices from {} is out of bounds of index buffer {} ({} indices).",
                count,
                first,
                ib.id(),
                ib.count()
            );
        }

        shader.bind()?;
        va.bind()?;
        ib.bind()?;

        let offset = first as usize * ib.format().stride();
        unsafe {
            self.video
                .draw_elements(Primitive::Triangles, count, ib.format(), offset)
        }
    }

    /// Enables blending with `(source, destination)` factors, or disables it.
    #[inline]
    pub fn set_blend(&self, blend: Option<(BlendFactor, BlendFactor)>) -> Result<()> {
        unsafe { self.video.set_blend(blend) }
    }

    /// Restricts drawing to `rect`, or lifts the restriction.
    #[inline]
    pub fn set_scissor(&self, rect: Option<SurfaceRect>) -> Result<()> {
        unsafe { self.video.set_scissor(rect) }
    }

    #[inline]
    pub fn set_viewport(&self, rect: SurfaceRect) -> Result<()> {
        unsafe { self.video.set_viewport(rect) }
    }
}
