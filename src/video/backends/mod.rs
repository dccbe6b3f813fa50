//! The backend of the video layer, which should be responsible for only one
//! thing: forwarding the wrappers' requests to the graphics driver.

pub mod gl;
pub mod headless;

use std::rc::Rc;

use crate::errors::*;
use crate::video::assets::prelude::*;
use crate::video::renderer::{BlendFactor, Primitive, SurfaceRect};
use crate::video::{ObjectId, SharedVisitor};

/// The GPU calls the wrappers are built upon.
///
/// # Safety
///
/// Implementations backed by a real driver require the owning context to be
/// current on the calling thread.
pub trait Visitor {
    /// Creates a buffer, binds it to `target` and uploads `bytes`.
    unsafe fn create_buffer(&self, target: BufferTarget, hint: BufferHint, bytes: &[u8])
        -> Result<ObjectId>;

    /// Binds the buffer `id` to `target` and re-specifies its whole storage.
    unsafe fn update_buffer(
        &self,
        target: BufferTarget,
        id: ObjectId,
        hint: BufferHint,
        bytes: &[u8],
    ) -> Result<()>;

    unsafe fn bind_buffer(&self, target: BufferTarget, id: Option<ObjectId>) -> Result<()>;

    unsafe fn delete_buffer(&self, id: ObjectId) -> Result<()>;

    unsafe fn create_vertex_array(&self) -> Result<ObjectId>;

    unsafe fn bind_vertex_array(&self, id: Option<ObjectId>) -> Result<()>;

    /// Enables and defines one attribute of the bound vertex array, sourced
    /// from the bound vertex buffer.
    unsafe fn vertex_attribute(&self, attribute: VertexAttribute) -> Result<()>;

    unsafe fn delete_vertex_array(&self, id: ObjectId) -> Result<()>;

    /// Compiles one stage. Failures carry the compiler log.
    unsafe fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<ObjectId>;

    /// Links compiled stages into a program. Failures carry the linker log.
    unsafe fn link_program(&self, shaders: &[ObjectId]) -> Result<ObjectId>;

    unsafe fn delete_shader(&self, id: ObjectId) -> Result<()>;

    unsafe fn use_program(&self, id: Option<ObjectId>) -> Result<()>;

    /// Returns the location of uniform `name`, or -1 if it is not active.
    unsafe fn uniform_location(&self, program: ObjectId, name: &str) -> Result<i32>;

    /// Uploads `variable` to `location` of the bound program.
    unsafe fn bind_uniform(&self, location: i32, variable: &UniformVariable) -> Result<()>;

    unsafe fn delete_program(&self, id: ObjectId) -> Result<()>;

    unsafe fn create_texture(&self, params: &TextureParams, pixels: &[u8]) -> Result<ObjectId>;

    unsafe fn bind_texture(&self, slot: u32, id: Option<ObjectId>) -> Result<()>;

    unsafe fn delete_texture(&self, id: ObjectId) -> Result<()>;

    unsafe fn set_blend(&self, blend: Option<(BlendFactor, BlendFactor)>) -> Result<()>;

    unsafe fn set_scissor(&self, rect: Option<SurfaceRect>) -> Result<()>;

    unsafe fn set_viewport(&self, rect: SurfaceRect) -> Result<()>;

    unsafe fn clear(&self, color: [f32; 4]) -> Result<()>;

    /// Draws `count` indices of the bound index buffer, starting `offset`
    /// bytes into it.
    unsafe fn draw_elements(
        &self,
        primitive: Primitive,
        count: u32,
        format: IndexFormat,
        offset: usize,
    ) -> Result<()>;
}

/// Creates the OpenGL backend.
///
/// # Safety
///
/// The GL function pointers must be loaded and a context made current.
pub unsafe fn new() -> Result<SharedVisitor> {
    let visitor = self::gl::visitor::GLVisitor::new()?;
    Ok(Rc::new(visitor))
}

pub fn new_headless() -> SharedVisitor {
    Rc::new(self::headless::HeadlessVisitor::new())
}
