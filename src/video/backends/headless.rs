//! A backend that draws nothing. It records every request, tracks the
//! current bindings and simulates compiling and linking, which makes it the
//! device of choice for tests.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use crate::errors::*;
use crate::video::assets::prelude::*;
use crate::video::backends::Visitor;
use crate::video::errors::Error as VideoError;
use crate::video::renderer::{BlendFactor, Primitive, SurfaceRect};
use crate::video::ObjectId;

/// One recorded request.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CreateBuffer {
        id: ObjectId,
        target: BufferTarget,
        hint: BufferHint,
        len: usize,
    },
    UpdateBuffer {
        id: ObjectId,
        target: BufferTarget,
        len: usize,
    },
    BindBuffer(BufferTarget, Option<ObjectId>),
    DeleteBuffer(ObjectId),
    CreateVertexArray(ObjectId),
    BindVertexArray(Option<ObjectId>),
    VertexAttribute {
        vertex_array: Option<ObjectId>,
        vertex_buffer: Option<ObjectId>,
        attribute: VertexAttribute,
    },
    DeleteVertexArray(ObjectId),
    CompileShader(ObjectId, ShaderStage),
    LinkProgram(ObjectId, Vec<ObjectId>),
    DeleteShader(ObjectId),
    UseProgram(Option<ObjectId>),
    UniformLocation {
        program: ObjectId,
        name: String,
        location: i32,
    },
    BindUniform {
        program: Option<ObjectId>,
        location: i32,
        variable: UniformVariable,
    },
    DeleteProgram(ObjectId),
    CreateTexture(ObjectId, TextureParams),
    BindTexture(u32, Option<ObjectId>),
    DeleteTexture(ObjectId),
    Blend(Option<(BlendFactor, BlendFactor)>),
    Scissor(Option<SurfaceRect>),
    Viewport(SurfaceRect),
    Clear([f32; 4]),
    Draw(DrawCall),
}

/// The state a draw request observed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DrawCall {
    pub primitive: Primitive,
    pub count: u32,
    pub format: IndexFormat,
    pub offset: usize,
    pub vertex_array: Option<ObjectId>,
    pub index_buffer: Option<ObjectId>,
    pub program: Option<ObjectId>,
}

/// The objects currently bound.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    pub vertex_buffer: Option<ObjectId>,
    pub index_buffer: Option<ObjectId>,
    pub vertex_array: Option<ObjectId>,
    pub program: Option<ObjectId>,
    pub textures: HashMap<u32, ObjectId>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Kind {
    Buffer,
    VertexArray,
    Shader,
    Program,
    Texture,
}

#[derive(Default)]
struct HeadlessState {
    next_id: ObjectId,
    commands: Vec<Command>,
    bindings: Bindings,
    // Element buffer of each vertex array, `None` being the default one.
    element_buffers: HashMap<Option<ObjectId>, ObjectId>,
    objects: HashMap<ObjectId, Kind>,
    sources: HashMap<ObjectId, String>,
    uniforms: HashMap<ObjectId, Vec<String>>,
    pixels: HashMap<ObjectId, Vec<u8>>,
    link_error: Option<String>,
    release_error: Option<String>,
}

impl HeadlessState {
    fn alloc(&mut self, kind: Kind) -> ObjectId {
        self.next_id += 1;
        self.objects.insert(self.next_id, kind);
        self.next_id
    }

    fn expect(&self, id: ObjectId, kind: Kind) -> Result<()> {
        match self.objects.get(&id) {
            Some(&v) if v == kind => Ok(()),
            Some(&v) => bail!("Object {} is a {:?}, not a {:?}.", id, v, kind),
            None => bail!("{:?} {} is not alive.", kind, id),
        }
    }

    fn bind_index_buffer(&mut self, id: Option<ObjectId>) {
        let vertex_array = self.bindings.vertex_array;
        match id {
            Some(id) => self.element_buffers.insert(vertex_array, id),
            None => self.element_buffers.remove(&vertex_array),
        };

        self.bindings.index_buffer = id;
    }

    fn free(&mut self, id: ObjectId, kind: Kind) -> Result<()> {
        self.expect(id, kind)?;
        self.objects.remove(&id);
        Ok(())
    }
}

#[derive(Default)]
pub struct HeadlessVisitor {
    state: RefCell<HeadlessState>,
}

impl HeadlessVisitor {
    pub fn new() -> Self {
        Default::default()
    }

    /// Makes every following link request fail with `log`.
    pub fn fail_link<T: Into<String>>(&self, log: T) {
        self.state.borrow_mut().link_error = Some(log.into());
    }

    /// Makes every following shader release fail with `log`. The shaders
    /// stay alive.
    pub fn fail_shader_release<T: Into<String>>(&self, log: T) {
        self.state.borrow_mut().release_error = Some(log.into());
    }

    /// A copy of every request recorded so far.
    pub fn commands(&self) -> Vec<Command> {
        self.state.borrow().commands.clone()
    }

    /// Drains the recorded requests.
    pub fn take_commands(&self) -> Vec<Command> {
        let mut state = self.state.borrow_mut();
        ::std::mem::replace(&mut state.commands, Vec::new())
    }

    pub fn draw_calls(&self) -> Vec<DrawCall> {
        self.state
            .borrow()
            .commands
            .iter()
            .filter_map(|v| match *v {
                Command::Draw(call) => Some(call),
                _ => None,
            })
            .collect()
    }

    pub fn bindings(&self) -> Bindings {
        self.state.borrow().bindings.clone()
    }

    /// The pixels uploaded into the live texture `id`.
    pub fn texture_pixels(&self, id: ObjectId) -> Option<Vec<u8>> {
        self.state.borrow().pixels.get(&id).cloned()
    }

    /// Number of objects created and not yet released.
    pub fn alive(&self) -> usize {
        self.state.borrow().objects.len()
    }

    fn record(&self, command: Command) {
        self.state.borrow_mut().commands.push(command);
    }
}

/// Collects the names of `uniform` declarations, e.g. `uniform vec4 u_Color;`.
fn uniform_declarations(source: &str) -> Vec<String> {
    let mut names = Vec::new();
    for statement in source.split(';') {
        let mut tokens = statement.split_whitespace();
        if tokens.next() != Some("uniform") {
            continue;
        }

        if let Some(name) = tokens.nth(1) {
            let name = name.split('[').next().unwrap_or(name);
            names.push(name.to_owned());
        }
    }

    names
}

impl Visitor for HeadlessVisitor {
    unsafe fn create_buffer(
        &self,
        target: BufferTarget,
        hint: BufferHint,
        bytes: &[u8],
    ) -> Result<ObjectId> {
        let mut state = self.state.borrow_mut();
        let id = state.alloc(Kind::Buffer);
        state.commands.push(Command::CreateBuffer {
            id,
            target,
            hint,
            len: bytes.len(),
        });

        match target {
            BufferTarget::Vertex => state.bindings.vertex_buffer = Some(id),
            BufferTarget::Index => state.bind_index_buffer(Some(id)),
        }

        Ok(id)
    }

    unsafe fn update_buffer(
        &self,
        target: BufferTarget,
        id: ObjectId,
        _: BufferHint,
        bytes: &[u8],
    ) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.expect(id, Kind::Buffer)?;
        state.commands.push(Command::UpdateBuffer {
            id,
            target,
            len: bytes.len(),
        });

        match target {
            BufferTarget::Vertex => state.bindings.vertex_buffer = Some(id),
            BufferTarget::Index => state.bind_index_buffer(Some(id)),
        }

        Ok(())
    }

    unsafe fn bind_buffer(&self, target: BufferTarget, id: Option<ObjectId>) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if let Some(id) = id {
            state.expect(id, Kind::Buffer)?;
        }

        state.commands.push(Command::BindBuffer(target, id));
        match target {
            BufferTarget::Vertex => state.bindings.vertex_buffer = id,
            BufferTarget::Index => state.bind_index_buffer(id),
        }

        Ok(())
    }

    unsafe fn delete_buffer(&self, id: ObjectId) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.free(id, Kind::Buffer)?;
        state.commands.push(Command::DeleteBuffer(id));

        if state.bindings.vertex_buffer == Some(id) {
            state.bindings.vertex_buffer = None;
        }

        state.element_buffers.retain(|_, v| *v != id);
        if state.bindings.index_buffer == Some(id) {
            state.bindings.index_buffer = None;
        }

        Ok(())
    }

    unsafe fn create_vertex_array(&self) -> Result<ObjectId> {
        let mut state = self.state.borrow_mut();
        let id = state.alloc(Kind::VertexArray);
        state.commands.push(Command::CreateVertexArray(id));
        Ok(id)
    }

    unsafe fn bind_vertex_array(&self, id: Option<ObjectId>) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if let Some(id) = id {
            state.expect(id, Kind::VertexArray)?;
        }

        state.commands.push(Command::BindVertexArray(id));
        state.bindings.vertex_array = id;
        state.bindings.index_buffer = state.element_buffers.get(&id).cloned();
        Ok(())
    }

    unsafe fn vertex_attribute(&self, attribute: VertexAttribute) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let vertex_array = state.bindings.vertex_array;
        let vertex_buffer = state.bindings.vertex_buffer;

        if vertex_array.is_none() || vertex_buffer.is_none() {
            bail!(
                "Attribute {} defined without a bound vertex array and vertex buffer.",
                attribute.index
            );
        }

        state.commands.push(Command::VertexAttribute {
            vertex_array,
            vertex_buffer,
            attribute,
        });

        Ok(())
    }

    unsafe fn delete_vertex_array(&self, id: ObjectId) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.free(id, Kind::VertexArray)?;
        state.commands.push(Command::DeleteVertexArray(id));
        state.element_buffers.remove(&Some(id));

        if state.bindings.vertex_array == Some(id) {
            state.bindings.vertex_array = None;
            state.bindings.index_buffer = state.element_buffers.get(&None).cloned();
        }

        Ok(())
    }

    unsafe fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<ObjectId> {
        if !source.contains("main") {
            let log = format!("0:1(1): error: {} shader has no `main` function", stage);
            return Err(VideoError::ShaderCompile { stage, log }.into());
        }

        let mut state = self.state.borrow_mut();
        let id = state.alloc(Kind::Shader);
        state.sources.insert(id, source.to_owned());
        state.commands.push(Command::CompileShader(id, stage));
        Ok(id)
    }

    unsafe fn link_program(&self, shaders: &[ObjectId]) -> Result<ObjectId> {
        let mut state = self.state.borrow_mut();
        if let Some(log) = state.link_error.clone() {
            return Err(VideoError::ShaderLink(log).into());
        }

        let mut names = Vec::new();
        for &shader in shaders {
            state.expect(shader, Kind::Shader)?;
            for name in uniform_declarations(&state.sources[&shader]) {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }

        let id = state.alloc(Kind::Program);
        state.uniforms.insert(id, names);
        state
            .commands
            .push(Command::LinkProgram(id, shaders.to_vec()));

        Ok(id)
    }

    unsafe fn delete_shader(&self, id: ObjectId) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if let Some(log) = state.release_error.clone() {
            bail!("Failed to release shader {}: {}", id, log);
        }

        state.free(id, Kind::Shader)?;
        state.sources.remove(&id);
        state.commands.push(Command::DeleteShader(id));
        Ok(())
    }

    unsafe fn use_program(&self, id: Option<ObjectId>) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if let Some(id) = id {
            state.expect(id, Kind::Program)?;
        }

        state.commands.push(Command::UseProgram(id));
        state.bindings.program = id;
        Ok(())
    }

    unsafe fn uniform_location(&self, program: ObjectId, name: &str) -> Result<i32> {
        let mut state = self.state.borrow_mut();
        state.expect(program, Kind::Program)?;

        let location = state.uniforms[&program]
            .iter()
            .position(|v| v == name)
            .map(|v| v as i32)
            .unwrap_or(-1);

        state.commands.push(Command::UniformLocation {
            program,
            name: name.to_owned(),
            location,
        });

        Ok(location)
    }

    unsafe fn bind_uniform(&self, location: i32, variable: &UniformVariable) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let program = state.bindings.program;
        if program.is_none() {
            bail!("Uniform {} uploaded without a bound program.", location);
        }

        state.commands.push(Command::BindUniform {
            program,
            location,
            variable: *variable,
        });

        Ok(())
    }

    unsafe fn delete_program(&self, id: ObjectId) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.free(id, Kind::Program)?;
        state.uniforms.remove(&id);
        state.commands.push(Command::DeleteProgram(id));

        if state.bindings.program == Some(id) {
            state.bindings.program = None;
        }

        Ok(())
    }

    unsafe fn create_texture(&self, params: &TextureParams, pixels: &[u8]) -> Result<ObjectId> {
        let mut state = self.state.borrow_mut();
        let id = state.alloc(Kind::Texture);
        state.pixels.insert(id, pixels.to_vec());
        state.commands.push(Command::CreateTexture(id, *params));
        Ok(id)
    }

    unsafe fn bind_texture(&self, slot: u32, id: Option<ObjectId>) -> Result<()> {
        let mut state = self.state.borrow_mut();
        match id {
            Some(id) => {
                state.expect(id, Kind::Texture)?;
                state.bindings.textures.insert(slot, id);
            }
            None => {
                state.bindings.textures.remove(&slot);
            }
        }

        state.commands.push(Command::BindTexture(slot, id));
        Ok(())
    }

    unsafe fn delete_texture(&self, id: ObjectId) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.free(id, Kind::Texture)?;
        state.pixels.remove(&id);
        state.bindings.textures.retain(|_, v| *v != id);
        state.commands.push(Command::DeleteTexture(id));
        Ok(())
    }

    unsafe fn set_blend(&self, blend: Option<(BlendFactor, BlendFactor)>) -> Result<()> {
        self.record(Command::Blend(blend));
        Ok(())
    }

    unsafe fn set_scissor(&self, rect: Option<SurfaceRect>) -> Result<()> {
        self.record(Command::Scissor(rect));
        Ok(())
    }

    unsafe fn set_viewport(&self, rect: SurfaceRect) -> Result<()> {
        self.record(Command::Viewport(rect));
        Ok(())
    }

    unsafe fn clear(&self, color: [f32; 4]) -> Result<()> {
        self.record(Command::Clear(color));
        Ok(())
    }

    unsafe fn draw_elements(
        &self,
        primitive: Primitive,
        count: u32,
        format: IndexFormat,
        offset: usize,
    ) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let call = DrawCall {
            primitive,
            count,
            format,
            offset,
            vertex_array: state.bindings.vertex_array,
            index_buffer: state.bindings.index_buffer,
            program: state.bindings.program,
        };

        if call.vertex_array.is_none() || call.index_buffer.is_none() || call.program.is_none() {
            bail!("Draw call issued with incomplete bindings {:?}.", call);
        }

        state.commands.push(Command::Draw(call));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniforms() {
        let source = "uniform vec4 u_Color;\nuniform mat4 u_MVP;uniform sampler2D u_Textures[2];\nvoid main() {}";
        assert_eq!(
            uniform_declarations(source),
            vec!["u_Color", "u_MVP", "u_Textures"]
        );
    }

    #[test]
    fn double_free() {
        let visitor = HeadlessVisitor::new();
        unsafe {
            let id = visitor
                .create_buffer(BufferTarget::Vertex, BufferHint::Immutable, &[0; 8])
                .unwrap();
            assert_eq!(visitor.alive(), 1);

            visitor.delete_buffer(id).unwrap();
            assert_eq!(visitor.alive(), 0);
            assert!(visitor.delete_buffer(id).is_err());
        }
    }

    #[test]
    fn element_buffer_per_vertex_array() {
        let visitor = HeadlessVisitor::new();
        unsafe {
            let first = visitor.create_vertex_array().unwrap();
            let second = visitor.create_vertex_array().unwrap();

            visitor.bind_vertex_array(Some(first)).unwrap();
            let ib = visitor
                .create_buffer(BufferTarget::Index, BufferHint::Immutable, &[0; 12])
                .unwrap();

            visitor.bind_vertex_array(Some(second)).unwrap();
            assert_eq!(visitor.bindings().index_buffer, None);

            visitor.bind_vertex_array(None).unwrap();
            assert_eq!(visitor.bindings().index_buffer, None);

            visitor.bind_vertex_array(Some(first)).unwrap();
            assert_eq!(visitor.bindings().index_buffer, Some(ib));

            visitor.delete_buffer(ib).unwrap();
            visitor.bind_vertex_array(Some(second)).unwrap();
            visitor.bind_vertex_array(Some(first)).unwrap();
            assert_eq!(visitor.bindings().index_buffer, None);
        }
    }

    #[test]
    fn mismatched_kind() {
        let visitor = HeadlessVisitor::new();
        unsafe {
            let id = visitor.create_vertex_array().unwrap();
            assert!(visitor.bind_buffer(BufferTarget::Index, Some(id)).is_err());
            assert!(visitor.bind_vertex_array(Some(id)).is_ok());
        }
    }
}
