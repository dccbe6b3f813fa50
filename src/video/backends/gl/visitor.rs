use std::ffi::CString;
use std::os::raw::c_void;
use std::ptr;

use gl::types::*;

use crate::errors::*;
use crate::video::assets::prelude::*;
use crate::video::backends::Visitor;
use crate::video::errors::Error as VideoError;
use crate::video::renderer::{BlendFactor, Primitive, SurfaceRect};
use crate::video::ObjectId;

use super::capabilities::Capabilities;
use super::types;

/// Forwards every request to the OpenGL context current on this thread.
pub struct GLVisitor {
    capabilities: Capabilities,
}

impl GLVisitor {
    pub unsafe fn new() -> Result<Self> {
        let capabilities = Capabilities::parse()?;
        info!("GLVisitor {:#?}", capabilities);

        if !capabilities.has_vertex_array() {
            return Err(VideoError::Unsupported(format!(
                "vertex array objects (found {:?})",
                capabilities.version
            ))
            .into());
        }

        gl_call!(gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1));
        Ok(GLVisitor { capabilities })
    }

    #[inline]
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    unsafe fn buffer_data(target: BufferTarget, hint: BufferHint, bytes: &[u8]) -> Result<()> {
        let data = if bytes.is_empty() {
            ptr::null()
        } else {
            bytes.as_ptr() as *const c_void
        };

        gl_call!(gl::BufferData(
            target.into(),
            bytes.len() as GLsizeiptr,
            data,
            hint.into()
        ));

        Ok(())
    }

    unsafe fn shader_log(id: GLuint) -> String {
        let mut len = 0;
        gl::GetShaderiv(id, gl::INFO_LOG_LENGTH, &mut len);
        if len <= 0 {
            return String::new();
        }

        let mut buf = vec![0u8; len as usize];
        let mut written = 0;
        gl::GetShaderInfoLog(id, len, &mut written, buf.as_mut_ptr() as *mut GLchar);
        buf.truncate(written.max(0) as usize);
        String::from_utf8_lossy(&buf).into_owned()
    }

    unsafe fn program_log(id: GLuint) -> String {
        let mut len = 0;
        gl::GetProgramiv(id, gl::INFO_LOG_LENGTH, &mut len);
        if len <= 0 {
            return String::new();
        }

        let mut buf = vec![0u8; len as usize];
        let mut written = 0;
        gl::GetProgramInfoLog(id, len, &mut written, buf.as_mut_ptr() as *mut GLchar);
        buf.truncate(written.max(0) as usize);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl Visitor for GLVisitor {
    unsafe fn create_buffer(
        &self,
        target: BufferTarget,
        hint: BufferHint,
        bytes: &[u8],
    ) -> Result<ObjectId> {
        let mut id = 0;
        gl_call!(gl::GenBuffers(1, &mut id));
        assert!(id != 0);

        gl_call!(gl::BindBuffer(target.into(), id));
        Self::buffer_data(target, hint, bytes)?;
        Ok(id)
    }

    unsafe fn update_buffer(
        &self,
        target: BufferTarget,
        id: ObjectId,
        hint: BufferHint,
        bytes: &[u8],
    ) -> Result<()> {
        gl_call!(gl::BindBuffer(target.into(), id));
        Self::buffer_data(target, hint, bytes)
    }

    unsafe fn bind_buffer(&self, target: BufferTarget, id: Option<ObjectId>) -> Result<()> {
        gl_call!(gl::BindBuffer(target.into(), id.unwrap_or(0)));
        Ok(())
    }

    unsafe fn delete_buffer(&self, id: ObjectId) -> Result<()> {
        gl_call!(gl::DeleteBuffers(1, &id));
        Ok(())
    }

    unsafe fn create_vertex_array(&self) -> Result<ObjectId> {
        let mut id = 0;
        gl_call!(gl::GenVertexArrays(1, &mut id));
        assert!(id != 0);
        Ok(id)
    }

    unsafe fn bind_vertex_array(&self, id: Option<ObjectId>) -> Result<()> {
        gl_call!(gl::BindVertexArray(id.unwrap_or(0)));
        Ok(())
    }

    unsafe fn vertex_attribute(&self, attribute: VertexAttribute) -> Result<()> {
        gl_call!(gl::EnableVertexAttribArray(attribute.index));
        gl_call!(gl::VertexAttribPointer(
            attribute.index,
            attribute.count as GLint,
            attribute.format.into(),
            attribute.normalized as GLboolean,
            attribute.stride as GLsizei,
            attribute.offset as usize as *const c_void
        ));

        Ok(())
    }

    unsafe fn delete_vertex_array(&self, id: ObjectId) -> Result<()> {
        gl_call!(gl::DeleteVertexArrays(1, &id));
        Ok(())
    }

    unsafe fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<ObjectId> {
        let c_str = CString::new(source.as_bytes())
            .map_err(|_| format_err!("The {} shader source contains a nul byte.", stage))?;

        let id = gl_call!(gl::CreateShader(stage.into()));
        gl_call!(gl::ShaderSource(id, 1, &c_str.as_ptr(), ptr::null()));
        gl_call!(gl::CompileShader(id));

        let mut status = GLint::from(gl::FALSE);
        gl::GetShaderiv(id, gl::COMPILE_STATUS, &mut status);

        if status != GLint::from(gl::TRUE) {
            let log = Self::shader_log(id);
            gl::DeleteShader(id);
            return Err(VideoError::ShaderCompile { stage, log }.into());
        }

        Ok(id)
    }

    unsafe fn link_program(&self, shaders: &[ObjectId]) -> Result<ObjectId> {
        let id = gl_call!(gl::CreateProgram());
        for &shader in shaders {
            gl_call!(gl::AttachShader(id, shader));
        }

        gl_call!(gl::LinkProgram(id));

        let mut status = GLint::from(gl::FALSE);
        gl::GetProgramiv(id, gl::LINK_STATUS, &mut status);

        if status != GLint::from(gl::TRUE) {
            let log = Self::program_log(id);
            gl::DeleteProgram(id);
            return Err(VideoError::ShaderLink(log).into());
        }

        for &shader in shaders {
            gl_call!(gl::DetachShader(id, shader));
        }

        Ok(id)
    }

    unsafe fn delete_shader(&self, id: ObjectId) -> Result<()> {
        gl_call!(gl::DeleteShader(id));
        Ok(())
    }

    unsafe fn use_program(&self, id: Option<ObjectId>) -> Result<()> {
        gl_call!(gl::UseProgram(id.unwrap_or(0)));
        Ok(())
    }

    unsafe fn uniform_location(&self, program: ObjectId, name: &str) -> Result<i32> {
        let c_name = CString::new(name.as_bytes())
            .map_err(|_| format_err!("Uniform name {:?} contains a nul byte.", name))?;

        let location = gl_call!(gl::GetUniformLocation(program, c_name.as_ptr()));
        Ok(location)
    }

    unsafe fn bind_uniform(&self, location: i32, variable: &UniformVariable) -> Result<()> {
        match *variable {
            UniformVariable::I32(v) => gl_call!(gl::Uniform1i(location, v)),
            UniformVariable::F32(v) => gl_call!(gl::Uniform1f(location, v)),
            UniformVariable::Vector4f(v) => gl_call!(gl::Uniform4f(location, v[0], v[1], v[2], v[3])),
            UniformVariable::Matrix4f(ref v, transpose) => {
                let transpose = if transpose { gl::TRUE } else { gl::FALSE };
                gl_call!(gl::UniformMatrix4fv(location, 1, transpose, v[0].as_ptr()))
            }
        }

        Ok(())
    }

    unsafe fn delete_program(&self, id: ObjectId) -> Result<()> {
        gl_call!(gl::DeleteProgram(id));
        Ok(())
    }

    unsafe fn create_texture(&self, params: &TextureParams, pixels: &[u8]) -> Result<ObjectId> {
        let mut id = 0;
        gl_call!(gl::GenTextures(1, &mut id));
        assert!(id != 0);

        gl_call!(gl::BindTexture(gl::TEXTURE_2D, id));

        let filter: GLenum = params.filter.into();
        let wrap: GLenum = params.wrap.into();
        gl_call!(gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, filter as GLint));
        gl_call!(gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, filter as GLint));
        gl_call!(gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, wrap as GLint));
        gl_call!(gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, wrap as GLint));

        let (internal_format, format, pixel_type) = types::texture_format(params.format);
        gl_call!(gl::TexImage2D(
            gl::TEXTURE_2D,
            0,
            internal_format as GLint,
            params.dimensions.0 as GLsizei,
            params.dimensions.1 as GLsizei,
            0,
            format,
            pixel_type,
            pixels.as_ptr() as *const c_void
        ));

        gl_call!(gl::BindTexture(gl::TEXTURE_2D, 0));
        Ok(id)
    }

    unsafe fn bind_texture(&self, slot: u32, id: Option<ObjectId>) -> Result<()> {
        gl_call!(gl::ActiveTexture(gl::TEXTURE0 + slot));
        gl_call!(gl::BindTexture(gl::TEXTURE_2D, id.unwrap_or(0)));
        Ok(())
    }

    unsafe fn delete_texture(&self, id: ObjectId) -> Result<()> {
        gl_call!(gl::DeleteTextures(1, &id));
        Ok(())
    }

    unsafe fn set_blend(&self, blend: Option<(BlendFactor, BlendFactor)>) -> Result<()> {
        match blend {
            Some((src, dst)) => {
                gl_call!(gl::Enable(gl::BLEND));
                gl_call!(gl::BlendEquation(gl::FUNC_ADD));
                gl_call!(gl::BlendFunc(src.into(), dst.into()));
            }
            None => gl_call!(gl::Disable(gl::BLEND)),
        }

        Ok(())
    }

    unsafe fn set_scissor(&self, rect: Option<SurfaceRect>) -> Result<()> {
        match rect {
            Some(rect) => {
                gl_call!(gl::Enable(gl::SCISSOR_TEST));
                gl_call!(gl::Scissor(
                    rect.x,
                    rect.y,
                    rect.width as GLsizei,
                    rect.height as GLsizei
                ));
            }
            None => gl_call!(gl::Disable(gl::SCISSOR_TEST)),
        }

        Ok(())
    }

    unsafe fn set_viewport(&self, rect: SurfaceRect) -> Result<()> {
        gl_call!(gl::Viewport(
            rect.x,
            rect.y,
            rect.width as GLsizei,
            rect.height as GLsizei
        ));

        Ok(())
    }

    unsafe fn clear(&self, color: [f32; 4]) -> Result<()> {
        gl_call!(gl::ClearColor(color[0], color[1], color[2], color[3]));
        gl_call!(gl::Clear(gl::COLOR_BUFFER_BIT));
        Ok(())
    }

    unsafe fn draw_elements(
        &self,
        primitive: Primitive,
        count: u32,
        format: IndexFormat,
        offset: usize,
    ) -> Result<()> {
        gl_call!(gl::DrawElements(
            primitive.into(),
            count as GLsizei,
            format.into(),
            offset as *const c_void
        ));

        Ok(())
    }
}
