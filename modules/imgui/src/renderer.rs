use bytemuck::{Pod, Zeroable};

use glquad::errors::*;
use glquad::video::prelude::*;
use glquad::video::renderer::{BlendFactor, SurfaceRect};

use imgui::{DrawCmd, DrawCmdParams, DrawData, TextureId};

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct UiVertex {
    position: [f32; 2],
    texcoord: [f32; 2],
    color: [u8; 4],
}

/// Draws the `DrawData` of imgui with the wrappers of `glquad`.
pub struct Renderer {
    renderer: glquad::video::renderer::Renderer,
    shader: Shader,
    texture: Texture,
    vertex_array: VertexArray,
    vertex_buffer: VertexBuffer,
    index_buffer: IndexBuffer,
    vertices: Vec<UiVertex>,
}

impl Renderer {
    /// Creates the program, the streaming buffers and the font atlas texture
    /// of `imgui`.
    pub fn new(video: &SharedVisitor, imgui: &mut imgui::Context) -> Result<Self> {
        let source = ShaderProgramSource::parse(include_str!("../assets/imgui.shader"))?;
        let shader = Shader::new(video, &source)?;

        let texture = {
            let fonts = imgui.fonts();
            let atlas = fonts.build_rgba32_texture();

            let mut params = TextureParams::default();
            params.filter = TextureFilter::Nearest;
            Texture::from_rgba(video, atlas.width, atlas.height, atlas.data, params)?
        };

        imgui.fonts().tex_id = TextureId::from(texture.id() as usize);

        let mut layout = VertexBufferLayout::new();
        layout.push::<f32>(2).push::<f32>(2).push::<u8>(4);

        let mut vertex_array = VertexArray::new(video)?;
        vertex_array.bind()?;
        let vertex_buffer = VertexBuffer::with_hint(video, BufferHint::Stream, &[])?;
        let index_buffer = IndexBuffer::with_hint::<u16>(video, BufferHint::Stream, &[])?;
        vertex_array.add_buffer(&vertex_buffer, &layout)?;
        vertex_array.unbind()?;

        Ok(Renderer {
            renderer: glquad::video::renderer::Renderer::new(video),
            shader,
            texture,
            vertex_array,
            vertex_buffer,
            index_buffer,
            vertices: Vec::new(),
        })
    }

    pub fn render(&mut self, draw_data: &DrawData) -> Result<()> {
        let [width, height] = draw_data.display_size;
        let [scale_x, scale_y] = draw_data.framebuffer_scale;
        if width <= 0.0 || height <= 0.0 {
            return Ok(());
        }

        let [left, top] = draw_data.display_pos;
        let matrix = UniformVariable::Matrix4f(
            [
                [2.0 / width, 0.0, 0.0, 0.0],
                [0.0, 2.0 / -height, 0.0, 0.0],
                [0.0, 0.0, -1.0, 0.0],
                [
                    -1.0 - left * 2.0 / width,
                    1.0 + top * 2.0 / height,
                    0.0,
                    1.0,
                ],
            ],
            false,
        );

        self.renderer.set_blend(Some((
            BlendFactor::SourceAlpha,
            BlendFactor::OneMinusSourceAlpha,
        )))?;

        self.texture.bind(0)?;
        self.shader.bind()?;
        self.shader.set_uniform("u_Matrix", matrix)?;
        self.shader.set_uniform_1i("u_Texture", 0)?;

        let font_texture = TextureId::from(self.texture.id() as usize);
        let framebuffer_height = height * scale_y;

        for list in draw_data.draw_lists() {
            // The element buffer binding belongs to the bound vertex array.
            self.vertex_array.bind()?;
            self.vertices.clear();
            self.vertices
                .extend(list.vtx_buffer().iter().map(|v| UiVertex {
                    position: v.pos,
                    texcoord: v.uv,
                    color: v.col,
                }));

            self.vertex_buffer
                .update(bytemuck::cast_slice(&self.vertices))?;
            self.index_buffer.update(list.idx_buffer())?;

            for cmd in list.commands() {
                match cmd {
                    DrawCmd::Elements {
                        count,
                        cmd_params:
                            DrawCmdParams {
                                clip_rect,
                                texture_id,
                                idx_offset,
                                ..
                            },
                    } => {
                        if texture_id != font_texture {
                            warn!("Skipped ui draw command using unknown texture {:?}.", texture_id);
                            continue;
                        }

                        let x0 = (clip_rect[0] - left) * scale_x;
                        let y0 = (clip_rect[1] - top) * scale_y;
                        let x1 = (clip_rect[2] - left) * scale_x;
                        let y1 = (clip_rect[3] - top) * scale_y;
                        if x1 <= x0 || y1 <= y0 {
                            continue;
                        }

                        let rect = SurfaceRect::new(
                            x0 as i32,
                            (framebuffer_height - y1) as i32,
                            (x1 - x0) as u32,
                            (y1 - y0) as u32,
                        );

                        self.renderer.set_scissor(Some(rect))?;
                        self.renderer.draw_range(
                            &self.vertex_array,
                            &self.index_buffer,
                            &self.shader,
                            idx_offset as u32,
                            count as u32,
                        )?;
                    }
                    DrawCmd::ResetRenderState => {}
                    DrawCmd::RawCallback { .. } => {
                        warn!("Raw ui callbacks are not supported.");
                    }
                }
            }
        }

        self.renderer.set_scissor(None)?;
        self.renderer.set_blend(None)?;
        self.vertex_array.unbind()?;
        self.shader.unbind()?;
        self.texture.unbind(0)
    }
}
