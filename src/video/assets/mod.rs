//! GPU objects owned by the application.

pub mod buffer;
pub mod layout;
pub mod shader;
pub mod texture;
pub mod vertex_array;

pub use self::buffer::{BufferHint, BufferTarget, IndexBuffer, IndexElement, IndexFormat, VertexBuffer};
pub use self::layout::{VertexAttribute, VertexBufferLayout, VertexElement, VertexFormat};
pub use self::shader::{Shader, ShaderProgramSource, ShaderStage, UniformVariable};
pub use self::texture::{Texture, TextureFilter, TextureFormat, TextureParams, TextureWrap};
pub use self::vertex_array::VertexArray;

pub mod prelude {
    pub use super::buffer::{BufferHint, BufferTarget, IndexBuffer, IndexElement, IndexFormat, VertexBuffer};
    pub use super::layout::{VertexAttribute, VertexBufferLayout, VertexElement, VertexFormat};
    pub use super::shader::{Shader, ShaderProgramSource, ShaderStage, UniformVariable};
    pub use super::texture::{Texture, TextureFilter, TextureFormat, TextureParams, TextureWrap};
    pub use super::vertex_array::VertexArray;
}
