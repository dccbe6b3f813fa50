//! Vertex and index buffers.

use bytemuck::Pod;

use crate::errors::*;
use crate::video::errors::Error as VideoError;
use crate::video::{ObjectId, SharedVisitor};

/// The binding point of a buffer object.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// Vertex attribute data.
    Vertex,
    /// Vertex indices.
    Index,
}

/// Hint abouts the intended update strategy of the data.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BufferHint {
    /// The resource is initialized with data and cannot be changed later.
    Immutable,
    /// The resource is re-uploaded every frame.
    Stream,
}

/// The integer width of the elements of an index buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum IndexFormat {
    U16,
    U32,
}

impl IndexFormat {
    /// Size of one index in bytes.
    #[inline]
    pub fn stride(self) -> usize {
        match self {
            IndexFormat::U16 => 2,
            IndexFormat::U32 => 4,
        }
    }
}

/// Integer types that can be stored in an `IndexBuffer`.
pub trait IndexElement: Pod {
    const FORMAT: IndexFormat;
}

impl IndexElement for u16 {
    const FORMAT: IndexFormat = IndexFormat::U16;
}

impl IndexElement for u32 {
    const FORMAT: IndexFormat = IndexFormat::U32;
}

/// Owns a GPU buffer holding raw vertex data.
pub struct VertexBuffer {
    video: SharedVisitor,
    id: ObjectId,
    hint: BufferHint,
    len: usize,
}

impl VertexBuffer {
    /// Uploads `bytes` into a new immutable buffer. The buffer is left bound.
    pub fn new(video: &SharedVisitor, bytes: &[u8]) -> Result<Self> {
        Self::with_hint(video, BufferHint::Immutable, bytes)
    }

    pub fn from_slice<T: Pod>(video: &SharedVisitor, vertices: &[T]) -> Result<Self> {
        Self::new(video, bytemuck::cast_slice(vertices))
    }

    pub fn with_hint(video: &SharedVisitor, hint: BufferHint, bytes: &[u8]) -> Result<Self> {
        let id = unsafe { video.create_buffer(BufferTarget::Vertex, hint, bytes)? };
        Ok(VertexBuffer {
            video: video.clone(),
            id,
            hint,
            len: bytes.len(),
        })
    }

    /// Replaces the whole content of a `BufferHint::Stream` buffer.
    pub fn update(&mut self, bytes: &[u8]) -> Result<()> {
        if self.hint == BufferHint::Immutable {
            bail!("Trying to update immutable vertex buffer {}.", self.id);
        }

        unsafe {
            self.video
                .update_buffer(BufferTarget::Vertex, self.id, self.hint, bytes)?;
        }

        self.len = bytes.len();
        Ok(())
    }

    #[inline]
    pub fn bind(&self) -> Result<()> {
        unsafe { self.video.bind_buffer(BufferTarget::Vertex, Some(self.id)) }
    }

    #[inline]
    pub fn unbind(&self) -> Result<()> {
        unsafe { self.video.bind_buffer(BufferTarget::Vertex, None) }
    }

    #[inline]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Size of the uploaded data in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Drop for VertexBuffer {
    fn drop(&mut self) {
        if let Err(err) = unsafe { self.video.delete_buffer(self.id) } {
            warn!("Failed to release vertex buffer {}: {}", self.id, err);
        }
    }
}

/// Owns a GPU buffer holding vertex indices.
///
/// The element type is fixed by the slice the buffer is created with.
pub struct IndexBuffer {
    video: SharedVisitor,
    id: ObjectId,
    hint: BufferHint,
    format: IndexFormat,
    count: u32,
}

impl IndexBuffer {
    /// Uploads `indices` into a new immutable buffer. The buffer is left bound.
    pub fn new<T: IndexElement>(video: &SharedVisitor, indices: &[T]) -> Result<Self> {
        Self::with_hint(video, BufferHint::Immutable, indices)
    }

    pub fn with_hint<T: IndexElement>(
        video: &SharedVisitor,
        hint: BufferHint,
        indices: &[T],
    ) -> Result<Self> {
        let bytes = bytemuck::cast_slice(indices);
        let id = unsafe { video.create_buffer(BufferTarget::Index, hint, bytes)? };
        Ok(IndexBuffer {
            video: video.clone(),
            id,
            hint,
            format: T::FORMAT,
            count: indices.len() as u32,
        })
    }

    /// Replaces the whole content of a `BufferHint::Stream` buffer. The new
    /// indices must have the same width as the original ones.
    pub fn update<T: IndexElement>(&mut self, indices: &[T]) -> Result<()> {
        if T::FORMAT != self.format {
            return Err(VideoError::IndexFormatMismatch(self.format, T::FORMAT).into());
        }

        if self.hint == BufferHint::Immutable {
            bail!("Trying to update immutable index buffer {}.", self.id);
        }

        unsafe {
            self.video.update_buffer(
                BufferTarget::Index,
                self.id,
                self.hint,
                bytemuck::cast_slice(indices),
            )?;
        }

        self.count = indices.len() as u32;
        Ok(())
    }

    #[inline]
    pub fn bind(&self) -> Result<()> {
        unsafe { self.video.bind_buffer(BufferTarget::Index, Some(self.id)) }
    }

    #[inline]
    pub fn unbind(&self) -> Result<()> {
        unsafe { self.video.bind_buffer(BufferTarget::Index, None) }
    }

    #[inline]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Number of indices stored.
    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }

    #[inline]
    pub fn format(&self) -> IndexFormat {
        self.format
    }
}

impl Drop for IndexBuffer {
    fn drop(&mut self) {
        if let Err(err) = unsafe { self.video.delete_buffer(self.id) } {
            warn!("Failed to release index buffer {}: {}", self.id, err);
        }
    }
}
