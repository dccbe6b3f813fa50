use crate::errors::*;
use crate::video::assets::buffer::VertexBuffer;
use crate::video::assets::layout::VertexBufferLayout;
use crate::video::{ObjectId, SharedVisitor};

/// Owns a vertex array object, the GPU-side association between vertex
/// buffers and shader attribute indices.
pub struct VertexArray {
    video: SharedVisitor,
    id: ObjectId,
    attributes: u32,
}

impl VertexArray {
    pub fn new(video: &SharedVisitor) -> Result<Self> {
        let id = unsafe { video.create_vertex_array()? };
        Ok(VertexArray {
            video: video.clone(),
            id,
            attributes: 0,
        })
    }

    /// Binds `buffer` to the next free attribute indices of this array, one
    /// index per entry of `layout`.
    pub fn add_buffer(&mut self, buffer: &VertexBuffer, layout: &VertexBufferLayout) -> Result<()> {
        self.bind()?;
        buffer.bind()?;

        for attribute in layout.attributes(self.attributes) {
            unsafe { self.video.vertex_attribute(attribute)? };
        }

        self.attributes += layout.len() as u32;
        Ok(())
    }

    #[inline]
    pub fn bind(&self) -> Result<()> {
        unsafe { self.video.bind_vertex_array(Some(self.id)) }
    }

    #[inline]
    pub fn unbind(&self) -> Result<()> {
        unsafe { self.video.bind_vertex_array(None) }
    }

    #[inline]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Number of attribute indices defined so far.
    #[inline]
    pub fn attributes(&self) -> u32 {
        self.attributes
    }
}

impl Drop for VertexArray {
    fn drop(&mut self) {
        if let Err(err) = unsafe { self.video.delete_vertex_array(self.id) } {
            warn!("Failed to release vertex array {}: {}", self.id, err);
        }
    }
}
