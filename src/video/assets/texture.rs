use std::path::Path;

use crate::errors::*;
use crate::video::{ObjectId, SharedVisitor};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TextureFormat {
    RGBA8,
}

impl TextureFormat {
    #[inline]
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            TextureFormat::RGBA8 => 4,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TextureFilter {
    Nearest,
    Linear,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TextureWrap {
    Repeat,
    Clamp,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TextureParams {
    pub format: TextureFormat,
    pub filter: TextureFilter,
    pub wrap: TextureWrap,
    pub dimensions: (u32, u32),
}

impl Default for TextureParams {
    fn default() -> Self {
        TextureParams {
            format: TextureFormat::RGBA8,
            filter: TextureFilter::Linear,
            wrap: TextureWrap::Clamp,
            dimensions: (0, 0),
        }
    }
}

/// Owns a 2D texture object.
pub struct Texture {
    video: SharedVisitor,
    id: ObjectId,
    params: TextureParams,
}

impl Texture {
    /// Decodes the image at `path` and uploads it. Rows are flipped so the
    /// first row in memory is the bottom of the image.
    pub fn from_file<P: AsRef<Path>>(video: &SharedVisitor, path: P) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path)
            .with_context(|_| format!("failed to decode texture {:?}", path))?
            .flipv()
            .into_rgba8();

        let (width, height) = image.dimensions();
        let texture = Self::from_rgba(video, width, height, &image.into_raw(), Default::default())?;
        info!(
            "Created texture {} ({}x{}) from {:?}.",
            texture.id, width, height, path
        );

        Ok(texture)
    }

    /// Uploads tightly packed RGBA8 pixels.
    pub fn from_rgba(
        video: &SharedVisitor,
        width: u32,
        height: u32,
        pixels: &[u8],
        mut params: TextureParams,
    ) -> Result<Self> {
        params.format = TextureFormat::RGBA8;
        params.dimensions = (width, height);

        let expected = width as usize * height as usize * params.format.bytes_per_pixel();
        if pixels.len() != expected {
            bail!(
                "Texture of {}x{} needs {} bytes of pixels, got {}.",
                width,
                height,
                expected,
                pixels.len()
            );
        }

        let id = unsafe { video.create_texture(&params, pixels)? };
        Ok(Texture {
            video: video.clone(),
            id,
            params,
        })
    }

    /// Binds the texture to texture unit `slot`.
    #[inline]
    pub fn bind(&self, slot: u32) -> Result<()> {
        unsafe { self.video.bind_texture(slot, Some(self.id)) }
    }

    #[inline]
    pub fn unbind(&self, slot: u32) -> Result<()> {
        unsafe { self.video.bind_texture(slot, None) }
    }

    #[inline]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.params.dimensions.0
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.params.dimensions.1
    }

    #[inline]
    pub fn params(&self) -> &TextureParams {
        &self.params
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        if let Err(err) = unsafe { self.video.delete_texture(self.id) } {
            warn!("Failed to release texture {}: {}", self.id, err);
        }
    }
}
