//! Describes how the bytes of a vertex buffer map to shader attributes.

/// The base numeric type of one vertex attribute component.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VertexFormat {
    Float,
    UInt,
    UByte,
}

impl VertexFormat {
    /// Size of one component in bytes.
    #[inline]
    pub fn size(self) -> u32 {
        match self {
            VertexFormat::Float => 4,
            VertexFormat::UInt => 4,
            VertexFormat::UByte => 1,
        }
    }
}

/// Component types that can be pushed into a `VertexBufferLayout`.
pub trait VertexElement {
    const FORMAT: VertexFormat;
    const NORMALIZED: bool;
}

impl VertexElement for f32 {
    const FORMAT: VertexFormat = VertexFormat::Float;
    const NORMALIZED: bool = false;
}

impl VertexElement for u32 {
    const FORMAT: VertexFormat = VertexFormat::UInt;
    const NORMALIZED: bool = false;
}

impl VertexElement for u8 {
    const FORMAT: VertexFormat = VertexFormat::UByte;
    const NORMALIZED: bool = true;
}

/// One entry of a layout.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VertexLayoutElement {
    pub count: u32,
    pub format: VertexFormat,
    pub normalized: bool,
}

impl VertexLayoutElement {
    #[inline]
    pub fn size(&self) -> u32 {
        self.count * self.format.size()
    }
}

/// A fully resolved attribute definition, as submitted to the backend.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VertexAttribute {
    pub index: u32,
    pub count: u32,
    pub format: VertexFormat,
    pub normalized: bool,
    pub stride: u32,
    pub offset: u32,
}

/// An ordered sequence of attribute entries. The order of `push` calls
/// determines both the attribute index and the byte offset of each entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexBufferLayout {
    elements: Vec<VertexLayoutElement>,
    stride: u32,
}

impl VertexBufferLayout {
    pub fn new() -> Self {
        Default::default()
    }

    /// Appends an attribute of `count` components of type `T`.
    ///
    /// ```rust
    /// use glquad::video::assets::VertexBufferLayout;
    ///
    /// let mut layout = VertexBufferLayout::new();
    /// layout.push::<f32>(2).push::<f32>(2);
    /// assert_eq!(layout.stride(), 16);
    /// ```
    pub fn push<T: VertexElement>(&mut self, count: u32) -> &mut Self {
        assert!(count > 0 && count <= 4);

        let element = VertexLayoutElement {
            count,
            format: T::FORMAT,
            normalized: T::NORMALIZED,
        };

        self.stride += element.size();
        self.elements.push(element);
        self
    }

    #[inline]
    pub fn elements(&self) -> &[VertexLayoutElement] {
        &self.elements
    }

    /// Size of one vertex in bytes.
    #[inline]
    pub fn stride(&self) -> u32 {
        self.stride
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Resolves the entries into attribute definitions whose indices start
    /// at `first`.
    pub fn attributes(&self, first: u32) -> impl Iterator<Item = VertexAttribute> + '_ {
        let stride = self.stride;
        self.elements
            .iter()
            .enumerate()
            .scan(0, move |offset, (i, element)| {
                let attribute = VertexAttribute {
                    index: first + i as u32,
                    count: element.count,
                    format: element.format,
                    normalized: element.normalized,
                    stride,
                    offset: *offset,
                };

                *offset += element.size();
                Some(attribute)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_and_offsets() {
        let mut layout = VertexBufferLayout::new();
        layout.push::<f32>(3).push::<u8>(4).push::<f32>(2).push::<u32>(1);

        assert_eq!(layout.stride(), 12 + 4 + 8 + 4);

        let attributes: Vec<_> = layout.attributes(0).collect();
        let offsets: Vec<_> = attributes.iter().map(|v| v.offset).collect();
        let indices: Vec<_> = attributes.iter().map(|v| v.index).collect();
        assert_eq!(offsets, vec![0, 12, 16, 24]);
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert!(attributes.iter().all(|v| v.stride == 28));
        assert!(attributes[1].normalized);
        assert!(!attributes[0].normalized);
    }

    #[test]
    fn first_index() {
        let mut layout = VertexBufferLayout::new();
        layout.push::<f32>(2);

        let attribute = layout.attributes(3).next().unwrap();
        assert_eq!(attribute.index, 3);
        assert_eq!(attribute.offset, 0);
        assert_eq!(attribute.stride, 8);
    }

    #[test]
    #[should_panic]
    fn too_many_components() {
        VertexBufferLayout::new().push::<f32>(5);
    }
}
