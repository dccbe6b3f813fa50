use std::cmp;
use std::ffi::CStr;
use std::os::raw::c_char;

use gl::types::*;

use crate::errors::*;

/// Describes a version.
///
/// A version can only be compared to another version if they belong to the same API.
/// For example, both `Version::GL(3, 0) >= Version::ES(3, 0)` and `Version::ES(3, 0) >=
/// Version::GL(3, 0)` return `false`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Version {
    /// Regular OpenGL.
    GL(u8, u8),
    /// OpenGL embedded system.
    ES(u8, u8),
}

impl PartialOrd for Version {
    #[inline]
    fn partial_cmp(&self, other: &Version) -> Option<cmp::Ordering> {
        let (es1, major1, minor1) = match *self {
            Version::GL(major, minor) => (false, major, minor),
            Version::ES(major, minor) => (true, major, minor),
        };

        let (es2, major2, minor2) = match *other {
            Version::GL(major, minor) => (false, major, minor),
            Version::ES(major, minor) => (true, major, minor),
        };

        if es1 != es2 {
            None
        } else {
            match major1.cmp(&major2) {
                cmp::Ordering::Equal => Some(minor1.cmp(&minor2)),
                v => Some(v),
            }
        }
    }
}

impl Version {
    /// Parses the string returned by `glGetString(GL_VERSION)`, e.g.
    /// `"4.6.0 NVIDIA 535.54"` or `"OpenGL ES 3.2 Mesa 23.0"`.
    pub fn parse(desc: &str) -> Option<Version> {
        let desc = desc.trim();
        let (es, desc) = if desc.starts_with("OpenGL ES") {
            let rest = desc["OpenGL ES".len()..].trim_start_matches(|c: char| c != ' ');
            (true, rest.trim_start())
        } else {
            (false, desc)
        };

        let number = desc.split_whitespace().next()?;
        let mut iter = number.split('.');
        let major = iter.next()?.parse().ok()?;
        let minor = iter.next()?.parse().ok()?;

        if es {
            Some(Version::ES(major, minor))
        } else {
            Some(Version::GL(major, minor))
        }
    }
}

#[derive(Debug, Clone)]
pub struct Capabilities {
    pub version: Version,
    pub vendor: String,
    pub renderer: String,
    pub shading_language: String,
}

impl Capabilities {
    /// Queries the capabilities of the current context.
    ///
    /// # Unsafe
    ///
    /// The GL function pointers must be loaded and the context current.
    pub unsafe fn parse() -> Result<Capabilities> {
        let desc = get_string(gl::VERSION);
        let version =
            Version::parse(&desc).ok_or_else(|| format_err!("Unknown GL version {:?}.", desc))?;

        Ok(Capabilities {
            version,
            vendor: get_string(gl::VENDOR),
            renderer: get_string(gl::RENDERER),
            shading_language: get_string(gl::SHADING_LANGUAGE_VERSION),
        })
    }

    /// Vertex array objects arrived with GL 3.0 and ES 3.0.
    pub fn has_vertex_array(&self) -> bool {
        self.version >= Version::GL(3, 0) || self.version >= Version::ES(3, 0)
    }
}

unsafe fn get_string(name: GLenum) -> String {
    let ptr = gl::GetString(name);
    if ptr.is_null() {
        return String::new();
    }

    CStr::from_ptr(ptr as *const c_char)
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_version() {
        assert_eq!(Version::parse("4.6.0 NVIDIA 535.54.03"), Some(Version::GL(4, 6)));
        assert_eq!(Version::parse("3.3 (Core Profile) Mesa 23.0.4"), Some(Version::GL(3, 3)));
        assert_eq!(Version::parse("OpenGL ES 3.2 Mesa 23.0.4"), Some(Version::ES(3, 2)));
        assert_eq!(Version::parse("OpenGL ES-CM 1.1"), Some(Version::ES(1, 1)));
        assert_eq!(Version::parse("garbage"), None);
        assert_eq!(Version::parse(""), None);
    }

    #[test]
    fn compare_version() {
        assert!(Version::GL(4, 4) > Version::GL(3, 3));
        assert!(Version::GL(3, 1) < Version::GL(3, 3));
        assert!(!(Version::GL(3, 0) >= Version::ES(3, 0)));
        assert!(!(Version::ES(3, 0) >= Version::GL(3, 0)));
    }
}
