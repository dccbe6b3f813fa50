//! GPU programs built from a single two-section source file.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::errors::*;
use crate::math::{Matrix4, Vector4};
use crate::video::backends::Visitor;
use crate::video::errors::Error as VideoError;
use crate::video::{ObjectId, SharedVisitor};

/// The line prefix that starts a stage section, e.g. `#shader vertex`.
pub const STAGE_MARKER: &str = "#shader";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex = 0,
    Fragment = 1,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

impl FromStr for ShaderStage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "vertex" => Ok(ShaderStage::Vertex),
            "fragment" => Ok(ShaderStage::Fragment),
            _ => Err(malformed(format!("unknown shader stage {:?}", s))),
        }
    }
}

fn malformed(reason: String) -> Error {
    VideoError::MalformedShaderSource(reason).into()
}

/// The stage name of a `#shader <stage>` line. Lines like `#shaders` are not
/// markers.
fn stage_marker(line: &str) -> Option<&str> {
    let rest = line.trim().strip_prefix(STAGE_MARKER)?;
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }

    Some(rest.split_whitespace().next().unwrap_or(""))
}

/// The stage sources extracted from one shader file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderProgramSource {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderProgramSource {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|_| format!("failed to read shader source {:?}", path))?;
        Self::parse(&text)
    }

    /// Splits `text` at its `#shader <stage>` marker lines.
    ///
    /// Lines before the first marker are discarded. Every stage must appear
    /// exactly once and must not be empty.
    pub fn parse(text: &str) -> Result<Self> {
        let mut sources = [String::new(), String::new()];
        let mut seen = [false; 2];
        let mut active: Option<ShaderStage> = None;

        for line in text.lines() {
            if let Some(name) = stage_marker(line) {
                let stage: ShaderStage = name.parse()?;
                if seen[stage as usize] {
                    return Err(malformed(format!(
                        "duplicated `{} {}` marker",
                        STAGE_MARKER, stage
                    )));
                }

                seen[stage as usize] = true;
                active = Some(stage);
                continue;
            }

            if let Some(stage) = active {
                let source = &mut sources[stage as usize];
                source.push_str(line);
                source.push('\n');
            }
        }

        for &stage in &[ShaderStage::Vertex, ShaderStage::Fragment] {
            if !seen[stage as usize] {
                return Err(malformed(format!(
                    "missing `{} {}` section",
                    STAGE_MARKER, stage
                )));
            }

            if sources[stage as usize].trim().is_empty() {
                return Err(malformed(format!("{} stage is empty", stage)));
            }
        }

        let fragment = sources[1].split_off(0);
        let vertex = sources[0].split_off(0);
        Ok(ShaderProgramSource { vertex, fragment })
    }
}

/// A value uploaded to a uniform of the currently bound program.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UniformVariable {
    I32(i32),
    F32(f32),
    Vector4f([f32; 4]),
    /// Column-major matrix and whether the driver should transpose it.
    Matrix4f([[f32; 4]; 4], bool),
}

impl From<i32> for UniformVariable {
    fn from(v: i32) -> Self {
        UniformVariable::I32(v)
    }
}

impl From<f32> for UniformVariable {
    fn from(v: f32) -> Self {
        UniformVariable::F32(v)
    }
}

impl From<Vector4<f32>> for UniformVariable {
    fn from(v: Vector4<f32>) -> Self {
        UniformVariable::Vector4f(v.into())
    }
}

impl From<Matrix4<f32>> for UniformVariable {
    fn from(v: Matrix4<f32>) -> Self {
        UniformVariable::Matrix4f(v.into(), false)
    }
}

/// Owns a linked GPU program and caches the locations of its uniforms.
pub struct Shader {
    video: SharedVisitor,
    id: ObjectId,
    uniforms: HashMap<String, i32>,
    missing: HashSet<String>,
}

impl Shader {
    pub fn from_file<P: AsRef<Path>>(video: &SharedVisitor, path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = ShaderProgramSource::from_file(path)?;
        let shader = Self::new(video, &source)?;
        info!("Created shader program {} from {:?}.", shader.id, path);
        Ok(shader)
    }

    /// Compiles both stages and links them. Nothing is linked if a stage
    /// fails to compile.
    pub fn new(video: &SharedVisitor, source: &ShaderProgramSource) -> Result<Self> {
        let id = unsafe { Self::create(&**video, source) }.map_err(|err| {
            error!("{}", err);
            err
        })?;

        Ok(Shader {
            video: video.clone(),
            id,
            uniforms: HashMap::new(),
            missing: HashSet::new(),
        })
    }

    unsafe fn create(video: &dyn Visitor, source: &ShaderProgramSource) -> Result<ObjectId> {
        let vs = video.compile_shader(ShaderStage::Vertex, &source.vertex)?;
        let fs = match video.compile_shader(ShaderStage::Fragment, &source.fragment) {
            Ok(fs) => fs,
            Err(err) => {
                video.delete_shader(vs)?;
                return Err(err);
            }
        };

        let program = video.link_program(&[vs, fs]);
        let released = video.delete_shader(vs).and(video.delete_shader(fs));
        match (program, released) {
            (Ok(id), Err(err)) => {
                if let Err(err) = video.delete_program(id) {
                    warn!("Failed to release shader program {}: {}", id, err);
                }

                Err(err)
            }
            (program, _) => program,
        }
    }

    #[inline]
    pub fn bind(&self) -> Result<()> {
        unsafe { self.video.use_program(Some(self.id)) }
    }

    #[inline]
    pub fn unbind(&self) -> Result<()> {
        unsafe { self.video.use_program(None) }
    }

    #[inline]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    #[inline]
    pub fn set_uniform_1i(&mut self, name: &str, v: i32) -> Result<()> {
        self.set_uniform(name, UniformVariable::I32(v))
    }

    #[inline]
    pub fn set_uniform_1f(&mut self, name: &str, v: f32) -> Result<()> {
        self.set_uniform(name, UniformVariable::F32(v))
    }

    #[inline]
    pub fn set_uniform_4f(&mut self, name: &str, v0: f32, v1: f32, v2: f32, v3: f32) -> Result<()> {
        self.set_uniform(name, UniformVariable::Vector4f([v0, v1, v2, v3]))
    }

    #[inline]
    pub fn set_uniform_vec4(&mut self, name: &str, v: Vector4<f32>) -> Result<()> {
        self.set_uniform(name, v.into())
    }

    #[inline]
    pub fn set_uniform_mat4f(&mut self, name: &str, m: &Matrix4<f32>) -> Result<()> {
        self.set_uniform(name, (*m).into())
    }

    /// Uploads `variable` into the uniform `name` of this program, which must
    /// be bound. Unknown names are ignored.
    pub fn set_uniform(&mut self, name: &str, variable: UniformVariable) -> Result<()> {
        if let Some(location) = self.uniform_location(name)? {
            unsafe { self.video.bind_uniform(location, &variable)? };
        }

        Ok(())
    }

    fn uniform_location(&mut self, name: &str) -> Result<Option<i32>> {
        if let Some(&location) = self.uniforms.get(name) {
            return Ok(Some(location));
        }

        let location = unsafe { self.video.uniform_location(self.id, name)? };
        if location < 0 {
            if self.missing.insert(name.to_owned()) {
                warn!("Uniform {:?} is not active in shader program {}.", name, self.id);
            }

            return Ok(None);
        }

        self.uniforms.insert(name.to_owned(), location);
        Ok(Some(location))
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        if let Err(err) = unsafe { self.video.delete_program(self.id) } {
            warn!("Failed to release shader program {}: {}", self.id, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC: &str = "\
// leading comment
#shader vertex
#version 330 core
void main() {}

#shader fragment
#version 330 core
out vec4 color;
void main() {}
";

    fn reason(err: Error) -> String {
        match err.downcast::<VideoError>() {
            Ok(VideoError::MalformedShaderSource(reason)) => reason,
            Ok(other) => panic!("unexpected error {}", other),
            Err(other) => panic!("unexpected error {}", other),
        }
    }

    #[test]
    fn parse() {
        let source = ShaderProgramSource::parse(BASIC).unwrap();
        assert_eq!(source.vertex, "#version 330 core\nvoid main() {}\n\n");
        assert_eq!(
            source.fragment,
            "#version 330 core\nout vec4 color;\nvoid main() {}\n"
        );
    }

    #[test]
    fn parse_fragment_first() {
        let text = "#shader fragment\nF\n#shader vertex\nV\n";
        let source = ShaderProgramSource::parse(text).unwrap();
        assert_eq!(source.vertex, "V\n");
        assert_eq!(source.fragment, "F\n");
    }

    #[test]
    fn parse_crlf() {
        let text = "#shader vertex\r\nV\r\n#shader fragment\r\nF\r\n";
        let source = ShaderProgramSource::parse(text).unwrap();
        assert_eq!(source.vertex, "V\n");
        assert_eq!(source.fragment, "F\n");
    }

    #[test]
    fn marker_needs_a_word_boundary() {
        let text = "#shader vertex\n#shaders are kept\nV\n#shader\tfragment\nF\n";
        let source = ShaderProgramSource::parse(text).unwrap();
        assert_eq!(source.vertex, "#shaders are kept\nV\n");
        assert_eq!(source.fragment, "F\n");

        assert_eq!(stage_marker("  #shader vertex  "), Some("vertex"));
        assert_eq!(stage_marker("#shader"), Some(""));
        assert_eq!(stage_marker("#shader_x vertex"), None);
    }

    #[test]
    fn malformed() {
        let err = ShaderProgramSource::parse("void main() {}").unwrap_err();
        assert!(reason(err).contains("missing"));

        let err = ShaderProgramSource::parse("#shader vertex\nV\n#shader fragment\n \n").unwrap_err();
        assert_eq!(reason(err), "fragment stage is empty");

        let err = ShaderProgramSource::parse("#shader vertex\nV\n#shader vertex\nV\n").unwrap_err();
        assert!(reason(err).contains("duplicated"));

        let err = ShaderProgramSource::parse("#shader geometry\nG\n").unwrap_err();
        assert!(reason(err).contains("geometry"));
    }
}
