use crate::video::assets::shader::ShaderStage;
use crate::video::assets::IndexFormat;

#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "Malformed shader source: {}.", _0)]
    MalformedShaderSource(String),
    #[fail(display = "Failed to compile {} shader, errors: \n{}", stage, log)]
    ShaderCompile { stage: ShaderStage, log: String },
    #[fail(display = "Failed to link shader program, errors: \n{}", _0)]
    ShaderLink(String),
    #[fail(display = "[GL] {} ({}) at {}:{}", message, call, file, line)]
    Driver {
        message: &'static str,
        call: &'static str,
        file: &'static str,
        line: u32,
    },
    #[fail(display = "Index buffer holds {:?} elements, can not update with {:?}.", _0, _1)]
    IndexFormatMismatch(IndexFormat, IndexFormat),
    #[fail(display = "OpenGL implementation doesn't support {}.", _0)]
    Unsupported(String),
}
