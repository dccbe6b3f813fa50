//! The OpenGL backend.

/// Issues a GL call. In debug builds every pending error flag is cleared
/// before the call and the error flag is checked after it, turning a raised
/// flag into `video::errors::Error::Driver`.
macro_rules! gl_call {
    ($call:expr) => {{
        #[cfg(debug_assertions)]
        $crate::video::backends::gl::clear_errors();

        let value = $call;

        #[cfg(debug_assertions)]
        $crate::video::backends::gl::check(stringify!($call), file!(), line!())?;

        value
    }};
}

pub mod capabilities;
pub mod types;
pub mod visitor;

use gl::types::*;

use crate::errors::*;
use crate::video::errors::Error as VideoError;

#[cfg_attr(not(debug_assertions), allow(dead_code))]
pub(crate) unsafe fn clear_errors() {
    while gl::GetError() != gl::NO_ERROR {}
}

#[cfg_attr(not(debug_assertions), allow(dead_code))]
pub(crate) unsafe fn check(call: &'static str, file: &'static str, line: u32) -> Result<()> {
    let code = gl::GetError();
    if code == gl::NO_ERROR {
        return Ok(());
    }

    let message = error_message(code);
    error!("[GL] {} ({}) at {}:{}", message, call, file, line);
    Err(VideoError::Driver {
        message,
        call,
        file,
        line,
    }
    .into())
}

#[cfg_attr(not(debug_assertions), allow(dead_code))]
fn error_message(code: GLenum) -> &'static str {
    match code {
        gl::INVALID_ENUM => "An unacceptable value is specified for an enumerated argument.",
        gl::INVALID_VALUE => "A numeric argument is out of range.",
        gl::INVALID_OPERATION => "The specified operation is not allowed in the current state.",
        gl::INVALID_FRAMEBUFFER_OPERATION => {
            "The command is trying to render to or read from the framebuffer while the \
             currently bound framebuffer is not framebuffer complete."
        }
        gl::OUT_OF_MEMORY => "There is not enough memory left to execute the command.",
        _ => "Oops, Unknown OpenGL error.",
    }
}
