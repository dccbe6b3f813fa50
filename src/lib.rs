//! # What is This?
//!
//! `glquad` is a small OpenGL rendering toolkit. Every GPU object (vertex
//! buffer, index buffer, vertex array, shader program and texture) is wrapped
//! by a value that acquires the handle at construction and releases it when
//! dropped. The wrappers reach the driver through a `Visitor`, which is either
//! the real OpenGL backend or a headless one recording every call.
//!
//! A typical program builds an `Engine`, creates its GPU objects from
//! `engine.video()` and hands an `Application` to `Engine::run`:
//!
//! ```rust,ignore
//! let settings = Settings::load_or_default("glquad.json")?;
//! let engine = Engine::new(&settings)?;
//! let app = MyApp::new(&engine)?;
//! engine.run(app)?;
//! ```

#[macro_use]
extern crate log;
#[macro_use]
extern crate failure;

pub mod errors;
pub mod application;
pub mod math;
pub mod settings;
pub mod video;
pub mod window;

pub mod prelude {
    pub use crate::application::prelude::*;
    pub use crate::errors::Result;
    pub use crate::settings::Settings;
    pub use crate::video::prelude::*;
    pub use crate::window::prelude::*;
}
