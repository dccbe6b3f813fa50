//! The video layer: resource-owning wrappers around GPU objects and the
//! backends they submit to.
//!
//! Each wrapper keeps a clone of the `SharedVisitor` it was created with, so
//! it can release its handle when dropped. All wrappers are bound to the
//! thread that owns the GL context.

pub mod assets;
pub mod backends;
pub mod errors;
pub mod renderer;

use std::rc::Rc;

use self::backends::Visitor;

/// The backend shared by every wrapper of one context.
pub type SharedVisitor = Rc<dyn Visitor>;

/// The opaque integer identifier of a GPU object.
pub type ObjectId = u32;

pub mod prelude {
    pub use super::assets::prelude::*;
    pub use super::backends::Visitor;
    pub use super::renderer::Renderer;
    pub use super::{ObjectId, SharedVisitor};
}
