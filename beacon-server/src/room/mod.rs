mod member;
mod registry;

pub use member::*;
pub use registry::*;
