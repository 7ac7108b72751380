pub mod error;
pub mod phase;
pub mod position;

pub use error::*;
pub use phase::*;
pub use position::*;
