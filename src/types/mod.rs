//! Type definitions for calheat

mod date_like;
mod error;
mod layout;
mod options;
mod value;

pub use date_like::DateLike;
pub use error::*;
pub use layout::*;
pub use options::*;
pub use value::*;
