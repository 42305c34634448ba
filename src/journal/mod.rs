//! Journal validation and posting

pub mod adapters;
pub mod draft;
pub mod poster;
pub mod validator;

pub use adapters::*;
pub use draft::*;
pub use poster::*;
pub use validator::*;
