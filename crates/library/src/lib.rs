pub mod errors;
pub mod math;

pub use errors::{LibraryError, LibraryResult};
