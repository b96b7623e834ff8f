// ninja-tools library.
// Two unrelated utilities sharing one crate: the cache launcher's
// configuration handling, and a NinjaRMM API client with a tag-sorted view of
// the API documentation.

pub mod error;
pub mod launcher;
pub mod ninja;

pub use error::{Error, Result};
