pub mod cookie;
pub mod error;
pub mod filter;
pub mod redact;
pub mod trace;
pub mod url;

pub use error::{Error, Result};
