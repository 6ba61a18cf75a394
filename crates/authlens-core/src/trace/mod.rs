mod reader;
mod types;

pub use reader::TraceReader;
pub use types::*;
