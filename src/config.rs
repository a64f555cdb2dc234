//! Settings schema and loader.
//!
//! Settings drive ordering, naming, tagging and the output layout. They
//! come from an optional TOML file and `PCP__` environment variables;
//! command-line flags are layered on top by the runtime.

mod load;
mod schema;

pub use schema::*;
