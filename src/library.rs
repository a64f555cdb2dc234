//! Source discovery and play order.
//!
//! The walker takes one snapshot of the source tree; the builder turns it
//! into the single sequence that every later stage numbers and copies.

mod model;
mod natural;
mod order;
mod walk;

pub use model::{DirStep, PlayEntry, PlayList, SourceEntry, SourceTree};
pub use order::PlayOrderBuilder;
pub use walk::TreeWalker;

#[cfg(test)]
mod tests;
