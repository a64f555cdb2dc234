//! Destination naming: ordinals, file and directory names, author
//! initials for title tags.

mod derive;
mod initials;
mod numbering;
mod sanitize;

pub use derive::NameDeriver;
pub use initials::initials;
pub use numbering::{NumberingScheme, Ordinal};
pub use sanitize::is_illegal;
