//! `reinhardt_util` v1:
//! Small string and mapping helpers.
//!
//! Modules:
//! - `text` : slug-style identifier normalization
//! - `dict` : key renaming on ordered maps
pub mod dict;
pub mod text;

pub use dict::replace_key;
pub use text::snakify;
