//! Shared helpers with no knowledge of the index or the host app.

pub mod html;
pub mod mime;
pub mod path;
