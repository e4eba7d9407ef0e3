//! Configuration section definitions.
//!
//! Each module corresponds to a section in `cachebust.toml`:
//!
//! | Module   | TOML Section | Purpose                              |
//! |----------|--------------|--------------------------------------|
//! | `assets` | `[assets]`   | Asset root and static endpoint       |
//! | `buster` | `[buster]`   | Fingerprint filter, size, placement  |
//! | `serve`  | `[serve]`    | Development server                   |

mod assets;
mod buster;
mod serve;

pub use assets::AssetsConfig;
pub use buster::{BusterConfig, Placement, ReadErrorPolicy};
pub use serve::ServeConfig;
