//! Reading terrain tile directories and writing them into MBTiles containers.
//!
//! The pieces fit together in a single pass:
//! - [`DirectoryTileWalker`] lazily yields every `<z>/<x>/<y>.terrain` tile below a root directory.
//! - [`MBTilesWriter`] stores each tile in TMS row order, tracks per-zoom extents and
//!   finally writes the metadata table.
//! - [`pack_directory`] drives both and removes the output file again if anything fails.
//! - [`MBTilesReader`] and [`LayerJson`] read a finished container back.
//!
//! ```rust,no_run
//! use qmpack_container::{PackConfig, pack_directory};
//! use std::path::Path;
//!
//! let report = pack_directory(
//!     Path::new("/data/terrain"),
//!     Path::new("/data/terrain.mbtiles"),
//!     &PackConfig::default(),
//! ).unwrap();
//! println!("packed {} tiles", report.tile_count);
//! ```

mod config;
pub use config::*;

mod directory;
pub use directory::*;

mod layer_json;
pub use layer_json::*;

mod mbtiles;
pub use mbtiles::*;

mod packer;
pub use packer::*;
