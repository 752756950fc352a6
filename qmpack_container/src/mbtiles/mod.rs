//! `SQLite` file `*.mbtiles` as terrain tile container
//!
//! - `MBTilesWriter`: creates a fresh database, stores tiles in TMS row order and writes the metadata.
//! - `MBTilesReader`: reads tiles and metadata of a finished database.

mod reader;
mod writer;

pub use reader::MBTilesReader;
pub use writer::{MBTilesWriter, PackReport};
