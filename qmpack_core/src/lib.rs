//! Core types for packing quantized-mesh terrain tiles.
//!
//! Contains tile coordinates with the XYZ ↔ TMS row flip, tile records, per-zoom
//! coverage extents and the coverage descriptor stored in the MBTiles `json` entry.

pub mod terrain;

pub mod types;
pub use types::*;
