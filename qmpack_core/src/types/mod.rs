//! Contains types like coordinates, extents, tile records and the coverage descriptor.

mod blob;
pub use blob::*;

mod coverage;
pub use coverage::*;

mod tile_coord;
pub use tile_coord::*;

mod tile_extent;
pub use tile_extent::*;

mod tile_extent_map;
pub use tile_extent_map::*;

mod tile_record;
pub use tile_record::*;
