use crate::{Blob, TileCoord};

/// One discovered tile: its on-disk (XYZ) coordinate and the opaque payload.
///
/// Records are produced one at a time and handed to the writer by value,
/// so only a single payload is held in memory at once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileRecord {
	pub coord: TileCoord,
	pub blob: Blob,
}

impl TileRecord {
	#[must_use]
	pub fn new(coord: TileCoord, blob: Blob) -> TileRecord {
		TileRecord { coord, blob }
	}
}
