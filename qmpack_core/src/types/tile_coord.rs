//! Three-dimensional tile coordinates in a quad-tree terrain pyramid
//!
//! A [`TileCoord`] addresses one tile by zoom `level`, column `x` and row `y`.
//! Rows can be counted from the top edge (XYZ, as on disk) or from the bottom
//! edge (TMS, as stored in MBTiles). [`TileCoord::flip_row`] converts between
//! the two and is its own inverse.
//!
//! # Examples
//!
//! ```
//! use qmpack_core::TileCoord;
//!
//! let coord = TileCoord::new(2, 0, 0).unwrap();
//! assert_eq!(coord.flipped().y, 3);
//! assert_eq!(coord.flipped().flipped(), coord);
//! ```

use anyhow::{Result, ensure};
use std::fmt::{self, Debug, Display};

/// Highest zoom level whose rows still fit into a `u32`.
pub const MAX_LEVEL: u8 = 31;

/// A tile coordinate with zoom level, column and row.
#[derive(Eq, PartialEq, Clone, Hash, Copy)]
pub struct TileCoord {
	/// The zoom level of the tile.
	pub level: u8,
	/// The column of the tile.
	pub x: u32,
	/// The row of the tile.
	pub y: u32,
}

impl TileCoord {
	/// Create a new `TileCoord`.
	///
	/// # Errors
	/// Returns an error if `level` > 31 or if `x`/`y` are outside `[0, 2^level - 1]`.
	pub fn new(level: u8, x: u32, y: u32) -> Result<TileCoord> {
		ensure!(level <= MAX_LEVEL, "level ({level}) must be <= {MAX_LEVEL}");
		let max = 1u64 << level;
		ensure!(u64::from(x) < max, "x ({x}) out of bounds for level {level}");
		ensure!(u64::from(y) < max, "y ({y}) out of bounds for level {level}");
		Ok(TileCoord { level, x, y })
	}

	/// Converts a row between top-down and bottom-up numbering: `(2^level - 1) - y`.
	///
	/// ```
	/// use qmpack_core::TileCoord;
	///
	/// assert_eq!(TileCoord::flip_row(2, 0), 3);
	/// assert_eq!(TileCoord::flip_row(2, 1), 2);
	/// assert_eq!(TileCoord::flip_row(0, 0), 0);
	/// ```
	#[must_use]
	pub fn flip_row(level: u8, y: u32) -> u32 {
		debug_assert!(level <= MAX_LEVEL);
		debug_assert!(u64::from(y) < (1u64 << level));
		((1u64 << level) - 1 - u64::from(y)) as u32
	}

	/// Maximum valid column or row at this zoom level: `2^level - 1`.
	#[must_use]
	pub fn max_value(&self) -> u32 {
		((1u64 << self.level) - 1) as u32
	}

	/// Flip the row in place.
	pub fn flip_y(&mut self) {
		self.y = TileCoord::flip_row(self.level, self.y);
	}

	/// Returns a copy with the row flipped.
	#[must_use]
	pub fn flipped(&self) -> TileCoord {
		let mut coord = *self;
		coord.flip_y();
		coord
	}
}

/// `TileCoord(z, [x, y])`
impl Debug for TileCoord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_fmt(format_args!("TileCoord({}, [{}, {}])", &self.level, &self.x, &self.y))
	}
}

/// `z/x/y`, the layout of the tile path on disk.
impl Display for TileCoord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}/{}", self.level, self.x, self.y)
	}
}
