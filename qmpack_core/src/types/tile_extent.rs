//! Inclusive rectangle of tile columns and rows at a single zoom level.

use std::fmt::{self, Debug};

/// The tightest axis-aligned rectangle around a set of tiles at one zoom level.
///
/// An extent always covers at least one tile: it is created from the first tile
/// and only ever grows. Coverage inside the rectangle may be sparse.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileExtent {
	pub x_min: u32,
	pub y_min: u32,
	pub x_max: u32,
	pub y_max: u32,
}

impl TileExtent {
	/// Single-tile extent at `(x, y)`.
	///
	/// ```
	/// use qmpack_core::TileExtent;
	///
	/// let extent = TileExtent::new_point(3, 5);
	/// assert_eq!(extent.as_array(), [3, 5, 3, 5]);
	/// ```
	#[must_use]
	pub fn new_point(x: u32, y: u32) -> TileExtent {
		TileExtent {
			x_min: x,
			y_min: y,
			x_max: x,
			y_max: y,
		}
	}

	/// Widen the extent to include `(x, y)`. Each axis is updated independently.
	///
	/// ```
	/// use qmpack_core::TileExtent;
	///
	/// let mut extent = TileExtent::new_point(3, 5);
	/// extent.include(1, 7);
	/// assert_eq!(extent.as_array(), [1, 5, 3, 7]);
	/// ```
	pub fn include(&mut self, x: u32, y: u32) {
		self.x_min = self.x_min.min(x);
		self.x_max = self.x_max.max(x);
		self.y_min = self.y_min.min(y);
		self.y_max = self.y_max.max(y);
	}

	#[must_use]
	pub fn width(&self) -> u32 {
		self.x_max - self.x_min + 1
	}

	#[must_use]
	pub fn height(&self) -> u32 {
		self.y_max - self.y_min + 1
	}

	/// `[x_min, y_min, x_max, y_max]`
	#[must_use]
	pub fn as_array(&self) -> [u32; 4] {
		[self.x_min, self.y_min, self.x_max, self.y_max]
	}
}

impl Debug for TileExtent {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"[{},{},{},{}] ({}x{})",
			self.x_min,
			self.y_min,
			self.x_max,
			self.y_max,
			self.width(),
			self.height()
		)
	}
}
