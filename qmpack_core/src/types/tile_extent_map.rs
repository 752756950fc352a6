//! Per-zoom coverage bookkeeping.
//!
//! [`TileExtentMap`] maps each zoom level that received at least one tile to the
//! [`TileExtent`] of all tiles seen at that level. Levels iterate in ascending order.

use crate::{TileCoord, TileExtent};
use std::{
	collections::{BTreeMap, btree_map},
	fmt::{self, Debug},
};

/// Zoom level → extent of the tiles included at that level.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct TileExtentMap {
	levels: BTreeMap<u8, TileExtent>,
}

impl TileExtentMap {
	#[must_use]
	pub fn new_empty() -> TileExtentMap {
		TileExtentMap::default()
	}

	/// Record a tile. An unseen level starts as the single-tile extent at the
	/// coordinate, a known level is widened to include it.
	///
	/// ```
	/// use qmpack_core::{TileCoord, TileExtentMap};
	///
	/// let mut map = TileExtentMap::new_empty();
	/// map.include_coord(&TileCoord::new(2, 0, 3).unwrap());
	/// map.include_coord(&TileCoord::new(2, 1, 2).unwrap());
	/// assert_eq!(map.get(2).unwrap().as_array(), [0, 2, 1, 3]);
	/// ```
	pub fn include_coord(&mut self, coord: &TileCoord) {
		match self.levels.entry(coord.level) {
			btree_map::Entry::Vacant(entry) => {
				entry.insert(TileExtent::new_point(coord.x, coord.y));
			}
			btree_map::Entry::Occupied(mut entry) => entry.get_mut().include(coord.x, coord.y),
		}
	}

	#[must_use]
	pub fn get(&self, level: u8) -> Option<&TileExtent> {
		self.levels.get(&level)
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.levels.is_empty()
	}

	/// Number of zoom levels with at least one tile.
	#[must_use]
	pub fn len(&self) -> usize {
		self.levels.len()
	}

	#[must_use]
	pub fn level_min(&self) -> Option<u8> {
		self.levels.keys().next().copied()
	}

	#[must_use]
	pub fn level_max(&self) -> Option<u8> {
		self.levels.keys().next_back().copied()
	}

	/// Levels and their extents, ascending by level.
	pub fn iter(&self) -> impl Iterator<Item = (u8, &TileExtent)> {
		self.levels.iter().map(|(level, extent)| (*level, extent))
	}
}

impl Debug for TileExtentMap {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let levels: Vec<String> = self.iter().map(|(level, extent)| format!("{level}: {extent:?}")).collect();
		write!(f, "[{}]", levels.join(", "))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn coords(list: &[(u8, u32, u32)]) -> Vec<TileCoord> {
		list.iter().map(|&(z, x, y)| TileCoord::new(z, x, y).unwrap()).collect()
	}

	fn build(coords: &[TileCoord]) -> TileExtentMap {
		let mut map = TileExtentMap::new_empty();
		for coord in coords {
			map.include_coord(coord);
		}
		map
	}

	#[test]
	fn empty_map() {
		let map = TileExtentMap::new_empty();
		assert!(map.is_empty());
		assert_eq!(map.len(), 0);
		assert_eq!(map.level_min(), None);
		assert_eq!(map.level_max(), None);
		assert_eq!(format!("{map:?}"), "[]");
	}

	#[test]
	fn first_tile_initializes_a_point() {
		let map = build(&coords(&[(4, 7, 9)]));
		assert_eq!(map.get(4).unwrap().as_array(), [7, 9, 7, 9]);
		assert!(map.get(3).is_none());
	}

	#[test]
	fn extent_is_exact_min_max_per_level() {
		let list = coords(&[(3, 5, 1), (3, 2, 6), (5, 10, 20), (3, 4, 4), (5, 31, 0), (5, 0, 12)]);
		let map = build(&list);
		assert_eq!(map.len(), 2);
		assert_eq!(map.level_min(), Some(3));
		assert_eq!(map.level_max(), Some(5));

		for (level, extent) in map.iter() {
			let at_level: Vec<&TileCoord> = list.iter().filter(|c| c.level == level).collect();
			let x_min = at_level.iter().map(|c| c.x).min().unwrap();
			let x_max = at_level.iter().map(|c| c.x).max().unwrap();
			let y_min = at_level.iter().map(|c| c.y).min().unwrap();
			let y_max = at_level.iter().map(|c| c.y).max().unwrap();
			assert_eq!(extent.as_array(), [x_min, y_min, x_max, y_max]);
		}
	}

	#[test]
	fn insertion_order_does_not_matter() {
		let mut list = coords(&[(2, 0, 3), (2, 1, 2), (6, 40, 7), (6, 3, 63), (0, 0, 0), (6, 12, 12)]);
		let forward = build(&list);
		list.reverse();
		assert_eq!(build(&list), forward);
		list.rotate_left(2);
		assert_eq!(build(&list), forward);
	}

	#[test]
	fn iterates_in_ascending_level_order() {
		let map = build(&coords(&[(9, 1, 1), (0, 0, 0), (4, 2, 2)]));
		let levels: Vec<u8> = map.iter().map(|(level, _)| level).collect();
		assert_eq!(levels, vec![0, 4, 9]);
		assert_eq!(format!("{map:?}"), "[0: [0,0,0,0] (1x1), 4: [2,2,2,2] (1x1), 9: [1,1,1,1] (1x1)]");
	}
}
