//! Coverage descriptor stored under the `json` metadata key.
//!
//! Terrain clients read the `available` list to learn which tiles exist.
//! Entry `i` describes the `i`-th zoom level present in the file (ascending)
//! as a list of rectangles in TMS rows. This writer always emits exactly one
//! rectangle per level, the level's [`TileExtent`].
//!
//! ```
//! use qmpack_core::{CoverageDescriptor, TileCoord, TileExtentMap};
//!
//! let mut map = TileExtentMap::new_empty();
//! map.include_coord(&TileCoord::new(2, 0, 3).unwrap());
//! map.include_coord(&TileCoord::new(2, 1, 2).unwrap());
//!
//! let coverage = CoverageDescriptor::new(vec!["octvertexnormals".to_string()], &map);
//! assert_eq!(
//!     coverage.to_json_string().unwrap(),
//!     r#"{"extensions":["octvertexnormals"],"available":[[{"startX":0,"startY":2,"endX":1,"endY":3}]]}"#
//! );
//! ```

use crate::{TileExtent, TileExtentMap};
use anyhow::Result;
use qmpack_derive::context;
use serde::{Deserialize, Serialize};

/// One rectangle of available tiles, inclusive on both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileRange {
	pub start_x: u32,
	pub start_y: u32,
	pub end_x: u32,
	pub end_y: u32,
}

impl From<&TileExtent> for TileRange {
	fn from(extent: &TileExtent) -> Self {
		TileRange {
			start_x: extent.x_min,
			start_y: extent.y_min,
			end_x: extent.x_max,
			end_y: extent.y_max,
		}
	}
}

/// `{"extensions": [...], "available": [[range], ...]}`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageDescriptor {
	pub extensions: Vec<String>,
	pub available: Vec<Vec<TileRange>>,
}

impl CoverageDescriptor {
	/// One single-rectangle entry per level of `extents`, ascending by level.
	#[must_use]
	pub fn new(extensions: Vec<String>, extents: &TileExtentMap) -> CoverageDescriptor {
		CoverageDescriptor {
			extensions,
			available: extents.iter().map(|(_, extent)| vec![TileRange::from(extent)]).collect(),
		}
	}

	/// Compact JSON without whitespace, keys in declaration order.
	#[context("serializing coverage descriptor")]
	pub fn to_json_string(&self) -> Result<String> {
		Ok(serde_json::to_string(self)?)
	}

	#[context("parsing coverage descriptor '{}'", text)]
	pub fn from_json_str(text: &str) -> Result<CoverageDescriptor> {
		Ok(serde_json::from_str(text)?)
	}
}
