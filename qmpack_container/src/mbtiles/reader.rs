//! Read tiles and metadata back from a terrain MBTiles (SQLite) database.
//!
//! ## Usage
//! ```rust,no_run
//! use qmpack_container::MBTilesReader;
//! use qmpack_core::TileCoord;
//! use std::path::Path;
//!
//! let reader = MBTilesReader::open_path(Path::new("/data/terrain.mbtiles")).unwrap();
//! let coverage = reader.coverage().unwrap();
//! let tile = reader.get_tile(&TileCoord::new(0, 0, 0).unwrap()).unwrap();
//! ```

use anyhow::{Context, Result, ensure};
use qmpack_core::{Blob, CoverageDescriptor, TileCoord, TileExtentMap, terrain};
use qmpack_derive::context;
use r2d2::Pool;
use r2d2_sqlite::{
	SqliteConnectionManager,
	rusqlite::{OptionalExtension, params},
};
use std::{collections::BTreeMap, fmt::Debug, path::Path};

/// Reader for terrain MBTiles containers.
pub struct MBTilesReader {
	name: String,
	pool: Pool<SqliteConnectionManager>,
}

impl MBTilesReader {
	/// Open an existing MBTiles database.
	///
	/// # Errors
	/// Returns an error if the file does not exist or SQLite cannot open it.
	#[context("opening MBTiles at '{}'", path.display())]
	pub fn open_path(path: &Path) -> Result<MBTilesReader> {
		log::debug!("open {path:?}");

		ensure!(path.exists(), "file {path:?} does not exist");
		ensure!(path.is_file(), "path {path:?} is not a file");

		let manager = SqliteConnectionManager::file(path);
		let pool = Pool::builder().max_size(10).build(manager)?;

		Ok(MBTilesReader {
			name: path.to_string_lossy().to_string(),
			pool,
		})
	}

	/// All entries of the `metadata` table, sorted by key.
	#[context("reading metadata from '{}'", self.name)]
	pub fn metadata(&self) -> Result<BTreeMap<String, String>> {
		let conn = self.pool.get()?;
		let mut stmt = conn.prepare("SELECT name, value FROM metadata")?;
		let entries = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;

		let mut metadata = BTreeMap::new();
		for entry in entries {
			let (name, value) = entry?;
			metadata.insert(name, value);
		}
		Ok(metadata)
	}

	#[context("reading metadata key '{}' from '{}'", key, self.name)]
	pub fn get_metadata(&self, key: &str) -> Result<Option<String>> {
		let conn = self.pool.get()?;
		let mut stmt = conn.prepare("SELECT value FROM metadata WHERE name = ?1")?;
		Ok(stmt.query_row(params![key], |row| row.get::<_, String>(0)).optional()?)
	}

	/// The coverage descriptor stored under the `json` key.
	#[context("reading coverage from '{}'", self.name)]
	pub fn coverage(&self) -> Result<CoverageDescriptor> {
		let json = self
			.get_metadata(terrain::KEY_JSON)?
			.with_context(|| format!("metadata key '{}' is missing", terrain::KEY_JSON))?;
		CoverageDescriptor::from_json_str(&json)
	}

	/// Fetch a tile by its XYZ coordinate, as laid out on disk.
	pub fn get_tile(&self, coord: &TileCoord) -> Result<Option<Blob>> {
		let tms = coord.flipped();
		self.get_tms_tile(tms.level, tms.x, tms.y)
	}

	/// Fetch a tile by its stored (TMS) coordinate.
	#[context("fetching tile {}/{}/{} from '{}'", level, x, y, self.name)]
	pub fn get_tms_tile(&self, level: u8, x: u32, y: u32) -> Result<Option<Blob>> {
		log::trace!("read tile {level}/{x}/{y}");

		let conn = self.pool.get()?;
		let mut stmt =
			conn.prepare("SELECT tile_data FROM tiles WHERE zoom_level = ?1 AND tile_column = ?2 AND tile_row = ?3")?;
		let data = stmt
			.query_row(params![level, x, y], |row| row.get::<_, Vec<u8>>(0))
			.optional()?;
		Ok(data.map(Blob::from))
	}

	#[context("counting tiles in '{}'", self.name)]
	pub fn tile_count(&self) -> Result<u64> {
		let conn = self.pool.get()?;
		let count: i64 = conn.query_row("SELECT COUNT(*) FROM tiles", [], |row| row.get(0))?;
		Ok(count as u64)
	}

	/// Per-zoom extents computed from the `tiles` table, in stored (TMS) rows.
	///
	/// For a file written by [`MBTilesWriter`](crate::MBTilesWriter) these match the
	/// ranges in the coverage descriptor.
	#[context("computing extents from '{}'", self.name)]
	pub fn extents(&self) -> Result<TileExtentMap> {
		let conn = self.pool.get()?;
		let mut stmt = conn.prepare(
			"SELECT zoom_level, MIN(tile_column), MIN(tile_row), MAX(tile_column), MAX(tile_row)
			FROM tiles GROUP BY zoom_level",
		)?;
		let rows = stmt.query_map([], |row| {
			Ok((
				row.get::<_, u8>(0)?,
				row.get::<_, u32>(1)?,
				row.get::<_, u32>(2)?,
				row.get::<_, u32>(3)?,
				row.get::<_, u32>(4)?,
			))
		})?;

		let mut extents = TileExtentMap::new_empty();
		for row in rows {
			let (level, x_min, y_min, x_max, y_max) = row?;
			extents.include_coord(&TileCoord::new(level, x_min, y_min)?);
			extents.include_coord(&TileCoord::new(level, x_max, y_max)?);
		}
		Ok(extents)
	}
}

impl Debug for MBTilesReader {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MBTilesReader").field("name", &self.name).finish()
	}
}
