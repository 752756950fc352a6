//! Write quantized-mesh terrain tiles and metadata into an MBTiles (SQLite) database.
//!
//! The database schema consists of:
//! - `tiles`: columns `(zoom_level, tile_column, tile_row, tile_data)` with a unique
//!   index `tile_index` on the coordinate columns
//! - `metadata`: `(name, value)` text pairs
//!
//! Coordinates are stored in the **TMS layout**, meaning that the row is flipped
//! from the XYZ input (`tile_row = 2^z - 1 - y`). The per-zoom extents reported in
//! the `json` metadata entry use the same stored rows.
//!
//! A writer moves through three states: created (empty database, open
//! transaction), populating ([`MBTilesWriter::insert`]) and sealed
//! ([`MBTilesWriter::finalize`], which consumes the writer). [`MBTilesWriter::abort`]
//! discards the file instead.
//!
//! ## Example
//! ```rust,no_run
//! use qmpack_container::MBTilesWriter;
//! use qmpack_core::{Blob, TileCoord, TileRecord};
//! use std::path::Path;
//!
//! let mut writer = MBTilesWriter::create(Path::new("/tmp/terrain.mbtiles")).unwrap();
//! writer.insert(TileRecord::new(TileCoord::new(0, 0, 0).unwrap(), Blob::from("tile"))).unwrap();
//! let report = writer.finalize("Demo", &["octvertexnormals".to_string()]).unwrap();
//! assert_eq!(report.tile_count, 1);
//! ```

use anyhow::{Result, bail, ensure};
use qmpack_core::{CoverageDescriptor, TileExtentMap, TileRecord, terrain};
use qmpack_derive::context;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::{SqliteConnectionManager, rusqlite::params};
use std::{
	fs::remove_file,
	path::{Path, PathBuf},
};

const INSERT_TILE: &str = "INSERT INTO tiles (zoom_level, tile_column, tile_row, tile_data) VALUES (?1, ?2, ?3, ?4)";

/// Summary of a sealed container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackReport {
	pub tile_count: u64,
	pub total_bytes: u64,
	/// Per-zoom extents in stored (TMS) rows.
	pub extents: TileExtentMap,
}

impl PackReport {
	#[must_use]
	pub fn min_zoom(&self) -> Option<u8> {
		self.extents.level_min()
	}

	#[must_use]
	pub fn max_zoom(&self) -> Option<u8> {
		self.extents.level_max()
	}
}

/// Writer for terrain MBTiles containers.
///
/// Holds the only connection to the database for the whole run. All inserts
/// share one transaction that is committed by [`finalize`](Self::finalize).
pub struct MBTilesWriter {
	path: PathBuf,
	conn: PooledConnection<SqliteConnectionManager>,
	extents: TileExtentMap,
	tile_count: u64,
	total_bytes: u64,
}

impl MBTilesWriter {
	/// Create a new MBTiles database at `path`.
	///
	/// An existing file at `path` is deleted first. This is destructive and not
	/// atomic: until [`finalize`](Self::finalize) succeeds there is no complete file at `path`.
	///
	/// # Errors
	/// Returns an error if the file cannot be removed, the database cannot be opened,
	/// or the schema creation fails.
	#[context("creating MBTiles database '{}'", path.display())]
	pub fn create(path: &Path) -> Result<MBTilesWriter> {
		if path.exists() {
			log::debug!("remove existing {path:?}");
			remove_file(path)?;
		}

		let manager = SqliteConnectionManager::file(path);
		let pool = Pool::builder().max_size(1).build(manager)?;
		let conn = pool.get()?;

		conn.execute_batch(
			"CREATE TABLE tiles (zoom_level INTEGER, tile_column INTEGER, tile_row INTEGER, tile_data BLOB);
			CREATE TABLE metadata (name TEXT, value TEXT);
			CREATE UNIQUE INDEX tile_index ON tiles (zoom_level, tile_column, tile_row);
			BEGIN;",
		)?;

		Ok(MBTilesWriter {
			path: path.to_path_buf(),
			conn,
			extents: TileExtentMap::new_empty(),
			tile_count: 0,
			total_bytes: 0,
		})
	}

	/// Store one tile.
	///
	/// Flips the row from XYZ to TMS, inserts the tile and widens the extent of
	/// its zoom level. A tile whose stored coordinate already exists fails with
	/// the database's `UNIQUE constraint failed` error.
	#[context("inserting tile {} into '{}'", record.coord, self.path.display())]
	pub fn insert(&mut self, record: TileRecord) -> Result<()> {
		let coord = record.coord.flipped();

		self
			.conn
			.prepare_cached(INSERT_TILE)?
			.execute(params![coord.level, coord.x, coord.y, record.blob.as_slice()])?;

		self.extents.include_coord(&coord);
		self.tile_count += 1;
		self.total_bytes += record.blob.len();
		log::trace!("inserted tile {} as {coord}", record.coord);

		Ok(())
	}

	/// Extents of the tiles inserted so far, in stored (TMS) rows.
	#[must_use]
	pub fn extents(&self) -> &TileExtentMap {
		&self.extents
	}

	#[must_use]
	pub fn tile_count(&self) -> u64 {
		self.tile_count
	}

	/// Write the metadata table, commit and close the database.
	///
	/// Fails if no tile was inserted, because the zoom range and coverage are
	/// undefined for an empty dataset. On any failure the file is deleted.
	pub fn finalize(self, name: &str, extensions: &[String]) -> Result<PackReport> {
		let path = self.path.clone();

		if let Err(err) = self.write_metadata(name, extensions) {
			if let Err(abort_err) = self.abort() {
				log::warn!("{abort_err:#}");
			}
			return Err(err.context(format!("finalizing MBTiles database '{}'", path.display())));
		}

		let MBTilesWriter {
			conn,
			extents,
			tile_count,
			total_bytes,
			..
		} = self;
		drop(conn);

		log::debug!("sealed {path:?} with {tile_count} tiles");
		Ok(PackReport {
			tile_count,
			total_bytes,
			extents,
		})
	}

	fn write_metadata(&self, name: &str, extensions: &[String]) -> Result<()> {
		let (min_zoom, max_zoom) = match (self.extents.level_min(), self.extents.level_max()) {
			(Some(min), Some(max)) => (min, max),
			_ => bail!("no tiles found"),
		};
		ensure!(min_zoom <= max_zoom, "invalid zoom range {min_zoom}..{max_zoom}");

		let coverage = CoverageDescriptor::new(extensions.to_vec(), &self.extents).to_json_string()?;

		self.set_metadata(terrain::KEY_JSON, &coverage)?;
		self.set_metadata("name", name)?;
		self.set_metadata("format", terrain::FORMAT)?;
		self.set_metadata("minzoom", &min_zoom.to_string())?;
		self.set_metadata("maxzoom", &max_zoom.to_string())?;
		self.set_metadata("bounds", terrain::BOUNDS)?;
		self.set_metadata("projection", terrain::PROJECTION)?;
		self.set_metadata("schema", terrain::SCHEMA)?;

		self.conn.execute_batch("COMMIT;")?;
		Ok(())
	}

	/// Insert a metadata key-value pair.
	#[context("setting metadata key '{}' = '{}'", name, value)]
	fn set_metadata(&self, name: &str, value: &str) -> Result<()> {
		self
			.conn
			.execute("INSERT INTO metadata (name, value) VALUES (?1, ?2)", params![name, value])?;
		Ok(())
	}

	/// Close the database and delete the file, leaving nothing behind at the output path.
	#[context("discarding MBTiles database '{}'", path.display())]
	fn discard(conn: PooledConnection<SqliteConnectionManager>, path: &Path) -> Result<()> {
		drop(conn);
		if path.exists() {
			remove_file(path)?;
		}
		Ok(())
	}

	/// Give up on this container: the uncommitted tiles are dropped and the file is deleted.
	pub fn abort(self) -> Result<()> {
		log::debug!("abort {:?}", self.path);
		MBTilesWriter::discard(self.conn, &self.path)
	}
}
