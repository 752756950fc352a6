//! Lazy discovery of terrain tiles in a directory tree.
//!
//! Tile files must follow the naming pattern:
//! ```text
//! <root>/<z>/<x>/<y>.terrain
//! ```
//! where `<z>` is the zoom level, `<x>` the column and `<y>` the row counted from
//! the top (XYZ). Entries are visited in directory-listing order, which is not sorted.
//!
//! | Entry                        | Handling                     |
//! |------------------------------|------------------------------|
//! | `/tiles/3/2/1.terrain`       | tile z=3 x=2 y=1             |
//! | `/tiles/layer.json`          | skipped, not a directory     |
//! | `/tiles/3/2/1.png`           | skipped, other extension     |
//! | `/tiles/3/abc/`              | error, column is not a number |
//! | `/tiles/3/2/x.terrain`       | error, row is not a number   |
//!
//! Malformed names abort the walk instead of being skipped, so a typo in a tile
//! tree never silently drops tiles from the packed file.

use anyhow::{Context, Result, bail, ensure};
use qmpack_core::{Blob, TileCoord, TileRecord, terrain::TILE_EXTENSION};
use qmpack_derive::context;
use std::{
	ffi::OsStr,
	fmt::Debug,
	fs::{self, DirEntry, ReadDir},
	path::{Path, PathBuf},
	str::FromStr,
};

/// Iterator over all terrain tiles below a root directory.
///
/// Only one directory listing per level of the tree is open at a time and each
/// tile payload is read when it is yielded. The walk cannot be restarted; open a
/// new walker for another pass. After the first error the iterator is exhausted.
pub struct DirectoryTileWalker {
	root: PathBuf,
	levels: ReadDir,
	columns: Option<LevelDir>,
	rows: Option<ColumnDir>,
	finished: bool,
}

/// Open listing of `<root>/<z>`.
struct LevelDir {
	level: u8,
	path: PathBuf,
	entries: ReadDir,
}

/// Open listing of `<root>/<z>/<x>`.
struct ColumnDir {
	level: u8,
	x: u32,
	path: PathBuf,
	entries: ReadDir,
}

impl DirectoryTileWalker {
	/// Starts a walk over `root`.
	///
	/// # Errors
	/// Returns an error if `root` does not exist, is not a directory or cannot be listed.
	#[context("opening tile directory '{}'", root.display())]
	pub fn open_path(root: &Path) -> Result<DirectoryTileWalker> {
		log::trace!("open {root:?}");

		ensure!(root.exists(), "path {root:?} does not exist");
		ensure!(root.is_dir(), "path {root:?} is not a directory");

		Ok(DirectoryTileWalker {
			root: root.to_path_buf(),
			levels: fs::read_dir(root)?,
			columns: None,
			rows: None,
			finished: false,
		})
	}

	fn next_tile(&mut self) -> Result<Option<TileRecord>> {
		loop {
			if let Some(column) = &mut self.rows {
				if let Some(entry) = column.entries.next() {
					let entry = entry.with_context(|| format!("listing directory {:?}", column.path))?;
					if let Some(record) = column.read_tile(&entry)? {
						return Ok(Some(record));
					}
					continue;
				}
				self.rows = None;
			}

			if let Some(level) = &mut self.columns {
				if let Some(entry) = level.entries.next() {
					let entry = entry.with_context(|| format!("listing directory {:?}", level.path))?;
					self.rows = level.open_column(&entry)?;
					continue;
				}
				self.columns = None;
			}

			match self.levels.next() {
				Some(entry) => {
					let entry = entry.with_context(|| format!("listing directory {:?}", self.root))?;
					self.columns = LevelDir::open(&entry)?;
				}
				None => return Ok(None),
			}
		}
	}
}

impl Iterator for DirectoryTileWalker {
	type Item = Result<TileRecord>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.finished {
			return None;
		}
		match self.next_tile() {
			Ok(Some(record)) => Some(Ok(record)),
			Ok(None) => {
				self.finished = true;
				None
			}
			Err(err) => {
				self.finished = true;
				Some(Err(err))
			}
		}
	}
}

impl Debug for DirectoryTileWalker {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("DirectoryTileWalker")
			.field("root", &self.root)
			.field("finished", &self.finished)
			.finish()
	}
}

impl LevelDir {
	/// `None` if the entry is not a directory.
	#[context("opening zoom directory {:?}", entry.path())]
	fn open(entry: &DirEntry) -> Result<Option<LevelDir>> {
		let path = entry.path();
		if !path.is_dir() {
			log::trace!("skip {path:?}");
			return Ok(None);
		}
		let level: u8 = parse_number(&entry.file_name(), "zoom level")?;
		ensure!(level <= qmpack_core::MAX_LEVEL, "zoom level {level} must be <= {}", qmpack_core::MAX_LEVEL);

		log::debug!("scan zoom level {level}");
		Ok(Some(LevelDir {
			level,
			entries: fs::read_dir(&path)?,
			path,
		}))
	}

	#[context("opening column directory {:?}", entry.path())]
	fn open_column(&self, entry: &DirEntry) -> Result<Option<ColumnDir>> {
		let path = entry.path();
		if !path.is_dir() {
			log::trace!("skip {path:?}");
			return Ok(None);
		}
		let x: u32 = parse_number(&entry.file_name(), "column")?;

		Ok(Some(ColumnDir {
			level: self.level,
			x,
			entries: fs::read_dir(&path)?,
			path,
		}))
	}
}

impl ColumnDir {
	/// `None` if the entry is not a `.terrain` file.
	#[context("reading tile file {:?}", entry.path())]
	fn read_tile(&self, entry: &DirEntry) -> Result<Option<TileRecord>> {
		let path = entry.path();
		if path.extension() != Some(OsStr::new(TILE_EXTENSION)) || !path.is_file() {
			log::trace!("skip {path:?}");
			return Ok(None);
		}
		let stem = match path.file_stem() {
			Some(stem) => stem,
			None => bail!("file name has no row number"),
		};
		let y: u32 = parse_number(stem, "row")?;

		let coord = TileCoord::new(self.level, self.x, y)?;
		let blob = Blob::from(fs::read(&path)?);
		log::trace!("read tile {coord} ({} bytes)", blob.len());

		Ok(Some(TileRecord::new(coord, blob)))
	}
}

/// Parses a path segment as a non-negative integer.
fn parse_number<T: FromStr>(name: &OsStr, what: &str) -> Result<T> {
	let text = match name.to_str() {
		Some(text) => text,
		None => bail!("{what} {name:?} is not valid UTF-8"),
	};
	if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
		bail!("{what} '{text}' is not a non-negative integer");
	}
	match text.parse::<T>() {
		Ok(value) => Ok(value),
		Err(_) => bail!("{what} '{text}' is out of range"),
	}
}
