//! Single-pass packing of a terrain tile directory into an MBTiles file.

use crate::{DirectoryTileWalker, MBTilesWriter, PackConfig, PackReport};
use anyhow::Result;
use qmpack_core::TileRecord;
use qmpack_derive::context;
use std::path::Path;

/// Packs every `<z>/<x>/<y>.terrain` tile below `input` into a new MBTiles file at `output`.
///
/// `input` is checked before `output` is touched, so a wrong input path never
/// destroys an existing output file. Any later failure deletes `output`.
#[context("packing '{}' into '{}'", input.display(), output.display())]
pub fn pack_directory(input: &Path, output: &Path, config: &PackConfig) -> Result<PackReport> {
	log::info!("pack {input:?} into {output:?}");
	let tiles = DirectoryTileWalker::open_path(input)?;
	pack_tiles(tiles, output, config)
}

/// Writes a stream of tiles into a new MBTiles file at `output`.
///
/// The stream is consumed one tile at a time. The first error, whether it
/// comes from `tiles` or from the writer, stops the run and deletes `output`.
pub fn pack_tiles<I>(tiles: I, output: &Path, config: &PackConfig) -> Result<PackReport>
where
	I: IntoIterator<Item = Result<TileRecord>>,
{
	let mut writer = MBTilesWriter::create(output)?;

	for tile in tiles {
		if let Err(err) = tile.and_then(|record| writer.insert(record)) {
			if let Err(abort_err) = writer.abort() {
				log::warn!("{abort_err:#}");
			}
			return Err(err);
		}
	}

	log::debug!(
		"read {} tiles at zoom levels {:?}",
		writer.tile_count(),
		writer.extents()
	);
	writer.finalize(&config.name, &config.extensions)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::MBTilesReader;
	use anyhow::anyhow;
	use assert_fs::{
		TempDir,
		fixture::{FileWriteStr, PathChild},
	};
	use pretty_assertions::assert_eq;
	use qmpack_core::{Blob, TileCoord};

	fn record(z: u8, x: u32, y: u32) -> Result<TileRecord> {
		Ok(TileRecord::new(TileCoord::new(z, x, y)?, Blob::from("tile")))
	}

	#[test]
	fn pack_records() -> Result<()> {
		let dir = TempDir::new()?;
		let output = dir.path().join("out.mbtiles");

		let report = pack_tiles(vec![record(3, 1, 1), record(5, 2, 2)], &output, &PackConfig::default())?;
		assert_eq!(report.tile_count, 2);
		assert_eq!((report.min_zoom(), report.max_zoom()), (Some(3), Some(5)));

		let reader = MBTilesReader::open_path(&output)?;
		assert_eq!(reader.get_metadata("name")?.as_deref(), Some("Quantized Mesh Terrain"));
		Ok(())
	}

	#[test]
	fn failing_stream_leaves_no_file() -> Result<()> {
		let dir = TempDir::new()?;
		let output = dir.path().join("out.mbtiles");

		let tiles = vec![record(1, 0, 0), Err(anyhow!("disk on fire")), record(1, 1, 1)];
		let err = pack_tiles(tiles, &output, &PackConfig::default()).unwrap_err();
		assert_eq!(err.to_string(), "disk on fire");
		assert!(!output.exists());
		Ok(())
	}

	#[test]
	fn missing_input_keeps_existing_output() -> Result<()> {
		let dir = TempDir::new()?;
		dir.child("old.mbtiles").write_str("previous run")?;
		let output = dir.path().join("old.mbtiles");

		let err = pack_directory(&dir.path().join("missing"), &output, &PackConfig::default()).unwrap_err();
		assert!(err.to_string().starts_with("packing '"), "{err}");
		assert_eq!(std::fs::read_to_string(&output)?, "previous run");
		Ok(())
	}
}
