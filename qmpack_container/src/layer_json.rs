//! `layer.json` for terrain clients.
//!
//! Terrain servers publish the metadata of a packed MBTiles file as a Cesium-style
//! `layer.json` next to the tiles, adding the tile URL template that clients need
//! to request `{z}/{x}/{y}.terrain`.

use crate::MBTilesReader;
use anyhow::{Context, Result, ensure};
use qmpack_core::{TileRange, terrain};
use qmpack_derive::context;
use serde::Serialize;
use std::{collections::BTreeMap, fs, path::Path};

/// The `layer.json` document of a terrain dataset.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LayerJson {
	pub tilejson: String,
	pub name: String,
	pub version: String,
	pub format: String,
	pub scheme: String,
	pub tiles: Vec<String>,
	pub projection: String,
	pub bounds: [f64; 4],
	pub minzoom: u8,
	pub maxzoom: u8,
	pub extensions: Vec<String>,
	pub available: Vec<Vec<TileRange>>,
}

impl LayerJson {
	/// Builds the document from the metadata table of `reader`.
	#[context("building layer.json from {:?}", reader)]
	pub fn from_reader(reader: &MBTilesReader) -> Result<LayerJson> {
		let metadata = reader.metadata()?;
		let get = |key: &str| required(&metadata, key);
		let coverage = reader.coverage()?;

		Ok(LayerJson {
			tilejson: String::from("2.1.0"),
			name: get("name")?.to_string(),
			version: String::from("1.0.0"),
			format: get("format")?.to_string(),
			scheme: get("schema")?.to_string(),
			tiles: vec![terrain::TILE_URL_TEMPLATE.to_string()],
			projection: get("projection")?.to_string(),
			bounds: parse_bounds(get("bounds")?)?,
			minzoom: get("minzoom")?.parse()?,
			maxzoom: get("maxzoom")?.parse()?,
			extensions: coverage.extensions,
			available: coverage.available,
		})
	}

	#[context("serializing layer.json")]
	pub fn to_json_string(&self) -> Result<String> {
		Ok(serde_json::to_string_pretty(self)?)
	}

	#[context("writing layer.json to '{}'", path.display())]
	pub fn write_to_path(&self, path: &Path) -> Result<()> {
		fs::write(path, self.to_json_string()?)?;
		Ok(())
	}
}

impl MBTilesReader {
	/// Shorthand for [`LayerJson::from_reader`].
	pub fn layer_json(&self) -> Result<LayerJson> {
		LayerJson::from_reader(self)
	}
}

/// Parses `"west,south,east,north"`.
#[context("parsing bounds '{}'", text)]
fn parse_bounds(text: &str) -> Result<[f64; 4]> {
	let values = text
		.split(',')
		.map(|s| s.trim().parse::<f64>())
		.collect::<Result<Vec<f64>, _>>()?;
	ensure!(values.len() == 4, "bounds must contain exactly 4 numbers");
	Ok([values[0], values[1], values[2], values[3]])
}

fn required<'a>(metadata: &'a BTreeMap<String, String>, key: &str) -> Result<&'a str> {
	metadata
		.get(key)
		.map(String::as_str)
		.with_context(|| format!("metadata key '{key}' is missing"))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::MBTilesWriter;
	use assert_fs::NamedTempFile;
	use pretty_assertions::assert_eq;
	use qmpack_core::{Blob, TileCoord, TileRecord};

	#[test]
	fn from_packed_file() -> Result<()> {
		let file = NamedTempFile::new("terrain.mbtiles")?;
		let mut writer = MBTilesWriter::create(&file)?;
		writer.insert(TileRecord::new(TileCoord::new(0, 0, 0)?, Blob::from("root")))?;
		writer.insert(TileRecord::new(TileCoord::new(1, 1, 0)?, Blob::from("east")))?;
		writer.finalize("Layer Test", &["octvertexnormals".to_string()])?;

		let layer = MBTilesReader::open_path(&file)?.layer_json()?;
		assert_eq!(layer.name, "Layer Test");
		assert_eq!(layer.format, "quantized-mesh-1.0");
		assert_eq!(layer.scheme, "tms");
		assert_eq!(layer.tiles, vec!["{z}/{x}/{y}.terrain"]);
		assert_eq!(layer.bounds, [-180.0, -90.0, 180.0, 90.0]);
		assert_eq!((layer.minzoom, layer.maxzoom), (0, 1));
		assert_eq!(layer.available.len(), 2);

		let json = layer.to_json_string()?;
		assert!(json.starts_with("{\n  \"tilejson\": \"2.1.0\",\n  \"name\": \"Layer Test\","), "{json}");
		assert!(json.contains("\"projection\": \"EPSG:4326\""), "{json}");
		Ok(())
	}

	#[test]
	fn write_to_path() -> Result<()> {
		let file = NamedTempFile::new("terrain.mbtiles")?;
		let mut writer = MBTilesWriter::create(&file)?;
		writer.insert(TileRecord::new(TileCoord::new(2, 3, 3)?, Blob::from("tile")))?;
		writer.finalize("Written", &[])?;

		let out = NamedTempFile::new("layer.json")?;
		let layer = MBTilesReader::open_path(&file)?.layer_json()?;
		layer.write_to_path(out.path())?;

		let text = fs::read_to_string(out.path())?;
		let value: serde_json::Value = serde_json::from_str(&text)?;
		assert_eq!(value["available"][0][0]["startY"], 0);
		assert_eq!(value["extensions"], serde_json::json!([]));
		Ok(())
	}

	#[test]
	fn bounds_parsing() -> Result<()> {
		assert_eq!(parse_bounds("-180.0,-90.0,180.0,90.0")?, [-180.0, -90.0, 180.0, 90.0]);
		assert_eq!(parse_bounds("1, 2, 3, 4")?, [1.0, 2.0, 3.0, 4.0]);
		assert!(parse_bounds("1,2,3").is_err());
		assert!(parse_bounds("a,b,c,d").is_err());
		Ok(())
	}
}
