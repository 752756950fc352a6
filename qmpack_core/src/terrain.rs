//! Fixed values of a quantized-mesh terrain MBTiles file.
//!
//! Tiles are read from `<root>/<z>/<x>/<y>.terrain` and the resulting container
//! always describes a global EPSG:4326 dataset stored in TMS row order.

/// File extension of terrain tiles, without the dot.
pub const TILE_EXTENSION: &str = "terrain";

/// Dataset name used when none is configured.
pub const DEFAULT_NAME: &str = "Quantized Mesh Terrain";

/// Terrain extensions announced in the coverage descriptor by default.
pub const DEFAULT_EXTENSIONS: &[&str] = &["octvertexnormals"];

pub const FORMAT: &str = "quantized-mesh-1.0";
pub const BOUNDS: &str = "-180.0,-90.0,180.0,90.0";
pub const PROJECTION: &str = "EPSG:4326";
pub const SCHEMA: &str = "tms";

/// URL template served to terrain clients, relative to `layer.json`.
pub const TILE_URL_TEMPLATE: &str = "{z}/{x}/{y}.terrain";

/// Metadata key of the JSON coverage descriptor.
pub const KEY_JSON: &str = "json";

/// Every key written to the `metadata` table, in write order.
pub const METADATA_KEYS: [&str; 8] = [
	KEY_JSON,
	"name",
	"format",
	"minzoom",
	"maxzoom",
	"bounds",
	"projection",
	"schema",
];

/// Default extensions as owned strings.
#[must_use]
pub fn default_extensions() -> Vec<String> {
	DEFAULT_EXTENSIONS.iter().map(|s| (*s).to_string()).collect()
}

#[must_use]
pub fn default_name() -> String {
	DEFAULT_NAME.to_string()
}
