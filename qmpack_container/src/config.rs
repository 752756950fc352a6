use anyhow::Result;
use qmpack_core::terrain::{default_extensions, default_name};
use qmpack_derive::context;
use serde::Deserialize;
use std::{
	fs::File,
	io::{BufReader, Read},
	path::Path,
};

/// Settings of a packing run.
///
/// Can be loaded from YAML:
/// ```yaml
/// name: Alps Terrain
/// extensions:
///   - octvertexnormals
///   - watermask
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PackConfig {
	/// Dataset name written to the `name` metadata entry.
	#[serde(default = "default_name")]
	pub name: String,

	/// Terrain extensions announced in the coverage descriptor.
	///
	/// Clients decide which optional tile sections to request from this list, so
	/// anything other than the default `["octvertexnormals"]` changes the `json`
	/// metadata entry they see. The tile payloads are stored unchanged either way.
	#[serde(default = "default_extensions")]
	pub extensions: Vec<String>,
}

impl Default for PackConfig {
	fn default() -> Self {
		PackConfig {
			name: default_name(),
			extensions: default_extensions(),
		}
	}
}

impl PackConfig {
	pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
		Ok(serde_yaml_ng::from_reader(reader)?)
	}

	pub fn from_string(text: &str) -> Result<Self> {
		Ok(serde_yaml_ng::from_str(text)?)
	}

	#[context("loading pack config from '{}'", path.display())]
	pub fn from_path(path: &Path) -> Result<Self> {
		let file = File::open(path)?;
		PackConfig::from_reader(BufReader::new(file))
	}

	/// Replace the dataset name, if one is given.
	#[must_use]
	pub fn with_name(mut self, name: Option<&str>) -> Self {
		if let Some(name) = name {
			self.name = name.to_string();
		}
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use assert_fs::{TempDir, fixture::FileWriteStr, fixture::PathChild};
	use pretty_assertions::assert_eq;

	#[test]
	fn defaults() {
		let config = PackConfig::default();
		assert_eq!(config.name, "Quantized Mesh Terrain");
		assert_eq!(config.extensions, vec!["octvertexnormals"]);
	}

	#[test]
	fn empty_yaml_uses_defaults() -> Result<()> {
		assert_eq!(PackConfig::from_string("{}")?, PackConfig::default());
		Ok(())
	}

	#[test]
	fn parse_all_fields() -> Result<()> {
		let config = PackConfig::from_string("name: Alps\nextensions:\n  - octvertexnormals\n  - watermask\n")?;
		assert_eq!(config.name, "Alps");
		assert_eq!(config.extensions, vec!["octvertexnormals", "watermask"]);
		Ok(())
	}

	#[test]
	fn unknown_fields_are_rejected() {
		let err = PackConfig::from_string("name: Alps\nschema: xyz\n").unwrap_err();
		assert!(err.to_string().contains("unknown field `schema`"), "{err}");
	}

	#[test]
	fn from_path() -> Result<()> {
		let dir = TempDir::new()?;
		dir.child("pack.yaml").write_str("name: From File\n")?;
		let config = PackConfig::from_path(&dir.path().join("pack.yaml"))?;
		assert_eq!(config.name, "From File");
		assert_eq!(config.extensions, vec!["octvertexnormals"]);
		Ok(())
	}

	#[test]
	fn from_missing_path() {
		let err = PackConfig::from_path(Path::new("/does/not/exist.yaml")).unwrap_err();
		assert_eq!(err.to_string(), "loading pack config from '/does/not/exist.yaml'");
	}

	#[test]
	fn with_name_overrides() {
		let config = PackConfig::default().with_name(Some("Override"));
		assert_eq!(config.name, "Override");
		let config = config.with_name(None);
		assert_eq!(config.name, "Override");
	}
}
