use anyhow::Result;
use clap::Parser;
use clap_verbosity_flag::{ErrorLevel, Verbosity};
use qmpack_container::{MBTilesReader, PackConfig, pack_directory};
use std::path::PathBuf;

/// Pack a folder of quantized-mesh terrain tiles into a single MBTiles file.
///
/// INPUT_FOLDER must contain tiles as <zoom>/<column>/<row>.terrain with rows
/// counted from the top. An existing OUTPUT_FILE is replaced.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, disable_help_subcommand = true)]
struct Cli {
	/// folder containing <zoom>/<column>/<row>.terrain files
	#[arg(required = true, verbatim_doc_comment)]
	input_folder: PathBuf,

	/// MBTiles file to create
	#[arg(required = true, verbatim_doc_comment)]
	output_file: PathBuf,

	/// dataset name stored in the metadata [default: "Quantized Mesh Terrain"]
	#[arg(long, short)]
	name: Option<String>,

	/// YAML file with the dataset name and layer extensions
	#[arg(long, value_name = "FILE")]
	config: Option<PathBuf>,

	/// also write a layer.json describing the packed dataset
	#[arg(long, value_name = "FILE")]
	layer_json: Option<PathBuf>,

	#[command(flatten)]
	verbose: Verbosity<ErrorLevel>,
}

fn main() -> Result<()> {
	let cli = Cli::parse();

	env_logger::Builder::new()
		.filter_level(cli.verbose.log_level_filter())
		.format_timestamp(None)
		.init();

	run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
	let config = match &cli.config {
		Some(path) => PackConfig::from_path(path)?,
		None => PackConfig::default(),
	}
	.with_name(cli.name.as_deref());

	let report = pack_directory(&cli.input_folder, &cli.output_file, &config)?;
	log::info!(
		"finished {:?}: {} tiles, {} bytes, zoom {:?}..{:?}",
		cli.output_file,
		report.tile_count,
		report.total_bytes,
		report.min_zoom(),
		report.max_zoom()
	);

	if let Some(path) = &cli.layer_json {
		MBTilesReader::open_path(&cli.output_file)?
			.layer_json()?
			.write_to_path(path)?;
		log::info!("wrote {path:?}");
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use assert_fs::{
		TempDir,
		fixture::{FileWriteStr, PathChild},
	};
	use pretty_assertions::assert_eq;

	fn run_command(arg_vec: Vec<&str>) -> Result<String> {
		let cli = Cli::try_parse_from(arg_vec)?;
		let msg = format!("{cli:?}");
		run(&cli)?;
		Ok(msg)
	}

	#[test]
	fn help() {
		let err = run_command(vec!["qmpack"]).unwrap_err().to_string();
		assert!(err.contains("Usage: qmpack <INPUT_FOLDER> <OUTPUT_FILE>"), "{err}");
	}

	#[test]
	fn version() {
		let err = run_command(vec!["qmpack", "-V"]).unwrap_err().to_string();
		assert!(err.starts_with("qmpack "), "{err}");
	}

	#[test]
	fn parse_arguments() -> Result<()> {
		let cli = Cli::try_parse_from(["qmpack", "in", "out.mbtiles", "-n", "Alps", "--layer-json", "layer.json"])?;
		assert_eq!(cli.input_folder, PathBuf::from("in"));
		assert_eq!(cli.output_file, PathBuf::from("out.mbtiles"));
		assert_eq!(cli.name.as_deref(), Some("Alps"));
		assert_eq!(cli.config, None);
		assert_eq!(cli.layer_json, Some(PathBuf::from("layer.json")));
		Ok(())
	}

	#[test]
	fn name_overrides_config() -> Result<()> {
		let dir = TempDir::new()?;
		dir.child("tiles/0/0/0.terrain").write_str("tile")?;
		dir.child("pack.yaml").write_str("name: From Config\nextensions: []\n")?;
		let tiles = dir.path().join("tiles");
		let output = dir.path().join("out.mbtiles");
		let config = dir.path().join("pack.yaml");

		run_command(vec![
			"qmpack",
			tiles.to_str().unwrap(),
			output.to_str().unwrap(),
			"--config",
			config.to_str().unwrap(),
			"--name",
			"From Flag",
		])?;

		let reader = MBTilesReader::open_path(&output)?;
		assert_eq!(reader.get_metadata("name")?.as_deref(), Some("From Flag"));
		assert_eq!(reader.coverage()?.extensions, Vec::<String>::new());
		Ok(())
	}

	#[test]
	fn writes_layer_json() -> Result<()> {
		let dir = TempDir::new()?;
		dir.child("tiles/1/1/0.terrain").write_str("tile")?;
		let tiles = dir.path().join("tiles");
		let output = dir.path().join("out.mbtiles");
		let layer = dir.path().join("layer.json");

		run_command(vec![
			"qmpack",
			tiles.to_str().unwrap(),
			output.to_str().unwrap(),
			"--layer-json",
			layer.to_str().unwrap(),
		])?;

		let text = std::fs::read_to_string(&layer)?;
		assert!(text.contains("\"name\": \"Quantized Mesh Terrain\""), "{text}");
		assert!(text.contains("\"minzoom\": 1"), "{text}");
		Ok(())
	}
}
