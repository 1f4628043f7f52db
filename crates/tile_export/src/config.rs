//! Command line surface for the tile exporter.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::Parser;
use glam::DVec3;

/// Convert an extracted geometry catalog into spatially tiled XML
/// documents plus a property JSON export.
#[derive(Parser, Debug)]
#[command(name = "tile_export")]
#[command(about = "Tiles an extracted model catalog into bounded XML documents")]
pub struct Args {
	/// Path of the extracted catalog file (.json).
	#[arg(short = 'i', long)]
	pub input: PathBuf,

	/// Output geometry tiles. If neither this nor --properties is set,
	/// both stages run.
	#[arg(short = 'g', long)]
	pub geometry: bool,

	/// Output the property JSON export.
	#[arg(short = 'p', long)]
	pub properties: bool,

	/// X size of each tile, in model units.
	#[arg(short = 'x', long, default_value_t = 100.0)]
	pub tile_x: f64,

	/// Y size of each tile, in model units.
	#[arg(short = 'y', long, default_value_t = 100.0)]
	pub tile_y: f64,

	/// Z size of each tile, in model units.
	#[arg(short = 'z', long, default_value_t = 100.0)]
	pub tile_z: f64,

	/// Maximum number of elements in each tile.
	#[arg(short = 'm', long, default_value_t = 100)]
	pub max_per_tile: usize,

	/// Triangle count from which a mesh is decimated.
	#[arg(short = 't', long, default_value_t = 500, allow_negative_numbers = true)]
	pub threshold: i64,

	/// Quality factor for decimation, clamped into (0, 1].
	#[arg(short = 'q', long, default_value_t = 0.5)]
	pub quality: f64,

	/// Maximum size of one output document in MB. Only used by
	/// --legacy-split.
	#[arg(short = 's', long, default_value_t = 10.0)]
	pub size_limit: f64,

	/// Split output by accumulated document size instead of spatial
	/// tiles (legacy behavior).
	#[arg(long)]
	pub legacy_split: bool,
}

impl Args {
	/// Tile size vector from the per-axis flags.
	pub fn tile_size(&self) -> DVec3 {
		DVec3::new(self.tile_x, self.tile_y, self.tile_z)
	}

	/// Triangle threshold; negative input is taken by magnitude.
	pub fn threshold_abs(&self) -> usize {
		self.threshold.unsigned_abs() as usize
	}

	/// Legacy size cap in bytes.
	pub fn size_limit_bytes(&self) -> usize {
		(self.size_limit * 1_048_576.0).max(0.0) as usize
	}

	/// Whether the geometry stage should run.
	pub fn run_geometry(&self) -> bool {
		self.geometry || !self.properties
	}

	/// Whether the property stage should run.
	pub fn run_properties(&self) -> bool {
		self.properties || !self.geometry
	}

	/// Validate the input path and numeric flags before any stage runs.
	pub fn validate(&self) -> Result<()> {
		if self.input.extension().and_then(|e| e.to_str()) != Some("json") {
			bail!(
				"input file {} does not have a .json suffix",
				self.input.display()
			);
		}
		if !self.input.exists() {
			bail!("input file {} does not exist", self.input.display());
		}
		if !(self.tile_x > 0.0 && self.tile_y > 0.0 && self.tile_z > 0.0) {
			bail!("tile sizes must be positive, got ({}, {}, {})", self.tile_x, self.tile_y, self.tile_z);
		}
		if self.max_per_tile == 0 {
			bail!("--max-per-tile must be at least 1");
		}
		Ok(())
	}

	/// Base path for outputs: the input path without its extension.
	pub fn output_base(&self) -> PathBuf {
		self.input.with_extension("")
	}
}

/// Derived output path for the property export.
pub fn properties_path(base: &Path) -> PathBuf {
	let mut path = base.as_os_str().to_owned();
	path.push(".properties.json");
	PathBuf::from(path)
}
