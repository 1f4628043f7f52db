//! Batch converter: extracted geometry catalog → spatially tiled XML
//! documents plus a property JSON export.
//!
//! One-shot pipeline: ingest the whole catalog into memory, run tiling
//! and allocation to completion, then emit. Ingestion failures abort the
//! run; a failing stage is logged and skipped while the other stage still
//! runs.

mod config;
mod ingest;
mod props;
mod xml;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use config::{properties_path, Args};
use tiling_core::{tile_catalog, GateConfig, UnsupportedReducer};

fn main() -> ExitCode {
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
		)
		.init();

	let args = Args::parse();
	if let Err(err) = args.validate() {
		error!("{err:#}");
		return ExitCode::FAILURE;
	}

	match run(&args) {
		Ok(true) => ExitCode::SUCCESS,
		Ok(false) => ExitCode::FAILURE,
		Err(err) => {
			error!("{err:#}");
			ExitCode::FAILURE
		}
	}
}

/// Run the enabled stages. Returns `Ok(false)` when a stage failed but
/// the run could continue.
fn run(args: &Args) -> Result<bool> {
	// Both stages consume the same ingestion; a broken catalog aborts.
	let ingested = ingest::load(&args.input)?;
	info!(
		elements = ingested.elements.len(),
		objects = ingested.catalog.len(),
		"catalog ingested"
	);

	let base = args.output_base();
	let mut all_ok = true;

	if args.run_properties() {
		let path = properties_path(&base);
		match props::export(&ingested.elements, &path) {
			Ok(()) => info!(path = %path.display(), "properties saved"),
			Err(err) => {
				error!("property stage failed: {err:#}");
				all_ok = false;
			}
		}
	}

	if args.run_geometry() {
		let gate = GateConfig {
			threshold: args.threshold_abs(),
			quality: args.quality,
		};
		let reducer = UnsupportedReducer;

		let result = if args.legacy_split {
			xml::export_size_capped(
				&base,
				&ingested.catalog,
				&gate,
				&reducer,
				args.size_limit_bytes(),
			)
		} else {
			let tiles = tile_catalog(&ingested.catalog, args.tile_size(), args.max_per_tile);
			info!(tiles = tiles.len(), "allocation finished");
			xml::export_tiles(&base, &tiles, &ingested.catalog, &gate, &reducer)
		};

		match result {
			Ok(written) => info!(documents = written.len(), "geometry saved"),
			Err(err) => {
				error!("geometry stage failed: {err:#}");
				all_ok = false;
			}
		}
	}

	if all_ok {
		info!("work done");
	}
	Ok(all_ok)
}
