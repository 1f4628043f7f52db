//! Catalog ingestion: the interchange file the extraction collaborator
//! writes, deserialized and converted into the core catalog.
//!
//! The core crate stays serde-free; all wire concerns live here. The
//! interchange is one JSON document:
//!
//! ```json
//! {
//!   "elements": [
//!     {
//!       "id": "2O2Fr$t4X7Zf8NOew3FLOH",
//!       "name": "Basic Wall",
//!       "description": "",
//!       "ifc_type": "IfcWallStandardCase",
//!       "properties": { "Level": "Ground Floor" },
//!       "meshes": [
//!         {
//!           "color": [140, 140, 140, 255],
//!           "vertices": [0.0, 0.0, 0.0, ...],
//!           "normals": [],
//!           "indices": [0, 1, 2, ...]
//!         }
//!       ]
//!     }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tiling_core::{Catalog, MeshPiece};

/// Root of the interchange document.
#[derive(Debug, Deserialize)]
pub struct CatalogFile {
	pub elements: Vec<ElementRecord>,
}

/// One extracted element with its property bag and meshes.
#[derive(Debug, Deserialize)]
pub struct ElementRecord {
	/// Stable identity (GlobalId in the source model).
	pub id: String,
	/// Display name.
	#[serde(default)]
	pub name: String,
	/// Free-text description.
	#[serde(default)]
	pub description: String,
	/// Source type tag, e.g. "IfcWallStandardCase".
	#[serde(default)]
	pub ifc_type: String,
	/// Extracted property set values, name → value.
	#[serde(default)]
	pub properties: BTreeMap<String, serde_json::Value>,
	/// Triangulated meshes; elements without geometry carry none.
	#[serde(default)]
	pub meshes: Vec<MeshRecord>,
}

/// One triangulated mesh on the wire.
#[derive(Debug, Deserialize)]
pub struct MeshRecord {
	/// RGBA, 0-255 per component.
	pub color: [u8; 4],
	/// Flattened x,y,z triples.
	pub vertices: Vec<f64>,
	#[serde(default)]
	pub normals: Vec<f64>,
	/// Triangle indices into the vertex triples.
	pub indices: Vec<u32>,
}

/// Result of ingestion: the geometric catalog plus the element records
/// (kept for the property export, which also covers geometry-free
/// elements).
pub struct Ingested {
	pub catalog: Catalog,
	pub elements: Vec<ElementRecord>,
}

/// Load and convert an interchange file.
///
/// Any malformed or vertex-free mesh aborts ingestion: a partially built
/// catalog must never reach the tiler.
pub fn load(path: &Path) -> Result<Ingested> {
	let text = std::fs::read_to_string(path)
		.with_context(|| format!("failed to read catalog file {}", path.display()))?;
	let file: CatalogFile = serde_json::from_str(&text)
		.with_context(|| format!("failed to parse catalog file {}", path.display()))?;

	let mut catalog = Catalog::new();
	for element in &file.elements {
		for mesh in &element.meshes {
			let piece = MeshPiece {
				color: mesh.color,
				vertices: mesh.vertices.clone(),
				normals: mesh.normals.clone(),
				indices: mesh.indices.clone(),
			};
			catalog
				.insert_mesh(&element.id, &element.name, piece)
				.with_context(|| format!("while ingesting element `{}`", element.id))?;
		}
	}

	Ok(Ingested {
		catalog,
		elements: file.elements,
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn parse(json: &str) -> Result<Ingested> {
		let file: CatalogFile = serde_json::from_str(json)?;
		let mut catalog = Catalog::new();
		for element in &file.elements {
			for mesh in &element.meshes {
				catalog.insert_mesh(
					&element.id,
					&element.name,
					MeshPiece {
						color: mesh.color,
						vertices: mesh.vertices.clone(),
						normals: mesh.normals.clone(),
						indices: mesh.indices.clone(),
					},
				)?;
			}
		}
		Ok(Ingested {
			catalog,
			elements: file.elements,
		})
	}

	#[test]
	fn test_ingest_minimal_catalog() {
		let ingested = parse(
			r#"{
				"elements": [{
					"id": "w1",
					"name": "Wall",
					"meshes": [{
						"color": [1, 2, 3, 255],
						"vertices": [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
						"indices": [0, 1, 2]
					}]
				}]
			}"#,
		)
		.unwrap();

		assert_eq!(ingested.catalog.len(), 1);
		let object = ingested.catalog.get("w1").unwrap();
		assert_eq!(object.name, "Wall");
		assert_eq!(object.meshes[0].color, [1, 2, 3, 255]);
		assert!(!ingested.catalog.bounds().is_empty());
	}

	#[test]
	fn test_ingest_element_without_geometry() {
		// Spatial-structure elements carry properties but no meshes.
		let ingested = parse(
			r#"{
				"elements": [{
					"id": "site-1",
					"name": "Site",
					"ifc_type": "IfcSite",
					"properties": { "Elevation": "12.5" }
				}]
			}"#,
		)
		.unwrap();

		assert!(ingested.catalog.is_empty());
		assert_eq!(ingested.elements.len(), 1);
	}

	#[test]
	fn test_ingest_degenerate_mesh_aborts() {
		let result = parse(
			r#"{
				"elements": [{
					"id": "ghost",
					"name": "Ghost",
					"meshes": [{
						"color": [0, 0, 0, 255],
						"vertices": [],
						"indices": []
					}]
				}]
			}"#,
		);
		assert!(result.is_err());
	}
}
