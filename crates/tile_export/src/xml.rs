//! XML geometry emission.
//!
//! One self-contained document per non-empty tile, or (legacy mode) a
//! sequence of documents split whenever the accumulated text exceeds a
//! byte budget. The wire format is fixed: root `IfcModel`, `Element`
//! nodes with `ElementId`/`LevelName`/`Name` attributes, `Mesh` nodes
//! with the parent id, a `Color` of literal `"R,G,B,A"` text and an
//! empty `Material`, and a `Lod0` block with empty `UVs`/`UVIndexes`
//! placeholders plus comma-joined `Vertices` and `PointIndexes` text.

use std::borrow::Cow;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use tiling_core::{apply_gate, Catalog, GateConfig, GeometryObject, MeshPiece, MeshReducer, Tile};

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"utf-8\" standalone=\"yes\"?>\n";

/// Escape text destined for an attribute value.
fn escape_attr(text: &str) -> Cow<'_, str> {
	if !text.contains(['&', '<', '>', '"', '\'']) {
		return Cow::Borrowed(text);
	}
	let mut escaped = String::with_capacity(text.len() + 8);
	for c in text.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&quot;"),
			'\'' => escaped.push_str("&apos;"),
			_ => escaped.push(c),
		}
	}
	Cow::Owned(escaped)
}

/// Comma-join numbers without a trailing separator.
fn join<T: std::fmt::Display>(values: &[T]) -> String {
	let mut text = String::new();
	for (i, value) in values.iter().enumerate() {
		if i > 0 {
			text.push(',');
		}
		let _ = write!(text, "{value}");
	}
	text
}

fn write_mesh(out: &mut String, element_id: &str, mesh: &MeshPiece) {
	let [r, g, b, a] = mesh.color;
	let _ = writeln!(
		out,
		"    <Mesh ElementId=\"{}\" Color=\"{r},{g},{b},{a}\" Material=\"\">",
		escape_attr(element_id)
	);
	out.push_str("      <Lod0>\n");
	out.push_str("        <UVs />\n");
	out.push_str("        <UVIndexes />\n");
	let _ = writeln!(out, "        <Vertices>{}</Vertices>", join(&mesh.vertices));
	let _ = writeln!(
		out,
		"        <PointIndexes>{}</PointIndexes>",
		join(&mesh.indices)
	);
	out.push_str("      </Lod0>\n");
	out.push_str("    </Mesh>\n");
}

/// Serialize one element with all its meshes, running each mesh through
/// the reduction gate first.
fn write_element(
	out: &mut String,
	object: &GeometryObject,
	gate: &GateConfig,
	reducer: &dyn MeshReducer,
) {
	let _ = writeln!(
		out,
		"  <Element ElementId=\"{}\" LevelName=\"\" Name=\"{}\">",
		escape_attr(&object.id),
		escape_attr(&object.name)
	);
	for mesh in &object.meshes {
		let gated = apply_gate(mesh, gate, reducer);
		write_mesh(out, &object.id, &gated);
	}
	out.push_str("  </Element>\n");
}

fn wrap_document(body: &str) -> String {
	let mut doc = String::with_capacity(body.len() + 64);
	doc.push_str(XML_DECLARATION);
	doc.push_str("<IfcModel>\n");
	doc.push_str(body);
	doc.push_str("</IfcModel>\n");
	doc
}

/// Render a full document for a set of objects.
pub fn render_document<'a, I>(objects: I, gate: &GateConfig, reducer: &dyn MeshReducer) -> String
where
	I: IntoIterator<Item = &'a GeometryObject>,
{
	let mut body = String::new();
	for object in objects {
		write_element(&mut body, object, gate, reducer);
	}
	wrap_document(&body)
}

fn document_path(base: &Path, index: usize) -> PathBuf {
	let mut name = base.as_os_str().to_owned();
	name.push(format!("_{index}.xml"));
	PathBuf::from(name)
}

/// Write one document per non-empty tile as `{base}_{tile_index}.xml`.
pub fn export_tiles(
	base: &Path,
	tiles: &[Tile],
	catalog: &Catalog,
	gate: &GateConfig,
	reducer: &dyn MeshReducer,
) -> Result<Vec<PathBuf>> {
	let mut written = Vec::with_capacity(tiles.len());
	for (index, tile) in tiles.iter().enumerate() {
		let document = render_document(tile.objects(catalog), gate, reducer);
		let path = document_path(base, index);
		std::fs::write(&path, &document)
			.with_context(|| format!("failed to write {}", path.display()))?;
		info!(
			path = %path.display(),
			elements = tile.members.len(),
			"wrote tile document"
		);
		written.push(path);
	}
	Ok(written)
}

/// Legacy emission: ignore tiles entirely and flush a numbered document
/// whenever the accumulated body exceeds `cap_bytes`.
pub fn export_size_capped(
	base: &Path,
	catalog: &Catalog,
	gate: &GateConfig,
	reducer: &dyn MeshReducer,
	cap_bytes: usize,
) -> Result<Vec<PathBuf>> {
	let mut written = Vec::new();
	let mut body = String::new();

	for object in catalog.objects() {
		write_element(&mut body, object, gate, reducer);
		if body.len() > cap_bytes {
			flush(base, &mut body, &mut written)?;
		}
	}
	if !body.is_empty() {
		flush(base, &mut body, &mut written)?;
	}
	Ok(written)
}

fn flush(base: &Path, body: &mut String, written: &mut Vec<PathBuf>) -> Result<()> {
	let document = wrap_document(body);
	let path = document_path(base, written.len());
	std::fs::write(&path, &document).with_context(|| format!("failed to write {}", path.display()))?;
	info!(path = %path.display(), bytes = document.len(), "wrote size-capped document");
	body.clear();
	written.push(path);
	Ok(())
}

#[cfg(test)]
#[path = "xml_test.rs"]
mod xml_test;
