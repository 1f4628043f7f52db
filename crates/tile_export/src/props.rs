//! Property JSON export: one object keyed by element identity, each value
//! a flat map of name → stringified value. The basic identity fields are
//! always present, extracted property-set values are merged on top.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use crate::ingest::ElementRecord;

/// Stringify a property value the way the source tool did: strings stay
/// as-is, everything else uses its JSON text form.
fn stringify(value: &Value) -> String {
	match value {
		Value::String(text) => text.clone(),
		other => other.to_string(),
	}
}

/// Build the export document for a set of element records.
pub fn render(elements: &[ElementRecord]) -> Value {
	let mut root = Map::new();
	for element in elements {
		let mut entry = Map::new();
		for (name, value) in &element.properties {
			entry.insert(name.clone(), Value::String(stringify(value)));
		}
		// Basic identity fields win over same-named extracted properties.
		entry.insert("GlobalId".into(), Value::String(element.id.clone()));
		entry.insert("Name".into(), Value::String(element.name.clone()));
		entry.insert(
			"Description".into(),
			Value::String(element.description.clone()),
		);
		entry.insert("IfcType".into(), Value::String(element.ifc_type.clone()));
		root.insert(element.id.clone(), Value::Object(entry));
	}
	Value::Object(root)
}

/// Write the property export to `path`.
pub fn export(elements: &[ElementRecord], path: &Path) -> Result<()> {
	let document = serde_json::to_string_pretty(&render(elements))
		.context("failed to serialize property export")?;
	std::fs::write(path, document)
		.with_context(|| format!("failed to write {}", path.display()))?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn element(id: &str) -> ElementRecord {
		serde_json::from_value(serde_json::json!({
			"id": id,
			"name": "Wall",
			"description": "Exterior",
			"ifc_type": "IfcWall",
			"properties": { "FireRating": "REI60", "Load": 12.5 }
		}))
		.unwrap()
	}

	#[test]
	fn test_render_keyed_by_identity() {
		let doc = render(&[element("a1"), element("b2")]);
		assert!(doc.get("a1").is_some());
		assert!(doc.get("b2").is_some());
	}

	#[test]
	fn test_render_includes_identity_fields() {
		let doc = render(&[element("a1")]);
		let entry = &doc["a1"];
		assert_eq!(entry["GlobalId"], "a1");
		assert_eq!(entry["Name"], "Wall");
		assert_eq!(entry["Description"], "Exterior");
		assert_eq!(entry["IfcType"], "IfcWall");
	}

	#[test]
	fn test_render_stringifies_values() {
		let doc = render(&[element("a1")]);
		let entry = &doc["a1"];
		assert_eq!(entry["FireRating"], "REI60");
		// Non-string values become their text form.
		assert_eq!(entry["Load"], "12.5");
	}
}
