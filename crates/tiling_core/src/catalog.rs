//! Geometry catalog: the in-memory data model the tiler consumes.
//!
//! A [`Catalog`] maps stable identity strings to [`GeometryObject`]s in
//! insertion order. Objects are created on first sight of their identity
//! and grow by mesh appends during ingestion; once tiling starts they are
//! read-only. Every append keeps the object's accumulated bounds and the
//! dataset bounds in sync via [`Aabb::union`].

use std::collections::HashMap;

use glam::DVec3;

use crate::bounds::Aabb;

/// Errors raised while building the catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
  /// A mesh produced no vertices, so no bounding box exists for it.
  /// Silently treating this as a zero box would corrupt allocation.
  #[error("mesh for element `{id}` has no vertices")]
  DegenerateMesh { id: String },

  /// A flat buffer whose length is not a multiple of 3.
  #[error("mesh for element `{id}` has a malformed {buffer} buffer (length {len})")]
  MalformedBuffer {
    id: String,
    buffer: &'static str,
    len: usize,
  },

  /// A triangle index pointing past the vertex buffer.
  #[error("mesh for element `{id}` references vertex {index} but only {count} exist")]
  IndexOutOfRange { id: String, index: u32, count: usize },
}

/// One drawable mesh owned by a [`GeometryObject`].
#[derive(Debug, Clone, PartialEq)]
pub struct MeshPiece {
  /// RGBA color, 0-255 per component.
  pub color: [u8; 4],
  /// Flattened vertex coordinates (x,y,z triples).
  pub vertices: Vec<f64>,
  /// Flattened normal coordinates (triples, may be empty).
  pub normals: Vec<f64>,
  /// Triangle index list referencing the vertex triples.
  pub indices: Vec<u32>,
}

impl MeshPiece {
  /// Number of triangles (`indices.len() / 3`).
  #[inline]
  pub fn triangle_count(&self) -> usize {
    self.indices.len() / 3
  }

  /// Number of vertex triples.
  #[inline]
  pub fn vertex_count(&self) -> usize {
    self.vertices.len() / 3
  }

  /// Iterate vertices as points.
  pub fn points(&self) -> impl Iterator<Item = DVec3> + '_ {
    self
      .vertices
      .chunks_exact(3)
      .map(|v| DVec3::new(v[0], v[1], v[2]))
  }

  /// Check the flat-buffer invariants against an owning identity.
  pub fn validate(&self, id: &str) -> Result<(), CatalogError> {
    if self.vertices.len() % 3 != 0 {
      return Err(CatalogError::MalformedBuffer {
        id: id.to_owned(),
        buffer: "vertex",
        len: self.vertices.len(),
      });
    }
    if self.indices.len() % 3 != 0 {
      return Err(CatalogError::MalformedBuffer {
        id: id.to_owned(),
        buffer: "index",
        len: self.indices.len(),
      });
    }
    let count = self.vertex_count();
    if let Some(&bad) = self.indices.iter().find(|&&i| i as usize >= count) {
      return Err(CatalogError::IndexOutOfRange {
        id: id.to_owned(),
        index: bad,
        count,
      });
    }
    Ok(())
  }
}

/// One logical visual object: identity, name, its meshes, and the union
/// of all mesh vertex extents.
#[derive(Debug, Clone)]
pub struct GeometryObject {
  /// Stable identity string (unique within the catalog).
  pub id: String,
  /// Display name.
  pub name: String,
  /// Ordered mesh pieces.
  pub meshes: Vec<MeshPiece>,
  /// Tight bounds over every vertex of every owned mesh.
  pub bounds: Aabb,
}

/// Insertion-ordered collection of geometry objects keyed by identity.
#[derive(Debug, Default)]
pub struct Catalog {
  objects: Vec<GeometryObject>,
  by_id: HashMap<String, usize>,
  bounds: Aabb,
}

impl Catalog {
  pub fn new() -> Self {
    Self::default()
  }

  /// Append a mesh to the object with the given identity, creating the
  /// object on first sight. Bounds are unioned in as meshes arrive.
  ///
  /// Fails on malformed buffers and on meshes with no vertices; the
  /// catalog is left unchanged in that case.
  pub fn insert_mesh(
    &mut self,
    id: &str,
    name: &str,
    mesh: MeshPiece,
  ) -> Result<(), CatalogError> {
    mesh.validate(id)?;
    let mesh_bounds = Aabb::from_points(mesh.points());
    if mesh_bounds.is_empty() {
      return Err(CatalogError::DegenerateMesh { id: id.to_owned() });
    }

    let index = match self.by_id.get(id) {
      Some(&index) => index,
      None => {
        let index = self.objects.len();
        self.objects.push(GeometryObject {
          id: id.to_owned(),
          name: name.to_owned(),
          meshes: Vec::new(),
          bounds: Aabb::Empty,
        });
        self.by_id.insert(id.to_owned(), index);
        index
      }
    };

    let object = &mut self.objects[index];
    object.bounds = object.bounds.union(mesh_bounds);
    object.meshes.push(mesh);
    self.bounds = self.bounds.union(mesh_bounds);
    Ok(())
  }

  /// Objects in insertion order.
  #[inline]
  pub fn objects(&self) -> &[GeometryObject] {
    &self.objects
  }

  /// Look up an object by identity.
  pub fn get(&self, id: &str) -> Option<&GeometryObject> {
    self.by_id.get(id).map(|&i| &self.objects[i])
  }

  /// Dataset bounds: the union of every object's bounds.
  #[inline]
  pub fn bounds(&self) -> Aabb {
    self.bounds
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.objects.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.objects.is_empty()
  }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod catalog_test;
