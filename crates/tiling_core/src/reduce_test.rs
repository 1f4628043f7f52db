use std::borrow::Cow;
use std::cell::Cell;

use super::*;

/// Reducer that truncates the index buffer to the requested triangle
/// count, recording the target it was asked for.
struct TruncatingReducer {
  last_target: Cell<Option<usize>>,
}

impl TruncatingReducer {
  fn new() -> Self {
    Self {
      last_target: Cell::new(None),
    }
  }
}

impl MeshReducer for TruncatingReducer {
  fn reduce(&self, mesh: &MeshPiece, target_triangles: usize) -> Result<MeshPiece, ReduceError> {
    self.last_target.set(Some(target_triangles));
    let mut reduced = mesh.clone();
    reduced.indices.truncate(target_triangles * 3);
    Ok(reduced)
  }
}

/// Reducer that always errors.
struct FailingReducer;

impl MeshReducer for FailingReducer {
  fn reduce(&self, _mesh: &MeshPiece, _target: usize) -> Result<MeshPiece, ReduceError> {
    Err(ReduceError::Failed("backend exploded".into()))
  }
}

/// Reducer that returns more triangles than it was given.
struct GrowingReducer;

impl MeshReducer for GrowingReducer {
  fn reduce(&self, mesh: &MeshPiece, _target: usize) -> Result<MeshPiece, ReduceError> {
    let mut grown = mesh.clone();
    grown.indices.extend_from_slice(&[0, 1, 2]);
    Ok(grown)
  }
}

/// Mesh with the given triangle count; degenerate but structurally valid.
fn mesh_with_triangles(triangles: usize) -> MeshPiece {
  MeshPiece {
    color: [255, 0, 0, 255],
    vertices: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
    normals: vec![],
    indices: vec![0, 1, 2].repeat(triangles),
  }
}

#[test]
fn test_gate_target_from_quality() {
  // 1200 triangles, threshold 500, quality 0.5 → target 600.
  let mesh = mesh_with_triangles(1200);
  let reducer = TruncatingReducer::new();
  let config = GateConfig {
    threshold: 500,
    quality: 0.5,
  };

  let out = apply_gate(&mesh, &config, &reducer);
  assert_eq!(reducer.last_target.get(), Some(600));
  assert_eq!(out.triangle_count(), 600);
  assert!(out.indices.len() <= mesh.indices.len());
}

#[test]
fn test_gate_skips_below_threshold() {
  let mesh = mesh_with_triangles(499);
  let reducer = TruncatingReducer::new();
  let config = GateConfig {
    threshold: 500,
    quality: 0.5,
  };

  let out = apply_gate(&mesh, &config, &reducer);
  assert_eq!(reducer.last_target.get(), None, "reducer must not run");
  assert!(matches!(out, Cow::Borrowed(_)));
}

#[test]
fn test_gate_runs_at_exact_threshold() {
  let mesh = mesh_with_triangles(500);
  let reducer = TruncatingReducer::new();
  let config = GateConfig {
    threshold: 500,
    quality: 0.5,
  };

  apply_gate(&mesh, &config, &reducer);
  assert_eq!(reducer.last_target.get(), Some(250));
}

#[test]
fn test_gate_failure_keeps_original() {
  let mesh = mesh_with_triangles(1000);
  let config = GateConfig::default();

  let out = apply_gate(&mesh, &config, &FailingReducer);
  assert_eq!(out.triangle_count(), 1000);
  assert!(matches!(out, Cow::Borrowed(_)));
}

#[test]
fn test_gate_rejects_grown_mesh() {
  let mesh = mesh_with_triangles(1000);
  let config = GateConfig::default();

  let out = apply_gate(&mesh, &config, &GrowingReducer);
  assert_eq!(out.triangle_count(), 1000);
}

#[test]
fn test_unsupported_reducer_keeps_original() {
  let mesh = mesh_with_triangles(1000);
  let config = GateConfig::default();

  let out = apply_gate(&mesh, &config, &UnsupportedReducer);
  assert_eq!(out.triangle_count(), 1000);
}

#[test]
fn test_quality_clamped_to_unit_interval() {
  let mesh = mesh_with_triangles(1000);
  let reducer = TruncatingReducer::new();

  // Above 1 clamps to 1: target equals the input count.
  let config = GateConfig {
    threshold: 500,
    quality: 3.0,
  };
  apply_gate(&mesh, &config, &reducer);
  assert_eq!(reducer.last_target.get(), Some(1000));

  // Zero or below clamps to a positive floor: target is at least 1.
  let config = GateConfig {
    threshold: 500,
    quality: 0.0,
  };
  apply_gate(&mesh, &config, &reducer);
  assert_eq!(reducer.last_target.get(), Some(1));
}
