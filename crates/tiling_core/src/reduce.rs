//! Mesh reduction gate.
//!
//! Decimation itself is an external capability: this module only defines
//! the [`MeshReducer`] seam and the gate policy around it. The gate is
//! deliberately forgiving: a reducer that fails, or returns a mesh with
//! more triangles than it was given, is ignored and the original mesh is
//! emitted unchanged with a warning. Reduction problems are never fatal.

use std::borrow::Cow;

use tracing::warn;

use crate::catalog::MeshPiece;

/// Errors a reduction capability may report.
#[derive(Debug, thiserror::Error)]
pub enum ReduceError {
  /// No reduction capability is wired into this build.
  #[error("mesh reduction is not available")]
  Unsupported,

  /// The capability ran and failed.
  #[error("mesh reduction failed: {0}")]
  Failed(String),
}

/// External mesh-simplification capability.
///
/// Implementations must never return a mesh with more triangles than the
/// input; the gate enforces this anyway and falls back to the original.
pub trait MeshReducer {
  fn reduce(&self, mesh: &MeshPiece, target_triangles: usize) -> Result<MeshPiece, ReduceError>;
}

/// Stand-in reducer for builds without a decimation backend. Always
/// reports [`ReduceError::Unsupported`], so the gate keeps originals.
#[derive(Debug, Default)]
pub struct UnsupportedReducer;

impl MeshReducer for UnsupportedReducer {
  fn reduce(&self, _mesh: &MeshPiece, _target_triangles: usize) -> Result<MeshPiece, ReduceError> {
    Err(ReduceError::Unsupported)
  }
}

/// Gate policy: when to invoke the reducer and how hard to push it.
#[derive(Debug, Clone, Copy)]
pub struct GateConfig {
  /// Meshes with at least this many triangles go through the reducer.
  pub threshold: usize,
  /// Target fraction of the original triangle count, clamped to (0, 1].
  pub quality: f64,
}

impl Default for GateConfig {
  fn default() -> Self {
    Self {
      threshold: 500,
      quality: 0.5,
    }
  }
}

/// Clamp a quality factor into (0, 1]. Non-finite input falls back to 1.
fn clamp_quality(quality: f64) -> f64 {
  if !quality.is_finite() {
    return 1.0;
  }
  quality.clamp(f64::EPSILON, 1.0)
}

/// Run a mesh through the reduction gate.
///
/// Meshes below the threshold pass through untouched (borrowed). Oversized
/// meshes are handed to the reducer with
/// `target = ceil(triangle_count * quality)`; any failure keeps the
/// original and logs a warning.
pub fn apply_gate<'a>(
  mesh: &'a MeshPiece,
  config: &GateConfig,
  reducer: &dyn MeshReducer,
) -> Cow<'a, MeshPiece> {
  let triangles = mesh.triangle_count();
  if triangles < config.threshold {
    return Cow::Borrowed(mesh);
  }

  let quality = clamp_quality(config.quality);
  let target = (triangles as f64 * quality).ceil() as usize;
  match reducer.reduce(mesh, target) {
    Ok(reduced) if reduced.triangle_count() <= triangles => Cow::Owned(reduced),
    Ok(reduced) => {
      warn!(
        original = triangles,
        reduced = reduced.triangle_count(),
        "reducer grew the mesh, keeping the original"
      );
      Cow::Borrowed(mesh)
    }
    Err(err) => {
      warn!(%err, triangles, target, "mesh reduction failed, keeping the original");
      Cow::Borrowed(mesh)
    }
  }
}

#[cfg(test)]
#[path = "reduce_test.rs"]
mod reduce_test;
