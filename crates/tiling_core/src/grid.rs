//! Uniform tile grid generation over a root box.

use glam::DVec3;

use crate::bounds::BoxExtent;

/// Partition `root` into a regular grid of tiles of the given size.
///
/// Per-axis cell counts are `ceil(root.size / tile_size)` with a minimum
/// of one, so the grid's outer edge may overshoot the root extent. That
/// overshoot is intentional and harmless: allocation scores tiles by
/// overlap volume, and overshoot tiles simply score lower.
///
/// Tiles are produced in row-major `i, j, k` order anchored at
/// `root.min`. Downstream tie-breaking depends on this order staying
/// deterministic, so callers must not reorder the result.
///
/// # Panics
/// Debug-asserts that every tile size component is positive.
pub fn partition(root: BoxExtent, tile_size: DVec3) -> Vec<BoxExtent> {
  debug_assert!(
    tile_size.x > 0.0 && tile_size.y > 0.0 && tile_size.z > 0.0,
    "tile size must be positive on all axes"
  );

  let counts = (root.size / tile_size).ceil();
  let nx = (counts.x as usize).max(1);
  let ny = (counts.y as usize).max(1);
  let nz = (counts.z as usize).max(1);

  let mut tiles = Vec::with_capacity(nx * ny * nz);
  for i in 0..nx {
    for j in 0..ny {
      for k in 0..nz {
        let offset = DVec3::new(
          i as f64 * tile_size.x,
          j as f64 * tile_size.y,
          k as f64 * tile_size.z,
        );
        tiles.push(BoxExtent::new(root.min + offset, tile_size));
      }
    }
  }
  tiles
}

#[cfg(test)]
#[path = "grid_test.rs"]
mod grid_test;
