//! Allocation engine: best-overlap bucketing with octree-style refinement.
//!
//! Each geometry object is assigned to the tile its bounding box overlaps
//! most, then over-full tiles are recursively split into up to eight
//! children until every surviving tile holds at most `max_per_tile`
//! members or its edges reach the refinement floor.
//!
//! # Determinism
//!
//! Tiles live in a plain `Vec` and are scanned by index, in the order
//! [`crate::grid::partition`] generated them. Ties on overlap volume keep
//! the earliest tile, so allocation is reproducible run to run. Tiles are
//! never keyed by their floating-point boxes.
//!
//! # Termination
//!
//! Refinement halves every edge per level and stops once any edge is at
//! or below [`MIN_TILE_EDGE`], bounding recursion depth by
//! `log2(initial edge)`. Each recursive call also operates on a strict
//! subset of the objects: only the members of the tile being split.

use glam::DVec3;
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::bounds::BoxExtent;
use crate::catalog::{Catalog, GeometryObject};
use crate::grid::partition;

/// Tiles with any edge at or below this length (in geometry units, i.e.
/// meters) are never split further, even when over capacity.
pub const MIN_TILE_EDGE: f64 = 1.0;

/// One final tile: its box plus the catalog indices assigned to it.
///
/// Members reference objects by index into the catalog's insertion-ordered
/// slice; tiles never own geometry.
#[derive(Debug, Clone)]
pub struct Tile {
  pub bounds: BoxExtent,
  pub members: Vec<usize>,
}

impl Tile {
  /// Resolve this tile's members against the catalog.
  pub fn objects<'a>(&'a self, catalog: &'a Catalog) -> impl Iterator<Item = &'a GeometryObject> {
    self.members.iter().map(|&i| &catalog.objects()[i])
  }
}

/// Split a tile into its octants by halving every edge.
fn split_octants(tile: &BoxExtent) -> SmallVec<[BoxExtent; 8]> {
  SmallVec::from_vec(partition(*tile, tile.size * 0.5))
}

/// Assign `members` (catalog indices) to `tiles` and refine over-full
/// tiles. Returns the surviving non-empty tiles as a flat list.
///
/// Objects go to the tile with the strictly greatest overlap volume;
/// ties keep the earliest tile in scan order, and a best of zero still
/// assigns. Only an empty tile set drops an object, with a warning.
pub fn allocate(
  catalog: &Catalog,
  members: &[usize],
  tiles: &[BoxExtent],
  max_per_tile: usize,
) -> Vec<Tile> {
  let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); tiles.len()];

  for &index in members {
    let object = &catalog.objects()[index];
    let mut best: Option<(usize, f64)> = None;
    for (tile_index, tile) in tiles.iter().enumerate() {
      let volume = object.bounds.overlap_volume(tile);
      // Strictly greater only: ties keep the earliest tile.
      let better = match best {
        None => true,
        Some((_, best_volume)) => volume > best_volume,
      };
      if better {
        best = Some((tile_index, volume));
      }
    }
    match best {
      Some((tile_index, _)) => buckets[tile_index].push(index),
      None => warn!(id = %object.id, "no tile available for object, dropping it"),
    }
  }

  let mut result = Vec::new();
  for (tile_index, bucket) in buckets.into_iter().enumerate() {
    if bucket.is_empty() {
      continue;
    }
    let tile = tiles[tile_index];
    if bucket.len() > max_per_tile && tile.min_edge() > MIN_TILE_EDGE {
      debug!(
        count = bucket.len(),
        max_per_tile,
        "tile over capacity, splitting into octants"
      );
      let children = split_octants(&tile);
      result.extend(allocate(catalog, &bucket, &children, max_per_tile));
    } else {
      // Either conforming, or an accepted oversized leaf at the edge floor.
      result.push(Tile {
        bounds: tile,
        members: bucket,
      });
    }
  }
  result
}

/// Tile a whole catalog: grid the dataset bounds with `tile_size`, then
/// allocate every object. Returns an empty list (with a warning) when the
/// catalog has no extent at all.
pub fn tile_catalog(catalog: &Catalog, tile_size: DVec3, max_per_tile: usize) -> Vec<Tile> {
  let root = match catalog.bounds().extent() {
    Some(root) => root,
    None => {
      warn!("catalog has no bounds, nothing to tile");
      return Vec::new();
    }
  };
  let tiles = partition(root, tile_size);
  let members: Vec<usize> = (0..catalog.len()).collect();
  allocate(catalog, &members, &tiles, max_per_tile)
}

#[cfg(test)]
#[path = "allocate_test.rs"]
mod allocate_test;
