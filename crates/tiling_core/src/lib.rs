//! tiling_core - spatial tiling and allocation for extracted model geometry.
//!
//! This crate takes an in-memory catalog of geometry objects (identity,
//! display name, triangle meshes with accumulated bounding boxes) and
//! partitions it into spatial tiles bounded in element count, for
//! downstream streaming and rendering.
//!
//! The pipeline is a pure, single-threaded batch:
//!
//! ```text
//! Catalog + dataset bounds
//!     → grid::partition        (uniform tile grid over the root box)
//!     → allocate::allocate     (best-overlap bucketing + octree-style
//!                               refinement of over-full tiles)
//!     → Vec<Tile>              (final tile → members mapping)
//! ```
//!
//! Extraction from source model formats, mesh decimation, and document
//! serialization live outside this crate. Decimation in particular is
//! consumed through the [`reduce::MeshReducer`] trait and never
//! implemented here.

pub mod allocate;
pub mod bounds;
pub mod catalog;
pub mod grid;
pub mod reduce;

// Re-export commonly used items
pub use allocate::{allocate, tile_catalog, Tile, MIN_TILE_EDGE};
pub use bounds::{Aabb, BoxExtent};
pub use catalog::{Catalog, CatalogError, GeometryObject, MeshPiece};
pub use grid::partition;
pub use reduce::{apply_gate, GateConfig, MeshReducer, ReduceError, UnsupportedReducer};
