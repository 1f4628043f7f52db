//! Axis-aligned bounding box algebra with double precision.
//!
//! Two types split the roles: [`BoxExtent`] is a concrete box (min corner
//! plus non-negative size) used for tiles, and [`Aabb`] adds a distinguished
//! `Empty` element so that accumulated object bounds form a monoid under
//! [`Aabb::union`]. `Empty` is a real sentinel, not a degenerate box: a box
//! with zero-length edges is still non-empty.

use glam::DVec3;

/// Concrete axis-aligned box: min corner plus per-axis size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxExtent {
  /// Minimum corner (inclusive).
  pub min: DVec3,
  /// Per-axis edge lengths, each >= 0.
  pub size: DVec3,
}

impl BoxExtent {
  /// Create a box from its min corner and size.
  ///
  /// # Panics
  /// Debug-asserts that every size component is non-negative.
  pub fn new(min: DVec3, size: DVec3) -> Self {
    debug_assert!(
      size.x >= 0.0 && size.y >= 0.0 && size.z >= 0.0,
      "box size must be non-negative on all axes"
    );
    Self { min, size }
  }

  /// Create a box from opposite corners.
  pub fn from_min_max(min: DVec3, max: DVec3) -> Self {
    Self::new(min, max - min)
  }

  /// Maximum corner (`min + size`).
  #[inline]
  pub fn max(&self) -> DVec3 {
    self.min + self.size
  }

  /// Center point of the box.
  #[inline]
  pub fn center(&self) -> DVec3 {
    self.min + self.size * 0.5
  }

  /// Shortest edge length.
  #[inline]
  pub fn min_edge(&self) -> f64 {
    self.size.min_element()
  }

  /// Volume of the intersection with `other`, zero when disjoint.
  ///
  /// The overlap corner is the component-wise max of the two mins and the
  /// far corner the component-wise min of the two maxes; any axis where
  /// far < corner means no overlap. Never negative.
  pub fn overlap_volume(&self, other: &BoxExtent) -> f64 {
    let corner = self.min.max(other.min);
    let far = self.max().min(other.max());
    let edges = far - corner;
    if edges.x < 0.0 || edges.y < 0.0 || edges.z < 0.0 {
      return 0.0;
    }
    edges.x * edges.y * edges.z
  }
}

/// Bounding box with an explicit empty element.
///
/// `Empty` is the identity for [`Aabb::union`] and reports zero overlap
/// with everything.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum Aabb {
  /// No extent at all. Distinct from a zero-sized box.
  #[default]
  Empty,
  /// A concrete extent.
  Extent(BoxExtent),
}

impl Aabb {
  /// Sentinel test. A zero-sized extent is NOT empty.
  #[inline]
  pub fn is_empty(&self) -> bool {
    matches!(self, Aabb::Empty)
  }

  /// The concrete extent, if any.
  #[inline]
  pub fn extent(&self) -> Option<BoxExtent> {
    match self {
      Aabb::Empty => None,
      Aabb::Extent(ext) => Some(*ext),
    }
  }

  /// Smallest box enclosing both operands; `Empty` is the identity.
  ///
  /// Commutative and associative.
  pub fn union(self, other: Aabb) -> Aabb {
    match (self, other) {
      (Aabb::Empty, b) => b,
      (a, Aabb::Empty) => a,
      (Aabb::Extent(a), Aabb::Extent(b)) => {
        let min = a.min.min(b.min);
        let max = a.max().max(b.max());
        Aabb::Extent(BoxExtent::from_min_max(min, max))
      }
    }
  }

  /// Overlap volume against a concrete box; zero for `Empty`.
  #[inline]
  pub fn overlap_volume(&self, tile: &BoxExtent) -> f64 {
    match self {
      Aabb::Empty => 0.0,
      Aabb::Extent(ext) => ext.overlap_volume(tile),
    }
  }

  /// Tight bounds of a point stream; `Empty` when the stream is.
  pub fn from_points<I>(points: I) -> Aabb
  where
    I: IntoIterator<Item = DVec3>,
  {
    let mut iter = points.into_iter();
    let first = match iter.next() {
      Some(p) => p,
      None => return Aabb::Empty,
    };
    let (min, max) = iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
    Aabb::Extent(BoxExtent::from_min_max(min, max))
  }
}
