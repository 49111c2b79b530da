//! # Mesh Information
//!
//! A `Mesh` describes how the global domain is split across processors: the global and
//! local extents along each axis, where the interior (non-guard) region of the local
//! subdomain starts and ends, where that interior sits in the global index space, and
//! topology information needed to locate the internal target boundary of a double-null
//! mesh.
//!
//! The loader only ever reads from a `Mesh`, so simulation drivers can implement the trait
//! on their own decomposition type. [`Subdomain`] is a complete implementation for a
//! regular `nxpe × nype` processor grid.
//!
//! ## Index conventions
//!
//! * global extents include the guard cells at both ends of the axis:
//!   `global_nx = interior_nx + 2 * mxg`.
//! * `offset_x` is the global interior index of the local `xstart`; equivalently the global
//!   guard-inclusive index of local `x = 0`.
//! * `ny_inner` is a global interior y index; it never includes guard cells.

mod subdomain;

pub use subdomain::{DecompositionError, Subdomain, SubdomainConfig};

use crate::loader::{self, Inconsistent};

/// read-only view of the decomposition of the global mesh for one processor
pub trait Mesh {
    /// global number of x points, boundary guard cells included
    fn global_nx(&self) -> usize;

    /// global number of y points, boundary guard cells included
    fn global_ny(&self) -> usize;

    fn local_nx(&self) -> usize;

    fn local_ny(&self) -> usize;

    /// number of points in the periodic direction on this processor
    fn local_nz(&self) -> usize;

    /// first local x index of the interior
    fn xstart(&self) -> usize;

    /// last local x index of the interior
    fn xend(&self) -> usize;

    fn ystart(&self) -> usize;

    fn yend(&self) -> usize;

    /// global interior index of the local `xstart`
    fn offset_x(&self) -> usize;

    /// global interior index of the local `ystart`
    fn offset_y(&self) -> usize;

    /// whether the mesh has two X-points, and so a second pair of targets inside the y domain
    fn is_double_null(&self) -> bool;

    /// global interior y index of the branch cut between the inner and outer legs of a
    /// double-null mesh
    fn ny_inner(&self) -> usize;

    /// length of the domain in the periodic coordinate
    fn zlength(&self) -> f64;

    /// width of the x guard region on each side of the local interior
    fn x_guard_width(&self) -> Result<usize, Inconsistent> {
        loader::guard_width('x', self.local_nx(), self.xstart(), self.xend())
    }

    /// width of the y guard region on each side of the local interior
    fn y_guard_width(&self) -> Result<usize, Inconsistent> {
        loader::guard_width('y', self.local_ny(), self.ystart(), self.yend())
    }
}
