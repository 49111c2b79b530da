//! container types for field data filled in from grid files
//!
//! The loader never owns a field: callers hand it a `&mut` to a [`Field2D`] or [`Field3D`],
//! and the loader allocates it to the local subdomain shape and writes into it in place.

mod field_2d;
mod field_3d;

use crate::prelude::*;

pub use field_2d::Field2D;
pub use field_3d::Field3D;

/// Mutable view of the data inside a field handle, used to dispatch between the
/// 2D and 3D read paths of the loader.
pub enum FieldView<'a> {
    Two(ArrayViewMut2<'a, f64>),
    Three(ArrayViewMut3<'a, f64>),
}

/// A field defined over the local subdomain of a mesh, addressable by local
/// `(x, y[, z])` index.
pub trait FieldData {
    /// Short name of the field type, used in log messages
    const NAME: &'static str;

    /// Number of array dimensions the field holds
    const RANK: usize;

    /// Ensure the field holds an array of the local subdomain shape. Existing data
    /// is kept if the shape already matches.
    fn allocate<M: Mesh + ?Sized>(&mut self, mesh: &M);

    /// Number of points in the periodic (z) direction. 2D fields have a single point.
    fn nz(&self) -> usize;

    /// Set every point of the field to `value`
    fn fill(&mut self, value: f64);

    /// Dimension specific view of the data
    fn view_mut(&mut self) -> FieldView<'_>;

    /// View the field as a 3D volume, with a unit length z axis for 2D fields
    fn volume_mut(&mut self) -> ArrayViewMut3<'_, f64>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Subdomain, SubdomainConfig};

    #[test]
    fn allocate_uses_local_shape() {
        let mesh = Subdomain::new(SubdomainConfig::serial(4, 6, 8, 2, 1)).unwrap();

        let mut f2 = Field2D::default();
        f2.allocate(&mesh);
        assert_eq!(f2.dim(), (8, 8));

        let mut f3 = Field3D::default();
        f3.allocate(&mesh);
        assert_eq!(f3.dim(), (8, 8, 8));
        assert_eq!(f3.nz(), 8);
    }

    #[test]
    fn allocate_keeps_data_with_matching_shape() {
        let mesh = Subdomain::new(SubdomainConfig::serial(2, 2, 1, 0, 0)).unwrap();

        let mut f2 = Field2D::new(Array2::from_elem((2, 2), 3.0));
        f2.allocate(&mesh);

        assert!(f2.iter().all(|x| *x == 3.0));
    }

    #[test]
    fn rank_matches_view() {
        let mut f2 = Field2D::default();
        let mut f3 = Field3D::default();

        assert_eq!(Field2D::RANK, 2);
        assert!(matches!(f2.view_mut(), FieldView::Two(_)));
        assert_eq!(Field3D::RANK, 3);
        assert!(matches!(f3.view_mut(), FieldView::Three(_)));
    }

    #[test]
    fn volume_of_2d_field_has_unit_z() {
        let mut f2 = Field2D::new(Array2::zeros((3, 4)));
        let mut volume = f2.volume_mut();
        assert_eq!(volume.dim(), (3, 4, 1));

        volume[(1, 2, 0)] = 5.0;
        assert_eq!(f2[(1, 2)], 5.0);
    }
}
