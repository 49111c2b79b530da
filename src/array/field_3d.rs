use super::{FieldData, FieldView};
use crate::prelude::*;

#[derive(Deref, DerefMut, Into, Clone, PartialEq, Default, Debug)]
/// Array container for a fully three dimensional quantity over the local subdomain
///
/// Axes are ordered `(x, y, z)` with z the periodic (toroidal) direction, so that every
/// `(x, y)` point owns a contiguous row of `local_nz` values. Guard cells are included in
/// x and y; there are no guard cells in z.
pub struct Field3D(Array3<f64>);

impl Field3D {
    /// Construct a `Field3D` from an array.
    pub fn new(arr: Array3<f64>) -> Self {
        Self(arr)
    }

    /// get the array that this type wraps.
    pub fn inner(self) -> Array3<f64> {
        self.0
    }
}

impl FieldData for Field3D {
    const NAME: &'static str = "Field3D";
    const RANK: usize = 3;

    fn allocate<M: Mesh + ?Sized>(&mut self, mesh: &M) {
        let shape = (mesh.local_nx(), mesh.local_ny(), mesh.local_nz());

        if self.0.dim() != shape {
            self.0 = Array3::zeros(shape);
        }
    }

    fn nz(&self) -> usize {
        self.0.len_of(Axis(2))
    }

    fn fill(&mut self, value: f64) {
        self.0.fill(value)
    }

    fn view_mut(&mut self) -> FieldView<'_> {
        FieldView::Three(self.0.view_mut())
    }

    fn volume_mut(&mut self) -> ArrayViewMut3<'_, f64> {
        self.0.view_mut()
    }
}
