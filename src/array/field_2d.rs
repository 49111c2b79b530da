use super::{FieldData, FieldView};
use crate::prelude::*;

#[derive(Deref, DerefMut, Into, Clone, PartialEq, Default, Debug)]
/// Array container for an axisymmetric quantity over the local subdomain, such as a metric
/// coefficient or an equilibrium profile.
///
/// The first axis contains X information and the second axis contains Y information,
/// guard cells included. If the local subdomain is `local_nx=8` by `local_ny=20` then the
/// array shape is `(8, 20)`.
pub struct Field2D(Array2<f64>);

impl Field2D {
    /// Construct a `Field2D` from an array.
    pub fn new(arr: Array2<f64>) -> Self {
        Self(arr)
    }

    /// get the array that this type wraps.
    /// usually this method is not required because `Field2D` implements [`DerefMut`](std::ops::DerefMut) and
    /// [`Deref`](std::ops::Deref)
    pub fn inner(self) -> Array2<f64> {
        self.0
    }
}

impl FieldData for Field2D {
    const NAME: &'static str = "Field2D";
    const RANK: usize = 2;

    fn allocate<M: Mesh + ?Sized>(&mut self, mesh: &M) {
        let shape = (mesh.local_nx(), mesh.local_ny());

        if self.0.dim() != shape {
            self.0 = Array2::zeros(shape);
        }
    }

    fn nz(&self) -> usize {
        1
    }

    fn fill(&mut self, value: f64) {
        self.0.fill(value)
    }

    fn view_mut(&mut self) -> FieldView<'_> {
        FieldView::Two(self.0.view_mut())
    }

    fn volume_mut(&mut self) -> ArrayViewMut3<'_, f64> {
        self.0.view_mut().insert_axis(Axis(2))
    }
}
