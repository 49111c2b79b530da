//! Boundary extrapolation into guard cells that the grid file does not provide.
//!
//! Both functions take the field as an `(x, y, z)` volume; 2D fields are passed with a unit
//! length z axis. The interior must already have been read.

use ndarray::{ArrayViewMut3, Axis};

/// copy the planes at `xstart` and `xend` into every lower and upper x guard plane
pub fn extrapolate_x(data: ArrayViewMut3<'_, f64>, xstart: usize, xend: usize) {
    extrapolate_axis(data, Axis(0), xstart, xend)
}

/// copy the planes at `ystart` and `yend` into every lower and upper y guard plane
pub fn extrapolate_y(data: ArrayViewMut3<'_, f64>, ystart: usize, yend: usize) {
    extrapolate_axis(data, Axis(1), ystart, yend)
}

fn extrapolate_axis(mut data: ArrayViewMut3<'_, f64>, axis: Axis, start: usize, end: usize) {
    let n = data.len_of(axis);

    if start > end || end >= n {
        return;
    }

    let (mut lower, interior) = data.view_mut().split_at(axis, start);
    let first = interior.index_axis(axis, 0);
    lower
        .axis_iter_mut(axis)
        .for_each(|mut plane| plane.assign(&first));

    let (interior, mut upper) = data.view_mut().split_at(axis, end + 1);
    let last = interior.index_axis(axis, end);
    upper
        .axis_iter_mut(axis)
        .for_each(|mut plane| plane.assign(&last));
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    fn numbered(shape: (usize, usize, usize)) -> Array3<f64> {
        let (_, ny, nz) = shape;
        Array3::from_shape_fn(shape, |(x, y, z)| (x * ny * nz + y * nz + z) as f64)
    }

    #[test]
    fn x_guards_copy_nearest_interior_plane() {
        let mut data = numbered((6, 3, 2));
        let original = data.clone();

        extrapolate_x(data.view_mut(), 2, 3);

        for x in 0..2 {
            assert_eq!(data.index_axis(Axis(0), x), original.index_axis(Axis(0), 2));
        }
        for x in 4..6 {
            assert_eq!(data.index_axis(Axis(0), x), original.index_axis(Axis(0), 3));
        }
        assert_eq!(data.index_axis(Axis(0), 2), original.index_axis(Axis(0), 2));
        assert_eq!(data.index_axis(Axis(0), 3), original.index_axis(Axis(0), 3));
    }

    #[test]
    fn y_guards_copy_nearest_interior_plane() {
        let mut data = numbered((2, 5, 3));
        let original = data.clone();

        extrapolate_y(data.view_mut(), 1, 3);

        assert_eq!(data.index_axis(Axis(1), 0), original.index_axis(Axis(1), 1));
        assert_eq!(data.index_axis(Axis(1), 4), original.index_axis(Axis(1), 3));
        assert_eq!(
            data.slice(ndarray::s![.., 1..4, ..]),
            original.slice(ndarray::s![.., 1..4, ..])
        );
    }

    #[test]
    fn no_guards_is_a_no_op() {
        let mut data = numbered((3, 3, 1));
        let original = data.clone();

        extrapolate_x(data.view_mut(), 0, 2);
        extrapolate_y(data.view_mut(), 0, 2);

        assert_eq!(data, original);
    }
}
