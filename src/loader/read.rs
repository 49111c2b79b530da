//! Row-by-row readers filling the window of a field from the storage backend

use super::{BackendFailure, FieldWindow, Inconsistent};
use crate::prelude::*;
use crate::source::Cursor;
use crate::spectral::{self, ModeRange, Synthesis};
use ndarray::aview1;

/// name of the variable whose presence marks 3D variables as stored in real space
pub(crate) const Z_SIZE_MARKER: &str = "nz";

/// read the window of a stored 2D variable into a plane, one x row at a time
pub(crate) fn read_plane<S: DataSource + ?Sized>(
    source: &mut S,
    name: &str,
    window: &FieldWindow,
    mut plane: ArrayViewMut2<'_, f64>,
) -> Result<(), BackendFailure> {
    let FieldWindow { x, y, .. } = *window;

    let mut cursor = Cursor::at(source, [x.start, y.start, 0]);
    let mut row = vec![0.; y.len];

    for i in 0..x.len {
        cursor.move_to([x.start + i, y.start, 0]);
        cursor
            .read(Destination::Real(&mut row), name, &[1, y.len])
            .map_err(|e| BackendFailure::new(name, e))?;

        plane
            .slice_mut(s![x.dest + i, y.local_range()])
            .assign(&aview1(&row));
    }

    Ok(())
}

/// read the window of a stored 3D variable, choosing the real-space or spectral layout
pub(crate) fn read_volume<S: DataSource + ?Sized, M: Mesh + ?Sized>(
    source: &mut S,
    mesh: &M,
    name: &str,
    window: &FieldWindow,
    volume: ArrayViewMut3<'_, f64>,
) -> Result<(), Error> {
    let size = source.size(name);

    if size.len() != 3 {
        log::warn!("Number of dimensions of `{name}` incorrect");
        return Err(Inconsistent::WrongDimensions {
            name: name.into(),
            expected: 3,
            found: size.len(),
        }
        .into());
    }

    let stored_nz = size[2];

    if !source.size(Z_SIZE_MARKER).is_empty() {
        let local = mesh.local_nz();

        if stored_nz != local {
            return Err(Inconsistent::LocalZMismatch {
                name: name.into(),
                stored: stored_nz,
                local,
            }
            .into());
        }

        read_volume_real(source, name, window, volume)?;
    } else {
        let zperiod = spectral::zperiod(mesh.zlength())?;
        read_volume_spectral(source, name, window, stored_nz, zperiod, volume)?;
    }

    Ok(())
}

/// copy every `(x, y)` row of a real-space 3D variable into the volume
fn read_volume_real<S: DataSource + ?Sized>(
    source: &mut S,
    name: &str,
    window: &FieldWindow,
    mut volume: ArrayViewMut3<'_, f64>,
) -> Result<(), BackendFailure> {
    let FieldWindow { x, y, .. } = *window;
    let nz = volume.len_of(Axis(2));

    let mut cursor = Cursor::at(source, [x.start, y.start, 0]);
    let mut row = vec![0.; nz];

    for i in 0..x.len {
        for j in 0..y.len {
            cursor.move_to([x.start + i, y.start + j, 0]);
            cursor
                .read(Destination::Real(&mut row), name, &[1, 1, nz])
                .map_err(|e| BackendFailure::new(name, e))?;

            volume
                .slice_mut(s![x.dest + i, y.dest + j, ..])
                .assign(&aview1(&row));
        }
    }

    Ok(())
}

/// reconstruct every `(x, y)` row of a toroidal Fourier series variable onto the local z points
fn read_volume_spectral<S: DataSource + ?Sized>(
    source: &mut S,
    name: &str,
    window: &FieldWindow,
    stored_nz: usize,
    zperiod: usize,
    mut volume: ArrayViewMut3<'_, f64>,
) -> Result<(), BackendFailure> {
    let FieldWindow { x, y, .. } = *window;
    let nz = volume.len_of(Axis(2));
    let maxmode = spectral::max_mode(stored_nz);

    if zperiod > maxmode {
        log::warn!("zperiod ({zperiod}) > maxmode ({maxmode}) => Only reading n = 0 component");
    } else {
        match spectral::mode_range(maxmode, zperiod, nz) {
            ModeRange::DcOnly => log::info!("Only reading the n = 0 component of `{name}`"),
            range => log::info!("Reading {range} of `{name}`"),
        }
    }

    let mut synthesis = Synthesis::new(nz);
    let mut cursor = Cursor::at(source, [x.start, y.start, 0]);
    let mut raw = vec![0.; stored_nz];
    let mut row = vec![0.; nz];

    for i in 0..x.len {
        for j in 0..y.len {
            cursor.move_to([x.start + i, y.start + j, 0]);
            cursor
                .read(Destination::Real(&mut raw), name, &[1, 1, stored_nz])
                .map_err(|e| BackendFailure::new(name, e))?;

            let spectrum = spectral::harmonic_spectrum(&raw, zperiod, nz);
            synthesis.process(&spectrum, &mut row);

            volume
                .slice_mut(s![x.dest + i, y.dest + j, ..])
                .assign(&aview1(&row));
        }
    }

    Ok(())
}
