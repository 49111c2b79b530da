//! Guard cell reconciliation between a grid file and the local subdomain
//!
//! A stored 2D or 3D variable holds the global interior of the mesh, optionally surrounded by
//! `g` boundary guard cells at each boundary of an axis. Comparing the stored extent with the
//! interior extent gives `g`, which decides where the local subdomain is read from:
//!
//! * `g == 0`: only the local interior is read. The local guard cells are extrapolated later.
//! * `g >= local guard width`: the whole local extent, guard cells included, is read.
//! * anything in between cannot fill the local guard cells and is rejected.
//!
//! A double-null mesh has a second pair of targets in the middle of the y domain, so the file
//! stores `4 g` extra y points rather than `2 g`, and subdomains past the branch cut read
//! `2 g` points further along y.

use super::Inconsistent;
use crate::mesh::Mesh;

/// width of the guard region on each side of a local interior spanning `start ..= end`
pub fn guard_width(
    axis: char,
    local: usize,
    start: usize,
    end: usize,
) -> Result<usize, Inconsistent> {
    let interior = (end + 1).saturating_sub(start);

    match local.checked_sub(interior) {
        Some(extra) if extra % 2 == 0 => Ok(extra / 2),
        _ => Err(Inconsistent::GuardWidth {
            axis,
            local,
            interior,
        }),
    }
}

/// number of guard cells stored at each of `boundaries` boundaries of an axis
pub fn file_guards(
    name: &str,
    axis: char,
    stored: usize,
    interior: usize,
    boundaries: usize,
) -> Result<usize, Inconsistent> {
    let extra = stored
        .checked_sub(interior)
        .ok_or_else(|| Inconsistent::ExtentMismatch {
            name: name.into(),
            axis,
            stored,
            interior,
        })?;

    if extra % boundaries != 0 {
        return Err(Inconsistent::FractionalGuards {
            name: name.into(),
            axis,
            stored,
            interior,
        });
    }

    Ok(extra / boundaries)
}

/// number of x-boundary guard cells of a variable with `stored_nx` points in x
pub fn x_file_guards<M: Mesh + ?Sized>(
    mesh: &M,
    name: &str,
    stored_nx: usize,
) -> Result<usize, Inconsistent> {
    let mxg = mesh.x_guard_width()?;
    let interior = mesh.global_nx().saturating_sub(2 * mxg);

    file_guards(name, 'x', stored_nx, interior, 2)
}

/// number of y-boundary guard cells of a variable with `stored_ny` points in y
pub fn y_file_guards<M: Mesh + ?Sized>(
    mesh: &M,
    name: &str,
    stored_ny: usize,
) -> Result<usize, Inconsistent> {
    let myg = mesh.y_guard_width()?;
    let interior = mesh.global_ny().saturating_sub(2 * myg);
    let boundaries = if mesh.is_double_null() { 4 } else { 2 };

    file_guards(name, 'y', stored_ny, interior, boundaries)
}

/// The part of one axis read from the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadWindow {
    /// first stored index to read
    pub start: usize,
    /// first local index written
    pub dest: usize,
    /// number of points read
    pub len: usize,
}

impl ReadWindow {
    /// local indices written by the read
    pub fn local_range(&self) -> std::ops::Range<usize> {
        self.dest..self.dest + self.len
    }
}

/// Window along an axis whose local interior starts at stored interior index `offset`
pub fn axis_window(
    name: &str,
    axis: char,
    offset: usize,
    file_guards: usize,
    mesh_guards: usize,
    local: usize,
) -> Result<ReadWindow, Inconsistent> {
    if file_guards == 0 {
        Ok(ReadWindow {
            start: offset,
            dest: mesh_guards,
            len: local.saturating_sub(2 * mesh_guards),
        })
    } else if file_guards >= mesh_guards {
        Ok(ReadWindow {
            start: offset + file_guards - mesh_guards,
            dest: 0,
            len: local,
        })
    } else {
        Err(Inconsistent::UnresolvableGuards {
            name: name.into(),
            axis,
            file_guards,
            mesh_guards,
        })
    }
}

/// Where a stored 2D or 3D variable is read from, and how many guard cells the file holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldWindow {
    pub x: ReadWindow,
    pub y: ReadWindow,
    pub x_guards: usize,
    pub y_guards: usize,
}

/// Read windows of a variable with `stored` extents, `[nx, ny, ..]`. `declared_y_guards` is the
/// y guard count the file declares for all of its variables, if any.
pub fn field_window<M: Mesh + ?Sized>(
    mesh: &M,
    name: &str,
    stored: &[usize],
    declared_y_guards: Option<i32>,
) -> Result<FieldWindow, Inconsistent> {
    let (stored_nx, stored_ny) = match stored {
        [nx, ny, ..] => (*nx, *ny),
        _ => {
            return Err(Inconsistent::WrongDimensions {
                name: name.into(),
                expected: 2,
                found: stored.len(),
            })
        }
    };

    let mxg = mesh.x_guard_width()?;
    let myg = mesh.y_guard_width()?;

    let x_guards = x_file_guards(mesh, name, stored_nx)?;
    let y_guards = y_file_guards(mesh, name, stored_ny)?;

    if let Some(declared) = declared_y_guards {
        if i64::from(declared) != y_guards as i64 {
            return Err(Inconsistent::DeclaredYGuards {
                name: name.into(),
                declared,
                derived: y_guards,
            });
        }
    }

    let x = axis_window(name, 'x', mesh.offset_x(), x_guards, mxg, mesh.local_nx())?;

    let mut y_offset = mesh.offset_y();
    // neither offset_y nor ny_inner count guard cells
    if mesh.is_double_null() && mesh.offset_y() >= mesh.ny_inner() {
        y_offset += 2 * y_guards;
    }

    let y = axis_window(name, 'y', y_offset, y_guards, myg, mesh.local_ny())?;

    Ok(FieldWindow {
        x,
        y,
        x_guards,
        y_guards,
    })
}
