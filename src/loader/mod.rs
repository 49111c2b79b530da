//! # Grid field loader
//!
//! [`GridFile`] reads scalars, 1D sequences and mesh-distributed 2D / 3D fields for the local
//! subdomain of one processor. Every load is checked against the layout of the mesh: how many
//! boundary guard cells the file stores (see [`window`]), whether 3D data is stored in real
//! space or as toroidal Fourier series, and whether missing guard cells must be extrapolated
//! (see [`extrapolate`]).
//!
//! Absent variables are never an error. Fields are filled with the supplied default and the
//! load reports `false`; scalar getters return `None`.

mod error;
pub mod extrapolate;
mod read;
pub mod window;

pub use error::{BackendFailure, Inconsistent};
pub use extrapolate::{extrapolate_x, extrapolate_y};
pub use window::{
    axis_window, field_window, file_guards, guard_width, x_file_guards, y_file_guards,
    FieldWindow, ReadWindow,
};

use crate::array::{Field2D, Field3D};
use crate::container::XmlGridFile;
use crate::prelude::*;
use crate::source::{Cursor, Element, StorageError};

use std::path::Path;

/// Destination of a [`GridFile::get`] call, one per kind of value a grid file can hold
pub enum Target<'a> {
    Int(&'a mut i32),
    Real(&'a mut f64),
    Float(&'a mut f32),
    String(&'a mut String),
    Field2D(&'a mut Field2D),
    Field3D(&'a mut Field3D),
}

/// An open grid file
///
/// The storage backend is owned for the lifetime of the loader and closed when it is dropped.
pub struct GridFile<S: DataSource> {
    source: S,
    filename: String,
    /// number of y-boundary guard cells the file declares for its variables
    y_boundary_guards: Option<i32>,
}

impl GridFile<XmlGridFile> {
    /// read the xml grid file at `path`
    pub fn open_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let filename = path.as_ref().display().to_string();
        let source = XmlGridFile::open(path)?;

        Self::open(source, filename)
    }
}

impl<S: DataSource> GridFile<S> {
    /// Take ownership of an opened backend. `filename` is only used in log messages.
    pub fn open<T: Into<String>>(mut source: S, filename: T) -> Result<Self, Error> {
        let filename = filename.into();

        if !source.is_valid() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Could not open file '{filename}'"),
            )
            .into());
        }

        source.set_global_origin([0; 3]);

        let mut grid = Self {
            source,
            filename,
            y_boundary_guards: None,
        };

        grid.y_boundary_guards = grid.read_scalar("y_boundary_guards");

        if let Some(guards) = grid.y_boundary_guards {
            log::debug!("{} declares {guards} y-boundary guard cells", grid.filename);
        }

        Ok(grid)
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// number of y-boundary guard cells declared by the file, if any
    pub fn y_boundary_guards(&self) -> Option<i32> {
        self.y_boundary_guards
    }

    /// whether the file can be read and holds a variable called `name`
    pub fn has_var(&self, name: &str) -> bool {
        self.source.is_valid() && !self.source.size(name).is_empty()
    }

    /// string attribute `name` of the file
    pub fn get_string(&self, name: &str) -> Option<String> {
        // strings are only stored as attributes
        let value = if self.source.is_valid() {
            self.source.attribute("", name)
        } else {
            None
        };

        self.log_option(name, value.as_ref());
        value
    }

    /// first value of the integer variable `name`
    pub fn get_int(&mut self, name: &str) -> Option<i32> {
        let value = self.read_scalar(name);
        self.log_option(name, value.as_ref());
        value
    }

    /// first value of the real variable `name`
    pub fn get_real(&mut self, name: &str) -> Option<f64> {
        let value = self.read_scalar(name);
        self.log_option(name, value.as_ref());
        value
    }

    /// first value of the variable `name` as a single precision float
    pub fn get_float(&mut self, name: &str) -> Option<f32> {
        let value = self.read_scalar(name);
        self.log_option(name, value.as_ref());
        value
    }

    /// `len` integers of the 1D variable `name` starting at `offset`
    pub fn get_ints(&mut self, name: &str, len: usize, offset: usize) -> Option<Vec<i32>> {
        let mut values = vec![0; len];
        self.read_vector(Destination::Int(&mut values), name, len, offset)
            .then_some(values)
    }

    /// `len` reals of the 1D variable `name` starting at `offset`
    pub fn get_reals(&mut self, name: &str, len: usize, offset: usize) -> Option<Vec<f64>> {
        let mut values = vec![0.; len];
        self.read_vector(Destination::Real(&mut values), name, len, offset)
            .then_some(values)
    }

    /// Whether the x extent of `dx` shows that the file already holds x-boundary guard cells.
    /// A file without `dx` is treated as having none.
    pub fn has_x_boundary_guards<M: Mesh + ?Sized>(&self, mesh: &M) -> bool {
        match self.source.size("dx").first() {
            Some(nx) => *nx > mesh.global_nx().saturating_sub(2 * mesh.xstart()),
            None => false,
        }
    }

    /// Read any kind of value into `target`. Fields take `default` when they are absent;
    /// scalars are left unchanged.
    pub fn get<M: Mesh + ?Sized>(
        &mut self,
        mesh: &M,
        target: Target<'_>,
        name: &str,
        default: f64,
    ) -> Result<bool, Error> {
        fn store<T>(slot: &mut T, value: Option<T>) -> bool {
            match value {
                Some(value) => {
                    *slot = value;
                    true
                }
                None => false,
            }
        }

        let found = match target {
            Target::Int(slot) => store(slot, self.get_int(name)),
            Target::Real(slot) => store(slot, self.get_real(name)),
            Target::Float(slot) => store(slot, self.get_float(name)),
            Target::String(slot) => store(slot, self.get_string(name)),
            Target::Field2D(field) => self.get_field(mesh, field, name, default)?,
            Target::Field3D(field) => self.get_field(mesh, field, name, default)?,
        };

        Ok(found)
    }

    /// Fill `var` with the variable `name` over the local subdomain of `mesh`.
    ///
    /// Returns `Ok(false)` with every point set to `default` if the variable is absent or has a
    /// dimensionality the field cannot hold. A source that can no longer be read is an error. Scalars and single element
    /// arrays are broadcast over the field. 2D data read into a 3D field is broadcast along z.
    pub fn get_field<M, F>(
        &mut self,
        mesh: &M,
        var: &mut F,
        name: &str,
        default: f64,
    ) -> Result<bool, Error>
    where
        M: Mesh + ?Sized,
        F: FieldData,
    {
        var.allocate(mesh);

        if !self.source.is_valid() {
            log::error!("Could not read '{name}' from {}: file cannot be read", self.filename);
            return Err(BackendFailure::new(name, StorageError::Invalid).into());
        }

        let size = self.source.size(name);
        let is_2d = F::RANK == 2;

        match size.as_slice() {
            [] => {
                log::warn!("Could not read '{name}' from grid. Setting to {default:e}");
                var.fill(default);
                return Ok(false);
            }
            [1] => {
                let mut value = [0.];
                Cursor::at(&mut self.source, [0; 3])
                    .read(Destination::Real(&mut value), name, &[1])
                    .map_err(|e| BackendFailure::new(name, e))?;

                var.fill(value[0]);
                return Ok(true);
            }
            [len] => {
                return Err(Inconsistent::AmbiguousShape {
                    name: name.into(),
                    len: *len,
                }
                .into());
            }
            [_, _] => {}
            [_, _, _] if !is_2d => {}
            _ => {
                let expected = if is_2d { "2D" } else { "2D or 3D" };
                log::warn!(
                    "Variable '{name}' should be {expected}, but has {} dimensions. Ignored",
                    size.len()
                );
                var.fill(default);
                return Ok(false);
            }
        }

        let window = field_window(mesh, name, &size, self.y_boundary_guards)?;

        match var.view_mut() {
            FieldView::Two(plane) => read::read_plane(&mut self.source, name, &window, plane)?,
            FieldView::Three(volume) if size.len() == 2 => {
                self.read_plane_into_volume(name, &window, volume)?
            }
            FieldView::Three(volume) => {
                read::read_volume(&mut self.source, mesh, name, &window, volume)?
            }
        }

        // the file holds no guard cells: copy from the nearest interior point
        if window.x_guards == 0 {
            extrapolate_x(var.volume_mut(), mesh.xstart(), mesh.xend());
        }

        if window.y_guards == 0 {
            extrapolate_y(var.volume_mut(), mesh.ystart(), mesh.yend());
        }

        log::debug!("read {} `{name}` from {}", F::NAME, self.filename);

        Ok(true)
    }

    /// read a 2D variable into the first z plane of a volume and copy it along z
    fn read_plane_into_volume(
        &mut self,
        name: &str,
        window: &FieldWindow,
        mut volume: ArrayViewMut3<'_, f64>,
    ) -> Result<(), BackendFailure> {
        if volume.len_of(Axis(2)) == 0 {
            return Ok(());
        }

        let (mut first, mut rest) = volume.view_mut().split_at(Axis(2), 1);
        read::read_plane(
            &mut self.source,
            name,
            window,
            first.index_axis_mut(Axis(2), 0),
        )?;

        let first = first.index_axis(Axis(2), 0);
        rest.axis_iter_mut(Axis(2))
            .for_each(|mut plane| plane.assign(&first));

        Ok(())
    }

    /// first element of a variable of any rank
    fn read_scalar<T: Element>(&mut self, name: &str) -> Option<T> {
        if !self.source.is_valid() {
            return None;
        }

        let size = self.source.size(name);
        if size.is_empty() || size.contains(&0) {
            return None;
        }

        let counts = vec![1; size.len()];
        let mut value = [T::default()];

        let mut cursor = Cursor::at(&mut self.source, [0; 3]);
        match cursor.read(T::destination(&mut value), name, &counts) {
            Ok(()) => {
                let [value] = value;
                Some(value)
            }
            Err(e) => {
                log::debug!("could not read scalar `{name}`: {e}");
                None
            }
        }
    }

    fn read_vector(&mut self, dest: Destination<'_>, name: &str, len: usize, offset: usize) -> bool {
        if !self.source.is_valid() {
            return false;
        }

        let mut cursor = Cursor::at(&mut self.source, [offset, 0, 0]);

        match cursor.read(dest, name, &[len]) {
            Ok(()) => true,
            Err(e) => {
                log::debug!("could not read {len} values of `{name}` at {offset}: {e}");
                false
            }
        }
    }

    fn log_option<T: std::fmt::Display>(&self, name: &str, value: Option<&T>) {
        match value {
            Some(value) => log::info!("Option {name} = {value} ({})", self.filename),
            None => log::info!("Option {name} not found in {}", self.filename),
        }
    }
}

impl<S: DataSource> Drop for GridFile<S> {
    fn drop(&mut self) {
        self.source.close();
    }
}
