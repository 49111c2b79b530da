//! # Storage backends
//!
//! The loader talks to grid files only through the [`DataSource`] trait: a variable size
//! query, attribute lookup, and typed, cursor-relative array reads. [`MemorySource`] is an
//! in-memory implementation that also backs the XML container in
//! [`container`](crate::container); any other format (NetCDF, HDF5, ...) can be used by
//! implementing the trait.
//!
//! ## The global origin cursor
//!
//! Partial reads are positioned with a "global origin": the starting index of the next read
//! along each of the first three dimensions of a variable. The origin is state of the
//! backend, so every read sequence goes through a [`Cursor`], which sets the origin when it
//! is created and resets it to zero when it is dropped, including on early returns.

mod cursor;
mod memory;

pub use cursor::Cursor;
pub use memory::{MemorySource, StoredVariable, Values};

/// Destination buffer of a typed read. Conversion from the stored element type happens in the
/// backend; unrepresentable values are an error.
#[derive(Debug)]
pub enum Destination<'a> {
    Int(&'a mut [i32]),
    Real(&'a mut [f64]),
    Float(&'a mut [f32]),
}

impl<'a> Destination<'a> {
    pub fn len(&self) -> usize {
        match self {
            Self::Int(buffer) => buffer.len(),
            Self::Real(buffer) => buffer.len(),
            Self::Float(buffer) => buffer.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Element types that can be read through a [`Destination`]
pub trait Element: Copy + Default {
    fn destination(buffer: &mut [Self]) -> Destination<'_>;
}

impl Element for i32 {
    fn destination(buffer: &mut [Self]) -> Destination<'_> {
        Destination::Int(buffer)
    }
}

impl Element for f64 {
    fn destination(buffer: &mut [Self]) -> Destination<'_> {
        Destination::Real(buffer)
    }
}

impl Element for f32 {
    fn destination(buffer: &mut [Self]) -> Destination<'_> {
        Destination::Float(buffer)
    }
}

/// Failure of a read at the storage layer
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum StorageError {
    #[error("storage is not readable")]
    Invalid,
    #[error("variable `{0}` does not exist")]
    Missing(String),
    #[error("`{name}` has {rank} dimensions but {counts} counts were given")]
    Rank {
        name: String,
        rank: usize,
        counts: usize,
    },
    #[error("reading {counts:?} values from `{name}` at origin {origin:?} runs past its extent {shape:?}")]
    OutOfBounds {
        name: String,
        origin: [usize; 3],
        counts: Vec<usize>,
        shape: Vec<usize>,
    },
    #[error("destination holds {len} values but {requested} were requested from `{name}`")]
    DestinationLength {
        name: String,
        len: usize,
        requested: usize,
    },
    #[error("shape {shape:?} of `{name}` does not match its {len} values")]
    Shape {
        name: String,
        shape: Vec<usize>,
        len: usize,
    },
    #[error("a value of `{name}` cannot be represented in the destination type")]
    Conversion { name: String },
}

/// Contract of a grid file backend
pub trait DataSource {
    /// whether the underlying storage can be read
    fn is_valid(&self) -> bool;

    /// extent of each dimension of a variable. Empty if the variable does not exist; a scalar
    /// reports a single dimension of length one.
    fn size(&self, name: &str) -> Vec<usize>;

    /// read `counts` values along each dimension of a variable, starting at the current
    /// global origin, into `dest` in row-major order.
    fn read(
        &mut self,
        dest: Destination<'_>,
        name: &str,
        counts: &[usize],
    ) -> Result<(), StorageError>;

    /// string attribute `name` of `group`; the empty group holds file level attributes
    fn attribute(&self, group: &str, name: &str) -> Option<String>;

    /// reposition the read cursor
    fn set_global_origin(&mut self, origin: [usize; 3]);

    /// release the underlying storage
    fn close(&mut self) {}
}
