//! # gridfield
//!
//! Loads mesh-decomposed field data for a single processor's subdomain out of a grid file.
//!
//! A [`GridFile`] wraps an open storage backend (anything implementing [`DataSource`]) and
//! fills caller owned [`Field2D`] / [`Field3D`] handles for the subdomain described by a
//! [`Mesh`]. The loader reconciles how many boundary guard cells the file stores against
//! the guard widths of the local decomposition, chooses between the real-space and the
//! legacy spectral (toroidal Fourier) representation of 3D variables, and extrapolates
//! boundary guard cells that the file does not provide.
//!
//! ```
//! use gridfield::{Field2D, GridFile, MemorySource, Subdomain, SubdomainConfig};
//!
//! let mesh = Subdomain::new(SubdomainConfig::serial(4, 3, 1, 1, 1)).unwrap();
//!
//! let mut source = MemorySource::new();
//! source.add_real("bxcv", 0.5);
//!
//! let mut grid = GridFile::open(source, "grid.nc").unwrap();
//! let mut bxcv = Field2D::default();
//!
//! assert!(grid.get_field(&mesh, &mut bxcv, "bxcv", 0.0).unwrap());
//! assert!(bxcv.iter().all(|value| *value == 0.5));
//! ```
//!
//! Grid files on disk use the XML container described in [`container`].

pub mod array;
pub mod container;
pub mod loader;
pub mod mesh;
pub mod prelude;
pub mod source;
pub mod spectral;
mod traits;
mod utils;

pub use array::{Field2D, Field3D, FieldData, FieldView};
pub use container::{parse_xml_document, read_grid_file, write_grid_file, XmlGridFile};
pub use loader::{BackendFailure, FieldWindow, GridFile, Inconsistent, ReadWindow, Target};
pub use mesh::{DecompositionError, Mesh, Subdomain, SubdomainConfig};
pub use source::{
    Cursor, DataSource, Destination, Element, MemorySource, StorageError, StoredVariable, Values,
};
pub use traits::Encoding;

pub use ndarray;

/// general purpose error enumeration for possible causes of failure.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("An io error occured: `{0}`")]
    Io(#[from] std::io::Error),
    #[error("Error while parsing grid file xml: {0}")]
    Parse(#[from] container::ParseError),
    #[error("Could not write XML data to file: `{0}`")]
    XmlWrite(#[from] quick_xml::Error),
    #[error("Inconsistent grid file: {0}")]
    Inconsistent(#[from] loader::Inconsistent),
    #[error("{0}")]
    Backend(#[from] loader::BackendFailure),
    #[error("Invalid mesh decomposition: {0}")]
    Decomposition(#[from] mesh::DecompositionError),
}
