//! # Grid file container
//!
//! On-disk grid files are xml documents with one `Attributes` section of string attributes
//! and one `Variables` section of numeric arrays:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <GridFile version="1.0" byte_order="LittleEndian">
//!   <Attributes>
//!     <Attribute Name="title" value="single null"/>
//!     <Attribute Group="dx" Name="units" value="m"/>
//!   </Attributes>
//!   <Variables>
//!     <DataArray type="Int32" Name="nx" Shape="" format="ascii">8</DataArray>
//!     <DataArray type="Float64" Name="dx" Shape="8 4" format="binary">AAAAAAAA...</DataArray>
//!   </Variables>
//! </GridFile>
//! ```
//!
//! `type` is `Int32` or `Float64`. `format` is `ascii` (whitespace separated numbers) or
//! `binary` (base64 of the little endian bytes of every element). `Shape` lists the extent
//! of each dimension in row-major order and is empty for a scalar. Attributes without a
//! `Group` belong to the file itself.

mod error;
mod event_summary;
mod parse;
mod write;

pub use error::ParseError;
pub use error::{Attributes, Body, Header, Variables};
pub use parse::{parse_xml_document, read_grid_file};
pub use write::write_grid_file;

use crate::source::{DataSource, Destination, MemorySource, StorageError};
use std::path::{Path, PathBuf};

/// A grid file read from disk, served from memory
#[derive(Debug, Clone)]
pub struct XmlGridFile {
    path: PathBuf,
    source: MemorySource,
}

impl XmlGridFile {
    /// read and parse the grid file at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, crate::Error> {
        let path = path.as_ref().to_path_buf();
        let source = read_grid_file(&path)?;

        log::debug!(
            "opened grid file {} with {} variables",
            path.display(),
            source.variables().count()
        );

        Ok(Self { path, source })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// the parsed contents of the file
    pub fn into_source(self) -> MemorySource {
        self.source
    }
}

impl DataSource for XmlGridFile {
    fn is_valid(&self) -> bool {
        self.source.is_valid()
    }

    fn size(&self, name: &str) -> Vec<usize> {
        self.source.size(name)
    }

    fn read(
        &mut self,
        dest: Destination<'_>,
        name: &str,
        counts: &[usize],
    ) -> Result<(), StorageError> {
        self.source.read(dest, name, counts)
    }

    fn attribute(&self, group: &str, name: &str) -> Option<String> {
        self.source.attribute(group, name)
    }

    fn set_global_origin(&mut self, origin: [usize; 3]) {
        self.source.set_global_origin(origin)
    }

    fn close(&mut self) {
        self.source.close()
    }
}
