//! Common traits and types that are useful for working with `gridfield`
#![allow(unused_imports)]

pub use crate::array::{FieldData, FieldView};
pub use crate::mesh::Mesh;
pub use crate::source::{DataSource, Destination};

pub(crate) use crate::traits::{Array, Encoding};

pub(crate) use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
pub(crate) use quick_xml::writer::Writer;

pub(crate) use crate::Error;
pub(crate) use std::io::Write;

pub(crate) use derive_more::{Constructor, Deref, DerefMut, Display, From, Into};

pub(crate) use ndarray::{s, Array2, Array3, ArrayViewMut2, ArrayViewMut3, Axis};
