use crate::prelude::*;

use super::event_summary::EventSummary;

use quick_xml::events::attributes::AttrError;
use quick_xml::name::QName;

#[derive(Debug, thiserror::Error, From)]
pub enum ParseError {
    #[error("Error parsing the GridFile root element: {0}")]
    Header(Header),
    #[error("Error parsing the Attributes section: {0}")]
    Attributes(Attributes),
    #[error("Error parsing the Variables section: {0}")]
    Variables(Variables),
    #[error("Error parsing the body of the GridFile element: {0}")]
    Body(Body),
}

#[derive(Debug, thiserror::Error, From)]
pub enum Header {
    #[error("{0}")]
    MalformedXml(MalformedXml),
    #[error("{0}")]
    MalformedAttribute(MalformedAttribute),
    #[error("{0}")]
    UnexpectedElement(UnexpectedElement),
    #[error("{0}")]
    UnexpectedAttributeValue(UnexpectedAttributeValue),
}

#[derive(Debug, thiserror::Error, From)]
pub enum Body {
    #[error("{0}")]
    MalformedXml(MalformedXml),
    #[error("{0}")]
    UnexpectedElement(UnexpectedElement),
}

#[derive(Debug, thiserror::Error, From)]
pub enum Attributes {
    #[error("{0}")]
    MalformedXml(MalformedXml),
    #[error("{0}")]
    MalformedAttribute(MalformedAttribute),
    #[error("{0}")]
    MissingAttribute(MissingAttribute),
    #[error("{0}")]
    UnexpectedElement(UnexpectedElement),
}

#[derive(Debug, thiserror::Error, From)]
pub enum Variables {
    #[error("{0}")]
    MalformedXml(MalformedXml),
    #[error("{0}")]
    MalformedAttribute(MalformedAttribute),
    #[error("{0}")]
    MissingAttribute(MissingAttribute),
    #[error("{0}")]
    UnexpectedElement(UnexpectedElement),
    #[error("{0}")]
    UnexpectedAttributeValue(UnexpectedAttributeValue),
    #[error("{0}")]
    MalformedShape(MalformedShape),
    #[error("{0}")]
    InlineAsciiArray(InlineAsciiArray),
    #[error("{0}")]
    InlineBase64Array(InlineBase64Array),
    #[error("{0}")]
    BinaryLength(BinaryLength),
    #[error("{0}")]
    ElementCount(ElementCount),
}

#[derive(From, Display, Debug)]
#[display(fmt = "failed to parse an xml element: {xml_err}")]
pub struct MalformedXml {
    xml_err: quick_xml::Error,
}

#[derive(From, Display, Debug)]
#[display(fmt = "failed to parse an xml attribute: {att_err}")]
pub struct MalformedAttribute {
    att_err: AttrError,
}

#[derive(From, Display, Debug)]
#[display(fmt = "unexpected element. Expected `{expected_name}`, got {actual_element}")]
pub struct UnexpectedElement {
    expected_name: String,
    actual_element: EventSummary,
}

impl UnexpectedElement {
    pub(crate) fn new<T: Into<String>>(expected_name: T, actual_element: EventSummary) -> Self {
        Self {
            expected_name: expected_name.into(),
            actual_element,
        }
    }
}

#[derive(From, Display, Debug, Constructor)]
#[display(
    fmt = "unexpected attribute value for {attribute_name} in {element_name} element: expected {expected_value}, got {actual_value}"
)]
pub struct UnexpectedAttributeValue {
    pub(crate) element_name: String,
    pub(crate) attribute_name: String,
    pub(crate) expected_value: String,
    pub(crate) actual_value: ParsedNameOrBytes,
}

#[derive(From, Display, Debug, Constructor)]
#[display(fmt = "missing attribute `{attribute_name}` in {element_name} element")]
pub struct MissingAttribute {
    element_name: String,
    attribute_name: String,
}

#[derive(From, Display, Debug)]
pub enum ParsedNameOrBytes {
    #[display(fmt = "{_0}")]
    Utf8(String),
    #[display(fmt = "{_0:?} (cannot convert to UTF8 string)")]
    Bytes(Vec<u8>),
}

impl ParsedNameOrBytes {
    fn new(bytes: &[u8]) -> Self {
        let vec = Vec::from(bytes);
        match String::from_utf8(vec) {
            Ok(string) => Self::Utf8(string),
            Err(e) => Self::Bytes(e.into_bytes()),
        }
    }
}

impl<'a> From<QName<'a>> for ParsedNameOrBytes {
    fn from(x: QName) -> Self {
        Self::new(x.as_ref())
    }
}

impl<'a> From<std::borrow::Cow<'a, [u8]>> for ParsedNameOrBytes {
    fn from(x: std::borrow::Cow<'a, [u8]>) -> Self {
        Self::new(x.as_ref())
    }
}

impl<'a> From<&'a str> for ParsedNameOrBytes {
    fn from(x: &str) -> Self {
        Self::Utf8(x.into())
    }
}

#[derive(From, Display, Debug, Constructor)]
#[display(fmt = "could not parse `Shape` attribute `{value}` of DataArray `{array_name}`")]
pub struct MalformedShape {
    array_name: String,
    value: String,
}

#[derive(From, Display, Debug, Constructor)]
#[display(fmt = "failed to parse `{token}` in inline ascii array `{array_name}`")]
pub struct InlineAsciiArray {
    array_name: String,
    token: String,
}

#[derive(From, Display, Debug, Constructor)]
#[display(fmt = "failed to decode base64 data of array `{array_name}`: {decode_err}")]
pub struct InlineBase64Array {
    array_name: String,
    decode_err: base64::DecodeError,
}

#[derive(From, Display, Debug, Constructor)]
#[display(
    fmt = "binary data of array `{array_name}` holds {bytes} bytes, which is not a whole number of {elem_size} byte elements"
)]
pub struct BinaryLength {
    array_name: String,
    bytes: usize,
    elem_size: usize,
}

#[derive(From, Display, Debug, Constructor)]
#[display(fmt = "array `{array_name}` with shape {shape:?} holds {len} elements")]
pub struct ElementCount {
    array_name: String,
    shape: Vec<usize>,
    len: usize,
}
