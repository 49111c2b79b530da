//! reading grid files from the xml container

use super::error;
use super::event_summary::{ElementName, EventSummary};

use crate::prelude::*;
use crate::source::{MemorySource, Values};
use crate::utils;

use quick_xml::name::QName;
use quick_xml::reader::Reader;

use std::io::BufRead;
use std::path::Path;

/// read in and parse an entire grid file for a given path
pub fn read_grid_file<P: AsRef<Path>>(path: P) -> Result<MemorySource, Error> {
    let file = std::fs::File::open(path)?;
    let buf_reader = std::io::BufReader::new(file);
    let reader = Reader::from_reader(buf_reader);

    parse_xml_document(reader)
}

/// parse a complete `GridFile` document into an in-memory source
pub fn parse_xml_document<R: BufRead>(mut reader: Reader<R>) -> Result<MemorySource, Error> {
    let mut buffer = Vec::new();
    let mut source = MemorySource::new();

    // ignore whitespace in the reader
    reader.trim_text(true);

    read_to_grid_header(&mut reader, &mut buffer).map_err(error::ParseError::from)?;

    loop {
        match read_section_start(&mut reader, &mut buffer).map_err(error::ParseError::from)? {
            Section::Attributes { empty } => {
                if !empty {
                    read_attributes(&mut reader, &mut buffer, &mut source)
                        .map_err(error::ParseError::from)?;
                }
            }
            Section::Variables { empty } => {
                if !empty {
                    read_variables(&mut reader, &mut buffer, &mut source)
                        .map_err(error::ParseError::from)?;
                }
            }
            Section::End => break,
        }
    }

    Ok(source)
}

fn read_to_grid_header<R: BufRead>(
    reader: &mut Reader<R>,
    buffer: &mut Vec<u8>,
) -> Result<(), error::Header> {
    // find a GridFile leading element
    loop {
        buffer.clear();
        let event = reader
            .read_event_into(buffer)
            .map_err(error::MalformedXml::from)?;

        match &event {
            // sometimes there are headers for type of file, we just continue
            Event::Decl(_) | Event::Comment(_) | Event::DocType(_) => continue,
            Event::Start(inner_start) if inner_start.name() == QName(b"GridFile") => {
                for attribute in inner_start.attributes() {
                    let attribute = attribute.map_err(error::MalformedAttribute::from)?;

                    if attribute.key.as_ref() == b"version" {
                        check_attribute_value(&attribute.value, "GridFile", "version", "1.0")?;
                    } else if attribute.key.as_ref() == b"byte_order" {
                        check_attribute_value(
                            &attribute.value,
                            "GridFile",
                            "byte_order",
                            "LittleEndian",
                        )?;
                    }
                }

                return Ok(());
            }
            Event::Eof => {
                return Err(error::UnexpectedElement::new("GridFile", EventSummary::eof()).into())
            }
            _ => {
                let actual_event = EventSummary::new(&event);
                return Err(error::UnexpectedElement::new("GridFile", actual_event).into());
            }
        }
    }
}

enum Section {
    Attributes { empty: bool },
    Variables { empty: bool },
    End,
}

fn read_section_start<R: BufRead>(
    reader: &mut Reader<R>,
    buffer: &mut Vec<u8>,
) -> Result<Section, error::Body> {
    const EXPECTED: &str = "Attributes,Variables,/GridFile";

    loop {
        buffer.clear();
        let event = reader
            .read_event_into(buffer)
            .map_err(error::MalformedXml::from)?;

        let name = event.byte_name().map(|name| name.as_ref().to_vec());

        let section = match (&event, name.as_deref()) {
            (Event::Comment(_), _) => continue,
            (Event::Start(_), Some(b"Attributes")) => Section::Attributes { empty: false },
            (Event::Empty(_), Some(b"Attributes")) => Section::Attributes { empty: true },
            (Event::Start(_), Some(b"Variables")) => Section::Variables { empty: false },
            (Event::Empty(_), Some(b"Variables")) => Section::Variables { empty: true },
            (Event::End(_), Some(b"GridFile")) => Section::End,
            _ => {
                let actual = EventSummary::new(&event);
                return Err(error::UnexpectedElement::new(EXPECTED, actual).into());
            }
        };

        return Ok(section);
    }
}

fn read_attributes<R: BufRead>(
    reader: &mut Reader<R>,
    buffer: &mut Vec<u8>,
    source: &mut MemorySource,
) -> Result<(), error::Attributes> {
    loop {
        buffer.clear();
        let event = reader
            .read_event_into(buffer)
            .map_err(error::MalformedXml::from)?;

        match &event {
            Event::Comment(_) => continue,
            Event::Empty(start) if start.name() == QName(b"Attribute") => {
                let group = optional_attribute::<error::Attributes>(start, "Group")?;
                let name = attribute_string::<error::Attributes>(start, "Name", "Attribute")?;
                let value = attribute_string::<error::Attributes>(start, "value", "Attribute")?;

                source.add_attribute(group.as_deref().unwrap_or(""), &name, &value);
            }
            Event::End(end) if end.name() == QName(b"Attributes") => return Ok(()),
            _ => {
                let actual = EventSummary::new(&event);
                return Err(error::UnexpectedElement::new("Attribute,/Attributes", actual).into());
            }
        }
    }
}

/// element type of a `DataArray`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ElementType {
    Int32,
    Float64,
}

impl ElementType {
    fn size(&self) -> usize {
        match self {
            Self::Int32 => std::mem::size_of::<i32>(),
            Self::Float64 => std::mem::size_of::<f64>(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Everything held in the opening tag of a `DataArray` element
struct DataArrayHeader {
    name: String,
    element: ElementType,
    shape: Vec<usize>,
    encoding: Encoding,
}

enum Next {
    Array { header: DataArrayHeader, empty: bool },
    End,
}

fn read_variables<R: BufRead>(
    reader: &mut Reader<R>,
    buffer: &mut Vec<u8>,
    source: &mut MemorySource,
) -> Result<(), error::Variables> {
    loop {
        let next = {
            buffer.clear();
            let event = reader
                .read_event_into(buffer)
                .map_err(error::MalformedXml::from)?;

            match &event {
                Event::Comment(_) => continue,
                Event::Start(start) if start.name() == QName(b"DataArray") => Next::Array {
                    header: read_dataarray_header(start)?,
                    empty: false,
                },
                Event::Empty(start) if start.name() == QName(b"DataArray") => Next::Array {
                    header: read_dataarray_header(start)?,
                    empty: true,
                },
                Event::End(end) if end.name() == QName(b"Variables") => Next::End,
                _ => {
                    let actual = EventSummary::new(&event);
                    return Err(
                        error::UnexpectedElement::new("DataArray,/Variables", actual).into(),
                    );
                }
            }
        };

        let header = match next {
            Next::Array { header, empty } => {
                let body = if empty {
                    String::new()
                } else {
                    read_array_body(reader, buffer)?
                };

                let values = parse_array_body(&header, &body)?;
                let len = values.len();

                source
                    .add_array(&header.name, &header.shape, values)
                    .map_err(|_| {
                        error::ElementCount::new(header.name.clone(), header.shape.clone(), len)
                    })?;

                header
            }
            Next::End => return Ok(()),
        };

        log::debug!("parsed grid file array `{}` {:?}", header.name, header.shape);
    }
}

/// parse the attributes of the opening tag of a `DataArray`
fn read_dataarray_header(start: &BytesStart<'_>) -> Result<DataArrayHeader, error::Variables> {
    let name = attribute_string::<error::Variables>(start, "Name", "DataArray")?;

    let element = match attribute_string::<error::Variables>(start, "type", "DataArray")?.as_str()
    {
        "Int32" => ElementType::Int32,
        "Float64" => ElementType::Float64,
        other => {
            return Err(error::UnexpectedAttributeValue::new(
                "DataArray".into(),
                "type".into(),
                "Int32 or Float64".into(),
                other.into(),
            )
            .into())
        }
    };

    let encoding = match attribute_string::<error::Variables>(start, "format", "DataArray")?.as_str()
    {
        "ascii" => Encoding::Ascii,
        "binary" => Encoding::Base64,
        other => {
            return Err(error::UnexpectedAttributeValue::new(
                "DataArray".into(),
                "format".into(),
                "ascii or binary".into(),
                other.into(),
            )
            .into())
        }
    };

    let shape_str = attribute_string::<error::Variables>(start, "Shape", "DataArray")?;
    let shape = shape_str
        .split_ascii_whitespace()
        .map(|x| x.parse::<usize>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| error::MalformedShape::new(name.clone(), shape_str.clone()))?;

    Ok(DataArrayHeader {
        name,
        element,
        shape,
        encoding,
    })
}

/// read the text body of a `DataArray` through its closing element
fn read_array_body<R: BufRead>(
    reader: &mut Reader<R>,
    buffer: &mut Vec<u8>,
) -> Result<String, error::Variables> {
    buffer.clear();
    let body = {
        let event = reader
            .read_event_into(buffer)
            .map_err(error::MalformedXml::from)?;

        match &event {
            Event::Text(text) => text
                .unescape()
                .map_err(error::MalformedXml::from)?
                .into_owned(),
            // a body with no text at all, like `<DataArray ...></DataArray>`
            Event::End(end) if end.name() == QName(b"DataArray") => return Ok(String::new()),
            _ => {
                let actual = EventSummary::new(&event);
                return Err(error::UnexpectedElement::new("body element", actual).into());
            }
        }
    };

    read_ending_element::<error::Variables, _>(reader, buffer, "DataArray")?;

    Ok(body)
}

fn parse_array_body(header: &DataArrayHeader, body: &str) -> Result<Values, error::Variables> {
    let values = match header.encoding {
        Encoding::Ascii => match header.element {
            ElementType::Int32 => Values::Int(parse_ascii(&header.name, body)?),
            ElementType::Float64 => Values::Real(parse_ascii(&header.name, body)?),
        },
        Encoding::Base64 => {
            let bytes = base64::decode(body.trim())
                .map_err(|e| error::InlineBase64Array::new(header.name.clone(), e))?;

            let elem_size = header.element.size();

            if bytes.len() % elem_size != 0 {
                return Err(
                    error::BinaryLength::new(header.name.clone(), bytes.len(), elem_size).into(),
                );
            }

            let chunks = bytes.chunks_exact(elem_size);

            match header.element {
                ElementType::Int32 => Values::Int(chunks.map(utils::bytes_to_int).collect()),
                ElementType::Float64 => Values::Real(chunks.map(utils::bytes_to_float).collect()),
            }
        }
    };

    Ok(values)
}

fn parse_ascii<T: std::str::FromStr>(
    array_name: &str,
    body: &str,
) -> Result<Vec<T>, error::InlineAsciiArray> {
    body.split_ascii_whitespace()
        .map(|token| {
            token
                .parse()
                .map_err(|_| error::InlineAsciiArray::new(array_name.into(), token.into()))
        })
        .collect()
}

fn read_ending_element<E, R: BufRead>(
    reader: &mut Reader<R>,
    buffer: &mut Vec<u8>,
    expected_name: &str,
) -> Result<(), E>
where
    E: From<error::UnexpectedElement> + From<error::MalformedXml>,
{
    buffer.clear();
    let element = reader
        .read_event_into(buffer)
        .map_err(error::MalformedXml::from)?;

    let event = if let Event::End(event) = element {
        event
    } else {
        let actual_event = EventSummary::new(&element);
        let unexpected = error::UnexpectedElement::new(format!("/{expected_name}"), actual_event);
        return Err(E::from(unexpected));
    };

    // check that the name of the closing element is correct
    if event.name().as_ref() != expected_name.as_bytes() {
        let actual_event = EventSummary::end(&event);
        let unexpected = error::UnexpectedElement::new(format!("/{expected_name}"), actual_event);
        return Err(E::from(unexpected));
    }

    Ok(())
}

/// unescaped value of an attribute if it is present on the element
fn optional_attribute<E>(
    bytes_start: &BytesStart<'_>,
    attribute_key: &str,
) -> Result<Option<String>, E>
where
    E: From<error::MalformedAttribute> + From<error::MalformedXml>,
{
    for attribute in bytes_start.attributes() {
        let attribute = attribute.map_err(error::MalformedAttribute::from)?;

        if attribute.key.as_ref() == attribute_key.as_bytes() {
            let value = attribute
                .unescape_value()
                .map_err(error::MalformedXml::from)?;
            return Ok(Some(value.into_owned()));
        }
    }

    Ok(None)
}

fn attribute_string<E>(
    bytes_start: &BytesStart<'_>,
    attribute_key: &str,
    element_name: &str,
) -> Result<String, E>
where
    E: From<error::MalformedAttribute> + From<error::MalformedXml> + From<error::MissingAttribute>,
{
    match optional_attribute::<E>(bytes_start, attribute_key)? {
        Some(value) => Ok(value),
        None => {
            let err = error::MissingAttribute::new(element_name.into(), attribute_key.into());
            Err(E::from(err))
        }
    }
}

/// ensure that an attribute's value is what we expect it to be, otherwise return an error with
/// some location information
fn check_attribute_value(
    value: &[u8],
    element_name: &str,
    attribute_name: &str,
    expected_attribute_value: &str,
) -> Result<(), error::UnexpectedAttributeValue> {
    if value != expected_attribute_value.as_bytes() {
        let unexpected_value = error::UnexpectedAttributeValue {
            element_name: element_name.into(),
            attribute_name: attribute_name.into(),
            expected_value: expected_attribute_value.into(),
            actual_value: error::ParsedNameOrBytes::from(std::borrow::Cow::Borrowed(value)),
        };

        Err(unexpected_value)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::DataSource;

    fn parse(xml: &str) -> Result<MemorySource, Error> {
        parse_xml_document(Reader::from_str(xml))
    }

    #[test]
    fn header_with_declaration() {
        let source = parse(
            r#"<?xml version="1.0" encoding="UTF-8"?>
            <GridFile version="1.0" byte_order="LittleEndian">
            </GridFile>"#,
        )
        .unwrap();

        assert_eq!(source.variables().count(), 0);
    }

    #[test]
    fn wrong_byte_order() {
        let result = parse(r#"<GridFile version="1.0" byte_order="BigEndian"></GridFile>"#);

        assert!(matches!(
            result,
            Err(Error::Parse(error::ParseError::Header(
                error::Header::UnexpectedAttributeValue(_)
            )))
        ));
    }

    #[test]
    fn not_a_grid_file() {
        let result = parse(r#"<Mesh type="Rectilinear"></Mesh>"#);

        assert!(matches!(
            result,
            Err(Error::Parse(error::ParseError::Header(
                error::Header::UnexpectedElement(_)
            )))
        ));
    }

    #[test]
    fn attributes_with_groups() {
        let source = parse(
            r#"<GridFile version="1.0" byte_order="LittleEndian">
                <Attributes>
                    <Attribute Name="title" value="tokamak &amp; divertor"/>
                    <Attribute Group="dx" Name="units" value="m"/>
                </Attributes>
            </GridFile>"#,
        )
        .unwrap();

        assert_eq!(
            source.attribute("", "title").as_deref(),
            Some("tokamak & divertor")
        );
        assert_eq!(source.attribute("dx", "units").as_deref(), Some("m"));
    }

    #[test]
    fn ascii_and_scalar_arrays() {
        let mut source = parse(
            r#"<GridFile version="1.0" byte_order="LittleEndian">
                <Variables>
                    <DataArray type="Int32" Name="nx" Shape="" format="ascii">8</DataArray>
                    <DataArray type="Float64" Name="dx" Shape="2 3" format="ascii">
                        0.0 0.5 1.0
                        1.5 2.0 2.5
                    </DataArray>
                </Variables>
            </GridFile>"#,
        )
        .unwrap();

        assert_eq!(source.size("nx"), vec![1]);
        assert_eq!(source.size("dx"), vec![2, 3]);

        let mut row = [0.0; 3];
        source.set_global_origin([1, 0, 0]);
        source
            .read(Destination::Real(&mut row), "dx", &[1, 3])
            .unwrap();
        assert_eq!(row, [1.5, 2.0, 2.5]);
    }

    #[test]
    fn base64_arrays() {
        let body = [1.0f64, -2.0].as_slice().base64_body();
        let xml = format!(
            r#"<GridFile version="1.0" byte_order="LittleEndian">
                <Variables>
                    <DataArray type="Float64" Name="psi" Shape="2" format="binary">{body}</DataArray>
                </Variables>
            </GridFile>"#
        );

        let source = parse(&xml).unwrap();
        let variable = source.variable("psi").unwrap();

        assert_eq!(variable.values(), &Values::Real(vec![1.0, -2.0]));
    }

    #[test]
    fn element_count_must_match_shape() {
        let result = parse(
            r#"<GridFile version="1.0" byte_order="LittleEndian">
                <Variables>
                    <DataArray type="Float64" Name="dx" Shape="2 2" format="ascii">1 2 3</DataArray>
                </Variables>
            </GridFile>"#,
        );

        assert!(matches!(
            result,
            Err(Error::Parse(error::ParseError::Variables(
                error::Variables::ElementCount(_)
            )))
        ));
    }

    #[test]
    fn bad_ascii_token() {
        let result = parse(
            r#"<GridFile version="1.0" byte_order="LittleEndian">
                <Variables>
                    <DataArray type="Int32" Name="ny" Shape="" format="ascii">1.5</DataArray>
                </Variables>
            </GridFile>"#,
        );

        assert!(matches!(
            result,
            Err(Error::Parse(error::ParseError::Variables(
                error::Variables::InlineAsciiArray(_)
            )))
        ));
    }

    #[test]
    fn missing_shape_attribute() {
        let result = parse(
            r#"<GridFile version="1.0" byte_order="LittleEndian">
                <Variables>
                    <DataArray type="Int32" Name="ny" format="ascii">1</DataArray>
                </Variables>
            </GridFile>"#,
        );

        assert!(matches!(
            result,
            Err(Error::Parse(error::ParseError::Variables(
                error::Variables::MissingAttribute(_)
            )))
        ));
    }

    #[test]
    fn empty_array_element() {
        let source = parse(
            r#"<GridFile version="1.0" byte_order="LittleEndian">
                <Variables>
                    <DataArray type="Float64" Name="none" Shape="0 4" format="ascii"/>
                </Variables>
            </GridFile>"#,
        )
        .unwrap();

        assert_eq!(source.size("none"), vec![0, 4]);
    }
}
