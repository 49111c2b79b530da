use crate::prelude::*;
use crate::source::{MemorySource, StoredVariable, Values};

/// Write the variables and attributes of an in-memory source as a grid file, encoding every
/// array with `encoding`
pub fn write_grid_file<W: Write>(
    writer: W,
    source: &MemorySource,
    encoding: Encoding,
) -> Result<(), Error> {
    let mut writer = Writer::new_with_indent(writer, b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("GridFile");
    root.push_attribute(("version", "1.0"));
    root.push_attribute(("byte_order", "LittleEndian"));
    writer.write_event(Event::Start(root))?;

    writer.write_event(Event::Start(BytesStart::new("Attributes")))?;

    for (group, name, value) in source.attributes() {
        let mut attribute = BytesStart::new("Attribute");
        if !group.is_empty() {
            attribute.push_attribute(("Group", group));
        }
        attribute.push_attribute(("Name", name));
        attribute.push_attribute(("value", value));

        writer.write_event(Event::Empty(attribute))?;
    }

    writer.write_event(Event::End(BytesEnd::new("Attributes")))?;

    writer.write_event(Event::Start(BytesStart::new("Variables")))?;

    for (name, variable) in source.variables() {
        write_variable(&mut writer, name, variable, encoding)?;
    }

    writer.write_event(Event::End(BytesEnd::new("Variables")))?;

    writer.write_event(Event::End(BytesEnd::new("GridFile")))?;

    Ok(())
}

fn write_variable<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    variable: &StoredVariable,
    encoding: Encoding,
) -> Result<(), Error> {
    match variable.values() {
        Values::Int(values) => {
            write_inline_dataarray(writer, name, variable.shape(), values.as_slice(), encoding)
        }
        Values::Real(values) => {
            write_inline_dataarray(writer, name, variable.shape(), values.as_slice(), encoding)
        }
    }
}

/// write a single inline array, such as `dx`, to the grid file
pub(crate) fn write_inline_dataarray<W: Write, A: Array + ?Sized>(
    writer: &mut Writer<W>,
    name: &str,
    shape: &[usize],
    array: &A,
    encoding: Encoding,
) -> Result<(), Error> {
    let shape = shape
        .iter()
        .map(|x| x.to_string())
        .collect::<Vec<_>>()
        .join(" ");

    let mut start = BytesStart::new("DataArray");
    start.push_attribute(("type", A::TYPE_NAME));
    start.push_attribute(("Name", name));
    start.push_attribute(("Shape", shape.as_str()));
    start.push_attribute(("format", encoding.to_str()));

    if array.length() == 0 {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    array.write_body(writer, encoding)?;
    writer.write_event(Event::End(BytesEnd::new("DataArray")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::parse_xml_document;
    use crate::source::DataSource;
    use quick_xml::reader::Reader;

    fn sample_source() -> MemorySource {
        let mut source = MemorySource::new();
        source.add_int("nx", 4);
        source.add_real("zperiod_hint", 0.25);
        source
            .add_array("dx", &[2, 2], vec![0.1, 0.2, 0.3, 0.4])
            .unwrap();
        source.add_ints("empty", Vec::new());
        source.add_attribute("", "title", "<grid> \"one\"");
        source.add_attribute("dx", "units", "m");
        source
    }

    fn write_then_parse(encoding: Encoding) -> MemorySource {
        let source = sample_source();

        let mut output = Vec::new();
        write_grid_file(&mut output, &source, encoding).unwrap();

        let text = String::from_utf8(output).unwrap();
        parse_xml_document(Reader::from_str(&text)).unwrap()
    }

    #[test]
    fn ascii_document_layout() {
        let mut source = MemorySource::new();
        source.add_ints("jyseps", vec![1, 5]);

        let mut output = Vec::new();
        write_grid_file(&mut output, &source, Encoding::Ascii).unwrap();
        let text = String::from_utf8(output).unwrap();

        assert!(text.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(text.contains(r#"<GridFile version="1.0" byte_order="LittleEndian">"#));
        assert!(text.contains(
            r#"<DataArray type="Int32" Name="jyseps" Shape="2" format="ascii">1 5</DataArray>"#
        ));
    }

    #[test]
    fn every_encoding_reproduces_the_source() {
        for encoding in [Encoding::Ascii, Encoding::Base64] {
            let parsed = write_then_parse(encoding);
            let original = sample_source();

            for (name, variable) in original.variables() {
                assert_eq!(parsed.variable(name), Some(variable), "{name} ({encoding:?})");
            }

            assert_eq!(
                parsed.attribute("", "title").as_deref(),
                Some("<grid> \"one\"")
            );
            assert_eq!(parsed.attribute("dx", "units").as_deref(), Some("m"));
        }
    }
}
