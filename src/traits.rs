//! # Traits
//!
//! Encoding traits used to write numeric arrays into the body of a `DataArray` element of a
//! grid file. Reading does not need these: the parser decides how to decode an array from the
//! `type` and `format` attributes of each element.

use crate::prelude::*;

/// the encoding to use when writing an inline dataarray
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// whitespace separated decimal numbers
    Ascii,
    /// base64 encoding of the little endian bytes of every element
    Base64,
}

impl Encoding {
    pub(crate) fn to_str(&self) -> &'static str {
        match &self {
            Self::Ascii => "ascii",
            Self::Base64 => "binary",
        }
    }
}

/// A flat numeric array that can be written to a grid file
pub trait Array {
    /// value of the `type` attribute of the `DataArray` element
    const TYPE_NAME: &'static str;

    /// the whitespace separated ascii text for the array body
    fn ascii_body(&self) -> String;

    /// the base64 text for the array body
    fn base64_body(&self) -> String;

    fn length(&self) -> usize;

    /// write the array body in the requested encoding
    fn write_body<W: Write>(&self, writer: &mut Writer<W>, encoding: Encoding) -> Result<(), Error> {
        let data = match encoding {
            Encoding::Ascii => self.ascii_body(),
            Encoding::Base64 => self.base64_body(),
        };

        writer.write_event(Event::Text(BytesText::new(&data)))?;

        Ok(())
    }
}

impl Array for [f64] {
    const TYPE_NAME: &'static str = "Float64";

    fn ascii_body(&self) -> String {
        let mut data = String::new();

        for float in self {
            let mut buffer = ryu::Buffer::new();
            data.push_str(buffer.format(*float));
            data.push(' ');
        }

        data.truncate(data.trim_end().len());
        data
    }

    fn base64_body(&self) -> String {
        let mut byte_data: Vec<u8> = Vec::with_capacity(self.len() * 8);

        self.iter()
            .for_each(|float| byte_data.extend_from_slice(&float.to_le_bytes()));

        base64::encode(byte_data.as_slice())
    }

    fn length(&self) -> usize {
        self.len()
    }
}

impl Array for [i32] {
    const TYPE_NAME: &'static str = "Int32";

    fn ascii_body(&self) -> String {
        self.iter()
            .map(|int| int.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn base64_body(&self) -> String {
        let mut byte_data: Vec<u8> = Vec::with_capacity(self.len() * 4);

        self.iter()
            .for_each(|int| byte_data.extend_from_slice(&int.to_le_bytes()));

        base64::encode(byte_data.as_slice())
    }

    fn length(&self) -> usize {
        self.len()
    }
}
