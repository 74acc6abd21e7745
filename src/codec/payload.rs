use super::binary::{BinaryRead, BinaryWrite};
use super::{
    length_header, optionally_strip_length_header, CodecError, Field, FieldCursor, FieldTag,
};
use std::io::Cursor;
use tracing::trace;

/// Ordered sequence of TLV fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload {
    fields: Vec<Field>,
}

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field carrying raw bytes
    pub fn push(&mut self, tag: FieldTag, data: impl Into<Vec<u8>>) {
        self.fields.push(Field::new(tag, data));
    }

    /// Append a field carrying a 4-byte little-endian integer
    pub fn push_u32(&mut self, tag: FieldTag, value: u32) {
        self.fields.push(Field::from_u32(tag, value));
    }

    pub fn push_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Move every field of `other` to the end of this payload
    pub fn append(&mut self, other: Payload) {
        self.fields.extend(other.fields);
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// First field carrying `tag`
    pub fn find(&self, tag: FieldTag) -> Option<&Field> {
        self.fields.iter().find(|field| field.tag() == tag)
    }

    /// Data of the first field carrying `tag`
    pub fn find_data(&self, tag: FieldTag) -> Option<&[u8]> {
        self.find(tag).map(Field::data)
    }

    /// Strict-order cursor over the fields
    pub fn cursor(&self) -> FieldCursor<'_> {
        FieldCursor::new(&self.fields)
    }

    /// Total serialized size in bytes
    pub fn serialized_size(&self) -> usize {
        self.fields.iter().map(BinaryWrite::serialized_size).sum()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.serialized_size());
        for field in &self.fields {
            field.write_into(&mut out);
        }
        out
    }

    /// Serialize and prefix with a 4-byte length header
    pub fn to_framed_bytes(&self) -> Vec<u8> {
        length_header(&self.to_bytes())
    }

    /// Decode fields until the input is exhausted
    ///
    /// An empty input yields an empty payload.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut reader = Cursor::new(bytes);
        let mut fields = Vec::new();
        while (reader.position() as usize) < bytes.len() {
            let offset = reader.position() as usize;
            let field = Field::read_from(&mut reader)
                .map_err(|err| CodecError::from_io(err, offset, bytes.len() - offset))?;
            fields.push(field);
        }
        trace!(fields = fields.len(), bytes = bytes.len(), "decoded payload");
        Ok(Self { fields })
    }

    /// Decode a message that may or may not carry a length header
    pub fn from_framed_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        Self::from_bytes(optionally_strip_length_header(bytes))
    }
}

impl From<Vec<Field>> for Payload {
    fn from(fields: Vec<Field>) -> Self {
        Self { fields }
    }
}

impl<'a> IntoIterator for &'a Payload {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
