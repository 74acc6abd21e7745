use super::{CodecError, Field, FieldTag};

/// Strict-order walker over the fields of a decoded [`Payload`](super::Payload)
///
/// Borrows the payload; each structural decoder drives its own cursor.
#[derive(Debug, Clone)]
pub struct FieldCursor<'a> {
    fields: &'a [Field],
    position: usize,
}

impl<'a> FieldCursor<'a> {
    pub fn new(fields: &'a [Field]) -> Self {
        Self {
            fields,
            position: 0,
        }
    }

    /// Look at the next field without consuming it
    pub fn peek(&self) -> Option<&'a Field> {
        self.fields.get(self.position)
    }

    /// Consume the next field, whatever its tag
    pub fn next_field(&mut self) -> Result<&'a Field, CodecError> {
        let field = self.peek().ok_or(CodecError::Exhausted)?;
        self.position += 1;
        Ok(field)
    }

    /// Consume the next field, which must carry `required`
    pub fn next_tagged(&mut self, required: FieldTag) -> Result<&'a Field, CodecError> {
        let field = self
            .peek()
            .ok_or(CodecError::MissingField { required })?;
        if field.tag() != required {
            return Err(CodecError::UnexpectedFieldTag {
                found: field.tag(),
                required,
            });
        }
        self.position += 1;
        Ok(field)
    }

    /// Consume the next field only if it carries `tag`
    pub fn next_if(&mut self, tag: FieldTag) -> Option<&'a Field> {
        let field = self.peek().filter(|field| field.tag() == tag)?;
        self.position += 1;
        Some(field)
    }

    /// Number of fields consumed so far
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.fields.len() - self.position
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }
}
