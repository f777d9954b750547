use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    storage::schema::ColumnSchema,
    types::{
        Identifier,
        codec::{read_i32, read_u16},
        error::{DatabaseError, Result},
        value::{DataType, Value},
    },
};

/// Column name to value mapping. Keeps insertion order, compares as a map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Row {
    entries: Vec<(Identifier, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn with(mut self, column: impl Into<Identifier>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    /// Set a column, returning the value it replaced.
    pub fn insert(&mut self, column: impl Into<Identifier>, value: impl Into<Value>) -> Option<Value> {
        let column = column.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| *name == column) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((column, value));
                None
            }
        }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn contains_column(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Encode the columns in declared order: INT as 4 bytes, TEXT as a 2 byte
    /// length followed by the raw bytes. No padding, no null markers.
    pub fn to_bytes(&self, columns: &[ColumnSchema]) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();

        for column in columns {
            let value = self.get(&column.name).ok_or_else(|| DatabaseError::MissingColumn {
                name: column.name.clone(),
            })?;

            match (column.data_type, value) {
                (DataType::Int, Value::Integer(n)) => {
                    buffer.extend_from_slice(&n.to_ne_bytes());
                }
                (DataType::Text, Value::Text(s)) => {
                    let length = u16::try_from(s.len()).map_err(|_| DatabaseError::ValueTooLarge {
                        column: column.name.clone(),
                        size: s.len(),
                    })?;
                    buffer.extend_from_slice(&length.to_ne_bytes());
                    buffer.extend_from_slice(s.as_bytes());
                }
                (DataType::Double, _) => {
                    return Err(DatabaseError::UnsupportedType {
                        column: column.name.clone(),
                        data_type: column.data_type.to_string(),
                    });
                }
                (expected, actual) => {
                    return Err(DatabaseError::TypeMismatch {
                        column: column.name.clone(),
                        expected: expected.to_string(),
                        actual: actual.data_type().to_string(),
                    });
                }
            }
        }

        Ok(buffer)
    }

    pub fn from_bytes(bytes: &[u8], columns: &[ColumnSchema]) -> Result<Self> {
        let mut row = Row::new();
        let mut cursor = 0;

        for column in columns {
            let value = match column.data_type {
                DataType::Int => {
                    Self::ensure_remaining(bytes, cursor, 4, &column.name)?;
                    let n = read_i32(bytes, cursor);
                    cursor += 4;
                    Value::Integer(n)
                }
                DataType::Text => {
                    Self::ensure_remaining(bytes, cursor, 2, &column.name)?;
                    let length = read_u16(bytes, cursor) as usize;
                    cursor += 2;
                    Self::ensure_remaining(bytes, cursor, length, &column.name)?;
                    let text = String::from_utf8(bytes[cursor..cursor + length].to_vec()).map_err(|e| {
                        DatabaseError::SerializationError {
                            details: format!("column '{}' is not valid text: {}", column.name, e),
                        }
                    })?;
                    cursor += length;
                    Value::Text(text)
                }
                DataType::Double => {
                    return Err(DatabaseError::UnsupportedType {
                        column: column.name.clone(),
                        data_type: column.data_type.to_string(),
                    });
                }
            };
            row.entries.push((column.name.clone(), value));
        }

        Ok(row)
    }

    fn ensure_remaining(bytes: &[u8], cursor: usize, needed: usize, column: &str) -> Result<()> {
        if cursor + needed > bytes.len() {
            return Err(DatabaseError::SerializationError {
                details: format!(
                    "record ends at byte {} while reading column '{}' (needed {} more bytes)",
                    bytes.len(),
                    column,
                    cursor + needed - bytes.len()
                ),
            });
        }
        Ok(())
    }
}

impl PartialEq for Row {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(name, value)| other.get(name) == Some(value))
    }
}

impl FromIterator<(Identifier, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (Identifier, Value)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (name, value) in iter {
            row.insert(name, value);
        }
        row
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", name, value)?;
        }
        write!(f, "}}")
    }
}
