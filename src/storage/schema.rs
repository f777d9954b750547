use serde::{Deserialize, Serialize};

use crate::types::{
    Identifier,
    error::{DatabaseError, Result},
    row::Row,
    value::DataType,
};

/// Per-column attributes handed over by the catalog alongside the column names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnAttribute {
    pub data_type: DataType,
}

impl ColumnAttribute {
    pub fn new(data_type: DataType) -> Self {
        Self { data_type }
    }
}

/// Represents a column definition in a table schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: Identifier,
    pub data_type: DataType,
    pub position: usize,
}

impl ColumnSchema {
    pub fn new(name: Identifier, data_type: DataType, position: usize) -> Self {
        Self {
            name,
            data_type,
            position,
        }
    }
}

/// Represents a complete table schema with all column definitions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    pub table_name: Identifier,
    pub columns: Vec<ColumnSchema>,
}

impl TableSchema {
    pub fn new<N: Into<Identifier>>(
        table_name: impl Into<Identifier>,
        column_names: Vec<N>,
        column_attributes: Vec<ColumnAttribute>,
    ) -> Result<Self> {
        let table_name = table_name.into();
        if column_names.len() != column_attributes.len() {
            return Err(DatabaseError::SchemaMismatch {
                details: format!(
                    "table '{}' has {} column names but {} column attributes",
                    table_name,
                    column_names.len(),
                    column_attributes.len()
                ),
            });
        }

        let mut columns: Vec<ColumnSchema> = Vec::with_capacity(column_names.len());
        for (position, (name, attribute)) in column_names.into_iter().zip(column_attributes).enumerate() {
            let name = name.into();
            if columns.iter().any(|col| col.name == name) {
                return Err(DatabaseError::SchemaMismatch {
                    details: format!("duplicate column '{}' in table '{}'", name, table_name),
                });
            }
            columns.push(ColumnSchema::new(name, attribute.data_type, position));
        }

        Ok(Self {
            table_name,
            columns,
        })
    }

    /// Get column by name
    pub fn get_column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|col| col.name == name)
    }

    /// Get column index by name
    pub fn get_column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|col| col.name == name)
    }

    /// Get all column names in order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|col| col.name.as_str()).collect()
    }

    /// Check that every declared column is present and return exactly the
    /// declared columns in schema order. Keys the schema does not know are
    /// dropped, not rejected.
    pub fn validate_row(&self, row: &Row) -> Result<Row> {
        let mut full_row = Row::new();
        for column in &self.columns {
            let value = row.get(&column.name).ok_or_else(|| DatabaseError::MissingColumn {
                name: column.name.clone(),
            })?;
            full_row.insert(column.name.clone(), value.clone());
        }
        Ok(full_row)
    }
}
