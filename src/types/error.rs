use thiserror::Error;

use crate::types::{BlockId, RecordId};

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not enough room in block {block_id}: needed {needed} bytes, {available} available")]
    NoRoom {
        block_id: BlockId,
        needed: usize,
        available: usize,
    },

    #[error("{operation} is not implemented")]
    NotImplemented { operation: &'static str },

    #[error("Row is missing column '{name}'")]
    MissingColumn { name: String },

    #[error("Column '{column}' has unsupported data type {data_type}")]
    UnsupportedType { column: String, data_type: String },

    #[error("Type mismatch in column '{column}': expected {expected}, got {actual}")]
    TypeMismatch {
        column: String,
        expected: String,
        actual: String,
    },

    #[error("Column '{name}' not found in table '{table}'")]
    ColumnNotFound { name: String, table: String },

    #[error("Column '{name}' is listed more than once")]
    DuplicateColumn { name: String },

    #[error("Schema mismatch: {details}")]
    SchemaMismatch { details: String },

    #[error("Record {record_id} in block {block_id} has been deleted")]
    RecordDeleted {
        block_id: BlockId,
        record_id: RecordId,
    },

    #[error("Invalid record id {record_id} (max: {max})")]
    InvalidRecordId { record_id: RecordId, max: RecordId },

    #[error("Row of {size} bytes can never fit in a block (max: {max})")]
    RowTooLarge { size: usize, max: usize },

    #[error("Value of {size} bytes in column '{column}' is too long")]
    ValueTooLarge { column: String, size: usize },

    #[error("Serialization/deserialization error: {details}")]
    SerializationError { details: String },

    #[error("Block {block_id} not found")]
    BlockNotFound { block_id: BlockId },

    #[error("Invalid block size: {expected} bytes, got {actual} bytes")]
    InvalidBlockSize { expected: usize, actual: usize },

    #[error("'{name}' is not open")]
    FileClosed { name: String },
}

impl DatabaseError {
    /// Only a full block is worth retrying, and only somewhere else.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, DatabaseError::NoRoom { .. })
    }
}

pub type Result<T> = std::result::Result<T, DatabaseError>;
