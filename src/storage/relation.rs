use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{BlockId, RecordId, error::Result, row::Row};

/// Address of one stored row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Handle {
    pub block_id: BlockId,
    pub record_id: RecordId,
}

impl Handle {
    pub fn new(block_id: BlockId, record_id: RecordId) -> Self {
        Self {
            block_id,
            record_id,
        }
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.block_id, self.record_id)
    }
}

/// Table access method as seen by the SQL layer.
pub trait Relation {
    fn create(&mut self) -> Result<()>;
    fn create_if_not_exists(&mut self) -> Result<()>;
    fn drop(&mut self) -> Result<()>;
    fn open(&mut self) -> Result<()>;
    fn close(&mut self) -> Result<()>;

    fn insert(&mut self, row: &Row) -> Result<Handle>;
    fn update(&mut self, handle: Handle, new_values: &Row) -> Result<()>;
    fn del(&mut self, handle: Handle) -> Result<()>;

    /// Every live row, ordered by block id then record id.
    fn select(&mut self) -> Result<Vec<Handle>>;
    /// Rows whose columns equal those given in `predicate`.
    fn select_where(&mut self, predicate: &Row) -> Result<Vec<Handle>>;

    fn project(&mut self, handle: Handle) -> Result<Row>;
    fn project_columns(&mut self, handle: Handle, column_names: &[&str]) -> Result<Row>;
}
