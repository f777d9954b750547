use log::debug;

use crate::{
    config::StorageConfig,
    executor::scan::{HeapScanner, ScanIterator},
    storage::{
        block_store::{BlockStore, FileBlockStore},
        heap_file::HeapFile,
        relation::{Handle, Relation},
        schema::TableSchema,
    },
    types::{
        error::{DatabaseError, Result},
        page::SlottedPage,
        row::Row,
    },
};

/// Heap-organised table: rows appended to the last block, no ordering, no index.
pub struct HeapTable<S: BlockStore = FileBlockStore> {
    schema: TableSchema,
    file: HeapFile<S>,
}

impl HeapTable<FileBlockStore> {
    pub fn new(config: &StorageConfig, schema: TableSchema) -> Self {
        let file = HeapFile::new(config, &schema.table_name);
        Self { schema, file }
    }
}

impl<S: BlockStore> HeapTable<S> {
    pub fn with_store(schema: TableSchema, store: S) -> Self {
        let file = HeapFile::with_store(schema.table_name.clone(), store);
        Self { schema, file }
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub fn table_name(&self) -> &str {
        &self.schema.table_name
    }

    pub fn file(&self) -> &HeapFile<S> {
        &self.file
    }

    /// Return the row restricted to the declared columns, in declared order.
    pub fn validate(&self, row: &Row) -> Result<Row> {
        self.schema.validate_row(row)
    }

    /// Insert rows in order, stopping at the first failure.
    pub fn insert_batch(&mut self, rows: &[Row]) -> Result<Vec<Handle>> {
        rows.iter().map(|row| self.insert(row)).collect()
    }

    /// Lazily enumerate the handles `select` would return.
    pub fn scan(&mut self) -> Result<HeapScanner<'_, S>> {
        self.file.open()?;
        Ok(HeapScanner::new(&mut self.file))
    }

    fn marshal(&self, row: &Row) -> Result<Vec<u8>> {
        row.to_bytes(&self.schema.columns)
    }

    fn unmarshal(&self, data: &[u8]) -> Result<Row> {
        Row::from_bytes(data, &self.schema.columns)
    }

    /// Add the record to the last block, or to a fresh block when the last
    /// one is full. The fresh block is tried exactly once.
    fn append(&mut self, data: &[u8]) -> Result<Handle> {
        if data.len() > SlottedPage::max_record_size() {
            return Err(DatabaseError::RowTooLarge {
                size: data.len(),
                max: SlottedPage::max_record_size(),
            });
        }

        let mut page = match self.file.last() {
            0 => self.file.get_new()?,
            last => self.file.get(last)?,
        };

        let record_id = match page.add(data) {
            Ok(record_id) => record_id,
            Err(e) if e.is_recoverable() => {
                debug!(
                    "Block {} of '{}' is full, continuing in a new block",
                    page.block_id(),
                    self.schema.table_name
                );
                page = self.file.get_new()?;
                page.add(data).map_err(|e| match e {
                    DatabaseError::NoRoom { .. } => DatabaseError::RowTooLarge {
                        size: data.len(),
                        max: SlottedPage::max_record_size(),
                    },
                    other => other,
                })?
            }
            Err(e) => return Err(e),
        };

        self.file.put(&page)?;
        Ok(Handle::new(page.block_id(), record_id))
    }
}

impl<S: BlockStore> Relation for HeapTable<S> {
    fn create(&mut self) -> Result<()> {
        self.file.create()
    }

    fn create_if_not_exists(&mut self) -> Result<()> {
        self.file.create_if_not_exists()
    }

    fn drop(&mut self) -> Result<()> {
        self.file.drop()
    }

    fn open(&mut self) -> Result<()> {
        self.file.open()
    }

    fn close(&mut self) -> Result<()> {
        self.file.close()
    }

    fn insert(&mut self, row: &Row) -> Result<Handle> {
        self.file.open()?;
        let full_row = self.validate(row)?;
        let data = self.marshal(&full_row)?;
        self.append(&data)
    }

    // Must go through SlottedPage::put so the handle keeps its record id
    fn update(&mut self, _handle: Handle, _new_values: &Row) -> Result<()> {
        Err(DatabaseError::NotImplemented {
            operation: "HeapTable::update",
        })
    }

    // Must go through SlottedPage::del so no other record id moves
    fn del(&mut self, _handle: Handle) -> Result<()> {
        Err(DatabaseError::NotImplemented {
            operation: "HeapTable::del",
        })
    }

    fn select(&mut self) -> Result<Vec<Handle>> {
        let scanner = self.scan()?;
        ScanIterator::new(scanner).collect()
    }

    // Must filter the scan select() runs, projecting each handle and comparing the predicate's columns
    fn select_where(&mut self, _predicate: &Row) -> Result<Vec<Handle>> {
        Err(DatabaseError::NotImplemented {
            operation: "HeapTable::select_where",
        })
    }

    fn project(&mut self, handle: Handle) -> Result<Row> {
        self.file.open()?;
        let page = self.file.get(handle.block_id)?;
        let data = page.get(handle.record_id).ok_or(DatabaseError::RecordDeleted {
            block_id: handle.block_id,
            record_id: handle.record_id,
        })?;
        self.unmarshal(data)
    }

    fn project_columns(&mut self, handle: Handle, column_names: &[&str]) -> Result<Row> {
        if let Some(unknown) = column_names
            .iter()
            .find(|name| self.schema.get_column(name).is_none())
        {
            return Err(DatabaseError::ColumnNotFound {
                name: unknown.to_string(),
                table: self.schema.table_name.clone(),
            });
        }

        for (index, name) in column_names.iter().enumerate() {
            if column_names[..index].contains(name) {
                return Err(DatabaseError::DuplicateColumn {
                    name: name.to_string(),
                });
            }
        }

        let row = self.project(handle)?;
        let mut projected = Row::new();
        for name in column_names {
            if let Some(value) = row.get(name) {
                projected.insert(*name, value.clone());
            }
        }
        Ok(projected)
    }
}
