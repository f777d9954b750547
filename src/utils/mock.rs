use std::{io, path::Path};

use tempfile::TempDir;

use crate::{
    config::StorageConfig,
    storage::{
        block_store::BlockStore, heap_file::HeapFile, heap_table::HeapTable, schema::TableSchema,
    },
    types::{
        BlockId,
        error::{DatabaseError, Result},
    },
};

/// A data directory that is deleted together with everything in it on drop.
pub struct TempStorage {
    pub dir: TempDir,
    pub config: StorageConfig,
}

impl TempStorage {
    pub fn new() -> io::Result<Self> {
        Self::with_prefix("tumpuk_test")
    }

    pub fn with_prefix(prefix: &str) -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix(prefix).tempdir()?;
        let config = StorageConfig::with_data_dir(dir.path());
        Ok(Self { dir, config })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn heap_file(&self, name: &str) -> HeapFile {
        HeapFile::new(&self.config, name)
    }

    pub fn heap_table(&self, schema: TableSchema) -> HeapTable {
        HeapTable::new(&self.config, schema)
    }
}

/// Block store kept entirely in memory, with the same contract as a file.
#[derive(Debug, Default)]
pub struct MemoryBlockStore {
    blocks: Option<Vec<Vec<u8>>>,
    is_open: bool,
    record_length: usize,
}

impl MemoryBlockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exists(&self) -> bool {
        self.blocks.is_some()
    }

    fn blocks_mut(&mut self) -> Result<&mut Vec<Vec<u8>>> {
        match (&mut self.blocks, self.is_open) {
            (Some(blocks), true) => Ok(blocks),
            _ => Err(DatabaseError::FileClosed {
                name: "memory".to_string(),
            }),
        }
    }
}

impl BlockStore for MemoryBlockStore {
    fn open(&mut self, create: bool, record_length: usize) -> Result<()> {
        match (create, self.blocks.is_some()) {
            (true, true) => {
                return Err(io::Error::new(io::ErrorKind::AlreadyExists, "store already exists").into());
            }
            (false, false) => {
                return Err(io::Error::new(io::ErrorKind::NotFound, "store does not exist").into());
            }
            (true, false) => self.blocks = Some(Vec::new()),
            (false, true) => {}
        }
        self.is_open = true;
        self.record_length = record_length;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.is_open = false;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.is_open
    }

    fn get(&mut self, block_id: BlockId) -> Result<Vec<u8>> {
        let blocks = self.blocks_mut()?;
        block_id
            .checked_sub(1)
            .and_then(|index| blocks.get(index as usize))
            .cloned()
            .ok_or(DatabaseError::BlockNotFound { block_id })
    }

    fn put(&mut self, block_id: BlockId, data: &[u8]) -> Result<()> {
        let record_length = self.record_length;
        if data.len() != record_length {
            return Err(DatabaseError::InvalidBlockSize {
                expected: record_length,
                actual: data.len(),
            });
        }
        if block_id == 0 {
            return Err(DatabaseError::BlockNotFound { block_id });
        }
        let blocks = self.blocks_mut()?;
        let index = block_id as usize - 1;
        if index >= blocks.len() {
            blocks.resize(index + 1, vec![0u8; record_length]);
        }
        blocks[index] = data.to_vec();
        Ok(())
    }

    fn remove(&mut self) -> Result<()> {
        if self.blocks.take().is_none() {
            return Err(io::Error::new(io::ErrorKind::NotFound, "store does not exist").into());
        }
        self.is_open = false;
        Ok(())
    }

    fn stat(&mut self) -> Result<u32> {
        Ok(self.blocks_mut()?.len() as u32)
    }
}
