use std::collections::VecDeque;

use crate::{
    storage::{block_store::BlockStore, heap_file::HeapFile, relation::Handle},
    types::{BlockId, error::DatabaseError},
};

pub trait Scanner {
    fn scan(&mut self) -> Result<Option<Handle>, DatabaseError>;
    fn reset(&mut self);
}

/// Walks a heap file block by block, yielding the live records of each block
/// in record id order. The set of blocks is fixed when the scanner is built.
pub struct HeapScanner<'a, S: BlockStore> {
    file: &'a mut HeapFile<S>,
    block_ids: Vec<BlockId>,
    next_block: usize,
    pending: VecDeque<Handle>,
}

impl<'a, S: BlockStore> HeapScanner<'a, S> {
    pub fn new(file: &'a mut HeapFile<S>) -> Self {
        let block_ids = file.block_ids();
        Self {
            file,
            block_ids,
            next_block: 0,
            pending: VecDeque::new(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.pending.is_empty() && self.next_block >= self.block_ids.len()
    }
}

impl<S: BlockStore> Scanner for HeapScanner<'_, S> {
    fn scan(&mut self) -> Result<Option<Handle>, DatabaseError> {
        loop {
            if let Some(handle) = self.pending.pop_front() {
                return Ok(Some(handle));
            }
            let Some(&block_id) = self.block_ids.get(self.next_block) else {
                return Ok(None);
            };
            self.next_block += 1;

            let page = self.file.get(block_id)?;
            self.pending.extend(
                page.ids()
                    .into_iter()
                    .map(|record_id| Handle::new(block_id, record_id)),
            );
        }
    }

    fn reset(&mut self) {
        self.next_block = 0;
        self.pending.clear();
    }
}

pub struct ScanIterator<S: Scanner> {
    scanner: S,
}

impl<S: Scanner> ScanIterator<S> {
    pub fn new(scanner: S) -> Self {
        Self { scanner }
    }
}

impl<S: Scanner> Iterator for ScanIterator<S> {
    type Item = Result<Handle, DatabaseError>;
    fn next(&mut self) -> Option<Self::Item> {
        match self.scanner.scan() {
            Ok(Some(handle)) => Some(Ok(handle)),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}
