use log::{debug, info, warn};

use crate::{
    config::StorageConfig,
    storage::block_store::{BlockStore, FileBlockStore},
    types::{
        BLOCK_SIZE, BlockId, Identifier,
        error::{DatabaseError, Result},
        page::SlottedPage,
    },
};

/// The blocks of one table, in allocation order.
///
/// Starts out closed. `create` and `open` open it, `close` and `drop` close
/// it again; every block access requires it to be open. Pages handed out by
/// `get`/`get_new` are copies: changes only reach the store through `put`.
pub struct HeapFile<S: BlockStore = FileBlockStore> {
    name: Identifier,
    store: S,
    last: BlockId,
    closed: bool,
}

impl HeapFile<FileBlockStore> {
    pub fn new(config: &StorageConfig, name: &str) -> Self {
        let store = FileBlockStore::new(config.table_path(name), config.fsync_enabled);
        Self::with_store(name, store)
    }
}

impl<S: BlockStore> HeapFile<S> {
    pub fn with_store(name: impl Into<Identifier>, store: S) -> Self {
        Self {
            name: name.into(),
            store,
            last: 0,
            closed: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_open(&self) -> bool {
        !self.closed
    }

    /// Highest allocated block id, 0 before the first allocation.
    pub fn last(&self) -> BlockId {
        self.last
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create the underlying store and its first block. Fails if it already exists.
    pub fn create(&mut self) -> Result<()> {
        self.store.open(true, BLOCK_SIZE)?;
        self.closed = false;
        self.last = 0;
        if let Err(e) = self.get_new().and_then(|page| self.put(&page)) {
            self.closed = true;
            self.last = 0;
            if let Err(close_err) = self.store.close() {
                warn!("Closing heap file '{}' after a failed create: {}", self.name, close_err);
            }
            return Err(e);
        }
        info!("Created heap file '{}'", self.name);
        Ok(())
    }

    pub fn create_if_not_exists(&mut self) -> Result<()> {
        match self.open() {
            Ok(()) => Ok(()),
            Err(e) => {
                debug!("Heap file '{}' could not be opened ({}), creating it", self.name, e);
                self.create()
            }
        }
    }

    pub fn open(&mut self) -> Result<()> {
        if !self.closed {
            return Ok(());
        }
        self.store.open(false, BLOCK_SIZE)?;
        self.last = self.store.stat()?;
        self.closed = false;
        debug!("Opened heap file '{}' with {} blocks", self.name, self.last);
        Ok(())
    }

    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.store.close()?;
        self.closed = true;
        debug!("Closed heap file '{}'", self.name);
        Ok(())
    }

    /// Close the file and delete its storage for good.
    pub fn drop(&mut self) -> Result<()> {
        self.close()?;
        self.store.remove()?;
        self.last = 0;
        info!("Dropped heap file '{}'", self.name);
        Ok(())
    }

    pub fn get(&mut self, block_id: BlockId) -> Result<SlottedPage> {
        self.ensure_open()?;
        let data = self.store.get(block_id)?;
        SlottedPage::new(data, block_id, false)
    }

    /// Allocate the next block id and return an empty page for it.
    pub fn get_new(&mut self) -> Result<SlottedPage> {
        self.ensure_open()?;
        let block_id = self.last + 1;
        self.store.put(block_id, &vec![0u8; BLOCK_SIZE])?;
        self.last = block_id;
        // Read it back so the page works on what the store holds
        let data = self.store.get(block_id)?;
        debug!("Allocated block {} in heap file '{}'", block_id, self.name);
        SlottedPage::new(data, block_id, true)
    }

    /// Write a page back to the store.
    pub fn put(&mut self, page: &SlottedPage) -> Result<()> {
        self.ensure_open()?;
        self.store.put(page.block_id(), page.data())
    }

    pub fn block_ids(&self) -> Vec<BlockId> {
        (1..=self.last).collect()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(DatabaseError::FileClosed {
                name: self.name.clone(),
            });
        }
        Ok(())
    }
}
