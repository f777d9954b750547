use std::{
    fs::{self, File, OpenOptions},
    io::{Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};

use log::debug;

use crate::types::{
    BlockId,
    error::{DatabaseError, Result},
};

/// Durable storage of fixed-length records addressed by 1-based sequential ids.
pub trait BlockStore {
    /// Open the store. With `create` set the store must not exist yet.
    fn open(&mut self, create: bool, record_length: usize) -> Result<()>;
    fn close(&mut self) -> Result<()>;
    fn is_open(&self) -> bool;
    fn get(&mut self, block_id: BlockId) -> Result<Vec<u8>>;
    fn put(&mut self, block_id: BlockId, data: &[u8]) -> Result<()>;
    /// Close and permanently delete the store.
    fn remove(&mut self) -> Result<()>;
    /// Number of records currently stored.
    fn stat(&mut self) -> Result<u32>;
}

/// A flat file of fixed-length records; block `n` starts at `(n - 1) * record_length`.
pub struct FileBlockStore {
    path: PathBuf,
    file: Option<File>,
    record_length: usize,
    fsync_enabled: bool,
}

impl FileBlockStore {
    pub fn new<P: AsRef<Path>>(path: P, fsync_enabled: bool) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            file: None,
            record_length: 0,
            fsync_enabled,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn block_offset(&self, block_id: BlockId) -> u64 {
        (block_id as u64 - 1) * self.record_length as u64
    }

    fn file_mut(&mut self) -> Result<&mut File> {
        let path = &self.path;
        self.file.as_mut().ok_or_else(|| DatabaseError::FileClosed {
            name: path.display().to_string(),
        })
    }
}

impl BlockStore for FileBlockStore {
    fn open(&mut self, create: bool, record_length: usize) -> Result<()> {
        let file = if create {
            if let Some(dir) = self.path.parent() {
                fs::create_dir_all(dir)?;
            }
            debug!("Creating block store at {}", self.path.display());
            OpenOptions::new()
                .read(true)
                .write(true)
                .create_new(true)
                .open(&self.path)?
        } else {
            debug!("Opening block store at {}", self.path.display());
            OpenOptions::new().read(true).write(true).open(&self.path)?
        };
        self.file = Some(file);
        self.record_length = record_length;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if let Some(file) = self.file.take() {
            if self.fsync_enabled {
                file.sync_all()?;
            }
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.file.is_some()
    }

    fn get(&mut self, block_id: BlockId) -> Result<Vec<u8>> {
        if block_id == 0 || block_id > self.stat()? {
            return Err(DatabaseError::BlockNotFound { block_id });
        }
        let offset = self.block_offset(block_id);
        let mut buffer = vec![0u8; self.record_length];
        let file = self.file_mut()?;
        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(&mut buffer)?;
        Ok(buffer)
    }

    fn put(&mut self, block_id: BlockId, data: &[u8]) -> Result<()> {
        if data.len() != self.record_length {
            return Err(DatabaseError::InvalidBlockSize {
                expected: self.record_length,
                actual: data.len(),
            });
        }
        if block_id == 0 {
            return Err(DatabaseError::BlockNotFound { block_id });
        }
        let offset = self.block_offset(block_id);
        let fsync_enabled = self.fsync_enabled;
        let file = self.file_mut()?;
        file.seek(SeekFrom::Start(offset))?;
        file.write_all(data)?;
        if fsync_enabled {
            file.sync_data()?;
        }
        Ok(())
    }

    fn remove(&mut self) -> Result<()> {
        self.close()?;
        debug!("Removing block store at {}", self.path.display());
        fs::remove_file(&self.path)?;
        Ok(())
    }

    fn stat(&mut self) -> Result<u32> {
        let record_length = self.record_length as u64;
        let file = self.file_mut()?;
        let length = file.metadata()?.len();
        if record_length == 0 {
            return Ok(0);
        }
        Ok((length / record_length) as u32)
    }
}
