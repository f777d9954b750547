use std::io;

use tumpuk::{
    storage::{block_store::BlockStore, heap_file::HeapFile},
    types::{
        BLOCK_SIZE, BlockId,
        error::{DatabaseError, Result},
    },
    utils::mock::{MemoryBlockStore, TempStorage},
};

/// Opens like a memory store but refuses every write.
#[derive(Default)]
struct ReadOnlyStore {
    inner: MemoryBlockStore,
}

impl BlockStore for ReadOnlyStore {
    fn open(&mut self, create: bool, record_length: usize) -> Result<()> {
        self.inner.open(create, record_length)
    }

    fn close(&mut self) -> Result<()> {
        self.inner.close()
    }

    fn is_open(&self) -> bool {
        self.inner.is_open()
    }

    fn get(&mut self, block_id: BlockId) -> Result<Vec<u8>> {
        self.inner.get(block_id)
    }

    fn put(&mut self, _block_id: BlockId, _data: &[u8]) -> Result<()> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only store").into())
    }

    fn remove(&mut self) -> Result<()> {
        self.inner.remove()
    }

    fn stat(&mut self) -> Result<u32> {
        self.inner.stat()
    }
}

#[test]
fn test_create_allocates_first_block() {
    let temp = TempStorage::with_prefix("heap_create").unwrap();
    let mut file = temp.heap_file("users");

    assert!(!file.is_open());
    file.create().unwrap();

    assert!(file.is_open());
    assert_eq!(file.last(), 1);
    assert_eq!(file.block_ids(), vec![1]);
    assert!(temp.config.table_path("users").exists());

    let page = file.get(1).unwrap();
    assert_eq!(page.num_records(), 0);
    assert_eq!(page.end_free(), (BLOCK_SIZE - 1) as u16);
}

#[test]
fn test_create_fails_when_exists() {
    let temp = TempStorage::with_prefix("heap_exists").unwrap();
    let mut file = temp.heap_file("dup");
    file.create().unwrap();
    file.close().unwrap();

    let mut again = temp.heap_file("dup");
    assert!(matches!(again.create(), Err(DatabaseError::Io(_))));
}

#[test]
fn test_open_missing_fails() {
    let temp = TempStorage::with_prefix("heap_missing").unwrap();
    let mut file = temp.heap_file("nothing");

    assert!(matches!(file.open(), Err(DatabaseError::Io(_))));
    assert!(!file.is_open());
}

#[test]
fn test_create_if_not_exists_opens_existing() {
    let temp = TempStorage::with_prefix("heap_cine").unwrap();
    {
        let mut file = temp.heap_file("t");
        file.create_if_not_exists().unwrap();
        file.get_new().unwrap();
        file.get_new().unwrap();
        assert_eq!(file.last(), 3);
        file.close().unwrap();
    }

    let mut file = temp.heap_file("t");
    file.create_if_not_exists().unwrap();
    assert_eq!(file.block_ids(), vec![1, 2, 3]);
}

#[test]
fn test_get_new_and_put_persist() {
    let temp = TempStorage::with_prefix("heap_put").unwrap();
    {
        let mut file = temp.heap_file("t");
        file.create().unwrap();

        let mut page = file.get_new().unwrap();
        assert_eq!(page.block_id(), 2);
        page.add(b"persist me").unwrap();
        file.put(&page).unwrap();

        // Changes that are never put stay in memory only
        let mut first = file.get(1).unwrap();
        first.add(b"lost").unwrap();
        file.close().unwrap();
    }

    let mut file = temp.heap_file("t");
    file.open().unwrap();
    assert_eq!(file.block_ids(), vec![1, 2]);
    assert_eq!(file.get(2).unwrap().get(1), Some(&b"persist me"[..]));
    assert!(file.get(1).unwrap().ids().is_empty());
}

#[test]
fn test_open_and_close_are_idempotent() {
    let mut file = HeapFile::with_store("mem", MemoryBlockStore::new());
    file.create().unwrap();
    file.get_new().unwrap();

    file.open().unwrap();
    assert_eq!(file.last(), 2);

    file.close().unwrap();
    file.close().unwrap();
    assert!(!file.is_open());

    file.open().unwrap();
    file.open().unwrap();
    assert_eq!(file.last(), 2);
}

#[test]
fn test_access_while_closed_fails() {
    let mut file = HeapFile::with_store("mem", MemoryBlockStore::new());
    file.create().unwrap();
    file.close().unwrap();

    match file.get(1) {
        Err(DatabaseError::FileClosed { name }) => assert_eq!(name, "mem"),
        other => panic!("Expected FileClosed, got {:?}", other.map(|p| p.block_id())),
    }
    assert!(matches!(file.get_new(), Err(DatabaseError::FileClosed { .. })));
}

#[test]
fn test_get_unallocated_block() {
    let mut file = HeapFile::with_store("mem", MemoryBlockStore::new());
    file.create().unwrap();

    assert!(matches!(
        file.get(9),
        Err(DatabaseError::BlockNotFound { block_id: 9 })
    ));
}

#[test]
fn test_drop_removes_storage() {
    let temp = TempStorage::with_prefix("heap_drop").unwrap();
    let mut file = temp.heap_file("gone");
    file.create().unwrap();
    let path = temp.config.table_path("gone");
    assert!(path.exists());

    file.drop().unwrap();

    assert!(!path.exists());
    assert!(!file.is_open());
    assert!(file.block_ids().is_empty());

    file.create_if_not_exists().unwrap();
    assert_eq!(file.block_ids(), vec![1]);
}

#[test]
fn test_failed_create_leaves_file_closed() {
    let mut file = HeapFile::with_store("blocked", ReadOnlyStore::default());

    assert!(matches!(file.create(), Err(DatabaseError::Io(_))));

    assert!(!file.is_open());
    assert!(!file.store().is_open());
    assert_eq!(file.last(), 0);
    assert!(file.block_ids().is_empty());
    assert!(matches!(file.get_new(), Err(DatabaseError::FileClosed { .. })));
}
