pub mod codec;
pub mod error;
pub mod page;
pub mod row;
pub mod value;

// Common type aliases
pub type BlockId = u32;
pub type RecordId = u16;
pub type Identifier = String;

// Size of every block handed to and from the block store
pub const BLOCK_SIZE: usize = 4096;

pub const PAGE_HEADER_SIZE: usize = 4; // num_records(2) + end_free(2)
pub const SLOT_DIRECTORY_ENTRY_SIZE: usize = 4; // size (2 bytes) + location (2 bytes)
