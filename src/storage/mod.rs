pub mod block_store;
pub mod heap_file;
pub mod heap_table;
pub mod relation;
pub mod schema;
