pub mod logger;
pub mod mock;
