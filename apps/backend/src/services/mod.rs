pub mod loader;
pub mod storage;
