pub mod config_store;
pub mod defaults;
pub mod editor;
pub mod storage;
