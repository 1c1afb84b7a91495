pub mod cors;
pub mod logger;
pub mod settings;
pub mod storage;
