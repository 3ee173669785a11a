//! 商品登録ウィザード CLI

pub mod autosave;
pub mod cli;
pub mod config;
pub mod error;
pub mod interactive;
pub mod media;
pub mod sku;
pub mod storage;
pub mod terminal;
pub mod transport;
