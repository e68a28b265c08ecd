pub mod attribution;
pub mod config;
pub mod error;
pub mod export;
pub mod lead;
pub mod store;
