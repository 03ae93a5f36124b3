//! Command implementations

pub mod cleanup;
pub mod compress;
pub mod config;
pub mod flush;
pub mod logs;
pub mod write;
