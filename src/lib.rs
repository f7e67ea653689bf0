pub mod analysis;
pub mod analyzer;
pub mod classifier;
pub mod collect;
pub mod config;
pub mod discovery;
pub mod error;
pub mod event;
pub mod evidence;
pub mod runlog;
pub mod tracefile;
pub mod types;
pub mod utils;
