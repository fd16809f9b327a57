pub mod config;
pub mod display;
pub mod error;
pub mod feed;
pub mod logging;
pub mod module;
pub mod sequencer;
