///! Headlines from any RSS 2.0 feed

pub mod client;
pub mod parser;

pub use client::RssNews;
