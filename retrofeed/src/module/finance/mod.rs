///! Market data from the Yahoo Finance chart API

pub mod client;
pub mod parser;

pub use client::YahooFinance;
