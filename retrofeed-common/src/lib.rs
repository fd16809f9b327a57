///! Shared snapshot types and data-source contracts
///!
///! Everything a feed needs to know about its data source lives here:
///! the snapshot records each source returns, and the async traits
///! the rendering engine calls during a refresh.

mod types;
pub use types::*;

mod source;
pub use source::{MarketSource, NewsSource, SightingSource, Sources, WeatherSource};
