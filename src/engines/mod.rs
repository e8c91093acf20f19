//! Search engine implementations.
//!
//! Each adapter owns its selector table, pagination policy and link
//! resolver, so a markup change on one engine only touches one file.

mod bing;
mod brave;
mod duckduckgo;
mod google;
mod yahoo;

pub use bing::Bing;
pub use brave::Brave;
pub use duckduckgo::DuckDuckGo;
pub use google::Google;
pub use yahoo::Yahoo;
