//! Container inventory API adapter
//!
//! The [`ListingTransport`] trait is the only seam between the extractor and
//! the network. [`HttpListingTransport`] implements it with reqwest.

pub mod client;
pub mod link;
mod transport;

pub use client::HttpListingTransport;
pub use link::next_page_url;
pub use transport::{ListingResponse, ListingTransport};
