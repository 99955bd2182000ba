//! Record retrieval for one window
//!
//! - [`filter`]: the `created` range expression sent with the first page
//! - [`paginator`]: follows `Link` headers until the listing is exhausted

pub mod filter;
pub mod paginator;

pub use filter::created_filter;
pub use paginator::{FetchOutcome, Paginator};
