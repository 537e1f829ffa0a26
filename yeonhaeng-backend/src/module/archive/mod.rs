//! ITKC archive search module
//!
//! Builds relay-wrapped search requests, parses the XML response into
//! records, and accumulates pages into a single `QueryState`.

pub mod error;
pub mod types;
pub mod request;
pub mod parser;
pub mod client;
pub mod pipeline;

pub use client::{RelayClient, SearchSource};
pub use error::{SearchError, FAILURE_MESSAGE};
pub use pipeline::{QueryPipeline, SearchTask};
pub use request::SearchQuery;
pub use types::{Commit, QueryState, RequestTicket, SearchPage};
