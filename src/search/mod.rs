//! # Search Module
//!
//! In-memory keyword search over learning content. Every search is a linear
//! scan of the current content snapshot; there is no index to maintain.
//!
//! ## Key Components
//!
//! - [`scorer`] - Weighted substring and whole-word relevance scoring
//! - [`filter`] - Difficulty and tag filters, available filter values
//! - [`executor`] - Flattens content into candidates and ranks them
//! - [`snippet`] - Highlighted excerpts around the first match
//! - [`suggest`] - Title and tag suggestions for partial queries
//! - [`debounce`] - Debounced watch channels
//! - [`service`] - Reactive composition of query, filters and content
//! - [`config`] - Configuration constants and tunable weights

pub mod config;
pub mod debounce;
pub mod executor;
pub mod filter;
pub mod outputs;
pub mod scorer;
pub mod service;
pub mod snippet;
pub mod suggest;
pub mod types;

pub use config::{ScoreWeights, SearchConfig};
pub use executor::execute;
pub use scorer::relevance_score;
pub use service::{SearchResults, SearchService};
pub use snippet::generate_snippet;
pub use suggest::get_suggestions;
pub use types::{
    ContentType, FilterOptions, FilterUpdate, ModuleOption, SearchFilters, SearchResult,
};
