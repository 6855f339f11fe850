pub mod api;
pub mod config;
pub mod error;
pub mod index;
pub mod metrics;
pub mod models;
pub mod postings;
pub mod search;
pub mod text;
pub mod trie;

pub use api::{create_router, AppState};
pub use config::{IndexConfig, ServerConfig};
pub use error::{FerretError, Result};
pub use index::{json_extractor, ContentExtractor, IndexBuilder, Indexer};
pub use metrics::SearchMetrics;
pub use models::{DocId, IndexedTerm, JsonDocuments};
pub use search::SearchIndex;
pub use trie::{ConcurrentTrieBuilder, TrieBuilder, TrieReader};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
