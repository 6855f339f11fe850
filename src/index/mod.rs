//! Document ingestion: per-shard term accumulation and the builder that
//! dispatches documents, merges shard results, and serializes the trie.

mod builder;
mod extractor;
mod indexer;

pub use builder::IndexBuilder;
pub use extractor::{json_extractor, ContentExtractor};
pub use indexer::{InlineIndexer, Indexer, ThreadedIndexer};
