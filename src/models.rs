use std::collections::BTreeMap;

/// External document identifier. Strictly positive by contract; zero is
/// rejected at the indexing boundary.
pub type DocId = u64;

/// Raw documents retained by `load_and_index_json_stream`, keyed by id.
/// A `BTreeMap` so enumeration without an id filter is ascending.
pub type JsonDocuments = BTreeMap<DocId, Vec<u8>>;

/// A term together with its canonical postings, as produced by an indexer
/// shard once finished.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexedTerm {
    /// Normalized token.
    pub term: String,
    /// Sorted, deduplicated document ids.
    pub postings: Vec<DocId>,
    /// Raw occurrence count before dedup. Informational; not serialized.
    pub occurrences: usize,
}

impl IndexedTerm {
    pub fn new(term: impl Into<String>, postings: Vec<DocId>, occurrences: usize) -> Self {
        Self {
            term: term.into(),
            postings,
            occurrences,
        }
    }
}
