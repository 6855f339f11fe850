//! Document dispatch across indexer shards and index serialization.

use std::io::{BufRead, Write};

use tracing::warn;

use super::extractor::ContentExtractor;
use super::indexer::{Indexer, InlineIndexer, ThreadedIndexer};
use crate::config::IndexConfig;
use crate::error::{FerretError, Result};
use crate::models::{DocId, JsonDocuments};
use crate::trie::TrieBuilder;

/// Collects documents, shards the tokenization work, and serializes the
/// resulting trie.
///
/// Documents are dispatched round-robin: document k goes to shard
/// `k mod N`. The builder is single-use; [`IndexBuilder::dump`] or
/// [`IndexBuilder::abort`] drains the shards.
pub struct IndexBuilder {
    shards: Vec<Box<dyn Indexer>>,
    document_count: usize,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self::with_config(&IndexConfig::default())
    }

    pub fn with_config(config: &IndexConfig) -> Self {
        let count = config.num_shards.max(1);
        let shards: Vec<Box<dyn Indexer>> = (0..count)
            .map(|_| -> Box<dyn Indexer> {
                if config.threaded {
                    Box::new(ThreadedIndexer::new(config.queue_capacity))
                } else {
                    Box::new(InlineIndexer::new())
                }
            })
            .collect();

        Self {
            shards,
            document_count: 0,
        }
    }

    /// Index one document. Adding the same id again unions the postings.
    pub fn add_document(&mut self, id: DocId, content: &str) {
        let k = self.next_shard();
        self.shards[k].add(id, content.as_bytes());
    }

    /// Dispatch raw bytes; the extractor runs inside the shard.
    pub fn add_json_document(&mut self, raw: Vec<u8>, extractor: ContentExtractor) {
        let k = self.next_shard();
        self.shards[k].add_raw(raw, extractor);
    }

    /// Index every non-empty line of a line-delimited JSON stream.
    ///
    /// Per-line extraction failures are captured inside the shards and do
    /// not stop the stream; a read error is fatal. Returns the number of
    /// lines dispatched.
    pub fn index_json_stream<R: BufRead>(
        &mut self,
        reader: R,
        extractor: ContentExtractor,
    ) -> Result<usize> {
        let mut num_lines = 0;
        for line in reader.lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            num_lines += 1;
            self.add_json_document(line.into_bytes(), extractor.clone());
        }
        Ok(num_lines)
    }

    /// Like [`Self::index_json_stream`], additionally retaining the raw
    /// bytes of every document keyed by id.
    ///
    /// Extraction happens up front here, so the first extractor failure
    /// is fatal, as is a duplicate document id.
    pub fn load_and_index_json_stream<R: BufRead>(
        &mut self,
        reader: R,
        extractor: ContentExtractor,
    ) -> Result<JsonDocuments> {
        let mut documents = JsonDocuments::new();
        for line in reader.lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }

            let (id, content) = extractor(line.as_bytes())?;
            if documents.contains_key(&id) {
                return Err(FerretError::DuplicateId(id));
            }
            documents.insert(id, line.clone().into_bytes());

            self.add_document(id, &content);
        }
        Ok(documents)
    }

    /// Finish all shards, merge their sorted terms into a trie, and
    /// serialize it to `writer`.
    pub fn dump<W: Write>(&mut self, writer: &mut W) -> Result<()> {
        let mut trie = TrieBuilder::new();

        for shard in &mut self.shards {
            shard.finish();
        }
        for (k, shard) in self.shards.iter_mut().enumerate() {
            let (terms, errors) = shard.result();
            if !errors.is_empty() {
                warn!(shard = k, skipped = errors.len(), "documents skipped while indexing");
                for err in &errors {
                    warn!(shard = k, %err, "skipped document");
                }
            }
            trie.add_bulk(&terms);
        }
        self.shards.clear();

        trie.dump(writer)
    }

    /// Finish all shards and discard their results. Idempotent with
    /// [`Self::dump`].
    pub fn abort(&mut self) {
        for shard in &mut self.shards {
            shard.finish();
            let _ = shard.result();
        }
        self.shards.clear();
    }

    fn next_shard(&mut self) -> usize {
        let k = self.document_count % self.shards.len();
        self.document_count += 1;
        k
    }
}

impl Default for IndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}
