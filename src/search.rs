//! Query execution over a serialized trie.

use std::io::Read;

use bytes::Bytes;

use crate::error::Result;
use crate::models::DocId;
use crate::postings::intersect;
use crate::text::tokenize_for_search;
use crate::trie::TrieReader;

/// A sealed, searchable index over a serialized trie blob.
///
/// The blob is immutable and reference-counted; every search clones the
/// prototype cursor, so a shared `SearchIndex` can serve parallel
/// queries.
pub struct SearchIndex {
    reader: TrieReader,
    raw: Bytes,
}

impl SearchIndex {
    /// Wrap serialized index bytes, validating the root node.
    pub fn from_bytes(raw: Bytes) -> Result<Self> {
        let (reader, _) = TrieReader::new(raw.clone())?;
        Ok(Self { reader, raw })
    }

    /// Read an index previously produced by
    /// [`crate::IndexBuilder::dump`].
    pub fn from_reader<R: Read>(mut src: R) -> Result<Self> {
        let mut buf = Vec::new();
        src.read_to_end(&mut buf)?;
        Self::from_bytes(Bytes::from(buf))
    }

    /// The serialized blob this index reads from.
    pub fn raw_bytes(&self) -> Bytes {
        self.raw.clone()
    }

    /// Search matching documents.
    ///
    /// Complete query terms require exact trie hits and are intersected;
    /// a trailing incomplete term expands by prefix. A query that
    /// normalizes to nothing returns every indexed document. `limit` is
    /// `None` for unlimited; `Some(0)` short-circuits to empty. The
    /// result is sorted and deduplicated.
    ///
    /// A term with no hit yields an empty result, not an error; only a
    /// malformed blob surfaces as `Err`.
    pub fn search(&self, query: &str, limit: Option<usize>) -> Result<Vec<DocId>> {
        if limit == Some(0) {
            return Ok(Vec::new());
        }

        let (terms, incomplete) = tokenize_for_search(query);
        let mut reader = self.reader.clone();

        // Nothing to match: enumerate the whole trie.
        if terms.is_empty() && incomplete.is_empty() {
            reader.reset()?;
            let mut postings = reader.read_all_postings_recursive()?;
            truncate(&mut postings, limit);
            return Ok(postings);
        }

        let mut merged: Option<Vec<DocId>> = None;

        for term in &terms {
            reader.reset()?;
            let node = reader.match_term(term)?;
            if node.num_postings == 0 {
                return Ok(Vec::new());
            }
            let postings = reader.read_all_postings()?;

            merged = Some(match merged {
                None => postings,
                Some(acc) => {
                    let both = intersect(&acc, &postings);
                    if both.is_empty() {
                        return Ok(Vec::new());
                    }
                    both
                }
            });
        }

        if !incomplete.is_empty() {
            reader.reset()?;
            let node = reader.match_term(&incomplete)?;
            if node.num_postings == 0 && node.num_edges == 0 {
                return Ok(Vec::new());
            }
            let postings = reader.read_all_postings_recursive()?;

            merged = Some(match merged {
                None => postings,
                Some(acc) => {
                    let both = intersect(&acc, &postings);
                    if both.is_empty() {
                        return Ok(Vec::new());
                    }
                    both
                }
            });
        }

        let mut postings = merged.unwrap_or_default();
        truncate(&mut postings, limit);
        Ok(postings)
    }
}

fn truncate(postings: &mut Vec<DocId>, limit: Option<usize>) {
    if let Some(limit) = limit {
        if postings.len() > limit {
            postings.truncate(limit);
        }
    }
}
