//! Per-shard term accumulation.

use std::collections::HashMap;
use std::thread;

use crossbeam::channel::{bounded, Sender};

use super::extractor::ContentExtractor;
use crate::error::FerretError;
use crate::models::{DocId, IndexedTerm};
use crate::postings::sort_dedup;
use crate::text::tokenize;

/// Accumulates `term -> postings` for a slice of the document stream.
///
/// Two shapes share this contract: [`InlineIndexer`] applies documents on
/// the calling thread, [`ThreadedIndexer`] feeds a dedicated worker
/// through a bounded queue. Both produce identical [`Indexer::result`]
/// output for identical input sequences.
pub trait Indexer: Send {
    /// Tokenize `content` and append `id` to each token's postings.
    fn add(&mut self, id: DocId, content: &[u8]);

    /// Queue raw bytes; the extractor runs where the accumulation runs.
    fn add_raw(&mut self, raw: Vec<u8>, extractor: ContentExtractor);

    /// Signal that no further input will arrive.
    fn finish(&mut self);

    /// Block until the shard has drained, then return its terms sorted by
    /// term (with canonical postings and raw occurrence counts) alongside
    /// the per-document errors it captured.
    fn result(&mut self) -> (Vec<IndexedTerm>, Vec<FerretError>);
}

/// Accumulation state shared by both indexer shapes.
#[derive(Default)]
struct Accumulator {
    terms: HashMap<String, Vec<DocId>>,
    errors: Vec<FerretError>,
}

impl Accumulator {
    fn add(&mut self, id: DocId, content: &[u8]) {
        if id == 0 {
            self.errors.push(FerretError::InvalidDocumentId(0));
            return;
        }
        let content = String::from_utf8_lossy(content);
        for term in tokenize(&content) {
            self.terms.entry(term).or_default().push(id);
        }
    }

    fn add_raw(&mut self, raw: &[u8], extractor: &ContentExtractor) {
        match extractor(raw) {
            Ok((id, content)) => self.add(id, content.as_bytes()),
            Err(err) => self.errors.push(err),
        }
    }

    fn finish(self) -> (Vec<IndexedTerm>, Vec<FerretError>) {
        let mut result: Vec<IndexedTerm> = self
            .terms
            .into_iter()
            .map(|(term, postings)| {
                let occurrences = postings.len();
                IndexedTerm::new(term, sort_dedup(&postings), occurrences)
            })
            .collect();
        result.sort_unstable_by(|a, b| a.term.cmp(&b.term));
        (result, self.errors)
    }
}

/// Synchronous indexer: accumulation happens inline on every call.
pub struct InlineIndexer {
    acc: Option<Accumulator>,
}

impl InlineIndexer {
    pub fn new() -> Self {
        Self {
            acc: Some(Accumulator::default()),
        }
    }
}

impl Default for InlineIndexer {
    fn default() -> Self {
        Self::new()
    }
}

impl Indexer for InlineIndexer {
    fn add(&mut self, id: DocId, content: &[u8]) {
        if let Some(acc) = self.acc.as_mut() {
            acc.add(id, content);
        }
    }

    fn add_raw(&mut self, raw: Vec<u8>, extractor: ContentExtractor) {
        if let Some(acc) = self.acc.as_mut() {
            acc.add_raw(&raw, &extractor);
        }
    }

    fn finish(&mut self) {}

    fn result(&mut self) -> (Vec<IndexedTerm>, Vec<FerretError>) {
        match self.acc.take() {
            Some(acc) => acc.finish(),
            None => (Vec::new(), Vec::new()),
        }
    }
}

enum IndexJob {
    Content { id: DocId, content: Vec<u8> },
    Raw { raw: Vec<u8>, extractor: ContentExtractor },
    Finish,
}

/// Worker-backed indexer fed through a bounded queue.
///
/// `add*` block only when the queue is full; `result` joins the worker
/// after the finish sentinel.
pub struct ThreadedIndexer {
    tx: Sender<IndexJob>,
    handle: Option<thread::JoinHandle<(Vec<IndexedTerm>, Vec<FerretError>)>>,
    finished: bool,
}

impl ThreadedIndexer {
    pub fn new(queue_capacity: usize) -> Self {
        let (tx, rx) = bounded::<IndexJob>(queue_capacity.max(1));
        let handle = thread::spawn(move || {
            let mut acc = Accumulator::default();
            while let Ok(job) = rx.recv() {
                match job {
                    IndexJob::Content { id, content } => acc.add(id, &content),
                    IndexJob::Raw { raw, extractor } => acc.add_raw(&raw, &extractor),
                    IndexJob::Finish => break,
                }
            }
            acc.finish()
        });

        Self {
            tx,
            handle: Some(handle),
            finished: false,
        }
    }
}

impl Indexer for ThreadedIndexer {
    fn add(&mut self, id: DocId, content: &[u8]) {
        let _ = self.tx.send(IndexJob::Content {
            id,
            content: content.to_vec(),
        });
    }

    fn add_raw(&mut self, raw: Vec<u8>, extractor: ContentExtractor) {
        let _ = self.tx.send(IndexJob::Raw { raw, extractor });
    }

    fn finish(&mut self) {
        if !self.finished {
            self.finished = true;
            let _ = self.tx.send(IndexJob::Finish);
        }
    }

    fn result(&mut self) -> (Vec<IndexedTerm>, Vec<FerretError>) {
        self.finish();
        match self.handle.take() {
            Some(handle) => handle.join().expect("indexer worker panicked"),
            None => (Vec::new(), Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::json_extractor;

    fn feed(indexer: &mut dyn Indexer) {
        indexer.add(1, b"the quick brown fox");
        indexer.add(2, b"The lazy dog");
        indexer.add(3, b"quick quick thinking");
    }

    fn check_result(terms: &[IndexedTerm]) {
        let quick = terms.iter().find(|t| t.term == "quick").unwrap();
        assert_eq!(quick.postings, vec![1, 3]);
        assert_eq!(quick.occurrences, 3);

        let the = terms.iter().find(|t| t.term == "the").unwrap();
        assert_eq!(the.postings, vec![1, 2]);

        let mut sorted = terms.to_vec();
        sorted.sort_unstable_by(|a, b| a.term.cmp(&b.term));
        assert_eq!(terms, sorted.as_slice());
    }

    #[test]
    fn test_inline_indexer() {
        let mut indexer = InlineIndexer::new();
        feed(&mut indexer);
        indexer.finish();
        let (terms, errors) = indexer.result();
        assert!(errors.is_empty());
        check_result(&terms);
    }

    #[test]
    fn test_threaded_indexer() {
        let mut indexer = ThreadedIndexer::new(128);
        feed(&mut indexer);
        indexer.finish();
        let (terms, errors) = indexer.result();
        assert!(errors.is_empty());
        check_result(&terms);
    }

    #[test]
    fn test_modes_agree() {
        let mut inline = InlineIndexer::new();
        let mut threaded = ThreadedIndexer::new(16);
        feed(&mut inline);
        feed(&mut threaded);
        assert_eq!(inline.result().0, threaded.result().0);
    }

    #[test]
    fn test_raw_content_extraction_errors_captured() {
        let extractor = json_extractor("id", &["text".to_owned()]);
        let mut indexer = ThreadedIndexer::new(16);
        indexer.add_raw(br#"{"id": 1, "text": "good doc"}"#.to_vec(), extractor.clone());
        indexer.add_raw(b"not json at all".to_vec(), extractor.clone());
        indexer.add_raw(br#"{"id": -1, "text": "bad id"}"#.to_vec(), extractor);

        let (terms, errors) = indexer.result();
        assert_eq!(errors.len(), 2);
        assert!(terms.iter().any(|t| t.term == "good"));
        assert!(!terms.iter().any(|t| t.term == "bad"));
    }

    #[test]
    fn test_zero_id_captured_and_skipped() {
        let mut indexer = InlineIndexer::new();
        indexer.add(0, b"ghost");
        indexer.add(4, b"real");
        let (terms, errors) = indexer.result();
        assert_eq!(errors.len(), 1);
        assert!(!terms.iter().any(|t| t.term == "ghost"));
        assert_eq!(terms.iter().find(|t| t.term == "real").unwrap().postings, vec![4]);
    }

    #[test]
    fn test_result_after_result_is_empty() {
        let mut indexer = InlineIndexer::new();
        indexer.add(1, b"once");
        let (terms, _) = indexer.result();
        assert_eq!(terms.len(), 1);
        let (terms, _) = indexer.result();
        assert!(terms.is_empty());
    }
}
