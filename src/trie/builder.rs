//! Trie construction and serialization.

use std::collections::BTreeMap;
use std::io::Write;
use std::thread;

use crossbeam::channel::{bounded, Sender};

use super::varint::{varint_len, write_varint};
use crate::error::Result;
use crate::models::{DocId, IndexedTerm};
use crate::postings::{sort_dedup, union};

/// Queue capacity for each concurrent trie worker.
const WORKER_QUEUE_CAPACITY: usize = 100;

/// Index of the root node in a builder arena.
const ROOT: usize = 0;

/// One owned trie vertex. Edges map runes to arena indices; `BTreeMap`
/// keeps them in ascending rune order for serialization.
#[derive(Debug, Default)]
struct TrieNode {
    postings: Vec<DocId>,
    /// Count of postings appended since the last consolidation.
    appended: usize,
    edges: BTreeMap<char, usize>,
}

/// Builds a trie in memory and serializes it to the byte format consumed
/// by [`super::TrieReader`].
///
/// Nodes live in an arena so the sorted bulk insert can keep a stack of
/// node indices along the current path.
#[derive(Debug)]
pub struct TrieBuilder {
    nodes: Vec<TrieNode>,
}

impl TrieBuilder {
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
        }
    }

    /// Add one posting under `term`. An empty term addresses the root.
    pub fn add(&mut self, posting: DocId, term: &str) {
        let mut node = ROOT;
        for rune in term.chars() {
            node = self.enter_child(node, rune);
        }
        self.nodes[node].postings.push(posting);
        self.nodes[node].appended += 1;
    }

    /// Bulk-add terms that are already sorted, each with canonical
    /// postings.
    ///
    /// A stack of (node, rune) along the current path lets each term
    /// resume from the longest prefix it shares with its predecessor, so
    /// the walk is linear in total runes rather than terms times depth.
    pub fn add_bulk(&mut self, data: &[IndexedTerm]) {
        let mut path_nodes: Vec<usize> = vec![ROOT];
        let mut path_runes: Vec<char> = Vec::new();

        for indexed in data {
            if indexed.postings.is_empty() {
                continue;
            }

            let mut node = ROOT;
            let mut depth = 0;
            for rune in indexed.term.chars() {
                if depth < path_runes.len() && path_runes[depth] == rune {
                    node = path_nodes[depth + 1];
                } else {
                    path_runes.truncate(depth);
                    path_nodes.truncate(depth + 1);
                    node = self.enter_child(path_nodes[depth], rune);
                    path_runes.push(rune);
                    path_nodes.push(node);
                }
                depth += 1;
            }

            let target = &mut self.nodes[node];
            if target.appended > 0 {
                target.postings = sort_dedup(&target.postings);
                target.appended = 0;
            }
            target.postings = union(&target.postings, &indexed.postings);
        }
    }

    /// Serialize the trie to `dst`.
    ///
    /// Child sizes are computed in a depth-first post-order pass, then the
    /// nodes are emitted front to back; nothing but the size table is
    /// buffered.
    pub fn dump<W: Write>(mut self, dst: &mut W) -> Result<()> {
        self.consolidate();
        let sizes = self.layout();
        self.write_node(ROOT, &sizes, dst)
    }

    fn enter_child(&mut self, node: usize, rune: char) -> usize {
        if let Some(&child) = self.nodes[node].edges.get(&rune) {
            return child;
        }
        let child = self.nodes.len();
        self.nodes.push(TrieNode::default());
        self.nodes[node].edges.insert(rune, child);
        child
    }

    /// Sort-dedup every node that still has raw appended postings.
    fn consolidate(&mut self) {
        for node in &mut self.nodes {
            if node.appended > 0 {
                node.postings = sort_dedup(&node.postings);
                node.appended = 0;
            }
        }
    }

    /// Compute the serialized byte size of every node, children first.
    fn layout(&self) -> Vec<usize> {
        let mut sizes = vec![0usize; self.nodes.len()];
        self.layout_rec(ROOT, &mut sizes);
        sizes
    }

    fn layout_rec(&self, idx: usize, sizes: &mut Vec<usize>) -> usize {
        let node = &self.nodes[idx];

        let mut size = varint_len(node.postings.len() as u64);
        size += varint_len(node.edges.len() as u64);

        if !node.postings.is_empty() {
            let postings_len = postings_block_len(&node.postings);
            size += varint_len(postings_len as u64) + postings_len;
        }

        if !node.edges.is_empty() {
            let mut edges_len = 0;
            let mut children_len = 0;
            let mut prev_rune = 0u32;
            for (&rune, &child) in &node.edges {
                let child_len = self.layout_rec(child, sizes);
                edges_len += varint_len(u64::from(rune as u32 - prev_rune));
                edges_len += varint_len(child_len as u64);
                children_len += child_len;
                prev_rune = rune as u32;
            }
            size += varint_len(edges_len as u64) + edges_len + children_len;
        }

        sizes[idx] = size;
        size
    }

    fn write_node<W: Write>(&self, idx: usize, sizes: &[usize], dst: &mut W) -> Result<()> {
        let node = &self.nodes[idx];

        write_varint(dst, node.postings.len() as u64)?;
        write_varint(dst, node.edges.len() as u64)?;

        if !node.postings.is_empty() {
            write_varint(dst, postings_block_len(&node.postings) as u64)?;
            let mut prev = 0u64;
            for &posting in &node.postings {
                write_varint(dst, posting - prev)?;
                prev = posting;
            }
        }

        if !node.edges.is_empty() {
            let mut edges_len = 0;
            let mut prev_rune = 0u32;
            for (&rune, &child) in &node.edges {
                edges_len += varint_len(u64::from(rune as u32 - prev_rune));
                edges_len += varint_len(sizes[child] as u64);
                prev_rune = rune as u32;
            }
            write_varint(dst, edges_len as u64)?;

            let mut prev_rune = 0u32;
            for (&rune, &child) in &node.edges {
                write_varint(dst, u64::from(rune as u32 - prev_rune))?;
                write_varint(dst, sizes[child] as u64)?;
                prev_rune = rune as u32;
            }
            for &child in node.edges.values() {
                self.write_node(child, sizes, dst)?;
            }
        }

        Ok(())
    }

    /// Root-level edges, ascending by rune. Used by the concurrent
    /// builder to stitch worker sub-forests under one root.
    fn root_children(&self) -> impl Iterator<Item = (char, usize)> + '_ {
        self.nodes[ROOT].edges.iter().map(|(&r, &i)| (r, i))
    }

    fn root_postings(&self) -> &[DocId] {
        &self.nodes[ROOT].postings
    }
}

impl Default for TrieBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn postings_block_len(postings: &[DocId]) -> usize {
    let mut len = 0;
    let mut prev = 0u64;
    for &posting in postings {
        len += varint_len(posting - prev);
        prev = posting;
    }
    len
}

/// Work item routed to a trie worker.
enum TrieJob {
    Add { posting: DocId, term: String },
    AddBulk(IndexedTerm),
}

struct TrieWorker {
    tx: Sender<TrieJob>,
    handle: thread::JoinHandle<TrieBuilder>,
}

/// A trie builder that shards construction by leading rune.
///
/// Each worker owns the disjoint sub-forest of terms whose first rune
/// hashes to it; the master keeps only the root's own postings (empty
/// terms). `dump` joins the workers and serializes the combined tree.
pub struct ConcurrentTrieBuilder {
    root: TrieBuilder,
    workers: Vec<TrieWorker>,
}

impl ConcurrentTrieBuilder {
    /// Spawn `workers` worker threads. A count of zero or one degrades to
    /// a single worker; use [`TrieBuilder`] directly when concurrency is
    /// not wanted.
    pub fn new(workers: usize) -> Self {
        let count = workers.max(1);
        let workers = (0..count)
            .map(|_| {
                let (tx, rx) = bounded::<TrieJob>(WORKER_QUEUE_CAPACITY);
                let handle = thread::spawn(move || {
                    let mut builder = TrieBuilder::new();
                    while let Ok(job) = rx.recv() {
                        match job {
                            TrieJob::Add { posting, term } => builder.add(posting, &term),
                            TrieJob::AddBulk(indexed) => {
                                builder.add_bulk(std::slice::from_ref(&indexed))
                            }
                        }
                    }
                    builder
                });
                TrieWorker { tx, handle }
            })
            .collect();

        Self {
            root: TrieBuilder::new(),
            workers,
        }
    }

    pub fn add(&mut self, posting: DocId, term: &str) {
        match term.chars().next() {
            None => self.root.add(posting, term),
            Some(first) => {
                let worker = self.pick_worker(first);
                // The send only fails after dump, which consumes self.
                let _ = worker.tx.send(TrieJob::Add {
                    posting,
                    term: term.to_owned(),
                });
            }
        }
    }

    pub fn add_bulk(&mut self, data: &[IndexedTerm]) {
        for indexed in data {
            if indexed.postings.is_empty() {
                continue;
            }
            match indexed.term.chars().next() {
                None => self.root.add_bulk(std::slice::from_ref(indexed)),
                Some(first) => {
                    let worker = self.pick_worker(first);
                    let _ = worker.tx.send(TrieJob::AddBulk(indexed.clone()));
                }
            }
        }
    }

    /// Join all workers and serialize the combined tree.
    pub fn dump<W: Write>(mut self, dst: &mut W) -> Result<()> {
        let mut builders = Vec::with_capacity(self.workers.len());
        for worker in self.workers.drain(..) {
            // Dropping the sender is the termination signal.
            drop(worker.tx);
            let builder = worker
                .handle
                .join()
                .expect("trie worker thread panicked");
            builders.push(builder);
        }

        let mut layouts = Vec::with_capacity(builders.len());
        for builder in &mut builders {
            builder.consolidate();
            layouts.push(builder.layout());
        }

        // Merge each worker's root-level edges into one sorted edge list.
        let mut edges: Vec<(char, usize, usize)> = Vec::new();
        for (wi, builder) in builders.iter().enumerate() {
            for (rune, child) in builder.root_children() {
                edges.push((rune, wi, child));
            }
        }
        edges.sort_unstable_by_key(|&(rune, _, _)| rune);

        self.root.consolidate();
        let root_postings = self.root.root_postings();

        write_varint(dst, root_postings.len() as u64)?;
        write_varint(dst, edges.len() as u64)?;

        if !root_postings.is_empty() {
            write_varint(dst, postings_block_len(root_postings) as u64)?;
            let mut prev = 0u64;
            for &posting in root_postings {
                write_varint(dst, posting - prev)?;
                prev = posting;
            }
        }

        if !edges.is_empty() {
            let mut edges_len = 0;
            let mut prev_rune = 0u32;
            for &(rune, wi, child) in &edges {
                edges_len += varint_len(u64::from(rune as u32 - prev_rune));
                edges_len += varint_len(layouts[wi][child] as u64);
                prev_rune = rune as u32;
            }
            write_varint(dst, edges_len as u64)?;

            let mut prev_rune = 0u32;
            for &(rune, wi, child) in &edges {
                write_varint(dst, u64::from(rune as u32 - prev_rune))?;
                write_varint(dst, layouts[wi][child] as u64)?;
                prev_rune = rune as u32;
            }
            for &(_, wi, child) in &edges {
                builders[wi].write_node(child, &layouts[wi], dst)?;
            }
        }

        Ok(())
    }

    fn pick_worker(&self, first_rune: char) -> &TrieWorker {
        &self.workers[first_rune as usize % self.workers.len()]
    }
}
