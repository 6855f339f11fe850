//! The serialized trie index.
//!
//! `TrieBuilder` assembles an owned in-memory trie and serializes it as a
//! self-describing byte blob: per node, the posting count and edge count,
//! then delta-coded postings, then delta-coded sorted edges with child
//! body sizes, then the child bodies. All integers are unsigned LEB128
//! varints. `TrieReader` walks the blob lazily without materializing
//! nodes.

mod builder;
mod reader;
mod varint;

pub use builder::{ConcurrentTrieBuilder, TrieBuilder};
pub use reader::{Edge, Node, TrieReader};
pub use varint::{read_varint, varint_len, write_varint};
