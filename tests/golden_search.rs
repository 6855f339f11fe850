//! Golden end-to-end scenarios: fixed corpora with pinned results.

use std::io::Cursor;

use bytes::Bytes;

use ferret::text::{normalize, tokenize_for_search};
use ferret::{json_extractor, DocId, FerretError, IndexBuilder, IndexConfig, SearchIndex};

fn corpus() -> [(DocId, &'static str); 4] {
    [
        (1, "This is a text to test something"),
        (2, "This is another text to test something else"),
        (3, "Now we would like to add another document"),
        (4, "The more the better, we need to test!"),
    ]
}

fn build_index() -> SearchIndex {
    let mut builder = IndexBuilder::with_config(&IndexConfig::default().with_num_shards(3));
    for (id, content) in corpus() {
        builder.add_document(id, content);
    }
    let mut blob = Vec::new();
    builder.dump(&mut blob).unwrap();
    SearchIndex::from_bytes(Bytes::from(blob)).unwrap()
}

#[test]
fn golden_search_scenarios() {
    let index = build_index();

    let cases: &[(&str, &[DocId])] = &[
        ("Text to test", &[1, 2]),
        ("test/to-TEXT!", &[1, 2]),
        ("test         to", &[1, 2, 4]),
        ("Th", &[1, 2, 4]),
        ("th ", &[]),
        ("-? ", &[1, 2, 3, 4]),
        ("", &[1, 2, 3, 4]),
    ];

    for (query, expected) in cases {
        assert_eq!(
            index.search(query, None).unwrap(),
            expected.to_vec(),
            "query {query:?}"
        );
    }
}

#[test]
fn golden_normalizer() {
    assert_eq!(normalize("This ìs ä fÄncy,  string"), "this is a fancy string");
}

#[test]
fn golden_tokenizer_for_search() {
    let (terms, incomplete) = tokenize_for_search("YES!-This ìs ä fÄncy, is a string");
    assert_eq!(terms, vec!["a", "fancy", "is", "this", "yes"]);
    assert_eq!(incomplete, "string");

    let (terms, incomplete) = tokenize_for_search("YES!-This ìs ä fÄncy, is a string-");
    assert_eq!(terms, vec!["a", "fancy", "is", "string", "this", "yes"]);
    assert_eq!(incomplete, "");
}

#[test]
fn golden_serialization_fixtures() {
    use ferret::TrieBuilder;

    let mut buf = Vec::new();
    TrieBuilder::new().dump(&mut buf).unwrap();
    assert_eq!(buf, vec![0x00, 0x00]);

    let mut builder = TrieBuilder::new();
    for id in [1, 2, 1, 2] {
        builder.add(id, "");
    }
    let mut buf = Vec::new();
    builder.dump(&mut buf).unwrap();
    assert_eq!(buf, vec![0x02, 0x00, 0x02, 0x01, 0x01]);

    let mut builder = TrieBuilder::new();
    builder.add(1, "A");
    builder.add(2, "A");
    builder.add(1, "B");
    builder.add(2, "B");
    let mut buf = Vec::new();
    builder.dump(&mut buf).unwrap();
    assert_eq!(
        buf,
        vec![
            0x00, 0x02, 0x04, 0x41, 0x05, 0x01, 0x05, 0x02, 0x00, 0x02, 0x01, 0x01, 0x02, 0x00,
            0x02, 0x01, 0x01,
        ]
    );
    assert_eq!(buf.len(), 17);
}

#[test]
fn golden_duplicate_id_is_fatal() {
    let input = concat!(
        r#"{"id": 1, "content": "a document"}"#, "\n",
        r#"{"id": 1, "content": "the same id again"}"#, "\n",
    );
    let extractor = json_extractor("id", &["content".to_owned()]);

    let mut builder = IndexBuilder::new();
    let result = builder.load_and_index_json_stream(Cursor::new(input), extractor);
    assert!(matches!(result, Err(FerretError::DuplicateId(1))));
    builder.abort();
}

#[test]
fn golden_index_survives_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corpus.fidx");

    let mut builder = IndexBuilder::new();
    for (id, content) in corpus() {
        builder.add_document(id, content);
    }
    let mut file = std::fs::File::create(&path).unwrap();
    builder.dump(&mut file).unwrap();

    let reloaded = SearchIndex::from_reader(std::fs::File::open(&path).unwrap()).unwrap();
    assert_eq!(reloaded.search("text to test", None).unwrap(), vec![1, 2]);
    assert_eq!(reloaded.search("", None).unwrap(), vec![1, 2, 3, 4]);
}
