//! Integration tests for the ingestion pipeline and end-to-end retrieval.

use std::sync::Arc;

use ayur_rag::hashing::HashEmbeddingProvider;
use ayur_rag::filestore::FileVectorStore;
use ayur_rag::ingest::Ingestor;
use ayur_rag::inmemory::InMemoryVectorStore;
use ayur_rag::retriever::Retriever;
use ayur_rag::RagConfig;

fn write_corpus(dir: &std::path::Path) {
    // Three documents, ~2500 characters combined.
    let stress = "When the stress level is high, the mind races and sleep suffers. \
        A high stress level calls for pranayama, early nights, and a steady routine. \
        Reducing a high stress level begins with slow breathing before meals. "
        .repeat(4);
    let diet = "Favor warm, freshly cooked meals with seasonal vegetables. \
        Avoid processed food and excess sugar. Eat the main meal at midday \
        when digestion is strongest, and keep dinner light. "
        .repeat(4);
    let sleep = "Sleep before ten in the evening and rise before the sun. \
        Avoid screens after dusk. A calm, dark room and a fixed schedule \
        deepen rest more than extra hours do. "
        .repeat(4);

    std::fs::write(dir.join("stress.txt"), stress).unwrap();
    std::fs::write(dir.join("diet.txt"), diet).unwrap();
    std::fs::write(dir.join("sleep.txt"), sleep).unwrap();
}

fn ingestor(store: Arc<dyn ayur_rag::VectorStore>) -> Ingestor {
    Ingestor::new(RagConfig::default(), Arc::new(HashEmbeddingProvider::new()), store).unwrap()
}

#[tokio::test]
async fn corpus_builds_index_with_expected_chunks() {
    let kb = tempfile::tempdir().unwrap();
    write_corpus(kb.path());

    let index = ingestor(Arc::new(InMemoryVectorStore::new()))
        .build(kb.path())
        .await
        .unwrap()
        .expect("three documents should produce an index");

    // chunk_size=1000 / overlap=200 over ~2500 chars in 3 files: at least
    // one chunk per document.
    assert!(index.len().await.unwrap() >= 3);
}

#[tokio::test]
async fn profile_query_ranks_relevant_chunks_first() {
    let kb = tempfile::tempdir().unwrap();
    write_corpus(kb.path());

    let index = ingestor(Arc::new(InMemoryVectorStore::new()))
        .build(kb.path())
        .await
        .unwrap()
        .unwrap();

    let query = r#"AYUSH lifestyle recommendations for a person with the following profile: { "stress_level": "high" }"#;
    let results = index.retrieve(query, 5).await.unwrap();

    assert!(!results.is_empty());
    assert!(results.len() <= 5);
    for window in results.windows(2) {
        assert!(window[0].score >= window[1].score);
    }
    assert!(
        results[0].text.contains("stress"),
        "most relevant chunk should come from the stress document"
    );
}

#[tokio::test]
async fn empty_directory_signals_no_knowledge_base() {
    let kb = tempfile::tempdir().unwrap();

    let result =
        ingestor(Arc::new(InMemoryVectorStore::new())).build(kb.path()).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn unsupported_files_are_ignored() {
    let kb = tempfile::tempdir().unwrap();
    std::fs::write(kb.path().join("data.csv"), "a,b,c").unwrap();

    let result =
        ingestor(Arc::new(InMemoryVectorStore::new())).build(kb.path()).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn missing_directory_is_created_and_reported_empty() {
    let parent = tempfile::tempdir().unwrap();
    let kb = parent.path().join("knowledge_base");

    let result = ingestor(Arc::new(InMemoryVectorStore::new())).build(&kb).await.unwrap();
    assert!(result.is_none());
    assert!(kb.is_dir());
}

#[tokio::test]
async fn rebuilding_against_a_durable_store_appends_by_id() {
    let kb = tempfile::tempdir().unwrap();
    let data = tempfile::tempdir().unwrap();
    write_corpus(kb.path());

    let first_len = {
        let store = Arc::new(FileVectorStore::open(data.path()).await.unwrap());
        let index = ingestor(store).build(kb.path()).await.unwrap().unwrap();
        index.len().await.unwrap()
    };

    // Second run over the same corpus upserts the same chunk IDs: the
    // collection persists and does not grow.
    let store = Arc::new(FileVectorStore::open(data.path()).await.unwrap());
    let index = ingestor(store).build(kb.path()).await.unwrap().unwrap();
    assert_eq!(index.len().await.unwrap(), first_len);
}
