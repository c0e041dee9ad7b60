//! Persistent similarity index over document chunks.

use crate::chunker::{Chunk, ChunkConfig, ChunkMetadata, chunk_document};
use crate::document::Corpus;
use crate::embedding::{Embedder, cosine_similarity};
use crate::error::{RagEvalError, Result};
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Chunks embedded per batch while indexing.
const EMBED_BATCH_SIZE: usize = 32;

/// A stored chunk with its embedding.
#[derive(Debug, Clone, Serialize, Deserialize, Encode, Decode)]
pub struct StoreEntry {
    pub chunk: Chunk,
    pub embedding: Vec<f32>,
}

/// A named collection of embedded chunks.
#[derive(Debug, Clone, Serialize, Deserialize, Encode, Decode)]
pub struct VectorStore {
    pub collection: String,
    /// [`Embedder::name`] of the embedder that produced every vector.
    pub embedder: String,
    pub dimension: usize,
    entries: Vec<StoreEntry>,
}

/// A chunk returned by a similarity query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub content: String,
    pub metadata: ChunkMetadata,
    /// Cosine distance to the query; smaller is closer.
    pub distance: Option<f32>,
}

impl VectorStore {
    /// Create a new empty collection for vectors from `embedder`.
    pub fn new(collection: impl Into<String>, embedder: &dyn Embedder) -> Self {
        Self {
            collection: collection.into(),
            embedder: embedder.name(),
            dimension: embedder.dimension(),
            entries: Vec::new(),
        }
    }

    /// Fails unless `embedder` is the one this collection was built with.
    pub fn check_embedder(&self, embedder: &dyn Embedder) -> Result<()> {
        if embedder.name() != self.embedder || embedder.dimension() != self.dimension {
            return Err(RagEvalError::Embedding(format!(
                "collection '{}' was built with '{}' ({} dimensions) but the active embedder is '{}' ({} dimensions); rebuild the store",
                self.collection,
                self.embedder,
                self.dimension,
                embedder.name(),
                embedder.dimension()
            )));
        }
        Ok(())
    }

    /// Embed and add chunks, returning how many new ids were stored.
    ///
    /// A chunk whose id is already present replaces the stored one. When the
    /// replaced chunk came from a different file a warning is logged.
    pub fn add(&mut self, chunks: Vec<Chunk>, embedder: &dyn Embedder) -> Result<usize> {
        self.check_embedder(embedder)?;

        let mut added = 0;
        for batch in chunks.chunks(EMBED_BATCH_SIZE) {
            let texts: Vec<&str> = batch.iter().map(|c| c.text.as_str()).collect();
            let embeddings = embedder.embed_batch(&texts)?;

            for (chunk, embedding) in batch.iter().zip(embeddings) {
                let entry = StoreEntry {
                    chunk: chunk.clone(),
                    embedding,
                };

                match self.entries.iter().position(|e| e.chunk.id == chunk.id) {
                    Some(pos) => {
                        let previous = &self.entries[pos].chunk.metadata;
                        if previous.path != chunk.metadata.path {
                            tracing::warn!(
                                "Chunk {} of {} replaces the one from {} (same file name)",
                                chunk.metadata.chunk_idx,
                                display_path(&chunk.metadata),
                                display_path(previous)
                            );
                        }
                        self.entries[pos] = entry;
                    }
                    None => {
                        self.entries.push(entry);
                        added += 1;
                    }
                }
            }
        }

        Ok(added)
    }

    /// Number of chunks in the collection.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[StoreEntry] {
        &self.entries
    }

    /// The `top_k` entries closest to `embedding`, nearest first.
    pub fn query(&self, embedding: &[f32], top_k: usize) -> Vec<RetrievedChunk> {
        let mut scored: Vec<(f32, &StoreEntry)> = self
            .entries
            .iter()
            .map(|entry| (1.0 - cosine_similarity(embedding, &entry.embedding), entry))
            .collect();

        scored.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);

        scored
            .into_iter()
            .map(|(distance, entry)| RetrievedChunk {
                content: entry.chunk.text.clone(),
                metadata: entry.chunk.metadata.clone(),
                distance: Some(distance),
            })
            .collect()
    }
}

fn display_path(metadata: &ChunkMetadata) -> &str {
    metadata.path.as_deref().unwrap_or(&metadata.source)
}

/// Chunks indexed from one document.
#[derive(Debug, Clone)]
pub struct IndexedDocument {
    pub source: String,
    /// Chunks cut from the document.
    pub chunks: usize,
    /// Chunks that took a new id rather than replacing an earlier file's.
    pub new_chunks: usize,
}

/// Summary of a store build.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub documents: Vec<IndexedDocument>,
    /// Chunks held by the finished store.
    pub total_chunks: usize,
    /// Chunks overwritten by a later file with the same name.
    pub replaced_chunks: usize,
}

/// Build a fresh collection from a corpus.
pub fn build_store(
    corpus: &Corpus,
    collection: &str,
    chunk_config: &ChunkConfig,
    embedder: &dyn Embedder,
) -> Result<(VectorStore, BuildReport)> {
    let mut store = VectorStore::new(collection, embedder);
    let mut report = BuildReport::default();

    for document in &corpus.documents {
        let chunks = chunk_document(document, chunk_config);
        let count = chunks.len();
        let new_chunks = store.add(chunks, embedder)?;
        tracing::info!("{}: {} chunks", document.name, count);

        report.documents.push(IndexedDocument {
            source: document.name.clone(),
            chunks: count,
            new_chunks,
        });
    }

    let produced: usize = report.documents.iter().map(|d| d.chunks).sum();
    report.total_chunks = store.len();
    report.replaced_chunks = produced - store.len();

    Ok((store, report))
}

/// Answers similarity queries against a store.
pub struct Retriever<'a> {
    store: &'a VectorStore,
    embedder: &'a dyn Embedder,
}

impl<'a> Retriever<'a> {
    pub fn new(store: &'a VectorStore, embedder: &'a dyn Embedder) -> Self {
        Self { store, embedder }
    }

    /// Retrieve the `top_k` chunks most similar to `query`.
    pub fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<RetrievedChunk>> {
        self.store.check_embedder(self.embedder)?;
        let embedding = self.embedder.embed(query)?;
        Ok(self.store.query(&embedding, top_k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::embedding::HashingEmbedder;

    fn corpus() -> Corpus {
        Corpus {
            root: Default::default(),
            documents: vec![
                Document::from_text(
                    "library.txt",
                    "Central Library opening hours are 8am to 10pm on weekdays.",
                ),
                Document::from_text(
                    "halls.md",
                    "Halls offer a meal plan with breakfast and dinner included.",
                ),
            ],
        }
    }

    #[test]
    fn test_build_reports_chunks_per_document() {
        let embedder = HashingEmbedder::default();
        let (store, report) =
            build_store(&corpus(), "nus_docs", &ChunkConfig::default(), &embedder).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(report.total_chunks, 2);
        assert_eq!(report.documents[0].source, "library.txt");
        assert_eq!(report.documents[0].chunks, 1);
        assert_eq!(report.replaced_chunks, 0);
    }

    #[test]
    fn test_retrieve_orders_by_distance() {
        let embedder = HashingEmbedder::default();
        let (store, _) =
            build_store(&corpus(), "nus_docs", &ChunkConfig::default(), &embedder).unwrap();

        let results = Retriever::new(&store, &embedder)
            .retrieve("library opening hours", 2)
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].metadata.source, "library.txt");
        assert!(results[0].distance.unwrap() <= results[1].distance.unwrap());
    }

    #[test]
    fn test_top_k_truncates() {
        let embedder = HashingEmbedder::default();
        let (store, _) =
            build_store(&corpus(), "nus_docs", &ChunkConfig::default(), &embedder).unwrap();
        let retriever = Retriever::new(&store, &embedder);
        assert_eq!(retriever.retrieve("dinner", 1).unwrap().len(), 1);
        assert!(retriever.retrieve("dinner", 0).unwrap().is_empty());
    }

    #[test]
    fn test_readding_a_chunk_replaces_it() {
        let embedder = HashingEmbedder::default();
        let doc = Document::from_text("a.txt", "one two three");
        let mut store = VectorStore::new("c", &embedder);

        let chunks = chunk_document(&doc, &ChunkConfig::default());
        assert_eq!(store.add(chunks.clone(), &embedder).unwrap(), 1);
        assert_eq!(store.add(chunks, &embedder).unwrap(), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_same_file_name_in_two_directories() {
        let file = |path: &str, content: &str| Document {
            name: "info.txt".to_string(),
            path: Some(path.into()),
            content: content.to_string(),
        };
        let corpus = Corpus {
            root: Default::default(),
            documents: vec![
                file("a/info.txt", "halls offer dinner"),
                file("b/info.txt", "library opens at 8am"),
            ],
        };

        let embedder = HashingEmbedder::default();
        let (store, report) =
            build_store(&corpus, "nus_docs", &ChunkConfig::default(), &embedder).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(report.total_chunks, store.len());
        assert_eq!(report.replaced_chunks, 1);
        assert_eq!(report.documents[0].new_chunks, 1);
        assert_eq!(report.documents[1].chunks, 1);
        assert_eq!(report.documents[1].new_chunks, 0);

        let kept = &store.entries()[0].chunk;
        assert_eq!(kept.text, "library opens at 8am");
        assert_eq!(kept.metadata.path.as_deref(), Some("b/info.txt"));
    }

    #[test]
    fn test_dimension_mismatch_is_rejected() {
        let mut store = VectorStore::new("c", &HashingEmbedder::new(16));
        let chunks = chunk_document(&Document::from_text("a.txt", "x"), &ChunkConfig::default());
        let err = store.add(chunks, &HashingEmbedder::new(32)).unwrap_err();
        assert!(matches!(err, RagEvalError::Embedding(_)));
    }

    #[test]
    fn test_store_records_embedder() {
        let embedder = HashingEmbedder::new(64);
        let (store, _) =
            build_store(&corpus(), "nus_docs", &ChunkConfig::default(), &embedder).unwrap();
        assert_eq!(store.embedder, "hashing-64");
        assert_eq!(store.dimension, 64);
    }

    #[test]
    fn test_querying_with_another_embedder_fails() {
        let (store, _) = build_store(
            &corpus(),
            "nus_docs",
            &ChunkConfig::default(),
            &HashingEmbedder::new(64),
        )
        .unwrap();

        let other = HashingEmbedder::new(32);
        let err = Retriever::new(&store, &other).retrieve("dinner", 1).unwrap_err();
        assert!(matches!(err, RagEvalError::Embedding(ref msg) if msg.contains("hashing-64")));
    }
}
