//! Compiled-artifact cache
//!
//! Entries are keyed by (document id, debug flag) and carry a fingerprint
//! of the document content. A lookup only hits when the fingerprint still
//! matches; a store overwrites whatever the key held before.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use blueprint_graph::Document;
use serde::Serialize;

use crate::ast::Program;
use crate::error::{CompileError, Result};
use crate::settings::CompileNodeBasic;

/// Result of compiling one document in one mode
#[derive(Debug, Clone)]
pub struct CompiledArtifact {
    /// Program text
    pub source: String,
    pub program: Program,
    /// Basic-function records in first-use order
    pub basics: Vec<CompileNodeBasic>,
    pub fingerprint: u64,
}

/// Cache counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    document: String,
    dev: bool,
}

#[derive(Debug, Default)]
pub struct ArtifactCache {
    entries: HashMap<CacheKey, Arc<CompiledArtifact>>,
    hits: u64,
    misses: u64,
}

impl ArtifactCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the entry for the key if it was built from the same content
    pub fn lookup(&mut self, document: &str, dev: bool, fingerprint: u64) -> Option<Arc<CompiledArtifact>> {
        let key = CacheKey {
            document: document.to_string(),
            dev,
        };
        match self.entries.get(&key) {
            Some(artifact) if artifact.fingerprint == fingerprint => {
                self.hits += 1;
                Some(Arc::clone(artifact))
            }
            _ => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn store(&mut self, document: &str, dev: bool, artifact: Arc<CompiledArtifact>) {
        self.entries.insert(
            CacheKey {
                document: document.to_string(),
                dev,
            },
            artifact,
        );
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
        }
    }
}

/// Content fingerprint of a document
pub fn fingerprint(document: &Document) -> Result<u64> {
    let bytes = serde_json::to_vec(document)
        .map_err(|e| CompileError::bad_param(format!("Document '{}' cannot be fingerprinted: {}", document.id, e)))?;
    let mut hasher = DefaultHasher::new();
    bytes.hash(&mut hasher);
    Ok(hasher.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use blueprint_graph::{Graph, GraphType};

    fn artifact(fingerprint: u64) -> Arc<CompiledArtifact> {
        Arc::new(CompiledArtifact {
            source: "main();".to_string(),
            program: Program::default(),
            basics: Vec::new(),
            fingerprint,
        })
    }

    #[test]
    fn test_lookup_requires_matching_fingerprint() {
        let mut cache = ArtifactCache::new();
        cache.store("doc", true, artifact(7));

        assert!(cache.lookup("doc", true, 7).is_some());
        assert!(cache.lookup("doc", true, 8).is_none());
        assert!(cache.lookup("doc", false, 7).is_none());
        assert_eq!(
            cache.stats(),
            CacheStats {
                entries: 1,
                hits: 1,
                misses: 2
            }
        );
    }

    #[test]
    fn test_store_overwrites() {
        let mut cache = ArtifactCache::new();
        cache.store("doc", false, artifact(1));
        cache.store("doc", false, artifact(2));
        assert_eq!(cache.stats().entries, 1);
        assert!(cache.lookup("doc", false, 2).is_some());

        cache.clear();
        assert_eq!(cache.stats(), CacheStats::default());
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let mut doc = Document::new("doc", "Doc");
        doc.main_graph = Some(Graph::new("main", GraphType::Main));
        let before = fingerprint(&doc).unwrap();
        assert_eq!(before, fingerprint(&doc.clone()).unwrap());

        if let Some(main) = doc.main_graph.as_mut() {
            main.name = "renamed".to_string();
        }
        assert_ne!(before, fingerprint(&doc).unwrap());
    }
}
