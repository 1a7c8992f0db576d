use std::collections::{BTreeSet, HashMap, HashSet};
use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use tracing::debug;
use crate::analysis::tokenizer::{SimpleTokenizer, Tokenizer};
use crate::core::error::{Error, Result};
use crate::core::types::DocId;
use crate::scoring::scorer::{PresenceTfIdfScorer, Scorer, TermStats};
use crate::search::results::{ScoredDocument, TopKCollector};

/// Posting list: the documents that contain a term
pub type PostingList = BTreeSet<DocId>;

/// What the index keeps per document. The raw text is never stored.
#[derive(Debug, Clone)]
pub struct IndexedDocument {
    pub doc_id: DocId,
    pub fingerprint: String,   // SHA-256 hex digest of the original text
    pub terms: Vec<String>,    // Distinct terms, used to unlink postings on replace/remove
}

struct IndexInner {
    postings: HashMap<String, PostingList>,
    documents: HashMap<DocId, IndexedDocument>,
}

/// Inverted index scored with TF-IDF at query time
pub struct TextSearchIndex {
    inner: RwLock<IndexInner>,
    tokenizer: Box<dyn Tokenizer>,
    scorer: Box<dyn Scorer>,
}

impl Default for TextSearchIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl TextSearchIndex {
    pub fn new() -> Self {
        Self::with_components(
            Box::new(SimpleTokenizer::default()),
            Box::new(PresenceTfIdfScorer),
        )
    }

    pub fn with_components(tokenizer: Box<dyn Tokenizer>, scorer: Box<dyn Scorer>) -> Self {
        TextSearchIndex {
            inner: RwLock::new(IndexInner {
                postings: HashMap::new(),
                documents: HashMap::new(),
            }),
            tokenizer,
            scorer,
        }
    }

    /// Index `text` under `doc_id`. Re-adding an id replaces its previous postings.
    pub fn add_document(&self, doc_id: DocId, text: &str) -> Result<()> {
        if doc_id.value() == 0 {
            return Err(Error::invalid_input("doc_id must be positive"));
        }
        if text.trim().is_empty() {
            return Err(Error::invalid_input("document text must not be empty"));
        }

        let mut seen = HashSet::new();
        let terms: Vec<String> = self.tokenizer
            .tokenize(text)
            .into_iter()
            .map(|token| token.text)
            .filter(|term| seen.insert(term.clone()))
            .collect();

        let document = IndexedDocument {
            doc_id,
            fingerprint: fingerprint(text),
            terms,
        };

        let mut inner = self.inner.write();
        if let Some(previous) = inner.documents.remove(&doc_id) {
            debug!(doc_id = %doc_id, "replacing indexed document");
            unlink(&mut inner.postings, &previous);
        }
        for term in &document.terms {
            inner.postings
                .entry(term.clone())
                .or_insert_with(PostingList::new)
                .insert(doc_id);
        }
        inner.documents.insert(doc_id, document);
        Ok(())
    }

    /// Drop a document and its postings. Returns whether it was indexed.
    pub fn remove_document(&self, doc_id: DocId) -> bool {
        let mut inner = self.inner.write();
        let removed = inner.documents.remove(&doc_id);
        match removed {
            Some(previous) => {
                unlink(&mut inner.postings, &previous);
                true
            }
            None => false,
        }
    }

    /// Rank documents by the summed TF-IDF of the distinct query terms they contain.
    ///
    /// Results are ordered by descending score, then ascending doc id, and hold at
    /// most `limit` entries. Documents that match only terms present in every
    /// document score 0 and rank after all positive hits.
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<ScoredDocument>> {
        if query.trim().is_empty() {
            return Err(Error::invalid_input("search query must not be empty"));
        }
        if limit == 0 {
            return Err(Error::invalid_input("search limit must be positive"));
        }

        let mut seen = HashSet::new();
        let terms: Vec<String> = self.tokenizer
            .tokenize(query)
            .into_iter()
            .map(|token| token.text)
            .filter(|term| seen.insert(term.clone()))
            .collect();

        let inner = self.inner.read();
        let total_docs = inner.documents.len();
        let mut scores: HashMap<DocId, f64> = HashMap::new();

        for term in &terms {
            let Some(posting_list) = inner.postings.get(term) else {
                continue;
            };
            let contribution = self.scorer.score(&TermStats {
                doc_freq: posting_list.len(),
                total_docs,
            });
            for doc_id in posting_list {
                *scores.entry(*doc_id).or_insert(0.0) += contribution;
            }
        }

        let mut collector = TopKCollector::new(limit.min(scores.len()));
        for (doc_id, score) in scores {
            collector.collect(ScoredDocument::new(doc_id, score));
        }
        Ok(collector.get_results())
    }

    pub fn document_count(&self) -> usize {
        self.inner.read().documents.len()
    }

    pub fn term_count(&self) -> usize {
        self.inner.read().postings.len()
    }

    pub fn contains_document(&self, doc_id: DocId) -> bool {
        self.inner.read().documents.contains_key(&doc_id)
    }

    pub fn fingerprint(&self, doc_id: DocId) -> Option<String> {
        self.inner.read().documents.get(&doc_id).map(|d| d.fingerprint.clone())
    }

    /// Number of documents containing `term` (after normalization).
    pub fn doc_freq(&self, term: &str) -> usize {
        let normalized = term.to_lowercase();
        self.inner.read().postings.get(&normalized).map_or(0, |p| p.len())
    }

    pub fn clear(&self) {
        let mut inner = self.inner.write();
        inner.postings.clear();
        inner.documents.clear();
    }
}

fn unlink(postings: &mut HashMap<String, PostingList>, document: &IndexedDocument) {
    for term in &document.terms {
        let emptied = match postings.get_mut(term) {
            Some(list) => {
                list.remove(&document.doc_id);
                list.is_empty()
            }
            None => false,
        };
        if emptied {
            postings.remove(term);
        }
    }
}

pub fn fingerprint(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}
