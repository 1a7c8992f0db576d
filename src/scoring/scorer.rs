/// Scorer trait
pub trait Scorer: Send + Sync {
    /// Contribution of one matching term to one document's score.
    fn score(&self, term_stats: &TermStats) -> f64;

    fn name(&self) -> &str;
}

/// Collection statistics for a single query term
#[derive(Debug, Clone, Copy)]
pub struct TermStats {
    pub doc_freq: usize,     // Number of documents containing the term
    pub total_docs: usize,   // Total number of indexed documents
}

impl TermStats {
    /// IDF = ln(N / df); zero when the term is absent.
    pub fn idf(&self) -> f64 {
        if self.doc_freq == 0 || self.total_docs == 0 {
            return 0.0;
        }
        (self.total_docs as f64 / self.doc_freq as f64).ln()
    }
}

/// TF-IDF where TF is fixed at 1.0.
///
/// Postings only record that a document contains a term, not how often, so every
/// matching document gets the same term frequency. Ranking is driven entirely by
/// IDF summed over the query terms a document matches.
#[derive(Debug, Clone, Copy, Default)]
pub struct PresenceTfIdfScorer;

impl PresenceTfIdfScorer {
    pub const TERM_FREQUENCY: f64 = 1.0;
}

impl Scorer for PresenceTfIdfScorer {
    fn score(&self, term_stats: &TermStats) -> f64 {
        Self::TERM_FREQUENCY * term_stats.idf()
    }

    fn name(&self) -> &str {
        "tfidf_presence"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rarer_terms_score_higher() {
        let scorer = PresenceTfIdfScorer;
        let rare = scorer.score(&TermStats { doc_freq: 1, total_docs: 3 });
        let common = scorer.score(&TermStats { doc_freq: 3, total_docs: 3 });
        assert!(rare > common);
        assert!((rare - 3f64.ln()).abs() < 1e-12);
        assert_eq!(common, 0.0);
    }

    #[test]
    fn test_absent_term_contributes_nothing() {
        let scorer = PresenceTfIdfScorer;
        assert_eq!(scorer.score(&TermStats { doc_freq: 0, total_docs: 10 }), 0.0);
        assert_eq!(scorer.score(&TermStats { doc_freq: 0, total_docs: 0 }), 0.0);
    }
}
