use std::collections::BinaryHeap;
use std::cmp::Ordering;
use serde::{Serialize, Deserialize};
use crate::core::types::DocId;

/// Document with relevance score
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub doc_id: DocId,
    pub score: f64,
}

impl ScoredDocument {
    pub fn new(doc_id: DocId, score: f64) -> Self {
        ScoredDocument { doc_id, score }
    }
}

// Ordering puts the *worse* hit last: lower score, then higher doc id.
// `BinaryHeap` keeps the worst hit on top so the collector can drop it.
impl PartialEq for ScoredDocument {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScoredDocument {}

impl PartialOrd for ScoredDocument {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoredDocument {
    fn cmp(&self, other: &Self) -> Ordering {
        other.score
            .total_cmp(&self.score)
            .then_with(|| self.doc_id.cmp(&other.doc_id))
    }
}

/// Upper bound on heap slots reserved up front; larger `k` grows on demand.
const MAX_PREALLOCATED_HITS: usize = 1024;

/// Top-K collector for efficient result collection
pub struct TopKCollector {
    pub heap: BinaryHeap<ScoredDocument>,
    pub k: usize,
    pub total_collected: usize,  // Track total documents processed
}

impl TopKCollector {
    pub fn new(k: usize) -> Self {
        TopKCollector {
            heap: BinaryHeap::with_capacity(k.min(MAX_PREALLOCATED_HITS).saturating_add(1)),
            k,
            total_collected: 0,
        }
    }

    pub fn collect(&mut self, scored_doc: ScoredDocument) {
        self.total_collected += 1;
        if self.k == 0 {
            return;
        }

        self.heap.push(scored_doc);
        if self.heap.len() > self.k {
            self.heap.pop();
        }
    }

    /// Best hit first; equal scores ordered by doc id ascending.
    pub fn get_results(self) -> Vec<ScoredDocument> {
        self.heap.into_sorted_vec()
    }

    pub fn max_score(&self) -> f64 {
        self.heap
            .iter()
            .map(|doc| doc.score)
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(id: u64, score: f64) -> ScoredDocument {
        ScoredDocument::new(DocId(id), score)
    }

    #[test]
    fn test_keeps_top_k_in_order() {
        let mut collector = TopKCollector::new(2);
        for (id, score) in [(1, 0.5), (2, 2.0), (3, 1.0), (4, 0.1)] {
            collector.collect(hit(id, score));
        }
        assert_eq!(collector.total_collected, 4);
        assert_eq!(collector.max_score(), 2.0);

        let ids: Vec<u64> = collector.get_results().iter().map(|d| d.doc_id.value()).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_ties_break_by_doc_id() {
        let mut collector = TopKCollector::new(3);
        for id in [9, 3, 5, 1] {
            collector.collect(hit(id, 1.0));
        }
        let ids: Vec<u64> = collector.get_results().iter().map(|d| d.doc_id.value()).collect();
        assert_eq!(ids, vec![1, 3, 5]);
    }

    #[test]
    fn test_zero_k_collects_nothing() {
        let mut collector = TopKCollector::new(0);
        collector.collect(hit(1, 1.0));
        assert!(collector.get_results().is_empty());
    }

    #[test]
    fn test_unbounded_k_keeps_everything() {
        let mut collector = TopKCollector::new(usize::MAX);
        collector.collect(hit(2, 0.5));
        collector.collect(hit(1, 0.9));
        let ids: Vec<u64> = collector.get_results().iter().map(|h| h.doc_id.value()).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
