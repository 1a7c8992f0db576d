use std::collections::BTreeMap;
use std::fmt;
use serde::{Serialize, Deserialize};
use crate::core::types::CacheStrategy;

/// Bound parameters of a query, kept sorted by name.
pub type QueryParams = BTreeMap<String, serde_json::Value>;

/// Advice attached to plans at or above the complexity threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationHint {
    ConsiderIndexing,
    UsePagination,
}

impl fmt::Display for OptimizationHint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OptimizationHint::ConsiderIndexing => f.write_str("consider_indexing"),
            OptimizationHint::UsePagination => f.write_str("use_pagination"),
        }
    }
}

/// Cost model weights for the complexity heuristic
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostModel {
    pub word_weight: u64,
    pub join_weight: u64,
    pub where_weight: u64,
    pub param_weight: u64,
}

impl Default for CostModel {
    fn default() -> Self {
        CostModel {
            word_weight: 1,
            join_weight: 10,
            where_weight: 5,
            param_weight: 2,
        }
    }
}

/// Raw counts the heuristic is computed from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryFeatures {
    pub word_count: u64,
    pub join_count: u64,
    pub where_count: u64,
    pub param_count: u64,
}

impl QueryFeatures {
    pub fn extract(query: &str, params: &QueryParams) -> Self {
        let upper = query.to_uppercase();
        QueryFeatures {
            word_count: query.split_whitespace().count() as u64,
            join_count: upper.matches("JOIN").count() as u64,
            where_count: upper.matches("WHERE").count() as u64,
            param_count: params.len() as u64,
        }
    }

    pub fn complexity(&self, cost_model: &CostModel) -> u64 {
        self.word_count * cost_model.word_weight
            + self.join_count * cost_model.join_weight
            + self.where_count * cost_model.where_weight
            + self.param_count * cost_model.param_weight
    }
}

/// Memoized planning decision for one `(query, params)` signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryPlan {
    pub query_text: String,
    pub cache_key: String,
    pub complexity_score: u64,
    pub cache_strategy: CacheStrategy,
    pub ttl_seconds: u64,
    pub optimization_hints: Vec<OptimizationHint>,
}

impl QueryPlan {
    pub fn has_hint(&self, hint: OptimizationHint) -> bool {
        self.optimization_hints.contains(&hint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_feature_extraction() {
        let mut params = QueryParams::new();
        params.insert("id".to_string(), json!(7));
        let features = QueryFeatures::extract(
            "select * from a join b on a.id = b.a_id where a.id = :id",
            &params,
        );
        assert_eq!(features.word_count, 14);
        assert_eq!(features.join_count, 1);
        assert_eq!(features.where_count, 1);
        assert_eq!(features.param_count, 1);
        assert_eq!(features.complexity(&CostModel::default()), 14 + 10 + 5 + 2);
    }

    #[test]
    fn test_hint_serialization() {
        let encoded = serde_json::to_string(&OptimizationHint::UsePagination).unwrap();
        assert_eq!(encoded, "\"use_pagination\"");
        assert_eq!(OptimizationHint::ConsiderIndexing.to_string(), "consider_indexing");
    }
}
