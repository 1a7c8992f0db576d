use regex::RegexSet;
use crate::core::error::{Error, Result};

/// Fragments that never appear in the parameterized queries this layer plans.
///
/// This is a coarse deny-list layered on top of parameter binding, not a
/// replacement for it.
const DENY_PATTERNS: &[&str] = &[
    // stacked statements
    r";\s*(drop|delete|truncate|alter|insert|update|create|grant|exec)\b",
    r"\bdrop\s+(table|database|schema)\b",
    r"\bunion\s+(all\s+)?select\b",
    r"\bexec(ute)?\s*\(",
    r"\bxp_cmdshell\b",
    r"--",
    r"/\*",
    r"\bor\s+'?1'?\s*=\s*'?1'?",
    r"\b(sleep|benchmark|pg_sleep)\s*\(",
];

/// Rejects query text matching the deny-list
pub struct QueryValidator {
    patterns: RegexSet,
}

impl QueryValidator {
    pub fn new() -> Result<Self> {
        let patterns = regex::RegexSetBuilder::new(DENY_PATTERNS)
            .case_insensitive(true)
            .build()?;
        Ok(QueryValidator { patterns })
    }

    pub fn is_safe(&self, query: &str) -> bool {
        !self.patterns.is_match(query)
    }

    pub fn validate(&self, query: &str) -> Result<()> {
        if query.trim().is_empty() {
            return Err(Error::invalid_input("query text must not be empty"));
        }
        let matched: Vec<usize> = self.patterns.matches(query).into_iter().collect();
        if !matched.is_empty() {
            return Err(Error::unsafe_query(format!(
                "query matches {} denied pattern(s)",
                matched.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;

    fn validator() -> QueryValidator {
        QueryValidator::new().unwrap()
    }

    #[test]
    fn test_accepts_parameterized_queries() {
        let v = validator();
        assert!(v.is_safe("SELECT * FROM lessons WHERE curriculum_id = :id"));
        assert!(v.is_safe("SELECT l.title FROM lessons l JOIN users u ON u.id = l.owner_id"));
        assert!(v.validate("UPDATE users SET name = :name WHERE id = :id").is_ok());
    }

    #[test]
    fn test_rejects_stacked_drop() {
        let err = validator().validate("SELECT * FROM x; DROP TABLE users").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsafeQuery);
    }

    #[test]
    fn test_rejects_common_injection_shapes() {
        let v = validator();
        for query in [
            "SELECT name FROM a UNION SELECT password FROM users",
            "SELECT * FROM a UNION ALL select secret FROM b",
            "EXEC('shutdown')",
            "SELECT * FROM users WHERE name = 'x' -- comment",
            "SELECT /* hidden */ 1",
            "SELECT * FROM users WHERE id = 1 OR 1=1",
            "SELECT pg_sleep(10)",
        ] {
            assert!(!v.is_safe(query), "expected rejection: {}", query);
        }
    }

    #[test]
    fn test_empty_query_is_invalid_input() {
        assert_eq!(validator().validate("  ").unwrap_err().kind, ErrorKind::InvalidInput);
    }
}
