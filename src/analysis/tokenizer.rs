use crate::analysis::token::Token;

pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<Token>;

    fn name(&self) -> &str;

    fn clone_box(&self) -> Box<dyn Tokenizer>;
}

/// Lower-cases, strips non-word characters and splits on whitespace.
///
/// A word character is alphanumeric or `_`. Tokens no longer than
/// `min_token_length` characters are dropped.
#[derive(Debug, Clone)]
pub struct SimpleTokenizer {
    pub min_token_length: usize,
}

impl Default for SimpleTokenizer {
    fn default() -> Self {
        SimpleTokenizer {
            min_token_length: 1,
        }
    }
}

impl SimpleTokenizer {
    fn is_kept(c: char) -> bool {
        c.is_alphanumeric() || c == '_' || c.is_whitespace()
    }
}

impl Tokenizer for SimpleTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let normalized: String = text
            .to_lowercase()
            .chars()
            .filter(|c| Self::is_kept(*c))
            .collect();

        let mut tokens = Vec::new();
        let mut position = 0u32;
        for word in normalized.split_whitespace() {
            if word.chars().count() > self.min_token_length {
                tokens.push(Token::new(word.to_string(), position));
                position += 1;
            }
        }
        tokens
    }

    fn name(&self) -> &str {
        "simple"
    }

    fn clone_box(&self) -> Box<dyn Tokenizer> {
        Box::new(self.clone())
    }
}
