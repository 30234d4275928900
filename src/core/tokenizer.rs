//! Token estimation for bundle statistics
//!
//! Uses tiktoken (cl100k_base by default) with a character-class heuristic
//! as a fallback when no encoding is wanted or it failed to load.

use once_cell::sync::Lazy;
use std::fmt;
use std::str::FromStr;
use tiktoken_rs::{cl100k_base, o200k_base, CoreBPE};

/// Supported token encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenModel {
    /// cl100k_base encoding (GPT-4, GPT-3.5-turbo, Claude approximation)
    #[default]
    Cl100k,
    /// o200k_base encoding (GPT-4o)
    O200k,
    /// Fast heuristic estimation (no BPE encoding)
    Heuristic,
}

impl TokenModel {
    fn get_bpe(&self) -> Option<&'static CoreBPE> {
        match self {
            TokenModel::Cl100k => CL100K_BPE.as_ref().ok(),
            TokenModel::O200k => O200K_BPE.as_ref().ok(),
            TokenModel::Heuristic => None,
        }
    }

    pub fn available_models() -> &'static [&'static str] {
        &["cl100k", "o200k", "heuristic"]
    }
}

impl fmt::Display for TokenModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenModel::Cl100k => "cl100k",
            TokenModel::O200k => "o200k",
            TokenModel::Heuristic => "heuristic",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for TokenModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cl100k" | "cl100k_base" | "gpt4" | "gpt-4" | "claude" | "default" => {
                Ok(TokenModel::Cl100k)
            }
            "o200k" | "o200k_base" | "gpt4o" | "gpt-4o" => Ok(TokenModel::O200k),
            "heuristic" | "fast" | "estimate" => Ok(TokenModel::Heuristic),
            _ => Err(format!(
                "Unknown model: {}. Available: {}",
                s,
                TokenModel::available_models().join(", ")
            )),
        }
    }
}

// Loaded once on first use
static CL100K_BPE: Lazy<Result<CoreBPE, String>> =
    Lazy::new(|| cl100k_base().map_err(|e| format!("Failed to load cl100k_base: {}", e)));

static O200K_BPE: Lazy<Result<CoreBPE, String>> =
    Lazy::new(|| o200k_base().map_err(|e| format!("Failed to load o200k_base: {}", e)));

/// Count tokens in `text`, falling back to the heuristic when the
/// encoding is unavailable
pub fn count_tokens(text: &str, model: TokenModel) -> usize {
    if text.is_empty() {
        return 0;
    }

    match model.get_bpe() {
        Some(bpe) => bpe.encode_with_special_tokens(text).len(),
        None => estimate_tokens_heuristic(text),
    }
}

/// Rough token count without a BPE encoding.
///
/// Word characters and whitespace cost a quarter token each, ASCII
/// punctuation half a token, wide (non-ASCII) characters two thirds.
pub fn estimate_tokens_heuristic(text: &str) -> usize {
    let (mut word, mut punct, mut wide) = (0usize, 0usize, 0usize);

    for c in text.chars() {
        if c.is_ascii_alphanumeric() || c.is_ascii_whitespace() || c == '_' {
            word += 1;
        } else if c.is_ascii() {
            punct += 1;
        } else {
            wide += 1;
        }
    }

    word.div_ceil(4) + punct.div_ceil(2) + (wide * 2).div_ceil(3)
}
