use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Limits {
    /// Deepest nesting of parentheses, unary minus and exponents
    pub max_depth: usize,
    /// Longest accepted expression in bytes, after trimming
    pub max_length: usize,
}

impl Default for Limits {
    fn default() -> Limits {
        Limits {
            max_depth: 64,
            max_length: 4096,
        }
    }
}
