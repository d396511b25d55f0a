//! Key Pattern Module
//!
//! Redis-style glob patterns for key enumeration: `*` matches any run of
//! characters, `?` matches exactly one, everything else is literal.

use regex::Regex;

use crate::error::CacheError;

/// A compiled key pattern.
#[derive(Debug, Clone)]
pub struct KeyPattern {
    source: String,
    regex: Regex,
}

impl KeyPattern {
    pub fn new(pattern: &str) -> Result<Self, CacheError> {
        let mut expr = String::with_capacity(pattern.len() + 8);
        expr.push('^');
        for ch in pattern.chars() {
            match ch {
                '*' => expr.push_str(".*"),
                '?' => expr.push('.'),
                other => expr.push_str(&regex::escape(&other.to_string())),
            }
        }
        expr.push('$');

        let regex = Regex::new(&expr)
            .map_err(|e| CacheError::Internal(format!("invalid key pattern {pattern:?}: {e}")))?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    pub fn matches(&self, key: &str) -> bool {
        self.regex.is_match(key)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_matches_namespace() {
        let pattern = KeyPattern::new("weather:*").unwrap();
        assert!(pattern.matches("weather:paris"));
        assert!(pattern.matches("weather:"));
        assert!(!pattern.matches("forecast:paris:3"));
    }

    #[test]
    fn test_city_forecast_pattern() {
        let pattern = KeyPattern::new("forecast:paris:*").unwrap();
        assert!(pattern.matches("forecast:paris:1"));
        assert!(pattern.matches("forecast:paris:5"));
        assert!(!pattern.matches("forecast:parisian:1"));
        assert!(!pattern.matches("weather:paris"));
    }

    #[test]
    fn test_question_mark_matches_one_char() {
        let pattern = KeyPattern::new("forecast:rome:?").unwrap();
        assert!(pattern.matches("forecast:rome:3"));
        assert!(!pattern.matches("forecast:rome:10"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let pattern = KeyPattern::new("weather:st. john's (nl)").unwrap();
        assert!(pattern.matches("weather:st. john's (nl)"));
        assert!(!pattern.matches("weather:stx john's (nl)"));
    }

    #[test]
    fn test_bare_star_matches_everything() {
        let pattern = KeyPattern::new("*").unwrap();
        assert!(pattern.matches(""));
        assert!(pattern.matches("anything:at:all"));
        assert_eq!(pattern.as_str(), "*");
    }
}
