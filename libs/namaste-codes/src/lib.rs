//! NAMASTE / ICD-11 code token grammars
//!
//! Source exports carry code cells in loose shapes like `"SR11 (AAA-1)"` where
//! one token is an ICD-11 code and another is the NAMASTE code, in no fixed
//! order. This crate classifies raw tokens against the two grammars and
//! extracts a best-effort `(namaste, icd)` pair from an arbitrary cell.
//!
//! # Examples
//!
//! ```rust
//! use bridge_namaste_codes::extract_mapping_codes;
//!
//! let codes = extract_mapping_codes(Some("SR11 (AAA-1)"));
//! assert_eq!(codes.namaste.as_deref(), Some("AAA-1"));
//! assert_eq!(codes.icd.as_deref(), Some("SR11"));
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

/// NAMASTE code grammar: `AAA-123` (three uppercase letters, hyphen, digits)
/// or 1-3 bare uppercase letters (`BB`).
static NAMASTE_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[A-Z]{3}-\d+|[A-Z]{1,3})$").unwrap());

/// ICD-11 code grammar: optional leading chapter digit, 1-3 uppercase
/// letters, digits, optional dotted subdivision, optional trailing letter
/// (`5A11`, `SR11`, `5A11.1Z`).
static ICD_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d?[A-Z]{1,3}\d+(\.\d+)?[A-Z]?$").unwrap());

/// Best-effort pair extracted from one raw source cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedCodes {
    pub namaste: Option<String>,
    pub icd: Option<String>,
}

/// Whether a single token matches the NAMASTE grammar.
pub fn is_namaste_code(token: &str) -> bool {
    NAMASTE_CODE.is_match(token)
}

/// Whether a single token matches the ICD-11 grammar.
pub fn is_icd_code(token: &str) -> bool {
    ICD_CODE.is_match(token)
}

/// Extract the NAMASTE and ICD-11 codes from a raw source-data cell.
///
/// Parentheses are treated as token separators. With multiple tokens, a token
/// matching the ICD grammar claims the ICD slot; every other token is a
/// NAMASTE candidate and the last one wins. With a single token only the
/// NAMASTE grammar is consulted, and on no match the raw token is still
/// returned as the NAMASTE code — a deliberately lossy fallback kept for
/// compatibility with existing source data (see tests).
///
/// Never fails: `None` input or an all-whitespace cell yields an empty pair.
pub fn extract_mapping_codes(raw: Option<&str>) -> ExtractedCodes {
    let raw = match raw {
        Some(r) => r,
        None => return ExtractedCodes::default(),
    };

    let cleaned = raw.replace(['(', ')'], " ");
    let tokens: Vec<&str> = cleaned.split_whitespace().collect();

    match tokens.as_slice() {
        [] => ExtractedCodes::default(),
        [only] => {
            // Single token: NAMASTE-only check, raw token as lossy fallback.
            ExtractedCodes {
                namaste: Some((*only).to_string()),
                icd: None,
            }
        }
        many => {
            let mut codes = ExtractedCodes::default();
            for token in many {
                if is_icd_code(token) {
                    codes.icd = Some((*token).to_string());
                } else {
                    // Later candidates overwrite earlier ones.
                    codes.namaste = Some((*token).to_string());
                }
            }
            codes
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namaste_grammar_accepts_hyphenated_and_bare_forms() {
        assert!(is_namaste_code("AAA-1"));
        assert!(is_namaste_code("AAA-123"));
        assert!(is_namaste_code("B"));
        assert!(is_namaste_code("BB"));
        assert!(is_namaste_code("BBB"));
    }

    #[test]
    fn namaste_grammar_rejects_icd_shapes() {
        assert!(!is_namaste_code("5A11"));
        assert!(!is_namaste_code("SR11"));
        assert!(!is_namaste_code("5A11.1Z"));
        assert!(!is_namaste_code("AAAA"));
        assert!(!is_namaste_code("aaa-1"));
    }

    #[test]
    fn icd_grammar_accepts_reference_shapes() {
        assert!(is_icd_code("5A11"));
        assert!(is_icd_code("SR11"));
        assert!(is_icd_code("5A11.1Z"));
        assert!(is_icd_code("A1"));
    }

    #[test]
    fn icd_grammar_rejects_namaste_shapes() {
        assert!(!is_icd_code("AAA-1"));
        assert!(!is_icd_code("BB"));
        assert!(!is_icd_code("11"));
    }
}
