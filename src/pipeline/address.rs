//! Address span extraction.
//!
//! Two forms, tried in order: an explicit "по адресу: ..." prefix, then a
//! street-type marker word ("улица", "st.", "straße"). Both capture up to
//! the next comma, semicolon or line end.

use regex::Regex;

use crate::config::{word_list_pattern, Vocabulary, VocabularyError};

use super::{collapse_ws, splice_out};

/// Result of scanning one fragment for an address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressMatch {
    pub address: Option<String>,

    /// Fragment with the address span removed
    pub text: String,
}

/// Extracts address spans from fragments.
pub struct AddressExtractor {
    re_prefix: Regex,
    re_street: Regex,
}

impl AddressExtractor {
    pub fn new(vocab: &Vocabulary) -> Result<Self, VocabularyError> {
        let prefixes = word_list_pattern(&vocab.address_prefixes);
        let markers = word_list_pattern(&vocab.street_markers);

        Ok(Self {
            re_prefix: Regex::new(&format!(
                r"(?i)\b(?:{prefixes})\s*[:\-]?\s*([^,;]+)"
            ))?,
            re_street: Regex::new(&format!(r"(?i)\b((?:{markers})\s+[^\n,;]+)"))?,
        })
    }

    /// Extract an address from a fragment, if one is introduced by a prefix
    /// or street marker. Without a match the fragment comes back unchanged
    /// except for whitespace normalization.
    pub fn extract(&self, fragment: &str) -> AddressMatch {
        let t = collapse_ws(fragment);
        if t.is_empty() {
            return AddressMatch {
                address: None,
                text: String::new(),
            };
        }

        if let Some(caps) = self.re_prefix.captures(&t) {
            if let (Some(whole), Some(span)) = (caps.get(0), caps.get(1)) {
                let address = trim_address(span.as_str());
                return AddressMatch {
                    address: (!address.is_empty()).then(|| address),
                    text: splice_out(&t, whole.range()),
                };
            }
        }

        if let Some(caps) = self.re_street.captures(&t) {
            if let (Some(whole), Some(span)) = (caps.get(0), caps.get(1)) {
                let address = trim_address(span.as_str());
                return AddressMatch {
                    address: (!address.is_empty()).then(|| address),
                    text: splice_out(&t, whole.range()),
                };
            }
        }

        AddressMatch {
            address: None,
            text: t,
        }
    }
}

fn trim_address(span: &str) -> String {
    span.trim()
        .trim_matches(|c: char| matches!(c, ' ' | '.' | ',' | ':' | ';' | '-'))
        .to_string()
}
