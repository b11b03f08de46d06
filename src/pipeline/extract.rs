//! Field extraction: pull the header name and location out of the raw source.
//!
//! ## Why extract before rewriting?
//!
//! The rewrite pipeline deletes the header block wholesale (the
//! `\fontsize…\selectfont` directive and the `\mbox{…Location}` it keys off)
//! and re-emits it as HTML. Both fields therefore have to be read from the
//! untouched source first and handed to the rewrite as [`ExtractedFields`].
//!
//! Both extractors are total: a missing construct is the empty string, never
//! an error.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// The two header fields spliced back into the rewritten body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    /// Text printed by the large-font header directive. Empty when absent.
    pub name: String,
    /// Argument of the first `\mbox{…Location}`. Empty when absent.
    pub location: String,
}

impl ExtractedFields {
    /// True when neither field was found.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.location.is_empty()
    }
}

// The argument must stay inside one brace group, so `\mbox{a}\mbox{Location}`
// yields `Location`, not `a}\mbox{Location`. One level of nesting is allowed.
static RE_LOCATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\mbox\{((?:[^{}\n]|\{[^{}\n]*\})*Location)\}").unwrap()
});

static RE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\fontsize\{\d+\s*pt\}\{\d+\s*pt\}\\selectfont\s*(.+)").unwrap()
});

// An even run of backslashes before `%` is line breaks, not an escape.
static RE_TRAILING_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"((?:^|[^\\])(?:\\\\)*)%.*$").unwrap());

/// Extract both header fields from the raw LaTeX source.
pub fn extract_fields(source: &str) -> ExtractedFields {
    ExtractedFields {
        name: extract_name(source),
        location: extract_location(source),
    }
}

/// Return the argument of the first `\mbox{…}` whose text ends in `Location`.
///
/// The literal word `Location` is part of the returned value.
pub fn extract_location(source: &str) -> String {
    RE_LOCATION
        .captures(source)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default()
}

/// Return the text following the first `\fontsize{N pt}{N pt}\selectfont`.
///
/// Only the rest of that line is taken, or the next non-blank line when the
/// directive ends its own line. A trailing `%` comment and surrounding whitespace are
/// dropped.
pub fn extract_name(source: &str) -> String {
    let Some(caps) = RE_NAME.captures(source) else {
        return String::new();
    };
    let line = &caps[1];
    RE_TRAILING_COMMENT
        .replace(line, "${1}")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_name_and_location() {
        let src = "\\fontsize{25 pt}{25 pt}\\selectfont Jane Doe\n\\mbox{Springfield, Location}";
        let fields = extract_fields(src);
        assert_eq!(fields.name, "Jane Doe");
        assert_eq!(fields.location, "Springfield, Location");
    }

    #[test]
    fn test_defaults_to_empty() {
        let fields = extract_fields("\\section{Experience}\n\\textbf{nothing here}");
        assert_eq!(fields, ExtractedFields::default());
        assert!(fields.is_empty());
    }

    #[test]
    fn test_first_match_wins() {
        let src = "\\mbox{Paris Location}\n\\mbox{Berlin Location}";
        assert_eq!(extract_location(src), "Paris Location");
    }

    #[test]
    fn test_location_stays_in_one_group() {
        let src = "\\mbox{phone}\\mbox{Your Location}";
        assert_eq!(extract_location(src), "Your Location");
    }

    #[test]
    fn test_location_must_end_with_keyword() {
        assert_eq!(extract_location("\\mbox{Location of office}"), "");
    }

    #[test]
    fn test_name_drops_trailing_comment() {
        let src = "\\fontsize{25 pt}{25 pt}\\selectfont John Doe %the name\n";
        assert_eq!(extract_name(src), "John Doe");
    }

    #[test]
    fn test_name_on_next_line() {
        let src = "\\fontsize{30pt}{30pt}\\selectfont\n    Ada Lovelace\n";
        assert_eq!(extract_name(src), "Ada Lovelace");
    }

    #[test]
    fn test_name_keeps_escaped_percent() {
        let src = "\\fontsize{25 pt}{25 pt}\\selectfont 100\\% Jane";
        assert_eq!(extract_name(src), "100\\% Jane");
    }

    #[test]
    fn test_name_after_blank_line() {
        let src = "\\fontsize{25 pt}{25 pt}\\selectfont\n\n  Name After Blank\n";
        assert_eq!(extract_name(src), "Name After Blank");
    }

    #[test]
    fn test_name_comment_after_line_break() {
        let src = "\\fontsize{25 pt}{25 pt}\\selectfont Jane Doe\\\\% spacing";
        assert_eq!(extract_name(src), "Jane Doe\\\\");
    }

    #[test]
    fn test_location_with_nested_group() {
        let src = "\\mbox{\\textit{Springfield}, Location}";
        assert_eq!(extract_location(src), "\\textit{Springfield}, Location");
    }
}
