//! Conversion results, statistics and the fidelity report.

use crate::error::Tex2HtmlError;
use crate::pipeline::extract::ExtractedFields;
use crate::pipeline::rules::Stage;
use serde::{Deserialize, Serialize};

/// Everything produced by one conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// The HTML fragment (or full page when `standalone` was requested).
    pub html: String,
    /// Header fields found before the rewrite.
    pub fields: ExtractedFields,
    /// Which rules fired and what the fallback stage stripped.
    pub report: ConversionReport,
    pub stats: ConversionStats,
}

impl ConversionOutput {
    /// Turn stripped content into an error.
    ///
    /// The rewrite always succeeds; this is for callers who want to reject
    /// documents that used constructs outside the supported vocabulary.
    pub fn into_result(self) -> Result<Self, Tex2HtmlError> {
        match self.report.stripped.first() {
            None => Ok(self),
            Some(first) => Err(Tex2HtmlError::StrippedContent {
                count: self.report.stripped.len(),
                rule: first.rule.clone(),
                first: first.text.clone(),
            }),
        }
    }
}

/// Per-conversion record of rule activity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionReport {
    /// Rules that matched at least once, in pipeline order.
    pub applied: Vec<RuleStat>,
    /// Spans removed by the fallback stage, in the order they were removed.
    ///
    /// Empty when span recording is disabled in the config.
    pub stripped: Vec<StrippedSpan>,
}

impl ConversionReport {
    /// No fallback rule had to strip anything.
    pub fn is_clean(&self) -> bool {
        self.stripped.is_empty()
    }

    /// Number of matches of the named rule (0 when it never fired).
    pub fn matches(&self, rule: &str) -> usize {
        self.applied
            .iter()
            .find(|s| s.rule == rule)
            .map(|s| s.matches)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleStat {
    pub rule: String,
    pub stage: Stage,
    pub matches: usize,
}

/// A piece of source text dropped by a fallback rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrippedSpan {
    pub rule: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    pub input_bytes: usize,
    pub output_bytes: usize,
    /// Distinct rules that matched.
    pub rules_fired: usize,
    /// Total matches of lossy (fallback) rules, recorded or not.
    pub stripped_spans: usize,
    /// Time spent reading or downloading the source. 0 for in-memory input.
    pub fetch_duration_ms: u64,
    pub rewrite_duration_ms: u64,
    pub total_duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(stripped: Vec<StrippedSpan>) -> ConversionOutput {
        ConversionOutput {
            html: "<h1 class=\"name\">Jane</h1>".into(),
            fields: ExtractedFields::default(),
            report: ConversionReport {
                applied: vec![RuleStat {
                    rule: "header_block".into(),
                    stage: Stage::Header,
                    matches: 1,
                }],
                stripped,
            },
            stats: ConversionStats::default(),
        }
    }

    #[test]
    fn clean_output_passes_into_result() {
        let out = output(vec![]).into_result().expect("clean");
        assert!(out.report.is_clean());
        assert_eq!(out.report.matches("header_block"), 1);
        assert_eq!(out.report.matches("section"), 0);
    }

    #[test]
    fn stripped_output_fails_into_result() {
        let err = output(vec![
            StrippedSpan {
                rule: "strip_bare_commands".into(),
                text: "\\raggedright".into(),
            },
            StrippedSpan {
                rule: "strip_commands_with_argument".into(),
                text: "\\foo{x}".into(),
            },
        ])
        .into_result()
        .unwrap_err();
        match err {
            Tex2HtmlError::StrippedContent { count, rule, first } => {
                assert_eq!(count, 2);
                assert_eq!(rule, "strip_bare_commands");
                assert_eq!(first, "\\raggedright");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn report_serialises_stage_in_kebab_case() {
        let json = serde_json::to_string(&output(vec![]).report).unwrap();
        assert!(json.contains("\"stage\":\"header\""), "got: {json}");
    }
}
