//! The rewrite driver: run the rule table over a working buffer.
//!
//! The driver owns no knowledge of LaTeX; it only walks
//! [`rules::RULES`](crate::pipeline::rules::RULES) left to right, swaps the
//! buffer when a rule matched, and keeps the books for the
//! [`ConversionReport`]. It cannot fail: a rule with no match is a no-op and
//! the worst case is an empty string.

use crate::output::{ConversionReport, RuleStat, StrippedSpan};
use crate::pipeline::extract::ExtractedFields;
use crate::pipeline::rules::{self, Rule};
use std::borrow::Cow;
use tracing::debug;

/// Result of a rewrite: the HTML and the rule activity that produced it.
#[derive(Debug, Clone, Default)]
pub struct Rewrite {
    pub html: String,
    pub report: ConversionReport,
    /// Matches of lossy rules, counted even when spans are not recorded.
    pub stripped_count: usize,
}

/// Rewrite `source` into HTML using the standard rule table.
pub fn rewrite(source: &str, fields: &ExtractedFields) -> String {
    Rewriter::new(fields).run(source).html
}

/// Configurable runner over a rule table.
#[derive(Debug)]
pub struct Rewriter<'f> {
    fields: &'f ExtractedFields,
    rules: &'static [Rule],
    record_spans: bool,
}

impl<'f> Rewriter<'f> {
    pub fn new(fields: &'f ExtractedFields) -> Self {
        Self {
            fields,
            rules: rules::rules(),
            record_spans: true,
        }
    }

    /// Whether to copy every stripped span into the report. Default: true.
    pub fn record_spans(mut self, v: bool) -> Self {
        self.record_spans = v;
        self
    }

    pub fn run(&self, source: &str) -> Rewrite {
        let mut buffer = source.to_string();
        let mut out = Rewrite::default();

        for rule in self.rules {
            let mut matches = 0usize;
            let mut spans: Vec<String> = Vec::new();
            let record = rule.lossy && self.record_spans;

            let next = match rule.apply(&buffer, self.fields, |m| {
                matches += 1;
                if record {
                    spans.push(m.to_string());
                }
            }) {
                Cow::Borrowed(_) => None,
                Cow::Owned(s) => Some(s),
            };
            if let Some(next) = next {
                buffer = next;
            }

            if matches == 0 {
                continue;
            }
            debug!(rule = rule.name, stage = ?rule.stage, matches, "rule applied");

            out.report.applied.push(RuleStat {
                rule: rule.name.to_string(),
                stage: rule.stage,
                matches,
            });
            if rule.lossy {
                out.stripped_count += matches;
                out.report
                    .stripped
                    .extend(spans.into_iter().map(|text| StrippedSpan {
                        rule: rule.name.to_string(),
                        text,
                    }));
            }
        }

        out.html = buffer.trim().to_string();
        out
    }
}
