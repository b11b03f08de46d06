//! The rewrite rule table.
//!
//! ## Rule Order
//!
//! The table is a one-pass compiler without an intermediate representation:
//! every rule scans the buffer left behind by all the rules before it, so
//! array position is part of each rule's contract. Rules are grouped into
//! [`Stage`]s whose order is fixed, and the comment above each entry states
//! what it relies on or protects. A unit test checks that stages never go
//! backwards.
//!
//! Substitutions never recurse into their own captures. A captured argument
//! is copied into the output as-is and only touched again by *later* rules,
//! which still scan the whole buffer (so a link inside bold text is converted
//! by the link stage, but a bold inside a section title is left to the
//! fallback stage).

use crate::pipeline::extract::ExtractedFields;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Pipeline stages, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    /// `%` comments, before anything content-sensitive.
    Comments,
    /// `\usepackage`, `\documentclass`, colours, PDF metadata, `\AND` macro.
    Preamble,
    /// Header block → `<h1>`, last-updated macro, preamble span.
    Header,
    /// Page and layout directives.
    Layout,
    /// `\normalsize … \end{header}` → contact `<div>` with the location.
    HeaderClose,
    /// `\section`, `\subsection`.
    Sectioning,
    /// One/two/three column entry environments.
    Environments,
    /// `highlights`, `itemize`, `enumerate`, `\item`.
    Lists,
    /// `\textbf`, `\textit`, boxes.
    Inline,
    /// `\href`, `\url`.
    Links,
    /// `\AND`, `\kern`, `\vspace`, line breaks, escaped characters.
    Spacing,
    /// Catch-all stripping of whatever is left.
    Fallback,
}

/// How a match is turned into output text.
#[derive(Debug)]
pub enum Substitution {
    /// Fixed text; `$` is not interpreted.
    Literal(&'static str),
    /// Capture template in `regex` syntax (`${1}`).
    Template(&'static str),
    /// Arbitrary function of the captures and the extracted header fields.
    Computed(fn(&Captures<'_>, &ExtractedFields) -> String),
}

/// One named pattern → substitution step.
#[derive(Debug)]
pub struct Rule {
    pub name: &'static str,
    pub stage: Stage,
    pub pattern: Regex,
    pub substitution: Substitution,
    /// Matches of this rule drop source content that no earlier rule
    /// understood; they are recorded in the conversion report.
    pub lossy: bool,
}

impl Rule {
    fn new(name: &'static str, stage: Stage, pattern: &str, substitution: Substitution) -> Self {
        Self {
            name,
            stage,
            pattern: Regex::new(pattern).unwrap(),
            substitution,
            lossy: false,
        }
    }

    fn lossy(mut self) -> Self {
        self.lossy = true;
        self
    }

    /// Apply the rule to every non-overlapping match in `text`.
    ///
    /// `on_match` sees the full matched span before it is replaced. Returns
    /// `Cow::Borrowed` when nothing matched.
    pub fn apply<'t>(
        &self,
        text: &'t str,
        fields: &ExtractedFields,
        mut on_match: impl FnMut(&str),
    ) -> Cow<'t, str> {
        self.pattern.replace_all(text, |caps: &Captures<'_>| {
            on_match(&caps[0]);
            match &self.substitution {
                Substitution::Literal(s) => (*s).to_string(),
                Substitution::Template(t) => {
                    let mut dst = String::new();
                    caps.expand(t, &mut dst);
                    dst
                }
                Substitution::Computed(f) => f(caps, fields),
            }
        })
    }
}

/// The rule table, compiled once.
pub static RULES: Lazy<Vec<Rule>> = Lazy::new(build_rules);

/// Borrow the compiled rule table.
pub fn rules() -> &'static [Rule] {
    &RULES
}

/// A braced argument allowing one level of nested braces; capture group.
const ARG: &str = r"((?:[^{}]|\{[^{}]*\})*)";

/// Stylesheet emitted in place of `\titleformat{\section}`.
const SECTION_STYLE: &str = "<style>.section { font-weight: bold; font-size: larger; \
margin-top: 0.3cm; margin-bottom: 0.2cm; border-bottom: 1px solid; }</style>";

const HIDDEN_PAGE_FURNITURE: &str =
    "<header style=\"display: none;\"></header><footer style=\"display: none;\"></footer>";

fn build_rules() -> Vec<Rule> {
    use Stage::*;
    use Substitution::*;

    vec![
        // ── Comments ─────────────────────────────────────────────────────
        // First: every later rule assumes `%…` is gone, and several
        // template lines end in `%` right after the construct they match.
        // `%` after an even run of backslashes follows a line break.
        Rule::new(
            "strip_comments",
            Comments,
            r"(?m)((?:^|[^\\])(?:\\\\)*)%.*$",
            Template("${1}"),
        ),
        // ── Preamble ─────────────────────────────────────────────────────
        // Bracketed form before the bare form so multi-line option lists
        // (geometry, hyperref) go in one piece.
        Rule::new(
            "strip_usepackage_with_options",
            Preamble,
            r"\\usepackage\[[^\]]*\]\{[^{}]*\}",
            Literal(""),
        ),
        Rule::new(
            "strip_usepackage",
            Preamble,
            r"\\usepackage\{[^{}]*\}",
            Literal(""),
        ),
        // Leaves a bare `\documentclass` for `strip_preamble` to anchor on.
        Rule::new(
            "normalize_documentclass",
            Preamble,
            r"\\documentclass\[[^\]]*\]\{[^{}]*\}",
            Literal(r"\documentclass{article}"),
        ),
        Rule::new(
            "strip_definecolor",
            Preamble,
            r"\\definecolor\{[^{}]*\}\{[^{}]*\}\{[^{}]*\}",
            Literal(""),
        ),
        Rule::new(
            "strip_pdf_metadata",
            Preamble,
            r"\bpdf(?:title|author|creator|subject|keywords|producer)=(?:\{[^{}]*\}|[^,\]\n]*),?",
            Literal(""),
        ),
        // Must precede the spacing stage, which would otherwise turn the
        // `\AND` inside the definition into a separator.
        Rule::new(
            "strip_and_macro",
            Preamble,
            r"(?s)\\newcommand\{\\AND\}.*?\\sbox\\ANDbox\{\$\|\$\}",
            Literal(""),
        ),
        // ── Header ───────────────────────────────────────────────────────
        // Consumes the name line too, so the name is not printed twice.
        // Must run before the fallback stage eats `\fontsize` piecemeal.
        Rule::new(
            "header_block",
            Header,
            r"(?s)\\begin\{header\}.*?\\fontsize\{\d+\s*pt\}\{\d+\s*pt\}(?:\\selectfont\s*[^\n]*)?",
            Computed(|_, fields| format!("<h1 class=\"name\">{}</h1>", fields.name)),
        ),
        // The definition's closing brace is the first `}` at column 0.
        Rule::new(
            "strip_last_updated_macro",
            Header,
            r"(?s)\\newcommand\{\\placelastupdatedtext\}.*?\n\}",
            Literal(""),
        ),
        // Relies on `normalize_documentclass`; takes every remaining
        // preamble directive with it.
        Rule::new(
            "strip_preamble",
            Header,
            r"(?s)\\documentclass.*?\\begin\{document\}",
            Literal(""),
        ),
        Rule::new(
            "strip_document_end",
            Header,
            r"\\end\{document\}",
            Literal(""),
        ),
        // ── Layout ───────────────────────────────────────────────────────
        // These only fire on fragments without a `\documentclass`; in a
        // full document `strip_preamble` already removed them.
        Rule::new(
            "strip_length_settings",
            Layout,
            r"\\setlength\{\\(?:parindent|topskip|columnsep)\}\{[^{}]*\}",
            Literal(""),
        ),
        Rule::new(
            "strip_pagenumbering",
            Layout,
            r"\\pagenumbering\{[^{}]*\}",
            Literal(""),
        ),
        Rule::new(
            "strip_titlespacing",
            Layout,
            r"\\titlespacing\*?\{\\section\}\{[^{}]*\}\{[^{}]*\}\{[^{}]*\}",
            Literal(""),
        ),
        Rule::new(
            "hide_page_furniture",
            Layout,
            r"\\pagestyle\{empty\}",
            Literal(HIDDEN_PAGE_FURNITURE),
        ),
        Rule::new(
            "reset_section_counter",
            Layout,
            r"\\setcounter\{secnumdepth\}\{[^{}]*\}",
            Literal("<section style=\"counter-reset: section;\">"),
        ),
        Rule::new(
            "section_title_style",
            Layout,
            r"\\titleformat\{\\section\}\{.*?\}\{.*?\}\{.*?\}\{.*?\}(?:\[.*?\])?",
            Literal(SECTION_STYLE),
        ),
        Rule::new(
            "open_adjustwidth",
            Layout,
            r"\\AtBeginEnvironment\{adjustwidth\}\{[^{}]*\}",
            Literal("<div>"),
        ),
        // ── Header close ─────────────────────────────────────────────────
        // Single injection point of the location. The location's own
        // `\mbox` is dropped from the content since it is hoisted in front.
        Rule::new(
            "header_contact",
            HeaderClose,
            r"(?s)\\normalsize\s*(.*?)\\end\{header\}",
            Computed(header_contact),
        ),
        // ── Sectioning ───────────────────────────────────────────────────
        Rule::new(
            "section",
            Sectioning,
            &format!(r"\\section\*?\{{{ARG}\}}"),
            Template("<h2 class=\"section-title\">${1}</h2>"),
        ),
        Rule::new(
            "subsection",
            Sectioning,
            &format!(r"\\subsection\*?\{{{ARG}\}}"),
            Template("<h3 class=\"subsection-title\">${1}</h3>"),
        ),
        // ── Environments ─────────────────────────────────────────────────
        // Argument is the right-hand column (dates), body the left one;
        // the right column is emitted first.
        Rule::new(
            "two_column_entry",
            Environments,
            &format!(r"(?s)\\begin\{{twocolentry\}}\{{{ARG}\}}(.*?)\\end\{{twocolentry\}}"),
            Computed(|caps, _| {
                format!(
                    "<div class=\"twocol\"><div class=\"twocol2 text-right\">{}</div><div class=\"twocol1\">{}</div></div>",
                    caps[1].trim(),
                    caps[2].trim()
                )
            }),
        ),
        // Whole environment in one match, so the grid is always closed.
        Rule::new(
            "three_column_entry",
            Environments,
            &format!(
                r"(?s)\\begin\{{threecolentry\}}(?:\[[^\]]*\])?\{{{ARG}\}}\{{{ARG}\}}(.*?)\\end\{{threecolentry\}}"
            ),
            Computed(|caps, _| {
                format!(
                    "<div class=\"three-col-entry\"><div class=\"col left\">{}</div><div class=\"col middle\">{}</div><div class=\"col right\">{}</div></div>",
                    caps[1].trim(),
                    caps[2].trim(),
                    caps[3].trim()
                )
            }),
        ),
        Rule::new(
            "open_one_column_entry",
            Environments,
            r"\\begin\{onecolentry\}",
            Literal("<div class=\"one-col-entry\">"),
        ),
        Rule::new(
            "close_one_column_entry",
            Environments,
            r"\\end\{onecolentry\}",
            Literal("</div>"),
        ),
        // ── Lists ────────────────────────────────────────────────────────
        Rule::new(
            "open_highlights",
            Lists,
            r"\\begin\{highlights\}",
            Literal("<ul class=\"highlights\">"),
        ),
        Rule::new(
            "close_highlights",
            Lists,
            r"\\end\{highlights\}",
            Literal("</ul>"),
        ),
        Rule::new(
            "open_itemize",
            Lists,
            r"\\begin\{itemize\}(?:\[[^\]]*\])?",
            Literal("<ul class=\"highlights\">"),
        ),
        Rule::new(
            "close_itemize",
            Lists,
            r"\\end\{itemize\}",
            Literal("</ul>"),
        ),
        Rule::new(
            "open_enumerate",
            Lists,
            r"\\begin\{enumerate\}(?:\[[^\]]*\])?",
            Literal("<ol>"),
        ),
        Rule::new(
            "close_enumerate",
            Lists,
            r"\\end\{enumerate\}",
            Literal("</ol>"),
        ),
        // `\b` keeps `\itemsep` and friends out.
        Rule::new("list_item", Lists, r"\\item\b\s*", Literal("<li>")),
        // Needs the list openers above to tell a first item from the rest.
        // Only `<li>`s between a list opener and its closer are touched.
        Rule::new(
            "close_list_items",
            Lists,
            r"(?s)<[uo]l[^>]*>.*</[uo]l>",
            Computed(close_list_items),
        ),
        // ── Inline ───────────────────────────────────────────────────────
        Rule::new(
            "bold",
            Inline,
            &format!(r"\\textbf\{{{ARG}\}}"),
            Template("<strong>${1}</strong>"),
        ),
        Rule::new(
            "italic",
            Inline,
            &format!(r"\\textit\{{{ARG}\}}"),
            Template("<em>${1}</em>"),
        ),
        // Header contact items are boxed links; unwrap before the link
        // stage so the fallback stage does not strip the whole box.
        Rule::new(
            "unwrap_mbox",
            Inline,
            &format!(r"\\mbox\{{{ARG}\}}"),
            Template("${1}"),
        ),
        // ── Links ────────────────────────────────────────────────────────
        // Header items use `\hrefWithoutArrow`, an alias of `\href`.
        Rule::new(
            "href",
            Links,
            &format!(r"\\href(?:WithoutArrow)?\{{([^{{}}]*)\}}\{{{ARG}\}}"),
            Template("<a href=\"${1}\" target=\"_blank\">${2}</a>"),
        ),
        Rule::new(
            "url",
            Links,
            r"\\url\{([^{}]*)\}",
            Template("<a href=\"${1}\" target=\"_blank\">${1}</a>"),
        ),
        // ── Spacing ──────────────────────────────────────────────────────
        Rule::new(
            "separator",
            Spacing,
            r"\\AND\b",
            Literal("<span class=\"separator\">|</span>"),
        ),
        Rule::new(
            "kern",
            Spacing,
            r"\\kern\s*([\d.]+)\s*pt",
            Template("<span style=\"margin-left: ${1}pt;\"></span>"),
        ),
        Rule::new(
            "vspace",
            Spacing,
            r"\\vspace\*?\{([^{}]*)\}",
            Template("<div class=\"vspace\" style=\"margin-top: ${1};\"></div>"),
        ),
        Rule::new(
            "line_break",
            Spacing,
            r"\\newline\b|\\\\(?:\[[^\]]*\])?",
            Literal("<br>"),
        ),
        // After `line_break`, so `\\` is never read as an escape.
        Rule::new(
            "escaped_characters",
            Spacing,
            r"\\([&%$#_])",
            Computed(|caps, _| match &caps[1] {
                "&" => "&amp;".to_string(),
                other => other.to_string(),
            }),
        ),
        // ── Fallback ─────────────────────────────────────────────────────
        Rule::new("collapse_whitespace", Fallback, r"\s{2,}", Literal(" ")),
        // Innermost invocations only: an argument holding braces is never
        // matched, so a wrapper is dissolved by the next two rules and its
        // nested text survives.
        Rule::new(
            "strip_commands_with_argument",
            Fallback,
            r"\\[a-zA-Z]+\*?\{[^{}]*\}",
            Literal(""),
        )
        .lossy(),
        Rule::new(
            "strip_bare_commands",
            Fallback,
            r"\\[a-zA-Z]+\*?",
            Literal(""),
        )
        .lossy(),
        Rule::new("strip_stray_backslashes", Fallback, r"\\+", Literal("")).lossy(),
        // Keeps the braces of emitted `<style>` blocks.
        Rule::new(
            "strip_braces",
            Fallback,
            r"(?s)(<style>.*?</style>)|[{}]",
            Computed(|caps, _| {
                caps.get(1)
                    .map(|style| style.as_str().to_string())
                    .unwrap_or_default()
            }),
        ),
    ]
}

static RE_LIST_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[uo]l[^>]*>|</[uo]l>|<li>").unwrap());

/// Insert `</li>` before every `<li>` whose list already has an open item.
///
/// One entry per open list on the stack. An item is left open at its list's
/// closer, which HTML allows.
fn close_list_items(caps: &Captures<'_>, _: &ExtractedFields) -> String {
    let region = &caps[0];
    let mut out = String::with_capacity(region.len() + 64);
    let mut item_open: Vec<bool> = Vec::new();
    let mut last = 0;

    for token in RE_LIST_TOKEN.find_iter(region) {
        let text = &region[last..token.start()];
        last = token.end();
        match token.as_str() {
            "<li>" => match item_open.last_mut() {
                Some(open) => {
                    out.push_str(text.trim_end());
                    if *open {
                        out.push_str("</li>");
                    }
                    *open = true;
                }
                None => out.push_str(text),
            },
            closer if closer.starts_with("</") => {
                out.push_str(text);
                item_open.pop();
            }
            _ => {
                out.push_str(text);
                item_open.push(false);
            }
        }
        out.push_str(token.as_str());
    }
    out.push_str(&region[last..]);
    out
}

fn header_contact(caps: &Captures<'_>, fields: &ExtractedFields) -> String {
    let content = &caps[1];
    let content = if fields.location.is_empty() {
        Cow::Borrowed(content)
    } else {
        Cow::Owned(content.replacen(&format!("\\mbox{{{}}}", fields.location), "", 1))
    };
    format!(
        "<div class=\"contact-info\">{}{}</div>",
        fields.location, content
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str) -> &'static Rule {
        rules()
            .iter()
            .find(|r| r.name == name)
            .unwrap_or_else(|| panic!("no rule named {name}"))
    }

    fn apply(name: &str, input: &str) -> String {
        rule(name)
            .apply(input, &ExtractedFields::default(), |_| {})
            .into_owned()
    }

    #[test]
    fn test_all_patterns_compile() {
        assert!(rules().len() > 40);
    }

    #[test]
    fn test_stages_never_go_backwards() {
        for pair in rules().windows(2) {
            assert!(
                pair[0].stage <= pair[1].stage,
                "{} ({:?}) runs after {} ({:?})",
                pair[1].name,
                pair[1].stage,
                pair[0].name,
                pair[0].stage
            );
        }
    }

    #[test]
    fn test_rule_names_unique() {
        let mut names: Vec<_> = rules().iter().map(|r| r.name).collect();
        names.sort_unstable();
        let before = names.len();
        names.dedup();
        assert_eq!(before, names.len());
    }

    #[test]
    fn test_only_fallback_rules_are_lossy() {
        for r in rules().iter().filter(|r| r.lossy) {
            assert_eq!(r.stage, Stage::Fallback, "{} is lossy", r.name);
        }
    }

    #[test]
    fn test_strip_comments_every_line() {
        let input = "a % one\n% whole line\nb%two\nc";
        assert_eq!(apply("strip_comments", input), "a \n\nb\nc");
    }

    #[test]
    fn test_strip_comments_after_line_break() {
        assert_eq!(apply("strip_comments", "a\\\\% note"), "a\\\\");
    }

    #[test]
    fn test_strip_comments_line_break_then_escaped_percent() {
        let input = "a\\\\\\% kept";
        assert_eq!(apply("strip_comments", input), input);
    }

    #[test]
    fn test_strip_comments_keeps_escaped_percent() {
        assert_eq!(apply("strip_comments", "50\\% growth % note"), "50\\% growth ");
    }

    #[test]
    fn test_usepackage_multiline_options() {
        let input = "\\usepackage[\n    top=2 cm,\n    bottom=2 cm\n]{geometry}\\usepackage{titlesec}";
        let once = apply("strip_usepackage_with_options", input);
        assert_eq!(apply("strip_usepackage", &once), "");
    }

    #[test]
    fn test_documentclass_normalised() {
        assert_eq!(
            apply("normalize_documentclass", "\\documentclass[10pt, letterpaper]{article}"),
            "\\documentclass{article}"
        );
    }

    #[test]
    fn test_pdf_metadata() {
        let input = "pdftitle={John Doe's CV},\npdfauthor={John Doe},\npdfcreator={LaTeX with RenderCV},\ncolorlinks=true";
        let out = apply("strip_pdf_metadata", input);
        assert!(!out.contains("pdf"), "got: {out}");
        assert!(out.contains("colorlinks=true"));
    }

    #[test]
    fn test_and_macro_removed() {
        let input = "\\newcommand{\\AND}{\\unskip\n  \\cleaders\\copy\\ANDbox\\hskip\\wd\\ANDbox\n  \\ignorespaces\n}\n\\newsavebox\\ANDbox\n\\sbox\\ANDbox{$|$}\nrest";
        assert_eq!(apply("strip_and_macro", input).trim(), "rest");
    }

    #[test]
    fn test_header_block_uses_extracted_name() {
        let fields = ExtractedFields {
            name: "John Doe".into(),
            location: String::new(),
        };
        let input = "\\begin{header}\n    \\fontsize{25 pt}{25 pt}\\selectfont John Doe\n\n    \\vspace{5 pt}";
        let out = rule("header_block").apply(input, &fields, |_| {});
        assert_eq!(out, "<h1 class=\"name\">John Doe</h1>\n\n    \\vspace{5 pt}");
    }

    #[test]
    fn test_header_block_skips_blank_line_before_name() {
        let fields = ExtractedFields {
            name: "Jane Doe".into(),
            location: String::new(),
        };
        let input = "\\begin{header}\\fontsize{25 pt}{25 pt}\\selectfont\n\n  Jane Doe\nrest";
        let out = rule("header_block").apply(input, &fields, |_| {});
        assert_eq!(out, "<h1 class=\"name\">Jane Doe</h1>\nrest");
    }

    #[test]
    fn test_last_updated_macro_removed() {
        let input = "\\newcommand{\\placelastupdatedtext}{\n  \\AddToShipoutPictureFG*{\n    \\put(1,2){x}\n  }\n}\nkeep";
        assert_eq!(apply("strip_last_updated_macro", input), "\nkeep");
    }

    #[test]
    fn test_preamble_and_document_end_removed() {
        let input = "\\documentclass{article}\n\\pagestyle{empty}\n\\begin{document}\nbody\n\\end{document}\n";
        let once = apply("strip_preamble", input);
        assert_eq!(apply("strip_document_end", &once), "\nbody\n\n");
    }

    #[test]
    fn test_header_contact_hoists_location() {
        let fields = ExtractedFields {
            name: String::new(),
            location: "Your Location".into(),
        };
        let input = "\\normalsize\n\\mbox{Your Location}\n\\AND\n\\end{header}";
        let out = rule("header_contact").apply(input, &fields, |_| {});
        assert_eq!(out, "<div class=\"contact-info\">Your Location\n\\AND\n</div>");
    }

    #[test]
    fn test_two_column_entry_right_first() {
        let input = "\\begin{twocolentry}{\n  Sept 2000 – May 2005\n}\n  \\textbf{UPenn}, BS\\end{twocolentry}";
        let out = apply("two_column_entry", input);
        assert_eq!(
            out,
            "<div class=\"twocol\"><div class=\"twocol2 text-right\">Sept 2000 – May 2005</div><div class=\"twocol1\">\\textbf{UPenn}, BS</div></div>"
        );
    }

    #[test]
    fn test_three_column_entry_single_span() {
        let input = "\\begin{threecolentry}{\\textbf{1}}{June 2023}\n  Body text\n\\end{threecolentry}";
        let out = apply("three_column_entry", input);
        assert_eq!(
            out,
            "<div class=\"three-col-entry\"><div class=\"col left\">\\textbf{1}</div><div class=\"col middle\">June 2023</div><div class=\"col right\">Body text</div></div>"
        );
    }

    #[test]
    fn test_unterminated_three_column_entry_is_left_alone() {
        let input = "\\begin{threecolentry}{a}{b} body";
        assert_eq!(apply("three_column_entry", input), input);
    }

    #[test]
    fn test_item_does_not_match_itemsep() {
        assert_eq!(apply("list_item", "\\itemsep=0pt"), "\\itemsep=0pt");
        assert_eq!(apply("list_item", "\\item A"), "<li>A");
    }

    #[test]
    fn test_close_list_items() {
        let out = apply(
            "close_list_items",
            "<ul class=\"highlights\"> <li>A <li>B <ol><li>x <li>y</ol> <li>C</ul>",
        );
        assert_eq!(
            out,
            "<ul class=\"highlights\"><li>A</li><li>B <ol><li>x</li><li>y</ol></li><li>C</ul>"
        );
    }

    #[test]
    fn test_close_list_items_outside_list() {
        assert_eq!(apply("close_list_items", "text\n<li>x"), "text\n<li>x");
        assert_eq!(
            apply("close_list_items", "<ol><li>a <li>b</ol> <li>c"),
            "<ol><li>a</li><li>b</ol> <li>c"
        );
    }

    #[test]
    fn test_bold_allows_one_nesting_level() {
        assert_eq!(
            apply("bold", "\\textbf{see \\href{u}{t}}"),
            "<strong>see \\href{u}{t}</strong>"
        );
    }

    #[test]
    fn test_href_without_arrow() {
        assert_eq!(
            apply("href", "\\hrefWithoutArrow{mailto:a@b.c}{a@b.c}"),
            "<a href=\"mailto:a@b.c\" target=\"_blank\">a@b.c</a>"
        );
    }

    #[test]
    fn test_url_used_twice() {
        assert_eq!(
            apply("url", "\\url{https://x.test}"),
            "<a href=\"https://x.test\" target=\"_blank\">https://x.test</a>"
        );
    }

    #[test]
    fn test_kern_and_vspace() {
        assert_eq!(
            apply("kern", "\\kern 5.0 pt"),
            "<span style=\"margin-left: 5.0pt;\"></span>"
        );
        assert_eq!(
            apply("vspace", "\\vspace{0.10 cm}"),
            "<div class=\"vspace\" style=\"margin-top: 0.10 cm;\"></div>"
        );
    }

    #[test]
    fn test_line_break() {
        assert_eq!(apply("line_break", "a\\\\b\\newline c\\\\[2pt]d"), "a<br>b<br> c<br>d");
    }

    #[test]
    fn test_escaped_characters() {
        assert_eq!(
            apply("escaped_characters", "R\\&D \\$5 \\#1 a\\_b 9\\%"),
            "R&amp;D $5 #1 a_b 9%"
        );
    }

    #[test]
    fn test_collapse_whitespace_idempotent() {
        let once = apply("collapse_whitespace", "a  \n\n b\t\tc d");
        assert_eq!(once, "a b c d");
        assert_eq!(apply("collapse_whitespace", &once), once);
    }

    #[test]
    fn test_fallback_strips_innermost_first() {
        let once = apply("strip_commands_with_argument", "\\mbox{\\foo{x}{kept}}");
        assert_eq!(once, "\\mbox{{kept}}");
        let twice = apply("strip_bare_commands", &once);
        assert_eq!(apply("strip_braces", &twice), "kept");
    }

    #[test]
    fn test_strip_braces_keeps_style_blocks() {
        let input = format!("{{x}}{SECTION_STYLE}{{y}}");
        assert_eq!(apply("strip_braces", &input), format!("x{SECTION_STYLE}y"));
    }
}
