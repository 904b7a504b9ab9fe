//! Math and bold markup segmentation for chat messages.
//!
//! Splits a message into plain text, inline math, display math, and bold
//! spans so the renderer can typeset each piece on its own. Detection is
//! lenient: an unbalanced or malformed delimiter never fails, the text
//! simply falls through as plain text.

use std::sync::OnceLock;

use regex::Regex;

/// Kind of a detected markup span. Declaration order is the overlap-priority
/// order: display math beats inline math beats bold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum MarkupKind {
    DisplayMath,
    InlineMath,
    Bold,
}

/// A detected span: byte range into the source plus the payload with the
/// delimiters stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MarkupMatch<'a> {
    pub(crate) start: usize,
    pub(crate) len: usize,
    pub(crate) payload: &'a str,
    pub(crate) kind: MarkupKind,
}

impl MarkupMatch<'_> {
    pub(crate) fn end(&self) -> usize {
        self.start + self.len
    }

    fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end() && other.start < self.end()
    }

    fn contained_in(&self, other: &Self) -> bool {
        self.start >= other.start && self.end() <= other.end()
    }
}

/// Renderable unit: literal text, or a typed payload to style/typeset.
/// Nodes come out in source order; concatenating them (with delimiters
/// restored around the typed kinds) reproduces the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MarkupNode<'a> {
    Text(&'a str),
    Bold(&'a str),
    InlineMath(&'a str),
    DisplayMath(&'a str),
}

fn display_dollar_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\$\$(.+?)\$\$").expect("valid regex"))
}

fn display_bracket_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\\\[(.+?)\\\]").expect("valid regex"))
}

fn inline_dollar_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Content may contain escaped dollars (\$) but no raw $ and no newline,
    // so a match never runs away across a paragraph break.
    RE.get_or_init(|| Regex::new(r"\$((?:\\.|[^\\$\n])+?)\$").expect("valid regex"))
}

fn inline_paren_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\\\((.+?)\\\)").expect("valid regex"))
}

fn bold_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*\*([^*]+?)\*\*").expect("valid regex"))
}

/// True when the delimiter at `pos` is escaped with a backslash.
fn escaped_at(source: &str, pos: usize) -> bool {
    pos > 0 && source.as_bytes()[pos - 1] == b'\\'
}

fn collect<'a>(
    re: &Regex,
    source: &'a str,
    kind: MarkupKind,
    out: &mut Vec<MarkupMatch<'a>>,
    keep: impl Fn(&MarkupMatch<'a>) -> bool,
) {
    for caps in re.captures_iter(source) {
        let (Some(whole), Some(payload)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let m = MarkupMatch {
            start: whole.start(),
            len: whole.len(),
            payload: payload.as_str(),
            kind,
        };
        if keep(&m) {
            out.push(m);
        }
    }
}

/// Scan a message for markup spans. Fresh state per call: the result depends
/// only on `source` (and the mode), never on earlier invocations.
///
/// Surviving matches are sorted by start offset and never overlap. Overlap is
/// resolved by the priority rule: an inline-math hit fully inside a
/// display-math span is dropped, a bold hit touching any math span is
/// dropped, and a final sweep discards whatever still collides (longer match
/// first, then kind priority).
///
/// Known limitation, kept on purpose: two bare `$` currency amounts on one
/// line (`costs $5 or $6`) read as inline math. There is no currency
/// convention in chat content to disambiguate with; an escaped `\$` is the
/// supported way to write a literal dollar sign.
pub(crate) fn scan_markup(source: &str, bold_only: bool) -> Vec<MarkupMatch<'_>> {
    let mut matches: Vec<MarkupMatch> = Vec::new();

    if !bold_only {
        collect(display_dollar_re(), source, MarkupKind::DisplayMath, &mut matches, |_| true);
        collect(display_bracket_re(), source, MarkupKind::DisplayMath, &mut matches, |_| true);

        let display = matches.clone();
        collect(inline_dollar_re(), source, MarkupKind::InlineMath, &mut matches, |m| {
            !escaped_at(source, m.start) && !display.iter().any(|d| m.contained_in(d))
        });
        collect(inline_paren_re(), source, MarkupKind::InlineMath, &mut matches, |m| {
            !display.iter().any(|d| m.contained_in(d))
        });
    }

    let math = matches.clone();
    collect(bold_re(), source, MarkupKind::Bold, &mut matches, |m| {
        !math.iter().any(|other| m.overlaps(other))
    });

    // Sort, then sweep out any remaining collision (degenerate input only):
    // at equal starts the longer match wins, then the higher-priority kind.
    matches.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then(b.len.cmp(&a.len))
            .then(a.kind.cmp(&b.kind))
    });
    let mut kept: Vec<MarkupMatch> = Vec::with_capacity(matches.len());
    for m in matches {
        if kept.last().is_none_or(|prev| m.start >= prev.end()) {
            kept.push(m);
        }
    }
    kept
}

fn nodes_from<'a>(source: &'a str, matches: &[MarkupMatch<'a>]) -> Vec<MarkupNode<'a>> {
    let mut nodes = Vec::new();
    let mut cursor = 0usize;
    for m in matches {
        if m.start > cursor {
            // Gap text is kept verbatim, whitespace and newlines included.
            nodes.push(MarkupNode::Text(&source[cursor..m.start]));
        }
        nodes.push(match m.kind {
            MarkupKind::DisplayMath => MarkupNode::DisplayMath(m.payload),
            MarkupKind::InlineMath => MarkupNode::InlineMath(m.payload),
            MarkupKind::Bold => MarkupNode::Bold(m.payload),
        });
        cursor = m.end();
    }
    if cursor < source.len() {
        nodes.push(MarkupNode::Text(&source[cursor..]));
    }
    nodes
}

/// Parse a message into renderable nodes: plain text, bold, and math.
/// An empty source yields an empty node list.
pub(crate) fn parse_markup(source: &str) -> Vec<MarkupNode<'_>> {
    let matches = scan_markup(source, false);
    nodes_from(source, &matches)
}

/// Bold-only variant for static copy (headers, panel labels) where a stray
/// `$` must never be read as math.
pub(crate) fn parse_bold_markup(source: &str) -> Vec<MarkupNode<'_>> {
    let matches = scan_markup(source, true);
    nodes_from(source, &matches)
}
