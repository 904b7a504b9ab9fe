//! Math typesetting for the terminal, with per-node error fallback.
//!
//! Each math payload is validated through latex2mathml before display. A
//! payload that fails to typeset becomes a visible error marker for that one
//! node; the rest of the message, other math nodes included, still renders.

use latex2mathml::{DisplayStyle, latex_to_mathml};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

use super::constants::ACCENT_SECONDARY;

/// Glyph substitutions applied for terminal display once a payload has been
/// validated. Ordered so longer commands are rewritten before their prefixes
/// (`\leq` before `\le`, `\subseteq` before `\subset`).
const GLYPHS: &[(&str, &str)] = &[
    ("\\left", ""),
    ("\\right", ""),
    ("\\leq", "≤"),
    ("\\geq", "≥"),
    ("\\neq", "≠"),
    ("\\neg", "¬"),
    ("\\le", "≤"),
    ("\\ge", "≥"),
    ("\\ne", "≠"),
    ("\\times", "×"),
    ("\\cdot", "·"),
    ("\\div", "÷"),
    ("\\pm", "±"),
    ("\\infty", "∞"),
    ("\\to", "→"),
    ("\\sqrt", "√"),
    ("\\sum", "Σ"),
    ("\\prod", "Π"),
    ("\\int", "∫"),
    ("\\pi", "π"),
    ("\\alpha", "α"),
    ("\\beta", "β"),
    ("\\lambda", "λ"),
    ("\\theta", "θ"),
    ("\\Delta", "Δ"),
    ("\\forall", "∀"),
    ("\\exists", "∃"),
    ("\\emptyset", "∅"),
    ("\\subseteq", "⊆"),
    ("\\subset", "⊂"),
    ("\\in", "∈"),
    ("\\cup", "∪"),
    ("\\cap", "∩"),
    ("\\setminus", "∖"),
    ("\\land", "∧"),
    ("\\lor", "∨"),
    ("\\lnot", "¬"),
    ("\\implies", "⇒"),
    ("\\Rightarrow", "⇒"),
    ("\\iff", "⇔"),
    ("\\Leftrightarrow", "⇔"),
    ("\\equiv", "≡"),
    ("\\approx", "≈"),
    ("\\,", " "),
    ("\\;", " "),
    ("\\!", ""),
    ("\\$", "$"),
];

/// Rewrite common LaTeX commands as unicode for terminal display.
fn to_terminal_glyphs(payload: &str) -> String {
    let mut out = payload.trim().to_string();
    for (cmd, glyph) in GLYPHS {
        out = out.replace(cmd, glyph);
    }
    out
}

/// Typeset a math payload. latex2mathml is the arbiter of validity: a parse
/// failure is an error for this node only. Its `[PARSE ERROR:` mtext markers
/// (emitted for unsupported-but-harmless commands) are tolerated, since the
/// surrounding structure is still sound.
pub(crate) fn typeset(payload: &str, display: bool) -> Result<String, String> {
    let style = if display {
        DisplayStyle::Block
    } else {
        DisplayStyle::Inline
    };
    match latex_to_mathml(payload, style) {
        Ok(_) => Ok(to_terminal_glyphs(payload)),
        Err(e) => Err(e.to_string()),
    }
}

fn math_style(display: bool) -> Style {
    let style = Style::default().fg(ACCENT_SECONDARY);
    if display {
        style.add_modifier(Modifier::BOLD)
    } else {
        style
    }
}

fn error_span(reason: &str) -> Span<'static> {
    let short: String = reason.chars().take(40).collect();
    Span::styled(
        format!("⚠ [math error: {}]", short),
        Style::default().fg(Color::Red),
    )
}

/// Span for one inline math node, or an error marker if it will not typeset.
pub(crate) fn inline_math_span(payload: &str) -> Span<'static> {
    match typeset(payload, false) {
        Ok(text) => Span::styled(text, math_style(false)),
        Err(reason) => error_span(&reason),
    }
}

/// Span for one display math node. The draw layer puts it on its own line.
pub(crate) fn display_math_span(payload: &str) -> Span<'static> {
    match typeset(payload, true) {
        Ok(text) => Span::styled(text, math_style(true)),
        Err(reason) => error_span(&reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_payload_typesets() {
        let out = typeset("x^2 + 1", false).unwrap();
        assert_eq!(out, "x^2 + 1");
    }

    #[test]
    fn glyph_substitution() {
        let out = typeset("a \\times b \\leq c", false).unwrap();
        assert_eq!(out, "a × b ≤ c");
    }

    #[test]
    fn left_right_stripped_before_le() {
        let out = typeset("\\left( x \\right)", false).unwrap();
        assert_eq!(out, "( x )");
    }

    #[test]
    fn malformed_payload_is_an_error() {
        assert!(typeset("\\frac{1}{", true).is_err());
    }

    #[test]
    fn failure_is_isolated_per_node() {
        // First node fails, second still typesets: one bad payload never
        // suppresses its neighbours.
        let bad = display_math_span("\\frac{1}{");
        let good = display_math_span("x^2");
        assert!(bad.content.contains("math error"));
        assert_eq!(good.content.as_ref(), "x^2");
    }

    #[test]
    fn error_marker_is_visible_and_bounded() {
        let span = inline_math_span("\\frac{");
        assert!(span.content.starts_with("⚠"));
        assert!(span.content.chars().count() < 70);
    }
}
