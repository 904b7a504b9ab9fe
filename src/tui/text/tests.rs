use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

use super::{
    MarkupKind, MarkupNode, MessageSegment, parse_bold_markup, parse_markup, scan_markup,
    split_segments, wrap_message, wrap_spans,
};

#[test]
fn scan_is_idempotent() {
    let s = "Solve $$x^2 = 4$$ then **check** the sign of $x$.";
    let first = scan_markup(s, false);
    let second = scan_markup(s, false);
    assert_eq!(first, second);
}

#[test]
fn scan_empty_input() {
    assert!(scan_markup("", false).is_empty());
    assert!(parse_markup("").is_empty());
}

#[test]
fn plain_text_only() {
    let nodes = parse_markup("no markup here");
    assert_eq!(nodes, vec![MarkupNode::Text("no markup here")]);
}

#[test]
fn inline_math_dollar() {
    let nodes = parse_markup("the root is $\\sqrt{2}$ exactly");
    assert_eq!(
        nodes,
        vec![
            MarkupNode::Text("the root is "),
            MarkupNode::InlineMath("\\sqrt{2}"),
            MarkupNode::Text(" exactly"),
        ]
    );
}

#[test]
fn inline_math_paren_delimiters() {
    let nodes = parse_markup("so \\(a+b\\) holds");
    assert_eq!(
        nodes,
        vec![
            MarkupNode::Text("so "),
            MarkupNode::InlineMath("a+b"),
            MarkupNode::Text(" holds"),
        ]
    );
}

#[test]
fn display_math_spans_lines() {
    let nodes = parse_markup("Consider:\n$$\n\\sum_{i=1}^n i\n$$\nDone.");
    assert_eq!(
        nodes,
        vec![
            MarkupNode::Text("Consider:\n"),
            MarkupNode::DisplayMath("\n\\sum_{i=1}^n i\n"),
            MarkupNode::Text("\nDone."),
        ]
    );
}

#[test]
fn display_math_bracket_delimiters() {
    let nodes = parse_markup("\\[e^{i\\pi} = -1\\]");
    assert_eq!(nodes, vec![MarkupNode::DisplayMath("e^{i\\pi} = -1")]);
}

#[test]
fn inline_math_does_not_cross_newline() {
    // One $ per line: neither forms a pair, everything stays text.
    let s = "price $10\ncost $20";
    assert!(scan_markup(s, false).is_empty());
    assert_eq!(parse_markup(s), vec![MarkupNode::Text(s)]);
}

#[test]
fn math_wins_over_bold_on_overlap() {
    let nodes = parse_markup("**bold $x$ bold**");
    assert_eq!(
        nodes,
        vec![
            MarkupNode::Text("**bold "),
            MarkupNode::InlineMath("x"),
            MarkupNode::Text(" bold**"),
        ]
    );
    assert!(
        !nodes.iter().any(|n| matches!(n, MarkupNode::Bold(_))),
        "bold must not swallow the math span"
    );
}

#[test]
fn display_wins_over_inline_inside() {
    let nodes = parse_markup("$$a + $b$ + c$$");
    assert_eq!(nodes, vec![MarkupNode::DisplayMath("a + $b$ + c")]);
}

#[test]
fn unbalanced_dollar_falls_through_to_text() {
    let s = "This costs \\$5 and $x^2";
    assert!(scan_markup(s, false).is_empty());
    assert_eq!(parse_markup(s), vec![MarkupNode::Text(s)]);
}

#[test]
fn escaped_dollar_inside_payload() {
    let nodes = parse_markup("$a \\$ b$");
    assert_eq!(nodes, vec![MarkupNode::InlineMath("a \\$ b")]);
}

#[test]
fn currency_pair_reads_as_math_known_limitation() {
    // Two bare $ amounts on one line are (mis)read as inline math; the
    // supported escape for a literal dollar sign is \$.
    let nodes = parse_markup("costs $5 or $6");
    assert_eq!(
        nodes,
        vec![
            MarkupNode::Text("costs "),
            MarkupNode::InlineMath("5 or "),
            MarkupNode::Text("6"),
        ]
    );
}

#[test]
fn surviving_matches_never_overlap() {
    let inputs = [
        "$a$$b$ and **c** plus $$d$$",
        "**x $y$ z** $$p **q** r$$ \\(t\\)",
        "$$a$$$b$",
    ];
    for s in inputs {
        let matches = scan_markup(s, false);
        for pair in matches.windows(2) {
            assert!(
                pair[0].start + pair[0].len <= pair[1].start,
                "overlap in {:?}: {:?}",
                s,
                pair
            );
        }
    }
}

#[test]
fn matches_sorted_by_offset() {
    let matches = scan_markup("$b$ then **a** then $$c$$", false);
    let starts: Vec<usize> = matches.iter().map(|m| m.start).collect();
    let mut sorted = starts.clone();
    sorted.sort_unstable();
    assert_eq!(starts, sorted);
    assert_eq!(matches[0].kind, MarkupKind::InlineMath);
    assert_eq!(matches[1].kind, MarkupKind::Bold);
    assert_eq!(matches[2].kind, MarkupKind::DisplayMath);
}

#[test]
fn round_trip_reconstructs_source() {
    let s = "Intro **big** then $$\\int_0^1 x\\,dx$$ and $y_n$ done.";
    let mut rebuilt = String::new();
    for node in parse_markup(s) {
        match node {
            MarkupNode::Text(t) => rebuilt.push_str(t),
            MarkupNode::Bold(t) => {
                rebuilt.push_str("**");
                rebuilt.push_str(t);
                rebuilt.push_str("**");
            }
            MarkupNode::InlineMath(t) => {
                rebuilt.push('$');
                rebuilt.push_str(t);
                rebuilt.push('$');
            }
            MarkupNode::DisplayMath(t) => {
                rebuilt.push_str("$$");
                rebuilt.push_str(t);
                rebuilt.push_str("$$");
            }
        }
    }
    assert_eq!(rebuilt, s);
}

#[test]
fn whitespace_only_gaps_are_preserved() {
    let nodes = parse_markup("$a$ \n $b$");
    assert_eq!(
        nodes,
        vec![
            MarkupNode::InlineMath("a"),
            MarkupNode::Text(" \n "),
            MarkupNode::InlineMath("b"),
        ]
    );
}

#[test]
fn bold_markup_parses() {
    let nodes = parse_markup("a **bold move** indeed");
    assert_eq!(
        nodes,
        vec![
            MarkupNode::Text("a "),
            MarkupNode::Bold("bold move"),
            MarkupNode::Text(" indeed"),
        ]
    );
}

#[test]
fn unclosed_bold_falls_through() {
    let s = "half **open";
    assert_eq!(parse_markup(s), vec![MarkupNode::Text(s)]);
}

#[test]
fn bold_only_mode_ignores_math() {
    let nodes = parse_bold_markup("**Streak** at $5 and $6");
    assert_eq!(
        nodes,
        vec![
            MarkupNode::Bold("Streak"),
            MarkupNode::Text(" at $5 and $6"),
        ]
    );
}

#[test]
fn split_segments_empty() {
    assert!(split_segments("").is_empty());
}

#[test]
fn split_segments_text_only() {
    let segs = split_segments("Hello world");
    assert_eq!(segs, vec![MessageSegment::Text("Hello world")]);
}

#[test]
fn split_segments_single_code_block() {
    let segs = split_segments("```python\nprint(1)\n```");
    assert_eq!(
        segs,
        vec![MessageSegment::CodeBlock {
            lang: "python",
            code: "print(1)"
        }]
    );
}

#[test]
fn split_segments_code_block_without_lang() {
    let segs = split_segments("```\nx = 1\n```");
    assert_eq!(
        segs,
        vec![MessageSegment::CodeBlock {
            lang: "",
            code: "x = 1"
        }]
    );
}

#[test]
fn split_segments_unclosed_code_block() {
    let segs = split_segments("```python\nwhile True:");
    assert_eq!(
        segs,
        vec![MessageSegment::CodeBlock {
            lang: "python",
            code: "while True:"
        }]
    );
}

#[test]
fn split_segments_text_and_code() {
    let segs = split_segments("Try this:\n```python\nx = 1\n```\nDone.");
    assert_eq!(segs.len(), 3);
    assert!(matches!(&segs[0], MessageSegment::Text(t) if t.contains("Try this:")));
    assert!(matches!(&segs[1], MessageSegment::CodeBlock { lang, .. } if *lang == "python"));
    assert!(matches!(&segs[2], MessageSegment::Text(t) if t.contains("Done.")));
}

#[test]
fn split_segments_multiple_code_blocks() {
    let segs = split_segments("```a\n1\n```\nmid\n```b\n2\n```");
    assert_eq!(segs.len(), 3);
    assert!(
        matches!(&segs[0], MessageSegment::CodeBlock { lang, code } if *lang == "a" && *code == "1")
    );
    assert!(matches!(&segs[1], MessageSegment::Text(t) if t.contains("mid")));
    assert!(
        matches!(&segs[2], MessageSegment::CodeBlock { lang, code } if *lang == "b" && *code == "2")
    );
}

#[test]
fn wrap_message_preserves_newlines() {
    let lines = wrap_message("line1\nline2", 100);
    assert_eq!(lines, ["line1", "line2"]);
}

#[test]
fn wrap_message_wraps_long_line() {
    let lines = wrap_message("hello world test", 8);
    assert_eq!(lines, ["hello", "world", "test"]);
}

#[test]
fn wrap_message_empty_lines() {
    let lines = wrap_message("a\n\nb", 100);
    assert_eq!(lines, ["a", "", "b"]);
}

#[test]
fn wrap_spans_short_line_unchanged() {
    let spans = vec![Span::raw("short".to_string())];
    let lines = wrap_spans(spans, 20);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0][0].content.as_ref(), "short");
}

#[test]
fn wrap_spans_breaks_at_word_boundary() {
    let spans = vec![
        Span::raw("alpha ".to_string()),
        Span::styled(
            "beta".to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" gamma".to_string()),
    ];
    let lines = wrap_spans(spans, 12);
    assert_eq!(lines.len(), 2);
    let first: String = lines[0].iter().map(|s| s.content.as_ref()).collect();
    let second: String = lines[1].iter().map(|s| s.content.as_ref()).collect();
    assert_eq!(first, "alpha beta ");
    assert_eq!(second, "gamma");
    // Styling survives the split.
    assert!(
        lines[0]
            .iter()
            .any(|s| s.style.add_modifier.contains(Modifier::BOLD))
    );
}

#[test]
fn wrap_spans_hard_breaks_unbroken_run() {
    let spans = vec![Span::raw("abcdefghij".to_string())];
    let lines = wrap_spans(spans, 4);
    let chunks: Vec<String> = lines
        .iter()
        .map(|l| l.iter().map(|s| s.content.as_ref()).collect())
        .collect();
    assert_eq!(chunks, ["abcd", "efgh", "ij"]);
}
