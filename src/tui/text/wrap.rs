//! Wrapping of plain text and styled span lines for display.

use ratatui::text::Span;

/// Split text into lines of max width (columns). Uses textwrap for correct
/// UTF-8 handling.
fn wrap_text(s: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![s.to_string()];
    }
    textwrap::wrap(s, width)
        .into_iter()
        .map(|cow| cow.into_owned())
        .collect()
}

/// Split a message into display lines respecting message newlines, then wrap
/// each to `width`.
pub(crate) fn wrap_message(msg: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    for line in msg.split('\n') {
        if line.is_empty() {
            out.push(String::new());
        } else {
            for chunk in wrap_text(line, width) {
                out.push(chunk);
            }
        }
    }
    out
}

/// Slice a span line to the character range [from, to), preserving styles.
fn slice_spans(spans: &[Span<'static>], from: usize, to: usize) -> Vec<Span<'static>> {
    let mut out = Vec::new();
    let mut pos = 0usize;
    for span in spans {
        let len = span.content.chars().count();
        let end = pos + len;
        if end > from && pos < to {
            let skip = from.saturating_sub(pos);
            let take = (to - pos).min(len) - skip;
            let piece: String = span.content.chars().skip(skip).take(take).collect();
            if !piece.is_empty() {
                out.push(Span::styled(piece, span.style));
            }
        }
        pos = end;
    }
    out
}

/// Wrap one styled line into chunks of at most `width` characters, breaking
/// at the last space inside the window when there is one. Styles survive the
/// split because chunks are cut out of the original spans by char range.
pub(crate) fn wrap_spans(spans: Vec<Span<'static>>, width: usize) -> Vec<Vec<Span<'static>>> {
    let total: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    if width == 0 || total <= width {
        return vec![spans];
    }
    let chars: Vec<char> = spans
        .iter()
        .flat_map(|s| s.content.chars())
        .collect();

    let mut out = Vec::new();
    let mut from = 0usize;
    while from < total {
        let window_end = (from + width).min(total);
        let cut = if window_end == total {
            total
        } else {
            // Prefer a word boundary; fall back to a hard break.
            chars[from..window_end]
                .iter()
                .rposition(|c| *c == ' ')
                .map(|i| from + i + 1)
                .filter(|&c| c > from)
                .unwrap_or(window_end)
        };
        out.push(slice_spans(&spans, from, cut));
        // Skip leading spaces on the continuation line.
        from = cut;
        while from < total && chars[from] == ' ' {
            from += 1;
        }
    }
    out
}
