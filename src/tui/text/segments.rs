//! Message segmentation: split content into prose and fenced code blocks.

/// Segment of a message: prose (which may carry math/bold markup) or a
/// fenced code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MessageSegment<'a> {
    Text(&'a str),
    CodeBlock { lang: &'a str, code: &'a str },
}

/// Byte offset of each line start, including the implicit first line.
fn line_starts(content: &str) -> impl Iterator<Item = usize> + '_ {
    std::iter::once(0).chain(content.match_indices('\n').map(|(i, _)| i + 1))
}

/// Split message content on ``` fences. A fence line is one whose trimmed
/// form starts with three backticks; the remainder of the opening line is the
/// language tag. An unclosed fence swallows the rest of the message as code,
/// so a streaming response mid-code-block still renders sensibly.
pub(crate) fn split_segments(content: &str) -> Vec<MessageSegment<'_>> {
    let mut segments = Vec::new();
    let mut text_from = 0usize;
    let mut open: Option<(&str, usize)> = None; // (lang, code start)

    for start in line_starts(content) {
        let line_end = content[start..]
            .find('\n')
            .map(|i| start + i)
            .unwrap_or(content.len());
        let trimmed = content[start..line_end].trim_start();
        if !trimmed.starts_with("```") {
            continue;
        }
        match open.take() {
            None => {
                if start > text_from {
                    segments.push(MessageSegment::Text(&content[text_from..start]));
                }
                let lang = trimmed[3..].trim();
                open = Some((lang, (line_end + 1).min(content.len())));
            }
            Some((lang, code_start)) => {
                let code = &content[code_start..start.max(code_start)];
                segments.push(MessageSegment::CodeBlock {
                    lang,
                    code: code.strip_suffix('\n').unwrap_or(code),
                });
                text_from = (line_end + 1).min(content.len());
            }
        }
    }

    match open {
        Some((lang, code_start)) => {
            segments.push(MessageSegment::CodeBlock {
                lang,
                code: &content[code_start..],
            });
        }
        None => {
            if text_from < content.len() {
                segments.push(MessageSegment::Text(&content[text_from..]));
            }
        }
    }
    segments
}
