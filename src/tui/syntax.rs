//! Syntax highlighting for fenced code blocks using syntect.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, ThemeSet};
use syntect::parsing::SyntaxSet;

use super::constants::ACCENT_SECONDARY;

static SYNTAX_SET: std::sync::OnceLock<SyntaxSet> = std::sync::OnceLock::new();
static THEME_SET: std::sync::OnceLock<ThemeSet> = std::sync::OnceLock::new();

fn syntax_set() -> &'static SyntaxSet {
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme_set() -> &'static ThemeSet {
    THEME_SET.get_or_init(ThemeSet::load_defaults)
}

/// Map a fence language tag to a syntect file extension. Course content is
/// mostly pseudocode and Python; everything else falls back to plain.
fn lang_to_extension(lang: &str) -> &'static str {
    match lang.trim().to_lowercase().as_str() {
        "py" | "python" => "py",
        "rs" | "rust" => "rs",
        "c" | "h" => "c",
        "cpp" | "cc" | "cxx" => "cpp",
        "java" => "java",
        "js" | "javascript" => "js",
        "sh" | "bash" => "sh",
        "sql" => "sql",
        "json" => "json",
        "md" | "markdown" => "md",
        _ => "plain",
    }
}

fn plain_line(line: &str) -> Vec<Span<'static>> {
    vec![Span::styled(
        line.to_string(),
        Style::default().fg(ACCENT_SECONDARY),
    )]
}

fn translate_style(s: syntect::highlighting::Style) -> Style {
    let syntect::highlighting::Color { r, g, b, a } = s.foreground;
    let mut style = Style::default().fg(if a > 0 {
        Color::Rgb(r, g, b)
    } else {
        ACCENT_SECONDARY
    });
    if s.font_style.contains(FontStyle::BOLD) {
        style = style.add_modifier(Modifier::BOLD);
    }
    if s.font_style.contains(FontStyle::ITALIC) {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if s.font_style.contains(FontStyle::UNDERLINE) {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    style
}

/// Highlight a whole code block, one spans-vector per line. Highlighter
/// state carries across lines, so multi-line constructs keep their colors;
/// any failure degrades that line to plain styled text.
pub(super) fn highlight_block(lang: &str, code: &str) -> Vec<Vec<Span<'static>>> {
    let ext = lang_to_extension(lang);
    let ps = syntax_set();
    let syntax = if ext == "plain" {
        None
    } else {
        ps.find_syntax_by_extension(ext)
    };
    let Some(syntax) = syntax else {
        return code.split('\n').map(plain_line).collect();
    };

    let ts = theme_set();
    let Some(theme) = ts
        .themes
        .get("base16-ocean.dark")
        .or_else(|| ts.themes.values().next())
    else {
        return code.split('\n').map(plain_line).collect();
    };

    let mut highlighter = HighlightLines::new(syntax, theme);
    code.split('\n')
        .map(|line| {
            let with_ending = format!("{}\n", line);
            match highlighter.highlight_line(&with_ending, ps) {
                Ok(segments) => segments
                    .into_iter()
                    .filter_map(|(style, content)| {
                        let s = content.trim_end_matches('\n').to_string();
                        (!s.is_empty()).then(|| Span::styled(s, translate_style(style)))
                    })
                    .collect(),
                Err(_) => plain_line(line),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_language_falls_back_to_plain() {
        let lines = highlight_block("fortran77", "print *, 'hi'");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].len(), 1);
        assert_eq!(lines[0][0].content.as_ref(), "print *, 'hi'");
    }

    #[test]
    fn python_block_keeps_line_count() {
        let code = "def f(n):\n    return n + 1";
        let lines = highlight_block("python", code);
        assert_eq!(lines.len(), 2);
        let rebuilt: String = lines[1].iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(rebuilt, "    return n + 1");
    }
}
