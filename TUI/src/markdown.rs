//! Markdown rendering for generated output.
//!
//! Generation results are usually markdown. This covers the subset models
//! actually emit (headings, lists, fenced code, quotes, rules, bold, italic,
//! inline code) and turns it into styled ratatui lines. Wrapping is left to
//! the `Paragraph` that displays them.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

const CODE_BG: Color = Color::Rgb(40, 44, 52);
const CODE_FG: Color = Color::Rgb(171, 178, 191);
const HEADING_COLOR: Color = Color::Rgb(101, 150, 243);
const BOLD_COLOR: Color = Color::Rgb(234, 208, 148);
const ITALIC_COLOR: Color = Color::Rgb(131, 179, 102);
const BULLET_COLOR: Color = Color::Rgb(211, 164, 234);
const QUOTE_COLOR: Color = Color::Rgb(128, 128, 128);
const RULE_COLOR: Color = Color::Rgb(70, 85, 110);
const TEXT_COLOR: Color = Color::Rgb(240, 240, 245);

#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text(String),
    Bold(String),
    Italic(String),
    Code(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading { level: u8, spans: Vec<Inline> },
    ListItem { indent: usize, marker: String, spans: Vec<Inline> },
    Quote(Vec<Inline>),
    Code { language: Option<String>, lines: Vec<String> },
    Rule,
    Paragraph(Vec<Inline>),
    Blank,
}

/// Split markdown text into blocks, one per source line except fenced code.
pub fn parse_blocks(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut code: Option<(Option<String>, Vec<String>)> = None;

    for line in text.lines() {
        if line.trim_start().starts_with("```") {
            match code.take() {
                Some((language, lines)) => blocks.push(Block::Code { language, lines }),
                None => {
                    let lang = line.trim_start().trim_start_matches('`').trim();
                    let language = (!lang.is_empty()).then(|| lang.to_string());
                    code = Some((language, Vec::new()));
                }
            }
            continue;
        }

        if let Some((_, lines)) = code.as_mut() {
            lines.push(line.to_string());
            continue;
        }

        blocks.push(parse_line(line));
    }

    // Unterminated fence: keep what we have
    if let Some((language, lines)) = code {
        blocks.push(Block::Code { language, lines });
    }

    blocks
}

fn parse_line(line: &str) -> Block {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Block::Blank;
    }

    if is_rule(trimmed) {
        return Block::Rule;
    }

    let hashes = trimmed.chars().take_while(|c| *c == '#').count();
    if (1..=6).contains(&hashes) && trimmed[hashes..].starts_with(' ') {
        return Block::Heading {
            level: hashes as u8,
            spans: parse_inline(trimmed[hashes..].trim()),
        };
    }

    if let Some(quote) = trimmed.strip_prefix('>') {
        return Block::Quote(parse_inline(quote.trim()));
    }

    let indent = line.len() - line.trim_start().len();
    for bullet in ["- ", "* ", "+ "] {
        if let Some(item) = trimmed.strip_prefix(bullet) {
            return Block::ListItem {
                indent,
                marker: "•".to_string(),
                spans: parse_inline(item),
            };
        }
    }

    let digits = trimmed.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let after = &trimmed[digits..];
        if after.starts_with(". ") || after.starts_with(") ") {
            return Block::ListItem {
                indent,
                marker: format!("{}.", &trimmed[..digits]),
                spans: parse_inline(&after[2..]),
            };
        }
    }

    Block::Paragraph(parse_inline(line.trim_end()))
}

fn is_rule(trimmed: &str) -> bool {
    let mut chars = trimmed.chars().filter(|c| !c.is_whitespace());
    let Some(first) = chars.next() else {
        return false;
    };
    matches!(first, '-' | '*' | '_')
        && trimmed.chars().filter(|c| *c == first).count() >= 3
        && chars.all(|c| c == first)
}

/// Parse bold (`**`), italic (`*`) and inline code spans.
///
/// Markers only open before a non-space and close after one, so `2 * 3 * 4`
/// stays literal.
pub fn parse_inline(line: &str) -> Vec<Inline> {
    let mut spans = Vec::new();
    let mut text = String::new();
    let mut rest = line;

    while let Some(c) = rest.chars().next() {
        let marker = if rest.starts_with("**") {
            Some("**")
        } else if c == '*' {
            Some("*")
        } else if c == '`' {
            Some("`")
        } else {
            None
        };

        if let Some(marker) = marker {
            let after = &rest[marker.len()..];
            if let Some(end) = find_closing(after, marker) {
                if !text.is_empty() {
                    spans.push(Inline::Text(std::mem::take(&mut text)));
                }
                let content = after[..end].to_string();
                spans.push(match marker {
                    "**" => Inline::Bold(content),
                    "*" => Inline::Italic(content),
                    _ => Inline::Code(content),
                });
                rest = &after[end + marker.len()..];
                continue;
            }
        }

        text.push(c);
        rest = &rest[c.len_utf8()..];
    }

    if !text.is_empty() {
        spans.push(Inline::Text(text));
    }
    spans
}

fn find_closing(after: &str, marker: &str) -> Option<usize> {
    // Code spans may contain anything; emphasis must hug its content
    if marker == "`" {
        return after.find('`').filter(|end| *end > 0);
    }
    if after.starts_with(char::is_whitespace) {
        return None;
    }
    let end = after.find(marker)?;
    if end == 0 || after[..end].ends_with(char::is_whitespace) {
        return None;
    }
    Some(end)
}

fn inline_spans(spans: &[Inline], base: Style) -> Vec<Span<'static>> {
    spans
        .iter()
        .map(|inline| match inline {
            Inline::Text(t) => Span::styled(t.clone(), base),
            Inline::Bold(t) => Span::styled(
                t.clone(),
                base.fg(BOLD_COLOR).add_modifier(Modifier::BOLD),
            ),
            Inline::Italic(t) => Span::styled(
                t.clone(),
                base.fg(ITALIC_COLOR).add_modifier(Modifier::ITALIC),
            ),
            Inline::Code(t) => Span::styled(
                format!(" {} ", t),
                Style::default().fg(CODE_FG).bg(CODE_BG),
            ),
        })
        .collect()
}

/// Render markdown to styled lines.
pub fn render_markdown(text: &str) -> Vec<Line<'static>> {
    let base = Style::default().fg(TEXT_COLOR);
    let mut lines = Vec::new();

    for block in parse_blocks(text) {
        match block {
            Block::Heading { level, spans } => {
                let mut style = base.fg(HEADING_COLOR).add_modifier(Modifier::BOLD);
                if level == 1 {
                    style = style.add_modifier(Modifier::UNDERLINED);
                }
                lines.push(Line::from(inline_spans(&spans, style)));
            }
            Block::ListItem { indent, marker, spans } => {
                let mut line_spans = vec![
                    Span::raw(" ".repeat(indent)),
                    Span::styled(format!("{} ", marker), Style::default().fg(BULLET_COLOR)),
                ];
                line_spans.extend(inline_spans(&spans, base));
                lines.push(Line::from(line_spans));
            }
            Block::Quote(spans) => {
                let style = Style::default().fg(QUOTE_COLOR).add_modifier(Modifier::ITALIC);
                let mut line_spans = vec![Span::styled("▎ ", style)];
                line_spans.extend(inline_spans(&spans, style));
                lines.push(Line::from(line_spans));
            }
            Block::Code { language, lines: code } => {
                let frame = Style::default().fg(CODE_FG);
                lines.push(Line::from(Span::styled(
                    format!("┌─ {} ", language.as_deref().unwrap_or("code")),
                    frame,
                )));
                for code_line in code {
                    lines.push(Line::from(vec![
                        Span::styled("│ ", frame),
                        Span::styled(code_line, Style::default().fg(CODE_FG).bg(CODE_BG)),
                    ]));
                }
                lines.push(Line::from(Span::styled("└─", frame)));
            }
            Block::Rule => {
                lines.push(Line::from(Span::styled(
                    "─".repeat(40),
                    Style::default().fg(RULE_COLOR),
                )));
            }
            Block::Paragraph(spans) => lines.push(Line::from(inline_spans(&spans, base))),
            Block::Blank => lines.push(Line::default()),
        }
    }

    lines
}

/// Raw view: one unstyled line per source line.
pub fn render_raw(text: &str) -> Vec<Line<'static>> {
    text.lines()
        .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(TEXT_COLOR))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_parse_heading() {
        assert_eq!(
            parse_blocks("## Recursion"),
            vec![Block::Heading {
                level: 2,
                spans: vec![Inline::Text("Recursion".to_string())]
            }]
        );
        // No space after the hashes: not a heading
        assert!(matches!(parse_blocks("#hashtag")[0], Block::Paragraph(_)));
    }

    #[test]
    fn test_parse_lists() {
        let blocks = parse_blocks("- one\n  * two\n3. three");

        assert_eq!(
            blocks,
            vec![
                Block::ListItem {
                    indent: 0,
                    marker: "•".to_string(),
                    spans: vec![Inline::Text("one".to_string())]
                },
                Block::ListItem {
                    indent: 2,
                    marker: "•".to_string(),
                    spans: vec![Inline::Text("two".to_string())]
                },
                Block::ListItem {
                    indent: 0,
                    marker: "3.".to_string(),
                    spans: vec![Inline::Text("three".to_string())]
                },
            ]
        );
    }

    #[test]
    fn test_parse_code_fence() {
        let blocks = parse_blocks("```python\ndef f(n):\n    return n\n```\ndone");

        assert_eq!(
            blocks[0],
            Block::Code {
                language: Some("python".to_string()),
                lines: vec!["def f(n):".to_string(), "    return n".to_string()]
            }
        );
        assert!(matches!(blocks[1], Block::Paragraph(_)));
    }

    #[test]
    fn test_unclosed_code_fence_is_kept() {
        let blocks = parse_blocks("```\nlet x = 1;");

        assert_eq!(
            blocks,
            vec![Block::Code {
                language: None,
                lines: vec!["let x = 1;".to_string()]
            }]
        );
    }

    #[test]
    fn test_parse_rule_and_quote() {
        let blocks = parse_blocks("---\n> wise words\n* * *");

        assert_eq!(blocks[0], Block::Rule);
        assert_eq!(
            blocks[1],
            Block::Quote(vec![Inline::Text("wise words".to_string())])
        );
        assert_eq!(blocks[2], Block::Rule);
    }

    #[test]
    fn test_parse_inline_styles() {
        assert_eq!(
            parse_inline("Use **regex** with *care* and `^\\w+$`"),
            vec![
                Inline::Text("Use ".to_string()),
                Inline::Bold("regex".to_string()),
                Inline::Text(" with ".to_string()),
                Inline::Italic("care".to_string()),
                Inline::Text(" and ".to_string()),
                Inline::Code("^\\w+$".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_inline_literal_asterisks() {
        assert_eq!(
            parse_inline("2 * 3 * 4"),
            vec![Inline::Text("2 * 3 * 4".to_string())]
        );
        assert_eq!(
            parse_inline("**unclosed"),
            vec![Inline::Text("**unclosed".to_string())]
        );
    }

    #[test]
    fn test_parse_inline_multibyte() {
        assert_eq!(
            parse_inline("café **crème**"),
            vec![
                Inline::Text("café ".to_string()),
                Inline::Bold("crème".to_string()),
            ]
        );
    }

    #[test]
    fn test_render_code_block_frame() {
        let lines = render_markdown("```rust\nfn main() {}\n```");

        let text: Vec<String> = lines.iter().map(line_text).collect();
        assert_eq!(text, vec!["┌─ rust ", "│ fn main() {}", "└─"]);
    }

    #[test]
    fn test_render_list_marker() {
        let lines = render_markdown("- **bold** item");

        assert_eq!(line_text(&lines[0]), "• bold item");
    }

    #[test]
    fn test_render_raw_keeps_markers() {
        let lines = render_raw("# Title\n**x**");

        assert_eq!(line_text(&lines[0]), "# Title");
        assert_eq!(line_text(&lines[1]), "**x**");
    }
}
