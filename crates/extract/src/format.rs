//! Converts rich-text fragments (summaries, descriptions, notes) into short,
//! plain chat text.
//!
//! - `<br>` becomes a newline, block elements become paragraphs.
//! - List items become `- ` prefixed lines.
//! - Plain text without any markup keeps its own line breaks.
//! - Runs of blank lines collapse to a single blank line.
//! - At most [`MAX_PARAGRAPHS`] paragraphs are kept.
//! - The result is cut at [`MAX_FIELD_CHARS`] characters, with `…` appended
//!   when anything was cut.
//!
//! Formatting never fails; input with no text yields an empty string.

use scraper::{ElementRef, Html, Node};

use crate::consts;

/// Maximum number of characters kept before the ellipsis.
pub const MAX_FIELD_CHARS: usize = 250;
/// Maximum number of paragraphs kept.
pub const MAX_PARAGRAPHS: usize = 3;
const ELLIPSIS: char = '…';

/// Formats an HTML (or plain text) fragment.
///
/// ```rust
/// use abstractor_extract::format_html;
/// let text = format_html("<p>First<br>line</p><ul><li>one</li><li>two</li></ul>");
/// assert_eq!(text, "First\nline\n\n- one\n- two");
/// ```
pub fn format_html(fragment: &str) -> String {
    let html = Html::parse_fragment(fragment);
    format_element(html.root_element())
}

/// Formats the contents of an already-parsed element.
pub fn format_element(element: ElementRef<'_>) -> String {
    let mut writer = TextWriter {
        plain: !element.descendants().skip(1).any(|node| node.value().is_element()),
        ..TextWriter::default()
    };
    writer.walk(element);
    finish(&writer.buffer)
}

#[derive(Default)]
struct TextWriter {
    buffer: String,
    pending_space: bool,
    /// No markup at all: line breaks in the text are kept.
    plain: bool,
}
impl TextWriter {
    fn walk(&mut self, element: ElementRef<'_>) {
        for node in element.children() {
            if let Node::Text(text) = node.value() {
                self.text(text);
                continue;
            }
            let Some(child) = ElementRef::wrap(node) else {
                continue;
            };
            match child.value().name() {
                "br" => self.newline(),
                "script" | "style" | "head" => {},
                "p" | "div" | "blockquote" | "ul" | "ol" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                    self.paragraph_break();
                    self.walk(child);
                    self.paragraph_break();
                },
                "li" => {
                    self.line_break();
                    self.buffer.push_str("- ");
                    self.walk(child);
                    self.line_break();
                },
                _ => self.walk(child),
            }
        }
    }

    fn text(&mut self, text: &str) {
        for c in text.chars() {
            if c == '\n' && self.plain {
                self.newline();
                continue;
            }
            if c.is_whitespace() {
                self.pending_space = true;
                continue;
            }
            if self.pending_space && !self.buffer.is_empty() && !self.buffer.ends_with(['\n', ' ']) {
                self.buffer.push(' ');
            }
            self.pending_space = false;
            self.buffer.push(c);
        }
    }

    fn trim_trailing_spaces(&mut self) {
        let trimmed = self.buffer.trim_end_matches(' ').len();
        self.buffer.truncate(trimmed);
        self.pending_space = false;
    }

    fn newline(&mut self) {
        self.trim_trailing_spaces();
        self.buffer.push('\n');
    }

    fn line_break(&mut self) {
        self.trim_trailing_spaces();
        if !self.buffer.is_empty() && !self.buffer.ends_with('\n') {
            self.buffer.push('\n');
        }
    }

    fn paragraph_break(&mut self) {
        self.trim_trailing_spaces();
        if !self.buffer.is_empty() {
            self.buffer.push_str("\n\n");
        }
    }
}

fn finish(raw: &str) -> String {
    let lines: Vec<&str> = raw.lines().map(str::trim_end).collect();
    let joined = lines.join("\n");
    let collapsed = consts::BLANK_LINES_REGEX.replace_all(joined.trim(), "\n\n");
    let paragraphs: Vec<&str> = collapsed.split("\n\n").take(MAX_PARAGRAPHS).collect();
    truncate(paragraphs.join("\n\n").trim_end())
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_FIELD_CHARS {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(MAX_FIELD_CHARS).collect();
    let trimmed = cut.trim_end().len();
    cut.truncate(trimmed);
    cut.push(ELLIPSIS);
    cut
}
