//! Maps block nodes onto presentation primitives.
//!
//! A [`Presenter`] is the sink supplied by the display layer; [`present`]
//! walks the nodes in order and calls one primitive per block. The mapping
//! holds no state of its own, so the same nodes always give the same output.

use crate::entity::{literal_text, ListKind, Markdown, MarkdownInline, MarkdownText};

use tracing::trace;

const SAFE_SCHEMES: &[&str] = &["http", "https", "mailto"];

pub trait Presenter {
    type Output;

    fn paragraph(&mut self, text: &MarkdownText);
    fn heading(&mut self, level: usize, text: &MarkdownText);
    fn list(&mut self, kind: ListKind, items: &[MarkdownText]);
    fn code_block(&mut self, language: Option<&str>, lines: &[String]);
    fn blockquote(&mut self, text: &MarkdownText);
    fn horizontal_rule(&mut self);
    fn spacer(&mut self);

    fn finish(self) -> Self::Output;
}

pub fn present<P: Presenter>(markdown: &[Markdown], mut presenter: P) -> P::Output {
    for block in markdown {
        match block {
            Markdown::Paragraph(text) => presenter.paragraph(text),
            Markdown::Heading(level, text) => presenter.heading(*level, text),
            Markdown::UnorderedList(items) => presenter.list(ListKind::Bullet, items),
            Markdown::OrderedList(items) => presenter.list(ListKind::Numbered, items),
            Markdown::Codeblock(language, lines) => {
                presenter.code_block(language.as_deref(), lines)
            }
            Markdown::Blockquote(text) => presenter.blockquote(text),
            Markdown::HorizontalRule => presenter.horizontal_rule(),
            Markdown::Spacer => presenter.spacer(),
        }
    }
    trace!(blocks = markdown.len(), "presented markdown");
    presenter.finish()
}

/// Renders the nodes as an HTML fragment.
pub fn translate(markdown: Vec<Markdown>) -> String {
    present(&markdown, HtmlPresenter::default())
}

#[derive(Debug, Default)]
pub struct HtmlPresenter {
    buf: String,
}

impl HtmlPresenter {
    fn push_escaped(&mut self, s: &str) {
        for c in s.chars() {
            match c {
                '&' => self.buf.push_str("&amp;"),
                '<' => self.buf.push_str("&lt;"),
                '>' => self.buf.push_str("&gt;"),
                '"' => self.buf.push_str("&quot;"),
                '\'' => self.buf.push_str("&#39;"),
                c => self.buf.push(c),
            }
        }
    }

    fn push_inline(&mut self, span: &MarkdownInline) {
        let (open, close) = match span {
            MarkdownInline::Plaintext(s) => return self.push_escaped(s),
            MarkdownInline::Link(text, href) => {
                self.buf.push_str("<a href=\"");
                self.push_escaped(safe_href(href));
                self.buf
                    .push_str("\" target=\"_blank\" rel=\"noopener noreferrer\">");
                self.push_escaped(text);
                self.buf.push_str("</a>");
                return;
            }
            MarkdownInline::Bold(_) => ("<strong>", "</strong>"),
            MarkdownInline::Italic(_) => ("<em>", "</em>"),
            MarkdownInline::InlineCode(_) => ("<code>", "</code>"),
            MarkdownInline::Strike(_) => ("<del>", "</del>"),
        };
        self.buf.push_str(open);
        self.push_escaped(span.literal());
        self.buf.push_str(close);
    }

    fn push_text(&mut self, text: &MarkdownText) {
        for span in text {
            self.push_inline(span);
        }
    }

    fn push_element(&mut self, tag: &str, text: &MarkdownText) {
        self.buf.push('<');
        self.buf.push_str(tag);
        self.buf.push('>');
        self.push_text(text);
        self.buf.push_str("</");
        self.buf.push_str(tag);
        self.buf.push('>');
    }
}

impl Presenter for HtmlPresenter {
    type Output = String;

    fn paragraph(&mut self, text: &MarkdownText) {
        self.push_element("p", text);
    }

    fn heading(&mut self, level: usize, text: &MarkdownText) {
        self.push_element(&format!("h{}", level), text);
    }

    fn list(&mut self, kind: ListKind, items: &[MarkdownText]) {
        let tag = match kind {
            ListKind::Bullet => "ul",
            ListKind::Numbered => "ol",
        };
        self.buf.push_str(&format!("<{}>", tag));
        for item in items {
            self.push_element("li", item);
        }
        self.buf.push_str(&format!("</{}>", tag));
    }

    fn code_block(&mut self, language: Option<&str>, lines: &[String]) {
        match language {
            Some(language) => {
                self.buf.push_str("<pre><code class=\"language-");
                self.push_escaped(language);
                self.buf.push_str("\">");
            }
            None => self.buf.push_str("<pre><code>"),
        }
        self.push_escaped(&lines.join("\n"));
        self.buf.push_str("</code></pre>");
    }

    fn blockquote(&mut self, text: &MarkdownText) {
        self.push_element("blockquote", text);
    }

    fn horizontal_rule(&mut self) {
        self.buf.push_str("<hr>");
    }

    fn spacer(&mut self) {
        self.buf.push_str("<br>");
    }

    fn finish(self) -> String {
        self.buf
    }
}

// links are untrusted; anything that is not a web or mail link is disarmed
fn safe_href(href: &str) -> &str {
    match href.find(|c: char| matches!(c, ':' | '/' | '?' | '#')) {
        Some(end) if href[end..].starts_with(':') => {
            let scheme = href[..end].to_ascii_lowercase();
            if SAFE_SCHEMES.contains(&scheme.as_str()) {
                href
            } else {
                "#"
            }
        }
        _ => href,
    }
}

/// Plain text, one output line per source line, all styling dropped.
#[derive(Debug, Default)]
pub struct TextPresenter {
    lines: Vec<String>,
}

impl Presenter for TextPresenter {
    type Output = String;

    fn paragraph(&mut self, text: &MarkdownText) {
        self.lines.push(literal_text(text));
    }

    fn heading(&mut self, _level: usize, text: &MarkdownText) {
        self.lines.push(literal_text(text));
    }

    fn list(&mut self, _kind: ListKind, items: &[MarkdownText]) {
        self.lines.extend(items.iter().map(literal_text));
    }

    fn code_block(&mut self, _language: Option<&str>, lines: &[String]) {
        self.lines.extend_from_slice(lines);
    }

    fn blockquote(&mut self, text: &MarkdownText) {
        self.lines.push(literal_text(text));
    }

    fn horizontal_rule(&mut self) {
        self.lines.push(String::new());
    }

    fn spacer(&mut self) {
        self.lines.push(String::new());
    }

    fn finish(self) -> String {
        self.lines.join("\n")
    }
}
