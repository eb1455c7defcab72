pub type MarkdownText = Vec<MarkdownInline>;

#[derive(Clone, Debug, PartialEq)]
pub enum Markdown {
    Paragraph(MarkdownText),
    Heading(usize, MarkdownText),
    UnorderedList(Vec<MarkdownText>),
    OrderedList(Vec<MarkdownText>),
    Codeblock(Option<String>, Vec<String>),
    Blockquote(MarkdownText),
    HorizontalRule,
    Spacer,
}

#[derive(Clone, Debug, PartialEq)]
pub enum MarkdownInline {
    Plaintext(String),
    Bold(String),
    Italic(String),
    InlineCode(String),
    Strike(String),
    /// Display text, then href.
    Link(String, String),
}

impl MarkdownInline {
    /// The text a reader sees, with styling dropped.
    pub fn literal(&self) -> &str {
        match self {
            MarkdownInline::Plaintext(s)
            | MarkdownInline::Bold(s)
            | MarkdownInline::Italic(s)
            | MarkdownInline::InlineCode(s)
            | MarkdownInline::Strike(s) => s,
            MarkdownInline::Link(text, _) => text,
        }
    }
}

pub fn literal_text(text: &MarkdownText) -> String {
    text.iter().map(MarkdownInline::literal).collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListKind {
    Bullet,
    Numbered,
}
