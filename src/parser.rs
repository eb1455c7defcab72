use crate::entity::ListKind;
use crate::entity::Markdown;
use crate::entity::MarkdownText;
use crate::inline::parse_markdown_text;

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, digit1, one_of, space0, space1},
    combinator::{all_consuming, map, rest, verify},
    sequence::{delimited, pair, preceded, terminated},
    IResult,
};
use tracing::{debug, trace};

const MAX_HEADING_LEVEL: usize = 6;

/// Splits a reply into block nodes, one pass over its lines.
///
/// Total over every input: unterminated fences still produce their code
/// block, and anything unrecognised becomes a paragraph.
pub fn parse_markdown(i: &str) -> Vec<Markdown> {
    let mut segmenter = Segmenter::default();
    let mut lines = 0;
    for line in i.lines() {
        segmenter.push_line(line);
        lines += 1;
    }
    let blocks = segmenter.finish();
    debug!(lines, blocks = blocks.len(), "segmented reply");
    blocks
}

#[derive(Debug, Default)]
struct Segmenter {
    blocks: Vec<Markdown>,
    list: Option<(ListKind, Vec<MarkdownText>)>,
    // Some while inside a fence
    code: Option<(Option<String>, Vec<String>)>,
}

impl Segmenter {
    fn push_line(&mut self, line: &str) {
        if let Ok((_, language)) = parse_code_fence(line.trim()) {
            match self.code.take() {
                Some((language, lines)) => self.blocks.push(Markdown::Codeblock(language, lines)),
                None => {
                    self.flush_list();
                    self.code = Some((language.map(str::to_string), Vec::new()));
                }
            }
            return;
        }

        if let Some((_, lines)) = self.code.as_mut() {
            lines.push(line.to_string());
            return;
        }

        if let Ok((_, (level, text))) = parse_header(line) {
            self.flush_list();
            self.blocks
                .push(Markdown::Heading(level, parse_markdown_text(text)));
        } else if let Ok((_, item)) = parse_unordered_list_element(line) {
            self.push_list_item(ListKind::Bullet, item);
        } else if let Ok((_, item)) = parse_ordered_list_element(line) {
            self.push_list_item(ListKind::Numbered, item);
        } else if parse_horizontal_rule(line.trim()).is_ok() {
            self.flush_list();
            self.blocks.push(Markdown::HorizontalRule);
        } else if let Ok((_, quote)) = parse_blockquote(line) {
            self.flush_list();
            self.blocks
                .push(Markdown::Blockquote(parse_markdown_text(quote)));
        } else if line.trim().is_empty() {
            self.flush_list();
            if !self.blocks.is_empty() {
                self.blocks.push(Markdown::Spacer);
            }
        } else {
            self.flush_list();
            self.blocks
                .push(Markdown::Paragraph(parse_markdown_text(line)));
        }
    }

    fn push_list_item(&mut self, kind: ListKind, item: &str) {
        if self.list.as_ref().map(|(pending, _)| *pending) != Some(kind) {
            self.flush_list();
        }
        self.list
            .get_or_insert_with(|| (kind, Vec::new()))
            .1
            .push(parse_markdown_text(item));
    }

    fn flush_list(&mut self) {
        if let Some((kind, items)) = self.list.take() {
            self.blocks.push(match kind {
                ListKind::Bullet => Markdown::UnorderedList(items),
                ListKind::Numbered => Markdown::OrderedList(items),
            });
        }
    }

    fn finish(mut self) -> Vec<Markdown> {
        self.flush_list();
        if let Some((language, lines)) = self.code.take() {
            trace!(lines = lines.len(), "closing unterminated code fence");
            self.blocks.push(Markdown::Codeblock(language, lines));
        }
        self.blocks
    }
}

fn first_word(info: &str) -> Option<&str> {
    info.split_whitespace().next()
}

// the language is the first word after the backticks, if any
fn parse_code_fence(i: &str) -> IResult<&str, Option<&str>> {
    map(preceded(tag("```"), rest), first_word)(i)
}

// this guy matches the literal character #, clamping deep headings to h6
fn parse_header_tag(i: &str) -> IResult<&str, usize> {
    map(
        terminated(take_while1(|c: char| c == '#'), tag(" ")),
        |s: &str| s.len().min(MAX_HEADING_LEVEL),
    )(i)
}

// this combines the header tag and the rest of the line
fn parse_header(i: &str) -> IResult<&str, (usize, &str)> {
    pair(parse_header_tag, rest)(i)
}

fn parse_unordered_list_tag(i: &str) -> IResult<&str, char> {
    delimited(space0, one_of("-*+"), space1)(i)
}

fn parse_unordered_list_element(i: &str) -> IResult<&str, &str> {
    preceded(parse_unordered_list_tag, rest)(i)
}

fn parse_ordered_list_tag(i: &str) -> IResult<&str, &str> {
    delimited(space0, terminated(digit1, char('.')), space1)(i)
}

fn parse_ordered_list_element(i: &str) -> IResult<&str, &str> {
    preceded(parse_ordered_list_tag, rest)(i)
}

fn parse_horizontal_rule(i: &str) -> IResult<&str, &str> {
    all_consuming(alt((
        verify(take_while1(|c: char| c == '-'), |run: &str| run.len() >= 3),
        verify(take_while1(|c: char| c == '*'), |run: &str| run.len() >= 3),
        verify(take_while1(|c: char| c == '_'), |run: &str| run.len() >= 3),
    )))(i)
}

fn parse_blockquote(i: &str) -> IResult<&str, &str> {
    preceded(pair(char('>'), space1), rest)(i)
}
