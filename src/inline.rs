use crate::entity::MarkdownInline;
use crate::entity::MarkdownText;

use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, take_until, take_while1},
    character::complete::{anychar, char},
    combinator::{map, not, recognize},
    error::{Error, ErrorKind},
    multi::fold_many0,
    sequence::{delimited, pair, terminated},
    IResult,
};

const URL_TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']'];

/// Splits one line of block content into inline spans.
///
/// Never fails: anything that does not open a styled span is kept as plain
/// text, and neighbouring plain characters are merged into a single span.
pub fn parse_markdown_text(i: &str) -> MarkdownText {
    match parse_spans(i) {
        Ok((_, spans)) => spans,
        Err(_) => vec![MarkdownInline::Plaintext(i.to_string())],
    }
}

fn parse_spans(i: &str) -> IResult<&str, MarkdownText> {
    fold_many0(
        alt((
            parse_markdown_inline,
            map(anychar, |c: char| MarkdownInline::Plaintext(c.to_string())),
        )),
        Vec::new,
        |mut spans: MarkdownText, span| {
            match span {
                MarkdownInline::Plaintext(s) => match spans.last_mut() {
                    Some(MarkdownInline::Plaintext(run)) => run.push_str(&s),
                    _ => spans.push(MarkdownInline::Plaintext(s)),
                },
                span => spans.push(span),
            }
            spans
        },
    )(i)
}

fn parse_markdown_inline(i: &str) -> IResult<&str, MarkdownInline> {
    alt((
        map(parse_bare_url, |(text, href): (&str, String)| {
            MarkdownInline::Link(text.to_string(), href)
        }),
        map(parse_boldtext, |s: &str| MarkdownInline::Bold(s.to_string())),
        map(parse_italics, |s: &str| MarkdownInline::Italic(s.to_string())),
        map(parse_inline_code, |s: &str| {
            MarkdownInline::InlineCode(s.to_string())
        }),
        map(parse_strike, |s: &str| MarkdownInline::Strike(s.to_string())),
        map(parse_link, |(text, url): (&str, &str)| {
            MarkdownInline::Link(text.to_string(), url.to_string())
        }),
    ))(i)
}

fn parse_url_prefix(i: &str) -> IResult<&str, &str> {
    alt((tag("https://"), tag("http://"), tag("www.")))(i)
}

fn parse_url_candidate(i: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace() && c != '<')(i)
}

// a bare url runs to the next whitespace, minus any sentence punctuation
// glued to its end
fn parse_bare_url(i: &str) -> IResult<&str, (&str, String)> {
    let (_, prefix) = parse_url_prefix(i)?;
    let (_, candidate) = parse_url_candidate(i)?;
    let url = candidate.trim_end_matches(URL_TRAILING_PUNCTUATION);
    if url.len() <= prefix.len() {
        return Err(nom::Err::Error(Error::new(i, ErrorKind::Verify)));
    }
    let href = if prefix == "www." {
        format!("https://{}", url)
    } else {
        url.to_string()
    };
    Ok((&i[url.len()..], (url, href)))
}

// content is at least one character, so `****` is not an empty bold span
fn parse_boldtext(i: &str) -> IResult<&str, &str> {
    delimited(
        tag("**"),
        recognize(pair(anychar, take_until("**"))),
        tag("**"),
    )(i)
}

fn parse_italic_open(i: &str) -> IResult<&str, char> {
    terminated(char('*'), not(char('*')))(i)
}

// the closing star must not be the start of another `**` run
fn parse_italics(i: &str) -> IResult<&str, &str> {
    let (body, _) = parse_italic_open(i)?;
    body.char_indices()
        .skip(1)
        .find(|&(at, c)| c == '*' && !body[at + 1..].starts_with('*'))
        .map(|(at, _)| (&body[at + 1..], &body[..at]))
        .ok_or_else(|| nom::Err::Error(Error::new(i, ErrorKind::TakeUntil)))
}

fn parse_strike(i: &str) -> IResult<&str, &str> {
    delimited(
        tag("~~"),
        recognize(pair(anychar, take_until("~~"))),
        tag("~~"),
    )(i)
}

fn parse_inline_code(i: &str) -> IResult<&str, &str> {
    delimited(
        char('`'),
        recognize(pair(anychar, take_until("`"))),
        char('`'),
    )(i)
}

fn parse_link(i: &str) -> IResult<&str, (&str, &str)> {
    pair(
        delimited(tag("["), is_not("]"), tag("]")),
        delimited(tag("("), is_not(")"), tag(")")),
    )(i)
}

#[cfg(test)]
mod tests {
    use crate::inline::*;
    use nom::error::ErrorKind;

    macro_rules! err {
        ($x:expr, $y:expr) => {
            Err(nom::Err::Error(nom::error::Error::new($x, $y)))
        };
    }

    fn plain(s: &str) -> MarkdownInline {
        MarkdownInline::Plaintext(String::from(s))
    }

    #[test]
    fn test_parse_boldtext() {
        assert_eq!(parse_boldtext("**here is bold**"), Ok(("", "here is bold")));
        assert_eq!(
            parse_boldtext("**here is bold** and more"),
            Ok((" and more", "here is bold"))
        );
        assert_eq!(
            parse_boldtext("**a * b**"),
            Ok(("", "a * b"))
        );
        assert_eq!(
            parse_boldtext("**here is bold"),
            err!("ere is bold", ErrorKind::TakeUntil)
        );
        assert_eq!(
            parse_boldtext("here is bold**"),
            err!("here is bold**", ErrorKind::Tag)
        );
        assert_eq!(parse_boldtext("****"), err!("*", ErrorKind::TakeUntil));
        assert_eq!(parse_boldtext("*****"), Ok(("", "*")));
        assert_eq!(parse_boldtext("**"), err!("", ErrorKind::Eof));
        assert_eq!(parse_boldtext(""), err!("", ErrorKind::Tag));
    }

    #[test]
    fn test_parse_italics() {
        assert_eq!(
            parse_italics("*here is italic*"),
            Ok(("", "here is italic"))
        );
        assert_eq!(parse_italics("*a* rest"), Ok((" rest", "a")));
        assert_eq!(
            parse_italics("*here is italic"),
            err!("*here is italic", ErrorKind::TakeUntil)
        );
        assert_eq!(
            parse_italics("here is italic*"),
            err!("here is italic*", ErrorKind::Char)
        );
        assert_eq!(
            parse_italics("**we are doing bold**"),
            err!("*we are doing bold**", ErrorKind::Not)
        );
        assert_eq!(parse_italics("*"), err!("*", ErrorKind::TakeUntil));
        assert_eq!(parse_italics(""), err!("", ErrorKind::Char));
        // a star followed by another star cannot close
        assert_eq!(parse_italics("*a**b*"), Ok(("b*", "a*")));
    }

    #[test]
    fn test_parse_inline_code() {
        assert_eq!(parse_inline_code("`let x`"), Ok(("", "let x")));
        assert_eq!(parse_inline_code("`**no**` tail"), Ok((" tail", "**no**")));
        assert_eq!(
            parse_inline_code("`here is code"),
            err!("ere is code", ErrorKind::TakeUntil)
        );
        assert_eq!(
            parse_inline_code("here is code`"),
            err!("here is code`", ErrorKind::Char)
        );
        assert_eq!(parse_inline_code("``"), err!("", ErrorKind::TakeUntil));
        assert_eq!(parse_inline_code("`"), err!("", ErrorKind::Eof));
    }

    #[test]
    fn test_parse_strike() {
        assert_eq!(parse_strike("~~gone~~"), Ok(("", "gone")));
        assert_eq!(parse_strike("~~gone"), err!("one", ErrorKind::TakeUntil));
        assert_eq!(parse_strike("~gone~"), err!("~gone~", ErrorKind::Tag));
    }

    #[test]
    fn test_parse_link() {
        assert_eq!(
            parse_link("[title](https://www.example.com)"),
            Ok(("", ("title", "https://www.example.com")))
        );
        assert!(parse_link("[title] (https://www.example.com)").is_err());
        assert!(parse_link("[title](").is_err());
    }

    #[test]
    fn test_parse_bare_url() {
        assert_eq!(
            parse_bare_url("https://example.com/a, now."),
            Ok((
                ", now.",
                ("https://example.com/a", String::from("https://example.com/a"))
            ))
        );
        assert_eq!(
            parse_bare_url("www.example.com)."),
            Ok((
                ").",
                ("www.example.com", String::from("https://www.example.com"))
            ))
        );
        assert_eq!(
            parse_bare_url("http://a.b/<tag>"),
            Ok(("<tag>", ("http://a.b/", String::from("http://a.b/"))))
        );
        assert!(parse_bare_url("https://").is_err());
        assert!(parse_bare_url("www.").is_err());
        assert!(parse_bare_url("example.com").is_err());
    }

    #[test]
    fn test_parse_markdown_text_mixed() {
        assert_eq!(
            parse_markdown_text("**bold** and *italic* and `code`"),
            vec![
                MarkdownInline::Bold(String::from("bold")),
                plain(" and "),
                MarkdownInline::Italic(String::from("italic")),
                plain(" and "),
                MarkdownInline::InlineCode(String::from("code")),
            ]
        );
    }

    #[test]
    fn test_parse_markdown_text_link_trimming() {
        assert_eq!(
            parse_markdown_text("See https://example.com/a, now."),
            vec![
                plain("See "),
                MarkdownInline::Link(
                    String::from("https://example.com/a"),
                    String::from("https://example.com/a")
                ),
                plain(", now."),
            ]
        );
    }

    #[test]
    fn test_parse_markdown_text_plain_runs() {
        assert_eq!(parse_markdown_text(""), vec![]);
        assert_eq!(
            parse_markdown_text("here is plaintext!"),
            vec![plain("here is plaintext!")]
        );
        assert_eq!(
            parse_markdown_text("stray ** and ~~ and ` marks"),
            vec![plain("stray ** and ~~ and ` marks")]
        );
        assert_eq!(
            parse_markdown_text("**a*"),
            vec![plain("*"), MarkdownInline::Italic(String::from("a"))]
        );
    }

    #[test]
    fn test_parse_markdown_text_no_nesting() {
        assert_eq!(
            parse_markdown_text("**bold *not italic***"),
            vec![
                MarkdownInline::Bold(String::from("bold *not italic")),
                plain("*"),
            ]
        );
        assert_eq!(
            parse_markdown_text("~~`x`~~"),
            vec![MarkdownInline::Strike(String::from("`x`"))]
        );
    }

    #[test]
    fn test_parse_markdown_text_links() {
        assert_eq!(
            parse_markdown_text("use [pip](https://pip.pypa.io/) or www.pypi.org."),
            vec![
                plain("use "),
                MarkdownInline::Link(String::from("pip"), String::from("https://pip.pypa.io/")),
                plain(" or "),
                MarkdownInline::Link(
                    String::from("www.pypi.org"),
                    String::from("https://www.pypi.org")
                ),
                plain("."),
            ]
        );
    }

    #[test]
    fn test_parse_markdown_text_unicode() {
        assert_eq!(
            parse_markdown_text("dosis *über* 5 mg - ok"),
            vec![
                plain("dosis "),
                MarkdownInline::Italic(String::from("über")),
                plain(" 5 mg - ok"),
            ]
        );
    }
}
