//! Markdown-subset renderer for assistant chat replies.
//!
//! [`parser::parse_markdown`] turns a reply into block nodes, each line's
//! text split into inline spans by [`inline::parse_markdown_text`]; the
//! [`translator`] maps those nodes onto HTML, plain text, or any other
//! [`translator::Presenter`].

pub mod entity;
pub mod error;
pub mod inline;
pub mod parser;
pub mod translator;
