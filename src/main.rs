use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use structopt::StructOpt;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use chatmark::error::Error;
use chatmark::parser;
use chatmark::translator::{self, TextPresenter};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Html,
    Text,
    Tree,
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "html" => Ok(Format::Html),
            "text" => Ok(Format::Text),
            "tree" => Ok(Format::Tree),
            _ => Err(Error::UnknownFormat(s.to_string())),
        }
    }
}

#[derive(Debug, StructOpt)]
#[structopt(name = "chatmark", about = "Render an assistant reply written in chat markdown")]
struct Opt {
    #[structopt(long = "debug")]
    pub debug: bool,

    /// Output format: html, text or tree
    #[structopt(long = "format", default_value = "html")]
    pub format: Format,

    /// Reply to render; stdin when omitted
    #[structopt(parse(from_os_str))]
    pub input: Option<PathBuf>,
}

fn read(input: Option<&Path>) -> Result<String, Error> {
    match input {
        Some(path) => fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.display().to_string(),
            source,
        }),
        None => {
            let mut content = String::new();
            io::stdin()
                .lock()
                .read_to_string(&mut content)
                .map_err(|source| Error::Read {
                    path: String::from("<stdin>"),
                    source,
                })?;
            Ok(content)
        }
    }
}

fn render(content: &str, format: Format) -> String {
    let markdown = parser::parse_markdown(content);
    match format {
        Format::Html => translator::translate(markdown),
        Format::Text => translator::present(&markdown, TextPresenter::default()),
        Format::Tree => format!("{:#?}", markdown),
    }
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let opt = Opt::from_args();
    init_tracing(opt.debug);
    debug!(?opt, "parsed options");

    let content = read(opt.input.as_deref()).context("failed to load the reply")?;
    println!("{}", render(&content, opt.format));
    Ok(())
}
