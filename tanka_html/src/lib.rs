//! Strips a status body down to plain text before handing it to the tanka
//! engine: recursively concatenate text nodes, turn `<br>` into a newline,
//! trim stray `\r\n` off each text node.

use snafu::{ResultExt, Snafu};
use tl::{Node, Parser};
use tracing::instrument;

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(context(suffix(Error)))]
pub enum Error {
    ParseError { source: tl::ParseError },
}

/// Flatten `html` to the plain text the tanka engine scans.
#[instrument(skip_all, level = "trace")]
pub fn html_to_text(html: &str) -> Result<String> {
    let dom = tl::parse(html, tl::ParserOptions::default()).context(ParseError)?;
    let parser = dom.parser();

    let mut out = String::new();
    for handle in dom.children() {
        if let Some(node) = handle.get(parser) {
            extract_text(node, parser, &mut out);
        }
    }
    Ok(out)
}

fn extract_text(node: &Node, parser: &Parser, out: &mut String) {
    match node {
        Node::Raw(raw) => {
            let text = raw.as_utf8_str();
            out.push_str(text.trim_matches(['\r', '\n']));
        }
        Node::Comment(_) => {}
        Node::Tag(tag) => {
            if tag.name().as_utf8_str().eq_ignore_ascii_case("br") {
                out.push('\n');
                return;
            }
            for child in tag.children().top().iter() {
                if let Some(child_node) = child.get(parser) {
                    extract_text(child_node, parser, out);
                }
            }
        }
    }
}
