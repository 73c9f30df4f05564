/*!
 * Documentation block parser
 *
 * Grammar:
 *
 * ```text
 * <description line>            leading non-blank lines, joined with ' '
 * <description line>
 *                               first blank line ends the description
 * <name>[ : <type>]             argument header, unindented
 *     <description line>        indented block: description lines first,
 *     - <choice> : <value>      then choice lines; a choice may continue
 *       continued choice text   on following non '-' lines
 * ```
 *
 * Malformed choice text (no colon, empty name or value) is dropped.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use super::named_map::NamedMap;

static HEADER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([\w-]+)\s*(?::\s*(\S.*?))?\s*$").expect("header pattern is a valid regex")
});

const TAB_WIDTH: usize = 8;

/// Metadata extracted from a documentation block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDoc {
    pub description: String,
    pub arg_types: NamedMap<String>,
    pub arg_descriptions: NamedMap<String>,
    pub arg_choices: NamedMap<Vec<(String, String)>>,
}

enum State {
    Description,
    SeekHeader {
        pending: Option<Header>,
    },
    ArgBody {
        header: Header,
        indent: String,
        body: Vec<String>,
    },
}

struct Header {
    name: String,
    type_token: Option<String>,
}

pub fn parse_doc(doc: &str) -> ParsedDoc {
    let mut parsed = ParsedDoc::default();
    let mut description: Vec<String> = Vec::new();
    let mut state = State::Description;

    for line in clean_doc(doc) {
        state = match state {
            State::Description => {
                if line.trim().is_empty() {
                    State::SeekHeader { pending: None }
                } else {
                    description.push(line.trim().to_string());
                    State::Description
                }
            }
            State::SeekHeader { pending } => seek_header(pending, &line),
            State::ArgBody {
                header,
                indent,
                mut body,
            } => match line.strip_prefix(indent.as_str()) {
                Some(rest) if !line.trim().is_empty() => {
                    body.push(rest.to_string());
                    State::ArgBody {
                        header,
                        indent,
                        body,
                    }
                }
                _ => {
                    finish_block(&mut parsed, header, &body);
                    State::SeekHeader {
                        pending: parse_header(&line),
                    }
                }
            },
        };
    }

    if let State::ArgBody { header, body, .. } = state {
        finish_block(&mut parsed, header, &body);
    }

    parsed.description = description.join(" ");
    parsed
}

fn seek_header(pending: Option<Header>, line: &str) -> State {
    let indent: String = line.chars().take_while(|c| c.is_whitespace()).collect();
    match pending {
        Some(header) if !indent.is_empty() && !line.trim().is_empty() => State::ArgBody {
            header,
            body: vec![line[indent.len()..].to_string()],
            indent,
        },
        _ => State::SeekHeader {
            pending: parse_header(line),
        },
    }
}

fn parse_header(line: &str) -> Option<Header> {
    let caps = HEADER_PATTERN.captures(line)?;
    Some(Header {
        name: caps.get(1)?.as_str().to_string(),
        type_token: caps.get(2).map(|m| m.as_str().trim().to_string()),
    })
}

fn finish_block(parsed: &mut ParsedDoc, header: Header, body: &[String]) {
    let mut description: Vec<&str> = Vec::new();
    let mut choices: Vec<(String, String)> = Vec::new();
    let mut choice_text: Option<String> = None;

    for line in body {
        let trimmed = line.trim();
        if trimmed.starts_with('-') {
            if let Some(done) = choice_text.take() {
                push_choice(&mut choices, &done);
            }
            choice_text = Some(trimmed.to_string());
        } else if let Some(text) = choice_text.as_mut() {
            if !trimmed.is_empty() {
                text.push(' ');
                text.push_str(trimmed);
            }
        } else if !trimmed.is_empty() {
            description.push(trimmed);
        }
    }
    if let Some(done) = choice_text {
        push_choice(&mut choices, &done);
    }

    if let Some(type_token) = header.type_token {
        parsed.arg_types.insert(header.name.clone(), type_token);
    }
    if !description.is_empty() {
        parsed
            .arg_descriptions
            .insert(header.name.clone(), description.join(" "));
    }
    if !choices.is_empty() {
        parsed.arg_choices.insert(header.name, choices);
    }
}

fn push_choice(choices: &mut Vec<(String, String)>, text: &str) {
    let Some((name, value)) = parse_choice(text) else {
        return;
    };
    match choices.iter_mut().find(|(n, _)| *n == name) {
        Some(slot) => slot.1 = value,
        None => choices.push((name, value)),
    }
}

/// `- <name> : <value>`, split at the first colon so values may hold colons
/// (`- docs : https://...`). A name containing a colon cannot be expressed.
fn parse_choice(text: &str) -> Option<(String, String)> {
    let body = text.strip_prefix('-')?;
    let (name, value) = body.split_once(':')?;
    let (name, value) = (name.trim(), value.trim());
    if name.is_empty() || value.is_empty() {
        return None;
    }
    Some((name.to_string(), value.to_string()))
}

/// Expands tabs, strips the first line's leading whitespace and the common
/// indentation of the rest, and drops surrounding blank lines.
fn clean_doc(doc: &str) -> Vec<String> {
    let expanded = doc.replace('\t', &" ".repeat(TAB_WIDTH));
    let lines: Vec<&str> = expanded.lines().collect();
    let Some((first, rest)) = lines.split_first() else {
        return Vec::new();
    };

    let leading = |l: &str| l.len() - l.trim_start().len();
    let margin = rest
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| leading(l))
        .min()
        .unwrap_or(0);

    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    out.push(first.trim().to_string());
    for line in rest {
        let stripped = if leading(line) >= margin {
            line.get(margin..).unwrap_or_else(|| line.trim_start())
        } else {
            line.trim_start()
        };
        out.push(stripped.trim_end().to_string());
    }

    while out.first().is_some_and(|l| l.is_empty()) {
        out.remove(0);
    }
    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    out
}
