//! Markdown/MDX document helpers: front matter and fenced example blocks.

use serde::Deserialize;
use std::path::Path;

use super::error::{ExtractError, ExtractResult};

/// Recognized front matter keys. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// A document split into its front matter and markdown body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document<'a> {
    pub front_matter: FrontMatter,
    pub body: &'a str,
}

impl<'a> Document<'a> {
    /// Split `text` read from `path`.
    ///
    /// Front matter is optional, but once opened with `---` it must be closed
    /// and must be valid YAML.
    pub fn parse(path: &Path, text: &'a str) -> ExtractResult<Self> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let Some(rest) = text
            .strip_prefix("---\n")
            .or_else(|| text.strip_prefix("---\r\n"))
        else {
            return Ok(Self {
                front_matter: FrontMatter::default(),
                body: text,
            });
        };

        let mut offset = 0;
        for line in rest.split_inclusive('\n') {
            if line.trim_end() == "---" {
                let yaml = &rest[..offset];
                let body = &rest[offset + line.len()..];
                let front_matter = if yaml.trim().is_empty() {
                    FrontMatter::default()
                } else {
                    serde_yaml::from_str(yaml)
                        .map_err(|e| ExtractError::content(path, format!("front matter: {e}")))?
                };
                return Ok(Self { front_matter, body });
            }
            offset += line.len();
        }

        Err(ExtractError::content(path, "unterminated front matter"))
    }
}

/// A fenced code block whose info string marks it as an example.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FencedExample {
    /// Text after the `example` marker, e.g. `Basic` in ```` ```tsx example Basic ````.
    pub title: Option<String>,
    pub code: String,
}

struct OpenFence<'a> {
    marker: &'a str,
    line: usize,
    example: bool,
    title: Option<String>,
    lines: Vec<&'a str>,
}

/// Collect ```` ```lang example ```` blocks from a markdown body.
///
/// Other fences are skipped but still tracked, so markers inside them are
/// not mistaken for examples.
pub fn fenced_examples(path: &Path, body: &str) -> ExtractResult<Vec<FencedExample>> {
    let mut examples = Vec::new();
    let mut open: Option<OpenFence> = None;

    for (index, line) in body.lines().enumerate() {
        let trimmed = line.trim_start();
        match open.as_mut() {
            None => {
                let Some(marker) = fence_marker(trimmed) else {
                    continue;
                };
                let words: Vec<&str> = trimmed[marker.len()..].split_whitespace().collect();
                let example_at = words.iter().position(|w| *w == "example");
                let title = example_at
                    .map(|i| words[i + 1..].join(" "))
                    .filter(|t| !t.is_empty())
                    .map(|t| t.trim_matches('"').to_string());
                open = Some(OpenFence {
                    marker,
                    line: index + 1,
                    example: example_at.is_some(),
                    title,
                    lines: Vec::new(),
                });
            }
            Some(fence) => {
                if is_closing(trimmed, fence.marker) {
                    if fence.example {
                        examples.push(FencedExample {
                            title: fence.title.take(),
                            code: fence.lines.join("\n"),
                        });
                    }
                    open = None;
                } else {
                    fence.lines.push(line);
                }
            }
        }
    }

    match open {
        Some(fence) if fence.example => Err(ExtractError::content(
            path,
            format!("unterminated example fence starting at line {}", fence.line),
        )),
        _ => Ok(examples),
    }
}

fn is_closing(line: &str, marker: &str) -> bool {
    let line = line.trim_end();
    fence_marker(line).is_some_and(|m| m.len() == line.len() && m.starts_with(marker))
}

/// Leading run of three or more backticks or tildes.
fn fence_marker(line: &str) -> Option<&str> {
    let first = line.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = line.chars().take_while(|c| *c == first).count();
    (len >= 3).then(|| &line[..len])
}
