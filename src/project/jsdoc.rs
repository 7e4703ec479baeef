//! JSDoc comment parsing.

use serde::Serialize;

/// A parsed `/** ... */` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocComment {
    /// Prose before the first block tag.
    pub description: String,
    /// Bodies of `@example` tags, in source order.
    pub examples: Vec<String>,
    /// Set when a `@deprecated` tag is present.
    pub deprecated: Option<String>,
    /// Text of `@default` / `@defaultValue`, used for props.
    pub default_value: Option<String>,
}

impl DocComment {
    /// Parse raw comment text. Returns `None` unless it is a `/**` block.
    pub fn parse(raw: &str) -> Option<Self> {
        let body = raw.strip_prefix("/**")?.strip_suffix("*/")?;
        let lines = body.lines().map(strip_leading_star);

        let mut doc = DocComment::default();
        let mut description = Vec::new();
        let mut current: Option<(String, Vec<String>)> = None;

        for line in lines {
            if let Some(tag_line) = line.trim_start().strip_prefix('@') {
                if let Some(tag) = current.take() {
                    doc.apply_tag(tag);
                }
                let (name, rest) = tag_line
                    .split_once(char::is_whitespace)
                    .unwrap_or((tag_line, ""));
                let first = if rest.trim().is_empty() {
                    Vec::new()
                } else {
                    vec![rest.to_string()]
                };
                current = Some((name.to_string(), first));
            } else if let Some((_, body)) = current.as_mut() {
                body.push(line.to_string());
            } else {
                description.push(line.trim().to_string());
            }
        }
        if let Some(tag) = current.take() {
            doc.apply_tag(tag);
        }

        doc.description = description.join("\n").trim().to_string();
        Some(doc)
    }

    fn apply_tag(&mut self, (name, body): (String, Vec<String>)) {
        let text = trim_block(&body);
        match name.as_str() {
            "example" if !text.is_empty() => self.examples.push(strip_fence(&text)),
            "deprecated" => self.deprecated = Some(text),
            "default" | "defaultValue" if !text.is_empty() => self.default_value = Some(text),
            _ => {}
        }
    }

    pub fn description(&self) -> Option<&str> {
        (!self.description.is_empty()).then_some(self.description.as_str())
    }
}

fn strip_leading_star(line: &str) -> &str {
    let trimmed = line.trim_start();
    match trimmed.strip_prefix('*') {
        Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
        None => line,
    }
}

/// Drop leading/trailing blank lines and the common indentation.
fn trim_block(lines: &[String]) -> String {
    let start = lines.iter().position(|l| !l.trim().is_empty());
    let end = lines.iter().rposition(|l| !l.trim().is_empty());
    let (Some(start), Some(end)) = (start, end) else {
        return String::new();
    };
    let block = &lines[start..=end];
    let indent = block
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);
    block
        .iter()
        .map(|l| l.get(indent..).unwrap_or("").trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

/// `@example` bodies are often wrapped in a markdown fence.
fn strip_fence(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() >= 2
        && lines[0].trim_start().starts_with("```")
        && lines[lines.len() - 1].trim() == "```"
    {
        lines[1..lines.len() - 1].join("\n")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line() {
        let doc = DocComment::parse("/** A clickable button. */").unwrap();
        assert_eq!(doc.description, "A clickable button.");
        assert!(doc.examples.is_empty());
    }

    #[test]
    fn test_non_jsdoc_comment_is_ignored() {
        assert!(DocComment::parse("// plain").is_none());
        assert!(DocComment::parse("/* block */").is_none());
    }

    #[test]
    fn test_tags() {
        let raw = r#"/**
 * Tracks the playground position.
 *
 * Persists to local storage.
 * @deprecated use usePlaygroundState
 * @example
 * ```tsx
 * const [position] = usePlaygroundPosition()
 * ```
 * @example
 *   usePlaygroundPosition()
 */"#;
        let doc = DocComment::parse(raw).unwrap();
        assert_eq!(
            doc.description,
            "Tracks the playground position.\n\nPersists to local storage."
        );
        assert_eq!(doc.deprecated.as_deref(), Some("use usePlaygroundState"));
        assert_eq!(
            doc.examples,
            vec![
                "const [position] = usePlaygroundPosition()".to_string(),
                "usePlaygroundPosition()".to_string()
            ]
        );
    }

    #[test]
    fn test_default_value() {
        let doc = DocComment::parse("/** Size of the icon.\n * @default 16 */").unwrap();
        assert_eq!(doc.description, "Size of the icon.");
        assert_eq!(doc.default_value.as_deref(), Some("16"));
    }
}
