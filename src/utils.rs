//! Common utilities shared across modules.

use std::path::{Component, Path};

use percent_encoding::{NON_ALPHANUMERIC, percent_encode};

/// Fold a display name into a URL-safe kebab-case slug.
///
/// Splits on camel-case boundaries as well as whitespace, dashes and
/// underscores, so `useMonaco` becomes `use-monaco` and `HTMLInput` becomes
/// `html-input`. Non-ASCII letters and digits are kept percent-encoded, so
/// `概要` still yields a usable slug. Other punctuation is dropped.
pub fn slugify(name: &str) -> String {
    let chars: Vec<char> = name.trim().chars().filter(|c| *c != '\'').collect();
    let mut slug = String::with_capacity(chars.len() + 4);
    let mut pending_dash = false;

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_alphanumeric() {
            if c.is_alphanumeric() {
                if pending_dash {
                    slug.push('-');
                    pending_dash = false;
                }
                let lower: String = c.to_lowercase().collect();
                slug.extend(percent_encode(lower.as_bytes(), NON_ALPHANUMERIC));
            } else {
                pending_dash = !slug.is_empty();
            }
            continue;
        }

        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            let boundary = prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower);
            if boundary && !slug.is_empty() {
                pending_dash = true;
            }
        }

        if pending_dash {
            slug.push('-');
            pending_dash = false;
        }
        slug.push(c.to_ascii_lowercase());
    }

    slug
}

/// Turn a file stem like `getting-started` into `Getting Started`.
pub fn title_case(stem: &str) -> String {
    stem.split(['-', '_', ' '])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render `path` relative to `root` with forward slashes.
///
/// Paths outside `root` are rendered without their root prefix so generated
/// output never embeds machine-specific absolute paths.
pub fn relative_display(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// True when `name` starts with an ASCII uppercase letter.
pub fn is_pascal_case(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

/// True for `use` followed by an uppercase letter or nothing at all.
pub fn is_hook_name(name: &str) -> bool {
    match name.strip_prefix("use") {
        Some(rest) => rest.chars().next().is_none_or(|c| c.is_ascii_uppercase()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Button"), "button");
        assert_eq!(slugify("ButtonGroup"), "button-group");
        assert_eq!(slugify("useMonaco"), "use-monaco");
        assert_eq!(slugify("HTMLInput"), "html-input");
        assert_eq!(slugify("Getting Started"), "getting-started");
        assert_eq!(slugify("snake_case"), "snake-case");
        assert_eq!(slugify("What's New?"), "whats-new");
        assert_eq!(slugify("  Spaces  "), "spaces");
        assert_eq!(slugify("get2FA"), "get2-fa");
    }

    #[test]
    fn test_slugify_non_ascii() {
        assert_eq!(slugify("概要"), "%E6%A6%82%E8%A6%81");
        assert_eq!(slugify("Über uns"), "%C3%BCber-uns");
        assert_eq!(slugify("Café Menu"), "caf%C3%A9-menu");
        assert_ne!(slugify("概要"), slugify("使い方"));
        assert_eq!(slugify("???"), "");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("getting-started"), "Getting Started");
        assert_eq!(title_case("playground"), "Playground");
    }

    #[test]
    fn test_relative_display() {
        let root = PathBuf::from("/project");
        assert_eq!(
            relative_display(&root, Path::new("/project/components/Button/Button.tsx")),
            "components/Button/Button.tsx"
        );
        assert_eq!(relative_display(&root, Path::new("/elsewhere/a.ts")), "elsewhere/a.ts");
    }

    #[test]
    fn test_name_classification() {
        assert!(is_hook_name("useMonaco"));
        assert!(is_hook_name("use"));
        assert!(!is_hook_name("user"));
        assert!(is_pascal_case("Button"));
        assert!(!is_pascal_case("button"));
    }
}
