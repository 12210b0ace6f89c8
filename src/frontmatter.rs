//! Defines the [`Frontmatter`] type and the logic for splitting an article
//! source file into its metadata header and markdown body. The header is a
//! deliberately restricted, line-oriented notation rather than full YAML:
//! each line is either a `key: value` scalar or opens a list (a key with an
//! empty value followed by `- item` lines). There are no nested structures,
//! no quoted-string escaping, and no multi-line scalars.

use std::fmt;

/// The metadata header of an article. Every field is a plain string; the
/// `publish_date` in particular is never parsed as a date -- it is compared
/// and emitted verbatim.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Frontmatter {
    /// The title of the article.
    pub title: String,

    /// The unique identifier for the article. Doubles as the generated
    /// module's file stem, so it must be identifier-safe.
    pub slug: String,

    /// The short teaser shown in listings.
    pub excerpt: String,

    /// Path to the header image. Relative image paths are rewritten to the
    /// public serving path by the article loader, not here.
    pub featured_image: String,

    /// The article's category.
    pub category: String,

    /// The publication date, kept as an opaque string.
    pub publish_date: String,

    /// The article's author.
    pub author: String,

    /// The tags associated with the article, in authoring order. Always
    /// present: absent or malformed `tags` parse as an empty list.
    pub tags: Vec<String>,

    /// An optional subtitle.
    pub subtitle: Option<String>,
}

/// A parsed header value: either a scalar or a dash-list.
enum Value {
    Scalar(String),
    List(Vec<String>),
}

const FENCE: &str = "---";

/// Parses an article source into its [`Frontmatter`] and remaining body
/// text. The header block is the region between an opening `---` line at
/// the very start of the input and the next `---` line.
pub fn parse(input: &str) -> Result<(Frontmatter, &str)> {
    let (header, body) = split_fences(input)?;
    let frontmatter = parse_header(header);
    if frontmatter.slug.is_empty() {
        return Err(Error::MissingSlug);
    }
    Ok((frontmatter, body))
}

/// Splits `input` into the header region and the body. Fences are matched
/// per line so a stray `---` inside a value can't terminate the header
/// early.
fn split_fences(input: &str) -> Result<(&str, &str)> {
    match input.lines().next() {
        Some(first) if first.trim_end() == FENCE => {}
        _ => return Err(Error::MissingStartFence),
    }
    let header_start = match input.find('\n') {
        Some(i) => i + 1,
        None => return Err(Error::MissingEndFence),
    };

    let mut offset = header_start;
    for line in input[header_start..].split_inclusive('\n') {
        if line.trim_end() == FENCE {
            return Ok((&input[header_start..offset], &input[offset + line.len()..]));
        }
        offset += line.len();
    }
    Err(Error::MissingEndFence)
}

/// Parses the header region line by line. Blank lines are skipped wherever
/// they appear -- in particular, a blank line between two `- item` lines
/// does not terminate the list. A list only closes when a subsequent line
/// fails to match the list-item pattern (or the block ends); a key with an
/// empty value and no following items parses as an empty list.
fn parse_header(header: &str) -> Frontmatter {
    let mut frontmatter = Frontmatter::default();
    let mut lines = header.lines().peekable();

    while let Some(line) = lines.next() {
        if line.trim().is_empty() {
            continue;
        }
        let (key, scalar) = match split_key(line) {
            Some(pair) => pair,
            None => continue, // not a key line; ignored
        };

        let value = if scalar.is_empty() {
            let mut items = Vec::new();
            loop {
                match lines.peek() {
                    Some(next) if next.trim().is_empty() => {
                        lines.next();
                    }
                    Some(next) => match list_item(next) {
                        Some(item) => {
                            items.push(item.to_owned());
                            lines.next();
                        }
                        None => break,
                    },
                    None => break,
                }
            }
            Value::List(items)
        } else {
            Value::Scalar(scalar.to_owned())
        };

        assign(&mut frontmatter, key, value);
    }

    frontmatter
}

/// Assigns a parsed header field onto the [`Frontmatter`]. Unknown keys are
/// ignored, as are list values for scalar fields and vice versa (so a
/// scalar `tags` leaves the list empty).
fn assign(frontmatter: &mut Frontmatter, key: &str, value: Value) {
    match (key, value) {
        ("title", Value::Scalar(v)) => frontmatter.title = v,
        ("slug", Value::Scalar(v)) => frontmatter.slug = v,
        ("excerpt", Value::Scalar(v)) => frontmatter.excerpt = v,
        ("featuredImage", Value::Scalar(v)) => frontmatter.featured_image = v,
        ("category", Value::Scalar(v)) => frontmatter.category = v,
        ("publishDate", Value::Scalar(v)) => frontmatter.publish_date = v,
        ("author", Value::Scalar(v)) => frontmatter.author = v,
        ("tags", Value::List(items)) => frontmatter.tags = items,
        ("subtitle", Value::Scalar(v)) => frontmatter.subtitle = Some(v),
        _ => {}
    }
}

/// Splits a `key: value` line. The value may itself contain colons; only
/// the first one separates.
fn split_key(line: &str) -> Option<(&str, &str)> {
    let colon = line.find(':')?;
    let key = line[..colon].trim();
    if key.is_empty() || key.starts_with('-') {
        return None;
    }
    Some((key, line[colon + 1..].trim()))
}

/// Matches a `- item` list line, returning the item text.
fn list_item(line: &str) -> Option<&str> {
    Some(line.trim_start().strip_prefix("- ")?.trim())
}

/// Represents the result of a frontmatter-parse operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error parsing an article header.
#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// Returned when an article source file is missing its starting header
    /// fence (`---`).
    MissingStartFence,

    /// Returned when an article source file is missing its terminal header
    /// fence (`---` i.e., the starting fence was found but the ending one
    /// was missing).
    MissingEndFence,

    /// Returned when the header has no `slug` field. The slug becomes both
    /// an output file stem and a generated module name, so an article
    /// without one cannot be emitted.
    MissingSlug,
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MissingStartFence => write!(f, "Article must begin with `---`"),
            Error::MissingEndFence => write!(f, "Missing closing `---`"),
            Error::MissingSlug => write!(f, "Frontmatter is missing a `slug` field"),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const BASIC: &str = "---
title: Hello, World!
slug: hello-world
excerpt: A first article.
featuredImage: ../images/hello.jpg
category: News
publishDate: 2021-04-16
author: Craig Weber
tags:
  - faith
  - family
---
Body text.
";

    #[test]
    fn test_parse_basic() -> Result<()> {
        let (frontmatter, body) = parse(BASIC)?;
        assert_eq!(frontmatter.title, "Hello, World!");
        assert_eq!(frontmatter.slug, "hello-world");
        assert_eq!(frontmatter.excerpt, "A first article.");
        assert_eq!(frontmatter.featured_image, "../images/hello.jpg");
        assert_eq!(frontmatter.category, "News");
        assert_eq!(frontmatter.publish_date, "2021-04-16");
        assert_eq!(frontmatter.author, "Craig Weber");
        assert_eq!(frontmatter.tags, vec!["faith", "family"]);
        assert_eq!(frontmatter.subtitle, None);
        assert_eq!(body, "Body text.\n");
        Ok(())
    }

    #[test]
    fn test_missing_start_fence() {
        assert_eq!(
            parse("title: No fences\n").unwrap_err(),
            Error::MissingStartFence
        );
    }

    #[test]
    fn test_missing_end_fence() {
        assert_eq!(
            parse("---\ntitle: Unterminated\n").unwrap_err(),
            Error::MissingEndFence
        );
    }

    #[test]
    fn test_missing_slug() {
        assert_eq!(
            parse("---\ntitle: Anonymous\n---\n").unwrap_err(),
            Error::MissingSlug
        );
    }

    #[test]
    fn test_fence_must_be_a_full_line() -> Result<()> {
        // A `---` embedded mid-line must not close the header.
        let input = "---\nslug: dashes\ntitle: a --- b\n---\nbody\n";
        let (frontmatter, body) = parse(input)?;
        assert_eq!(frontmatter.title, "a --- b");
        assert_eq!(body, "body\n");
        Ok(())
    }

    #[test]
    fn test_tags_absent_is_empty() -> Result<()> {
        let (frontmatter, _) = parse("---\nslug: no-tags\n---\n")?;
        assert!(frontmatter.tags.is_empty());
        Ok(())
    }

    #[test]
    fn test_tags_scalar_is_empty() -> Result<()> {
        // `tags` with an inline scalar is not recognized as a list; callers
        // must still observe an empty list rather than a missing field.
        let (frontmatter, _) = parse("---\nslug: s\ntags: faith, family\n---\n")?;
        assert!(frontmatter.tags.is_empty());
        Ok(())
    }

    #[test]
    fn test_tags_empty_block() -> Result<()> {
        // A key with an empty value at the end of the block is an empty
        // list, not an error.
        let (frontmatter, _) = parse("---\nslug: s\ntags:\n---\n")?;
        assert!(frontmatter.tags.is_empty());
        Ok(())
    }

    #[test]
    fn test_blank_line_inside_list() -> Result<()> {
        let input = "---\nslug: s\ntags:\n  - faith\n\n  - family\n---\n";
        let (frontmatter, _) = parse(input)?;
        assert_eq!(frontmatter.tags, vec!["faith", "family"]);
        Ok(())
    }

    #[test]
    fn test_list_closed_by_key_line() -> Result<()> {
        let input = "---\nslug: s\ntags:\n  - faith\nauthor: Craig\n---\n";
        let (frontmatter, _) = parse(input)?;
        assert_eq!(frontmatter.tags, vec!["faith"]);
        assert_eq!(frontmatter.author, "Craig");
        Ok(())
    }

    #[test]
    fn test_value_containing_colon() -> Result<()> {
        let (frontmatter, _) = parse("---\nslug: s\ntitle: Q: an answer\n---\n")?;
        assert_eq!(frontmatter.title, "Q: an answer");
        Ok(())
    }

    #[test]
    fn test_subtitle_present() -> Result<()> {
        let (frontmatter, _) = parse("---\nslug: s\nsubtitle: Below the fold\n---\n")?;
        assert_eq!(frontmatter.subtitle.as_deref(), Some("Below the fold"));
        Ok(())
    }

    #[test]
    fn test_crlf_input() -> Result<()> {
        let input = "---\r\nslug: s\r\ntitle: Windows\r\n---\r\nbody\r\n";
        let (frontmatter, body) = parse(input)?;
        assert_eq!(frontmatter.slug, "s");
        assert_eq!(frontmatter.title, "Windows");
        assert_eq!(body, "body\r\n");
        Ok(())
    }

    #[test]
    fn test_unknown_keys_ignored() -> Result<()> {
        let (frontmatter, _) = parse("---\nslug: s\nlayout: wide\n---\n")?;
        assert_eq!(frontmatter.slug, "s");
        Ok(())
    }
}
