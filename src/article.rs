//! Defines the [`Article`] type and the logic for loading articles from the
//! file system into memory. Loading a single article splits the source file
//! into its header and body ([`crate::frontmatter`]), renders the body
//! ([`crate::markdown`]), and normalizes the header's image path so it
//! points at the public serving location.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::frontmatter::{self, Frontmatter};
use crate::markdown;

const MARKDOWN_EXTENSION: &str = ".md";

/// Prefixes under which an article's `featuredImage` refers to the source
/// images directory. Values with one of these prefixes are rewritten to
/// [`PUBLIC_IMAGES_PREFIX`]; all other values are left untouched.
const RELATIVE_IMAGES_PREFIXES: &[&str] = &["../images/", "./images/"];

/// The path under which synchronized images are served.
const PUBLIC_IMAGES_PREFIX: &str = "/images/";

/// A fully loaded article: its canonical slug, parsed [`Frontmatter`], and
/// rendered markup body. Constructed fresh from the source file on every
/// build; never persisted except as generated output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Article {
    /// The canonical, identifier-safe slug. Duplicated out of the
    /// frontmatter after normalization since everything downstream keys on
    /// it.
    pub slug: String,

    /// The parsed metadata header.
    pub frontmatter: Frontmatter,

    /// The rendered markup body.
    pub body: String,
}

/// Normalizes a slug -- from a header or from operator input -- to its
/// canonical identifier-safe form (e.g. `My Article` becomes `my-article`).
/// Already-safe slugs pass through unchanged.
pub fn normalize_slug(slug: &str) -> String {
    slug::slugify(slug)
}

/// Loads a single article from `path`. Errors are annotated with the
/// offending path.
pub fn load(path: &Path) -> Result<Article> {
    match load_file(path) {
        Ok(article) => Ok(article),
        Err(e) => Err(Error::Annotated(
            format!("loading article `{}`", path.display()),
            Box::new(e),
        )),
    }
}

fn load_file(path: &Path) -> Result<Article> {
    let contents = fs::read_to_string(path)?;
    let (mut frontmatter, body) = frontmatter::parse(&contents)?;

    let slug = normalize_slug(&frontmatter.slug);
    if slug.is_empty() {
        return Err(Error::Format(frontmatter::Error::MissingSlug));
    }
    frontmatter.slug = slug.clone();
    frontmatter.featured_image = rewrite_image_path(frontmatter.featured_image);

    Ok(Article {
        slug,
        body: markdown::render(body),
        frontmatter,
    })
}

/// Rewrites a `featuredImage` value that points into the source images
/// directory to the public image-serving path.
fn rewrite_image_path(path: String) -> String {
    for prefix in RELATIVE_IMAGES_PREFIXES {
        if let Some(rest) = path.strip_prefix(prefix) {
            return format!("{}{}", PUBLIC_IMAGES_PREFIX, rest);
        }
    }
    path
}

/// Loads every article (extension = `.md`) in `directory` and returns them
/// ordered by publish date, most recent first (ties broken by slug). This
/// ordering is the canonical input sequence for the code generator: the
/// generated listing preserves it.
pub fn load_all(directory: &Path) -> Result<Vec<Article>> {
    let mut articles: Vec<Article> = Vec::new();

    for result in fs::read_dir(directory)? {
        let entry = result?;
        let os_file_name = entry.file_name();
        let file_name = os_file_name.to_string_lossy();
        if file_name.ends_with(MARKDOWN_EXTENSION) {
            articles.push(load(&entry.path())?);
        }
    }

    articles.sort_by(|a, b| {
        b.frontmatter
            .publish_date
            .cmp(&a.frontmatter.publish_date)
            .then_with(|| a.slug.cmp(&b.slug))
    });

    let mut seen: HashSet<&str> = HashSet::new();
    for article in &articles {
        if !seen.insert(&article.slug) {
            return Err(Error::DuplicateSlug(article.slug.clone()));
        }
    }

    Ok(articles)
}

/// Represents the result of an article-load operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading an [`Article`].
#[derive(Debug)]
pub enum Error {
    /// Returned when the article's header block is malformed or missing.
    Format(frontmatter::Error),

    /// Returned when two source files declare the same slug. Slugs key the
    /// generated index, so the set must be unique.
    DuplicateSlug(String),

    /// Returned for I/O errors.
    Io(std::io::Error),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Format(err) => err.fmt(f),
            Error::DuplicateSlug(slug) => {
                write!(f, "Multiple articles declare the slug `{}`", slug)
            }
            Error::Io(err) => err.fmt(f),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Format(err) => Some(err),
            Error::DuplicateSlug(_) => None,
            Error::Io(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<frontmatter::Error> for Error {
    /// Converts a [`frontmatter::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator when parsing headers.
    fn from(err: frontmatter::Error) -> Error {
        Error::Format(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
