//! Exports the lifecycle entry points that stitch together the high-level
//! steps of the pipeline: loading articles ([`crate::article`]), mirroring
//! images ([`crate::assets`]), and emitting generated modules
//! ([`crate::codegen`]). Whatever the entry point -- build-all, build-one,
//! delete-one, or the interactive prompt -- the generated index is always
//! rebuilt from the complete article set on disk, so it can never drift
//! from the sources.

use std::fmt;
use std::fs;
use std::io;

use crate::article::{self, Article};
use crate::assets;
use crate::codegen::Generator;
use crate::config::Config;
use crate::logger;
use crate::prompt::Prompt;

/// Builds every article: loads the full set, mirrors the images directory,
/// and regenerates every module plus the index.
pub fn build_all(config: &Config) -> Result<()> {
    let articles = article::load_all(&config.articles_directory)?;
    logger::info(&format!(
        "Loaded {} article(s) from `{}`",
        articles.len(),
        config.articles_directory.display()
    ));

    let copied = assets::sync_images(&config.images_directory, &config.public_images_directory)?;
    logger::info(&format!("Synchronized {} image(s)", copied));

    Generator {
        output_directory: &config.output_directory,
    }
    .generate(&articles)?;
    logger::success(&format!(
        "Generated {} article module(s) and the index",
        articles.len()
    ));
    Ok(())
}

/// Builds one article. The full set is still reloaded from disk: when a
/// prior generated index exists, everything is regenerated so the index
/// stays a function of the sources -- the "single article" distinction
/// affects logging, not what is written. Only when no index exists yet is
/// output limited to the requested article plus an index containing it
/// alone.
pub fn build_one(config: &Config, slug: &str) -> Result<()> {
    let slug = article::normalize_slug(slug);
    let generator = Generator {
        output_directory: &config.output_directory,
    };

    let articles = article::load_all(&config.articles_directory)?;
    let article = articles
        .iter()
        .find(|a| a.slug == slug)
        .ok_or_else(|| Error::NotFound(slug.clone()))?;
    logger::info(&format!(
        "Building `{}` ({})",
        slug, article.frontmatter.title
    ));

    if generator.index_path().is_file() {
        generator.generate(&articles)?;
        logger::success(&format!(
            "Regenerated the index for {} article(s)",
            articles.len()
        ));
    } else {
        let single = vec![article.clone()];
        generator.generate(&single)?;
        logger::warn("No prior index; generated an index containing only this article");
        logger::success(&format!("Generated `{}`", slug));
    }
    Ok(())
}

/// Deletes one article's generated module, then regenerates everything from
/// the articles remaining on disk. Deleting the last article writes an
/// explicitly empty index rather than omitting it. The markdown source is
/// never touched: if the operator left it in place, regeneration
/// resurrects the article and a warning says so.
pub fn delete_one(config: &Config, slug: &str) -> Result<()> {
    let slug = article::normalize_slug(slug);
    let generator = Generator {
        output_directory: &config.output_directory,
    };

    let module_path = generator.module_path(&slug);
    if !module_path.is_file() {
        return Err(Error::NotFound(slug));
    }
    fs::remove_file(&module_path)?;
    logger::info(&format!("Removed `{}`", module_path.display()));

    let articles = article::load_all(&config.articles_directory)?;
    if articles.iter().any(|a| a.slug == slug) {
        logger::warn(&format!(
            "The source for `{}` still exists; its module will be regenerated",
            slug
        ));
    }

    generator.generate(&articles)?;
    if articles.is_empty() {
        logger::success("No articles remain; wrote an empty index");
    } else {
        logger::success(&format!(
            "Regenerated the index for {} remaining article(s)",
            articles.len()
        ));
    }
    Ok(())
}

/// The no-arguments entry point: asks for an action, then delegates to the
/// matching target prompt.
pub fn interactive(config: &Config, prompt: &mut dyn Prompt) -> Result<()> {
    loop {
        let action = prompt.ask("Build or delete? [build]")?;
        match action.to_ascii_lowercase().as_str() {
            "" | "b" | "build" => return interactive_build(config, prompt),
            "d" | "delete" => return interactive_delete(config, prompt),
            other => {
                logger::warn(&format!(
                    "Unrecognized action `{}`; answer `build` or `delete`",
                    other
                ));
            }
        }
    }
}

fn interactive_build(config: &Config, prompt: &mut dyn Prompt) -> Result<()> {
    let articles = article::load_all(&config.articles_directory)?;
    list_targets(&articles);
    loop {
        let answer = prompt.ask("Article to build (number or slug, empty for all):")?;
        if answer.is_empty() {
            return build_all(config);
        }
        match resolve_target(&articles, &answer) {
            Some(slug) => return build_one(config, &slug),
            None => logger::error(&format!("No article matches `{}`", answer)),
        }
    }
}

/// The interactive delete prompt (`--delete`). Empty input cancels without
/// error; an unknown target reports the failure and re-prompts.
pub fn interactive_delete(config: &Config, prompt: &mut dyn Prompt) -> Result<()> {
    let articles = article::load_all(&config.articles_directory)?;
    list_targets(&articles);
    loop {
        let answer = prompt.ask("Article to delete (number or slug, empty to cancel):")?;
        if answer.is_empty() {
            logger::info("Nothing deleted");
            return Ok(());
        }
        // A slug outside the current article set is still a valid delete
        // target: its generated module may be a stale leftover.
        let slug = resolve_target(&articles, &answer)
            .unwrap_or_else(|| article::normalize_slug(&answer));
        match delete_one(config, &slug) {
            Err(Error::NotFound(slug)) => {
                logger::error(&format!("No generated module for `{}`", slug));
            }
            other => return other,
        }
    }
}

fn list_targets(articles: &[Article]) {
    for (i, article) in articles.iter().enumerate() {
        logger::info(&format!(
            "{}. {} ({})",
            i + 1,
            article.slug,
            article.frontmatter.title
        ));
    }
}

/// Resolves an operator answer -- a 1-based ordinal or a literal slug --
/// against the article listing.
fn resolve_target(articles: &[Article], answer: &str) -> Option<String> {
    if let Ok(ordinal) = answer.parse::<usize>() {
        return ordinal
            .checked_sub(1)
            .and_then(|i| articles.get(i))
            .map(|a| a.slug.clone());
    }
    let slug = article::normalize_slug(answer);
    articles
        .iter()
        .find(|a| a.slug == slug)
        .map(|a| a.slug.clone())
}

/// Represents the result of a lifecycle operation.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for lifecycle operations.
#[derive(Debug)]
pub enum Error {
    /// Returned when a referenced slug has no corresponding markdown file
    /// (build path) or generated module (delete path).
    NotFound(String),

    /// Returned for errors loading articles.
    Load(article::Error),

    /// Returned for I/O problems mirroring images or writing generated
    /// modules.
    Io(io::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::NotFound(slug) => write!(f, "Unknown article `{}`", slug),
            Error::Load(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::NotFound(_) => None,
            Error::Load(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<article::Error> for Error {
    /// Converts an [`article::Error`] into an [`Error`]. This allows us to
    /// use the `?` operator.
    fn from(err: article::Error) -> Error {
        Error::Load(err)
    }
}

impl From<io::Error> for Error {
    /// Converts an [`io::Error`] into an [`Error`]. This allows us to use
    /// the `?` operator.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}
