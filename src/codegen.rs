//! Emits the generated data modules consumed by the presentation layer:
//! one Rust module per article plus the aggregate index module (`mod.rs`).
//! The index exposes the full slug-to-article mapping, the metadata-only
//! listing in input order, and the derived category/tag vocabularies, and
//! defines the `Article`/`ArticleMeta` structs itself so the generated tree
//! is self-contained.
//!
//! Regeneration is always whole-set: [`Generator::generate`] takes the
//! complete article sequence and rewrites every module, so the index can
//! never reference a missing per-article module or omit a present one.
//! There is deliberately no partial-update entry point. Output is a pure
//! function of the input sequence -- no timestamps, no environment -- so
//! rebuilding an unchanged source set produces byte-identical files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::article::Article;

const GENERATED_HEADER: &str = "\
// @generated by presswork. Do not edit by hand; this file is rewritten
// wholesale on every build.
";

/// The index module's file name within the output directory.
const INDEX_FILE: &str = "mod.rs";

/// Emits generated modules into an output directory.
pub struct Generator<'a> {
    /// The directory in which the generated modules are written. Owned
    /// entirely by the tool; the whole tree is rewritten on every build.
    pub output_directory: &'a Path,
}

impl Generator<'_> {
    /// Writes one module per article plus the index module. `articles` must
    /// be the complete set, in listing order -- never a subset merged with
    /// stale prior output. An empty set writes an explicitly empty index.
    pub fn generate(&self, articles: &[Article]) -> io::Result<()> {
        // Blow away the old output tree so a renamed or removed article
        // can't leave a stale module behind. The directory is owned
        // entirely by this tool, never edited by hand.
        rmdir(self.output_directory)?;
        fs::create_dir_all(self.output_directory)?;
        for article in articles {
            fs::write(self.module_path(&article.slug), article_module(article))?;
        }
        fs::write(self.index_path(), index_module(articles))?;
        Ok(())
    }

    /// The path of the generated module for `slug`.
    pub fn module_path(&self, slug: &str) -> PathBuf {
        self.output_directory
            .join(format!("{}.rs", module_name(slug)))
    }

    /// The path of the generated index module.
    pub fn index_path(&self) -> PathBuf {
        self.output_directory.join(INDEX_FILE)
    }
}

fn rmdir(dir: &Path) -> io::Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) => match e.kind() {
            io::ErrorKind::NotFound => Ok(()),
            _ => Err(e),
        },
    }
}

/// Maps a slug to a Rust module identifier: dashes become underscores and
/// a leading digit is prefixed so e.g. `4th-of-july` stays nameable.
pub fn module_name(slug: &str) -> String {
    let mut name: String = slug
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    if name.chars().next().map_or(false, |c| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}

/// Escapes a value for embedding in a double-quoted Rust string literal.
/// Escape-introducing characters and the literal delimiter are escaped, and
/// line breaks become `\n` so every emitted literal stays on one line.
fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn string_literal(value: &str) -> String {
    format!("\"{}\"", escape(value))
}

fn option_literal(value: &Option<String>) -> String {
    match value {
        Some(v) => format!("Some({})", string_literal(v)),
        None => "None".to_owned(),
    }
}

fn list_literal(values: &[String]) -> String {
    let items: Vec<String> = values.iter().map(|v| string_literal(v)).collect();
    format!("&[{}]", items.join(", "))
}

/// Renders the shared metadata fields of an `Article`/`ArticleMeta`
/// initializer, one field per line at the given indent.
fn metadata_fields(article: &Article, indent: &str) -> String {
    let frontmatter = &article.frontmatter;
    [
        ("title", string_literal(&frontmatter.title)),
        ("slug", string_literal(&article.slug)),
        ("excerpt", string_literal(&frontmatter.excerpt)),
        ("featured_image", string_literal(&frontmatter.featured_image)),
        ("category", string_literal(&frontmatter.category)),
        ("publish_date", string_literal(&frontmatter.publish_date)),
        ("author", string_literal(&frontmatter.author)),
        ("tags", list_literal(&frontmatter.tags)),
        ("subtitle", option_literal(&frontmatter.subtitle)),
    ]
    .iter()
    .map(|(field, literal)| format!("{}{}: {},\n", indent, field, literal))
    .collect()
}

/// Renders the source of one per-article module.
fn article_module(article: &Article) -> String {
    let mut source = String::from(GENERATED_HEADER);
    source.push_str("\nuse super::Article;\n\n");
    source.push_str("pub const ARTICLE: Article = Article {\n");
    source.push_str(&metadata_fields(article, "    "));
    source.push_str(&format!("    body: {},\n", string_literal(&article.body)));
    source.push_str("};\n");
    source
}

/// Renders the source of the index module from the complete article set.
fn index_module(articles: &[Article]) -> String {
    let mut source = String::from(GENERATED_HEADER);
    source.push('\n');

    for article in articles {
        source.push_str(&format!("mod {};\n", module_name(&article.slug)));
    }
    if !articles.is_empty() {
        source.push('\n');
    }

    source.push_str(
        "/// A fully rendered article.\n\
         #[derive(Clone, Copy, Debug)]\n\
         pub struct Article {\n\
         \x20   pub title: &'static str,\n\
         \x20   pub slug: &'static str,\n\
         \x20   pub excerpt: &'static str,\n\
         \x20   pub featured_image: &'static str,\n\
         \x20   pub category: &'static str,\n\
         \x20   pub publish_date: &'static str,\n\
         \x20   pub author: &'static str,\n\
         \x20   pub tags: &'static [&'static str],\n\
         \x20   pub subtitle: Option<&'static str>,\n\
         \x20   pub body: &'static str,\n\
         }\n\n\
         /// Listing metadata for an article: everything except the body.\n\
         #[derive(Clone, Copy, Debug)]\n\
         pub struct ArticleMeta {\n\
         \x20   pub title: &'static str,\n\
         \x20   pub slug: &'static str,\n\
         \x20   pub excerpt: &'static str,\n\
         \x20   pub featured_image: &'static str,\n\
         \x20   pub category: &'static str,\n\
         \x20   pub publish_date: &'static str,\n\
         \x20   pub author: &'static str,\n\
         \x20   pub tags: &'static [&'static str],\n\
         \x20   pub subtitle: Option<&'static str>,\n\
         }\n\n",
    );

    source.push_str("/// Every article, most recently published first.\n");
    source.push_str("pub static ARTICLES: &[Article] = &[\n");
    for article in articles {
        source.push_str(&format!("    {}::ARTICLE,\n", module_name(&article.slug)));
    }
    source.push_str("];\n\n");

    source.push_str("/// Looks up an article by slug.\n");
    source.push_str("pub fn by_slug(slug: &str) -> Option<&'static Article> {\n");
    source.push_str("    match slug {\n");
    for article in articles {
        source.push_str(&format!(
            "        {} => Some(&{}::ARTICLE),\n",
            string_literal(&article.slug),
            module_name(&article.slug)
        ));
    }
    source.push_str("        _ => None,\n    }\n}\n\n");

    source.push_str("/// Listing metadata, in the same order as [`ARTICLES`].\n");
    source.push_str("pub static METADATA: &[ArticleMeta] = &[\n");
    for article in articles {
        source.push_str("    ArticleMeta {\n");
        source.push_str(&metadata_fields(article, "        "));
        source.push_str("    },\n");
    }
    source.push_str("];\n\n");

    source.push_str("/// Every category in use, deduplicated and sorted.\n");
    source.push_str(&format!(
        "pub static CATEGORIES: &[&str] = {};\n\n",
        vocabulary_literal(categories(articles))
    ));

    source.push_str("/// Every tag in use, deduplicated and sorted.\n");
    source.push_str(&format!(
        "pub static TAGS: &[&str] = {};\n",
        vocabulary_literal(tags(articles))
    ));

    source
}

fn vocabulary_literal(values: Vec<&str>) -> String {
    let items: Vec<String> = values.iter().map(|v| string_literal(v)).collect();
    format!("&[{}]", items.join(", "))
}

/// The deduplicated, lexicographically sorted category vocabulary. Articles
/// with an empty category don't contribute.
pub fn categories(articles: &[Article]) -> Vec<&str> {
    vocabulary(articles.iter().map(|a| a.frontmatter.category.as_str()))
}

/// The deduplicated, lexicographically sorted tag vocabulary across all
/// articles.
pub fn tags(articles: &[Article]) -> Vec<&str> {
    vocabulary(
        articles
            .iter()
            .flat_map(|a| a.frontmatter.tags.iter().map(String::as_str)),
    )
}

fn vocabulary<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut vocabulary: Vec<&str> = values.filter(|v| !v.is_empty()).collect();
    vocabulary.sort_unstable();
    vocabulary.dedup();
    vocabulary
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::frontmatter::Frontmatter;

    fn article(slug: &str, date: &str, category: &str, tags: &[&str]) -> Article {
        Article {
            slug: slug.to_owned(),
            frontmatter: Frontmatter {
                title: format!("Title of {}", slug),
                slug: slug.to_owned(),
                excerpt: "An excerpt.".to_owned(),
                featured_image: "/images/hero.jpg".to_owned(),
                category: category.to_owned(),
                publish_date: date.to_owned(),
                author: "Craig Weber".to_owned(),
                tags: tags.iter().map(|t| t.to_string()).collect(),
                subtitle: None,
            },
            body: "<p>Body.</p>".to_owned(),
        }
    }

    #[test]
    fn test_module_name() {
        assert_eq!(module_name("hello-world"), "hello_world");
        assert_eq!(module_name("4th-of-july"), "_4th_of_july");
        assert_eq!(module_name("plain"), "plain");
    }

    #[test]
    fn test_escape_round_trip() {
        // Reversing the escapes must recover the original scalar exactly.
        fn unescape(escaped: &str) -> String {
            let mut out = String::new();
            let mut chars = escaped.chars();
            while let Some(c) = chars.next() {
                if c != '\\' {
                    out.push(c);
                    continue;
                }
                match chars.next() {
                    Some('\\') => out.push('\\'),
                    Some('"') => out.push('"'),
                    Some('n') => out.push('\n'),
                    Some('r') => out.push('\r'),
                    Some('t') => out.push('\t'),
                    other => panic!("unexpected escape {:?}", other),
                }
            }
            out
        }

        for original in [
            "plain text",
            "a \"quoted\" value",
            "line one\nline two",
            "tabs\tand\\backslashes",
            "<img src=\"/images/x.jpg\" alt=\"x\" />",
        ] {
            assert_eq!(unescape(&escape(original)), original);
        }
    }

    #[test]
    fn test_escaped_literal_is_single_line() {
        assert!(!string_literal("multi\nline\rvalue").contains('\n'));
    }

    #[test]
    fn test_article_module_contents() {
        let source = article_module(&article("hello-world", "2021-04-16", "News", &["faith"]));
        assert!(source.starts_with("// @generated"));
        assert!(source.contains("pub const ARTICLE: Article"));
        assert!(source.contains("slug: \"hello-world\","));
        assert!(source.contains("tags: &[\"faith\"],"));
        assert!(source.contains("body: \"<p>Body.</p>\","));
    }

    #[test]
    fn test_index_module_contents() {
        let articles = vec![
            article("hello-world", "2021-04-16", "News", &["faith", "family"]),
            article("picnic", "2021-01-01", "Events", &["community"]),
        ];
        let source = index_module(&articles);
        assert!(source.contains("mod hello_world;\n"));
        assert!(source.contains("mod picnic;\n"));
        assert!(source.contains("\"hello-world\" => Some(&hello_world::ARTICLE),"));
        assert!(source.contains("\"picnic\" => Some(&picnic::ARTICLE),"));
        assert!(source.contains("pub static CATEGORIES: &[&str] = &[\"Events\", \"News\"];"));
        assert!(source.contains(
            "pub static TAGS: &[&str] = &[\"community\", \"faith\", \"family\"];"
        ));
        // The metadata listing carries no body field.
        let metadata_section = source.split("pub static METADATA").nth(1).unwrap();
        assert!(!metadata_section.split("pub static CATEGORIES").next().unwrap().contains("body:"));
    }

    #[test]
    fn test_empty_set_writes_empty_index() {
        let source = index_module(&[]);
        assert!(source.contains("pub static ARTICLES: &[Article] = &[\n];"));
        assert!(source.contains("pub static METADATA: &[ArticleMeta] = &[\n];"));
        assert!(source.contains("pub static CATEGORIES: &[&str] = &[];"));
        assert!(source.contains("pub static TAGS: &[&str] = &[];"));
        assert!(!source.contains("mod "));
    }

    #[test]
    fn test_tags_vocabulary_sorted_and_deduplicated() {
        let articles = vec![
            article("hello-world", "2021-04-16", "News", &["faith", "family"]),
            article("second", "2021-03-01", "News", &["faith"]),
            article("third", "2021-02-01", "Events", &["community"]),
        ];
        assert_eq!(tags(&articles), vec!["community", "faith", "family"]);
        assert_eq!(categories(&articles), vec!["Events", "News"]);
    }

    #[test]
    fn test_generate_is_deterministic() -> io::Result<()> {
        let articles = vec![
            article("hello-world", "2021-04-16", "News", &["faith"]),
            article("picnic", "2021-01-01", "Events", &["community"]),
        ];
        let dir = tempfile::tempdir()?;
        let generator = Generator {
            output_directory: dir.path(),
        };

        generator.generate(&articles)?;
        let first_index = fs::read(generator.index_path())?;
        let first_module = fs::read(generator.module_path("hello-world"))?;

        generator.generate(&articles)?;
        assert_eq!(fs::read(generator.index_path())?, first_index);
        assert_eq!(fs::read(generator.module_path("hello-world"))?, first_module);
        Ok(())
    }
}
