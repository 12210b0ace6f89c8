//! Converts the constrained markdown subset used by article bodies into
//! markup fragments. The renderer is an explicit sequence of passes, each a
//! pure `String -> String` function, applied in a load-bearing order:
//! longest-match constructs run before shorter ones (`######` before `#`,
//! `***` before `**` before `*`) so a short pattern can never swallow part
//! of a longer one, block-level passes run before paragraph wrapping so
//! nothing gets double-wrapped, and inline links/images are substituted
//! last so their syntax is still recognized inside headers and list items.
//!
//! Every pass preserves line boundaries exactly: list runs are detected by
//! adjacency in the transformed line sequence, so a pass that merged or
//! split lines would change which items share a container.

use regex::Regex;
use std::sync::LazyLock;

/// Renders a markdown body to markup. Pure function, no I/O.
pub fn render(markdown: &str) -> String {
    const PASSES: &[fn(String) -> String] = &[
        headers,
        emphasis,
        blockquotes,
        list_items,
        wrap_list_runs,
        paragraphs,
        strip_empty_paragraphs,
        inline_images,
        inline_links,
    ];
    PASSES
        .iter()
        .fold(markdown.to_owned(), |text, pass| pass(text))
}

static HEADERS: LazyLock<Vec<(Regex, String)>> = LazyLock::new(|| {
    (1..=6)
        .rev()
        .map(|level| {
            let pattern = format!(r"(?m)^{} (.*)$", "#".repeat(level));
            let replacement = format!("<h{}>$1</h{}>", level, level);
            (Regex::new(&pattern).unwrap(), replacement)
        })
        .collect()
});

/// Pass 1: heading lines, matched from six leading markers down to one.
fn headers(text: String) -> String {
    HEADERS.iter().fold(text, |text, (pattern, replacement)| {
        pattern
            .replace_all(&text, replacement.as_str())
            .into_owned()
    })
}

static TRIPLE_EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*\*(.+?)\*\*\*").unwrap());
static DOUBLE_EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static SINGLE_EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(.+?)\*").unwrap());

/// Pass 2: emphasis, triple before double before single. The inner matches
/// are lazy and never cross a line boundary, so
/// `**bold *and italic* text**` resolves to nested tags rather than one
/// pass corrupting the other.
fn emphasis(text: String) -> String {
    let text = TRIPLE_EMPHASIS.replace_all(&text, "<strong><em>$1</em></strong>");
    let text = DOUBLE_EMPHASIS.replace_all(&text, "<strong>$1</strong>");
    SINGLE_EMPHASIS.replace_all(&text, "<em>$1</em>").into_owned()
}

static BLOCKQUOTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^> (.*)$").unwrap());

/// Pass 3: blockquote lines.
fn blockquotes(text: String) -> String {
    BLOCKQUOTE
        .replace_all(&text, "<blockquote>$1</blockquote>")
        .into_owned()
}

static LIST_ITEM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^- (.*)$").unwrap());

/// Pass 4a: unordered list item lines become item fragments.
fn list_items(text: String) -> String {
    LIST_ITEM.replace_all(&text, "<li>$1</li>").into_owned()
}

/// Pass 4b: wraps every maximal run of consecutive item-fragment lines in
/// a single list container. Runs are detected by adjacency in the
/// transformed text: a blank line between two items splits them into two
/// containers.
fn wrap_list_runs(text: String) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut run: Vec<&str> = Vec::new();
    for line in text.lines() {
        if line.starts_with("<li>") {
            run.push(line);
        } else {
            flush_run(&mut out, &mut run);
            out.push(line.to_owned());
        }
    }
    flush_run(&mut out, &mut run);
    out.join("\n")
}

fn flush_run(out: &mut Vec<String>, run: &mut Vec<&str>) {
    if !run.is_empty() {
        out.push("<ul>".to_owned());
        out.extend(run.drain(..).map(str::to_owned));
        out.push("</ul>".to_owned());
    }
}

/// Pass 5: wraps any remaining non-blank line that doesn't already start
/// with a markup tag in a paragraph container. Runs strictly after the
/// block-level passes.
fn paragraphs(text: String) -> String {
    text.lines()
        .map(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('<') {
                line.to_owned()
            } else {
                format!("<p>{}</p>", line)
            }
        })
        .collect::<Vec<String>>()
        .join("\n")
}

static EMPTY_PARAGRAPH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^<p>\s*</p>$\n?").unwrap());

/// Pass 6: drops paragraph containers with no content.
fn strip_empty_paragraphs(text: String) -> String {
    EMPTY_PARAGRAPH.replace_all(&text, "").into_owned()
}

static IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]*)\)").unwrap());
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\(([^)]*)\)").unwrap());

/// Pass 7a: inline images. Must run before the link pass or the link
/// pattern would consume the image syntax minus its leading `!`.
fn inline_images(text: String) -> String {
    IMAGE
        .replace_all(&text, r#"<img src="$2" alt="$1" />"#)
        .into_owned()
}

/// Pass 7b: inline links.
fn inline_links(text: String) -> String {
    LINK.replace_all(&text, r#"<a href="$2">$1</a>"#)
        .into_owned()
}
