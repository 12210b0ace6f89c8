//! Command-line interface definitions. The flag surface maps onto the
//! lifecycle actions in [`crate::build`]; with no arguments at all the tool
//! falls back to the interactive action prompt.

use clap::Parser;

/// Compiles markdown articles into generated Rust data modules
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Build every article
    #[arg(
        short,
        long,
        conflicts_with_all = ["delete", "delete_slug", "slug"]
    )]
    pub all: bool,

    /// Interactively choose an article whose generated module to delete
    #[arg(long, conflicts_with_all = ["delete_slug", "slug"])]
    pub delete: bool,

    /// Delete the named article's generated module and regenerate the index
    #[arg(
        short = 'd',
        long = "delete-slug",
        value_name = "SLUG",
        conflicts_with = "slug"
    )]
    pub delete_slug: Option<String>,

    /// Build exactly this article (the full index is still regenerated)
    #[arg(value_name = "SLUG")]
    pub slug: Option<String>,
}

/// The lifecycle action resolved from the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Build every article.
    BuildAll,

    /// Build one article (and regenerate the full index).
    BuildOne(String),

    /// Delete one article's generated module non-interactively.
    DeleteOne(String),

    /// Interactively pick a module to delete.
    DeleteInteractive,

    /// No arguments: ask for an action and a target.
    PromptAction,
}

impl Cli {
    /// Maps the parsed arguments onto an [`Action`]. Conflicting
    /// combinations are already rejected by the parser, as are `-d` with a
    /// missing value or a value that is itself a flag.
    pub fn action(self) -> Action {
        if self.all {
            Action::BuildAll
        } else if let Some(slug) = self.delete_slug {
            Action::DeleteOne(slug)
        } else if self.delete {
            Action::DeleteInteractive
        } else if let Some(slug) = self.slug {
            Action::BuildOne(slug)
        } else {
            Action::PromptAction
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(args: &[&str]) -> Result<Action, clap::Error> {
        Cli::try_parse_from(args).map(Cli::action)
    }

    #[test]
    fn test_no_arguments_prompts() {
        assert_eq!(parse(&["presswork"]).unwrap(), Action::PromptAction);
    }

    #[test]
    fn test_build_all() {
        assert_eq!(parse(&["presswork", "--all"]).unwrap(), Action::BuildAll);
        assert_eq!(parse(&["presswork", "-a"]).unwrap(), Action::BuildAll);
    }

    #[test]
    fn test_bare_slug_builds_one() {
        assert_eq!(
            parse(&["presswork", "hello-world"]).unwrap(),
            Action::BuildOne("hello-world".to_owned())
        );
    }

    #[test]
    fn test_delete_interactive() {
        assert_eq!(
            parse(&["presswork", "--delete"]).unwrap(),
            Action::DeleteInteractive
        );
    }

    #[test]
    fn test_delete_slug() {
        assert_eq!(
            parse(&["presswork", "-d", "hello-world"]).unwrap(),
            Action::DeleteOne("hello-world".to_owned())
        );
        assert_eq!(
            parse(&["presswork", "--delete-slug", "hello-world"]).unwrap(),
            Action::DeleteOne("hello-world".to_owned())
        );
    }

    #[test]
    fn test_delete_slug_requires_a_value() {
        assert!(parse(&["presswork", "-d"]).is_err());
    }

    #[test]
    fn test_delete_slug_rejects_flag_values() {
        // `-d --all` must fail loudly rather than delete an article named
        // `--all`.
        assert!(parse(&["presswork", "-d", "--all"]).is_err());
    }

    #[test]
    fn test_bare_slug_cannot_look_like_a_flag() {
        assert!(parse(&["presswork", "--bogus"]).is_err());
    }

    #[test]
    fn test_conflicting_actions_rejected() {
        assert!(parse(&["presswork", "--all", "hello-world"]).is_err());
        assert!(parse(&["presswork", "--delete", "-d", "x"]).is_err());
    }
}
