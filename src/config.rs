//! Project configuration. A `presswork.yaml` file marks the project root
//! and may override any of the conventional directory locations; it is
//! discovered by walking up from the working directory. When no project
//! file exists, the conventional layout is assumed rooted at the working
//! directory itself.

use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;

const PROJECT_FILE: &str = "presswork.yaml";

const DEFAULT_ARTICLES_DIRECTORY: &str = "content/articles";
const DEFAULT_IMAGES_DIRECTORY: &str = "content/images";
const DEFAULT_OUTPUT_DIRECTORY: &str = "src/generated";
const DEFAULT_PUBLIC_IMAGES_DIRECTORY: &str = "public/images";

/// The raw, optional-everything shape of the project file.
#[derive(Deserialize, Default)]
struct Project {
    #[serde(default)]
    articles_directory: Option<PathBuf>,

    #[serde(default)]
    images_directory: Option<PathBuf>,

    #[serde(default)]
    output_directory: Option<PathBuf>,

    #[serde(default)]
    public_images_directory: Option<PathBuf>,
}

/// The resolved project layout. All paths are resolved against the project
/// root (the directory containing `presswork.yaml`, or the working
/// directory when none exists).
#[derive(Clone, Debug)]
pub struct Config {
    /// The directory of markdown article sources. Read-only to the tool.
    pub articles_directory: PathBuf,

    /// The directory of source images. Read-only to the tool.
    pub images_directory: PathBuf,

    /// The directory into which generated modules are written. Owned by
    /// the tool.
    pub output_directory: PathBuf,

    /// The directory into which images are mirrored for serving. Owned by
    /// the tool.
    pub public_images_directory: PathBuf,
}

impl Config {
    /// Resolves the configuration for `directory`: finds the nearest
    /// `presswork.yaml` in it or any parent directory, falling back to the
    /// conventional layout rooted at `directory` when there is none.
    pub fn from_directory(directory: &Path) -> Result<Config> {
        match find_project_file(directory) {
            Some(path) => Config::from_project_file(&path),
            None => Ok(Config::conventional(directory)),
        }
    }

    /// Loads and resolves a specific project file.
    pub fn from_project_file(path: &Path) -> Result<Config> {
        let project: Project = serde_yaml::from_reader(File::open(path)?)?;
        // The parent is empty (i.e., the working directory) only for a bare
        // file name.
        let root = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(Config {
            articles_directory: resolve(
                root,
                project.articles_directory,
                DEFAULT_ARTICLES_DIRECTORY,
            ),
            images_directory: resolve(root, project.images_directory, DEFAULT_IMAGES_DIRECTORY),
            output_directory: resolve(root, project.output_directory, DEFAULT_OUTPUT_DIRECTORY),
            public_images_directory: resolve(
                root,
                project.public_images_directory,
                DEFAULT_PUBLIC_IMAGES_DIRECTORY,
            ),
        })
    }

    /// The conventional layout rooted at `root`, with no overrides.
    pub fn conventional(root: &Path) -> Config {
        Config {
            articles_directory: root.join(DEFAULT_ARTICLES_DIRECTORY),
            images_directory: root.join(DEFAULT_IMAGES_DIRECTORY),
            output_directory: root.join(DEFAULT_OUTPUT_DIRECTORY),
            public_images_directory: root.join(DEFAULT_PUBLIC_IMAGES_DIRECTORY),
        }
    }
}

fn find_project_file(directory: &Path) -> Option<PathBuf> {
    let path = directory.join(PROJECT_FILE);
    if path.is_file() {
        Some(path)
    } else {
        directory.parent().and_then(find_project_file)
    }
}

fn resolve(root: &Path, value: Option<PathBuf>, default: &str) -> PathBuf {
    // Path::join replaces the base when the override is absolute, which is
    // exactly the behavior we want.
    root.join(value.unwrap_or_else(|| PathBuf::from(default)))
}

/// Represents the result of a configuration-load operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading the project configuration.
#[derive(Debug)]
pub enum Error {
    /// Returned when the project file can't be read.
    Io(std::io::Error),

    /// Returned when the project file isn't valid YAML.
    DeserializeYaml(serde_yaml::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::DeserializeYaml(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::DeserializeYaml(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    #[test]
    fn test_project_file_overrides_and_defaults() -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(PROJECT_FILE),
            "articles_directory: posts\noutput_directory: src/articles\n",
        )?;

        let config = Config::from_project_file(&dir.path().join(PROJECT_FILE))?;
        assert_eq!(config.articles_directory, dir.path().join("posts"));
        assert_eq!(config.output_directory, dir.path().join("src/articles"));
        // Unset keys fall back to the conventional layout.
        assert_eq!(config.images_directory, dir.path().join("content/images"));
        assert_eq!(
            config.public_images_directory,
            dir.path().join("public/images")
        );
        Ok(())
    }

    #[test]
    fn test_project_file_found_in_parent() -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(PROJECT_FILE), "articles_directory: posts\n")?;
        let nested = dir.path().join("content").join("articles");
        fs::create_dir_all(&nested)?;

        let config = Config::from_directory(&nested)?;
        assert_eq!(config.articles_directory, dir.path().join("posts"));
        Ok(())
    }

    #[test]
    fn test_malformed_project_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(PROJECT_FILE), ": not yaml: [\n").unwrap();

        match Config::from_project_file(&dir.path().join(PROJECT_FILE)) {
            Err(Error::DeserializeYaml(_)) => {}
            other => panic!("expected DeserializeYaml, got {:?}", other.map(|_| ())),
        }
    }
}
