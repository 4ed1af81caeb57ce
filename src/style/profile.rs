//! Named style profiles and the directory they are loaded from

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::debug;

use super::ast::StyleSheet;
use super::error::StyleError;

/// Environment variable overriding the style directory
pub const STYLE_DIR_ENV: &str = "FIGURE_TEMPLATE_STYLE_DIR";

/// File extension of style definition files
pub const STYLE_EXTENSION: &str = "figstyle";

/// The bundled style profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleProfile {
    Notebook,
    Slides,
    Paper,
}

impl StyleProfile {
    pub const ALL: [StyleProfile; 3] = [
        StyleProfile::Notebook,
        StyleProfile::Slides,
        StyleProfile::Paper,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            StyleProfile::Notebook => "notebook",
            StyleProfile::Slides => "slides",
            StyleProfile::Paper => "paper",
        }
    }
}

impl FromStr for StyleProfile {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "notebook" => Ok(StyleProfile::Notebook),
            "slides" => Ok(StyleProfile::Slides),
            "paper" => Ok(StyleProfile::Paper),
            _ => Err(StyleError::InvalidProfile {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for StyleProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A parsed style file, ready to be applied
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedStyle {
    pub profile: StyleProfile,
    pub path: PathBuf,
    pub source: String,
    pub sheet: StyleSheet,
}

/// A directory holding `<tag>.figstyle` files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleLibrary {
    dir: PathBuf,
}

impl Default for StyleLibrary {
    fn default() -> Self {
        Self::from_env()
    }
}

impl StyleLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The style files shipped with this crate
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("styles"))
    }

    /// `$FIGURE_TEMPLATE_STYLE_DIR` if set, else the bundled styles
    pub fn from_env() -> Self {
        match std::env::var_os(STYLE_DIR_ENV) {
            Some(dir) if !dir.is_empty() => Self::new(dir),
            _ => Self::bundled(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the style file for a profile, whether or not it exists
    pub fn path_for(&self, profile: StyleProfile) -> PathBuf {
        self.dir.join(format!("{}.{}", profile.tag(), STYLE_EXTENSION))
    }

    /// Resolve a profile tag to a readable style file
    pub fn resolve(&self, tag: &str) -> Result<PathBuf, StyleError> {
        let profile: StyleProfile = tag.parse()?;
        let path = self.path_for(profile);
        if !path.is_file() {
            return Err(StyleError::MissingResource {
                profile: tag.to_string(),
                path,
            });
        }
        Ok(path)
    }

    /// Resolve, read and parse a profile
    pub fn load(&self, tag: &str) -> Result<LoadedStyle, StyleError> {
        let path = self.resolve(tag)?;
        let profile: StyleProfile = tag.parse()?;
        let source = std::fs::read_to_string(&path).map_err(|source| StyleError::Read {
            path: path.clone(),
            source,
        })?;
        let sheet = super::grammar::parse(&source).map_err(|errors| StyleError::Syntax {
            path: path.clone(),
            source_text: source.clone(),
            errors,
        })?;
        debug!(
            profile = %profile,
            path = %path.display(),
            entries = sheet.entries.len(),
            "loaded style"
        );
        Ok(LoadedStyle {
            profile,
            path,
            source,
            sheet,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_tags_roundtrip() {
        for profile in StyleProfile::ALL {
            assert_eq!(profile.tag().parse::<StyleProfile>().unwrap(), profile);
        }
    }

    #[test]
    fn test_tags_are_case_sensitive() {
        assert!(matches!(
            "Paper".parse::<StyleProfile>(),
            Err(StyleError::InvalidProfile { .. })
        ));
    }

    #[test]
    fn test_bundled_profiles_resolve() {
        let library = StyleLibrary::bundled();
        for profile in StyleProfile::ALL {
            let path = library.resolve(profile.tag()).unwrap();
            assert!(path.ends_with(format!("{}.figstyle", profile.tag())));
        }
    }

    #[test]
    fn test_bundled_profiles_parse() {
        let library = StyleLibrary::bundled();
        for profile in StyleProfile::ALL {
            let loaded = library.load(profile.tag()).unwrap();
            assert!(!loaded.sheet.entries.is_empty());
        }
    }

    #[test]
    fn test_missing_resource() {
        let library = StyleLibrary::new("/nonexistent/styles");
        let err = library.resolve("slides").unwrap_err();
        assert!(
            matches!(err, StyleError::MissingResource { ref profile, .. } if profile == "slides")
        );
    }

    #[test]
    fn test_invalid_tag_is_checked_before_the_filesystem() {
        let library = StyleLibrary::new("/nonexistent/styles");
        assert!(matches!(
            library.resolve("poster"),
            Err(StyleError::InvalidProfile { .. })
        ));
    }
}
