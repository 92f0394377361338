//! Download URL construction.

use std::fmt;

/// Normalized base URL that relative paths are appended to.
///
/// Trailing slashes are stripped on construction so joins never produce a
/// double slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlBase(String);

impl UrlBase {
    /// Normalize a base URL.
    pub fn new(base: &str) -> Self {
        Self(base.trim().trim_end_matches('/').to_string())
    }

    /// Scope this base to an instance: `<base>/<instance>`.
    pub fn scoped(&self, instance: &str) -> Self {
        let segment = instance.trim_matches('/');
        if segment.is_empty() {
            return self.clone();
        }
        Self(format!("{}/{segment}", self.0))
    }

    /// Append a root-relative, slash-separated path.
    pub fn join(&self, relative: &str) -> String {
        format!("{}/{}", self.0, relative.trim_start_matches('/'))
    }

    /// The normalized base as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UrlBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_strips_trailing_slash() {
        assert_eq!(
            UrlBase::new("https://cdn.example.com/").join("a/b.txt"),
            "https://cdn.example.com/a/b.txt"
        );
        assert_eq!(
            UrlBase::new("https://cdn.example.com").join("a/b.txt"),
            "https://cdn.example.com/a/b.txt"
        );
    }

    #[test]
    fn test_join_with_instance() {
        assert_eq!(
            UrlBase::new("https://cdn.example.com/")
                .scoped("modpack1")
                .join("a/b.txt"),
            "https://cdn.example.com/modpack1/a/b.txt"
        );
    }

    #[test]
    fn test_multiple_trailing_slashes() {
        let base = UrlBase::new("https://cdn.example.com/files///");
        assert_eq!(base.as_str(), "https://cdn.example.com/files");
        assert_eq!(
            base.scoped("pack").join("mods/x.jar"),
            "https://cdn.example.com/files/pack/mods/x.jar"
        );
    }
}
