//! Top-level include filter.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexSet;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Allow-list of top-level folder names beneath a scan root.
///
/// `All` admits every file. `Only` admits a file when the first segment of
/// its root-relative path is one of the listed names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum IncludeSet {
    /// No filtering.
    #[default]
    All,
    /// Only the named top-level segments.
    Only(IndexSet<String>),
}

impl IncludeSet {
    /// Parse the comma-separated list form.
    ///
    /// An empty value, a list with no non-blank items, or the literal `all`
    /// (any case) disables filtering.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Self::All;
        }

        let names: IndexSet<String> = trimmed
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect();

        if names.is_empty() {
            Self::All
        } else {
            Self::Only(names)
        }
    }

    /// Build a filter from explicit names.
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: IndexSet<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            Self::All
        } else {
            Self::Only(names)
        }
    }

    /// Check whether a top-level segment is admitted.
    pub fn permits(&self, segment: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(names) => names.contains(segment),
        }
    }

    /// Check whether a root-relative, slash-separated path is admitted.
    pub fn permits_path(&self, relative: &str) -> bool {
        let segment = relative.split('/').next().unwrap_or_default();
        self.permits(segment)
    }

    /// Whether this filter admits everything.
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl fmt::Display for IncludeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(names) => write!(f, "{}", names.iter().join(",")),
        }
    }
}

impl FromStr for IncludeSet {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<String> for IncludeSet {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<IncludeSet> for String {
    fn from(value: IncludeSet) -> Self {
        value.to_string()
    }
}
