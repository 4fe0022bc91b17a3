//! Changelog releases and the due-release decision

/// Version string of the mutable top-of-changelog section
pub const UNRELEASED: &str = "unreleased";

/// One `## [version]` section of a changelog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    /// Version identifier as written (e.g. `v1.2.3`)
    pub version: String,
    /// Date from the heading, if any (`## [v1.2.3] - 2021-06-01`)
    pub date: Option<String>,
    /// Section lines; the first is the heading itself
    pub body: Vec<String>,
}

impl Release {
    /// Create a release with a synthesized heading line
    #[must_use]
    pub fn new(version: impl Into<String>) -> Self {
        let version = version.into();
        Self {
            body: vec![format!("## [{version}]")],
            version,
            date: None,
        }
    }

    /// Append body lines after the heading
    #[must_use]
    pub fn with_lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.body.extend(lines.into_iter().map(Into::into));
        self
    }

    /// Whether this is the `Unreleased` section (case-insensitive)
    #[must_use]
    pub fn is_unreleased(&self) -> bool {
        self.version.eq_ignore_ascii_case(UNRELEASED)
    }

    /// Body without the heading line
    #[must_use]
    pub fn notes(&self) -> &[String] {
        self.body.get(1..).unwrap_or_default()
    }
}

/// A parsed changelog, newest release first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Changelog {
    /// Text of the level-1 heading
    pub title: String,
    /// Releases in file order
    pub releases: Vec<Release>,
}

/// Outcome of comparing the changelog against existing tags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NextRelease {
    /// The newest release is already tagged (or there is none)
    #[default]
    NoReleaseDue,
    /// This release has no tag yet and should be cut
    ReleaseDue(Release),
}

impl NextRelease {
    /// The due release, if any
    #[must_use]
    pub const fn due(&self) -> Option<&Release> {
        match self {
            Self::NoReleaseDue => None,
            Self::ReleaseDue(release) => Some(release),
        }
    }

    /// Whether a release is due
    #[must_use]
    pub const fn is_due(&self) -> bool {
        matches!(self, Self::ReleaseDue(_))
    }
}
