/// Which result set a PR came from. Review status only means something for
/// PRs the user authored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Authored,
    ToReview,
}

impl Section {
    pub fn heading(self) -> &'static str {
        match self {
            Section::Authored => "Authored",
            Section::ToReview => "To review",
        }
    }
}

/// Where an authored PR stands with its reviewers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStatus {
    Approved,
    /// No reviewer was ever requested
    NoReviewers,
    /// Reviews came in and nobody is requested any more; the author owes an update
    UpdateNeeded,
    /// Requested reviewers haven't responded yet
    Waiting,
    /// Not shown for PRs the user is asked to review
    NotApplicable,
}

impl ReviewStatus {
    pub fn glyph(self) -> &'static str {
        match self {
            ReviewStatus::Approved => "A",
            ReviewStatus::NoReviewers => "0",
            ReviewStatus::UpdateNeeded => "U",
            ReviewStatus::Waiting => "w",
            ReviewStatus::NotApplicable => " ",
        }
    }
}

/// Aggregate CI state of a PR's head commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestStatus {
    /// No commit, so no check-suite data
    Unknown,
    /// No check suites configured
    NoChecks,
    Passed,
    Running,
    Failed,
}

impl TestStatus {
    pub fn glyph(self) -> &'static str {
        match self {
            TestStatus::Unknown => "?",
            TestStatus::NoChecks => " ",
            TestStatus::Passed => "✓",
            TestStatus::Running => "·",
            TestStatus::Failed => "✗",
        }
    }
}

/// Display knobs for the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Character budget for titles, including the `...`
    pub title_limit: usize,
    /// Prefix PR numbers with `owner/name#`
    pub show_repo: bool,
    /// Wrap identifiers in OSC 8 terminal hyperlinks
    pub hyperlinks: bool,
}
