/// A pull request as decoded from the GraphQL search response.
/// Constructed once by the response schema and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct PullRequest {
    /// `owner/name` of the repository the PR belongs to
    pub repo_full_name: String,
    /// PR number, always >= 1
    pub number: u64,
    pub title: String,
    pub url: String,
    /// Head branch name
    pub branch_name: String,
    /// Aggregate review verdict; `None` when the repository requires no review
    pub review_decision: Option<ReviewDecision>,
    /// Author's GitHub login
    #[allow(dead_code)] // Decoded for completeness, not shown in the summary
    pub author: String,
    pub reviews: Vec<Review>,
    /// Reviewers still pending
    pub review_requests: Vec<RequestedReviewer>,
    /// Check suites of the head commit; `None` when the PR has no commits
    pub last_commit_check_suites: Option<Vec<CheckSuite>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    ChangesRequested,
    ReviewRequired,
    Approved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewState {
    Commented,
    ChangesRequested,
    Approved,
    Pending,
}

/// A submitted review. Only the count of reviews feeds the review status.
#[derive(Debug, Clone, PartialEq)]
#[allow(dead_code)] // Fields decoded for completeness, not shown in the summary
pub struct Review {
    pub author_login: String,
    pub state: ReviewState,
}

/// Who a review request is waiting on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestedReviewer {
    User { login: String },
    Team { name: String },
    Mannequin { name: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckSuite {
    /// Outcome string, e.g. `SUCCESS`; `None` while the suite is still running
    pub conclusion: Option<String>,
}

/// The two result sets of a single query, in API order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrGroups {
    pub authored: Vec<PullRequest>,
    pub to_review: Vec<PullRequest>,
}
