use super::types::{ReviewStatus, Section, TestStatus};
use crate::pr::types::{PullRequest, ReviewDecision};

/// Check-suite conclusions that count as passing.
pub const CHECK_SUITE_SUCCESS: &[&str] = &["SUCCESS", "NEUTRAL", "SKIPPED"];

pub fn review_status(pr: &PullRequest, section: Section) -> ReviewStatus {
    if section == Section::ToReview {
        return ReviewStatus::NotApplicable;
    }
    if pr.review_decision == Some(ReviewDecision::Approved) {
        return ReviewStatus::Approved;
    }
    match (pr.review_requests.is_empty(), pr.reviews.is_empty()) {
        (true, true) => ReviewStatus::NoReviewers,
        (true, false) => ReviewStatus::UpdateNeeded,
        (false, _) => ReviewStatus::Waiting,
    }
}

/// A failed suite outranks one that is still running.
pub fn test_status(pr: &PullRequest) -> TestStatus {
    let Some(suites) = &pr.last_commit_check_suites else {
        return TestStatus::Unknown;
    };
    if suites.is_empty() {
        return TestStatus::NoChecks;
    }

    let passed = |conclusion: &Option<String>| {
        conclusion
            .as_deref()
            .is_some_and(|c| CHECK_SUITE_SUCCESS.contains(&c))
    };

    if suites.iter().all(|s| passed(&s.conclusion)) {
        TestStatus::Passed
    } else if suites
        .iter()
        .any(|s| s.conclusion.is_some() && !passed(&s.conclusion))
    {
        TestStatus::Failed
    } else {
        TestStatus::Running
    }
}
