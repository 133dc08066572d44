//! Shapes of the GraphQL search response, expressed with [`crate::schema`].

use crate::schema::{
    array, chain, edges_to_nodes, enumeration, integer, literal, maybe_edge_to_node, nullable,
    record, string, tagged_union, Schema,
};

use super::types::{
    CheckSuite, PrGroups, PullRequest, RequestedReviewer, Review, ReviewDecision, ReviewState,
};

const REVIEW_DECISIONS: &[(&str, ReviewDecision)] = &[
    ("CHANGES_REQUESTED", ReviewDecision::ChangesRequested),
    ("REVIEW_REQUIRED", ReviewDecision::ReviewRequired),
    ("APPROVED", ReviewDecision::Approved),
];

const REVIEW_STATES: &[(&str, ReviewState)] = &[
    ("COMMENTED", ReviewState::Commented),
    ("CHANGES_REQUESTED", ReviewState::ChangesRequested),
    ("APPROVED", ReviewState::Approved),
    ("PENDING", ReviewState::Pending),
];

/// `{data: {authored: <connection>, toReview: <connection>}}`
pub fn response_schema() -> Schema<PrGroups> {
    let search_result = edges_to_nodes(pull_request_schema());
    let data = record(move |f| {
        Ok(PrGroups {
            authored: f.field("authored", &search_result)?,
            to_review: f.field("toReview", &search_result)?,
        })
    });
    record(move |f| f.field("data", &data))
}

/// Messages of a top-level GraphQL `errors` array, if one is present.
pub fn api_errors_schema() -> Schema<Option<Vec<String>>> {
    let error = record(|f| f.field("message", &string()));
    let errors = nullable(array(error));
    record(move |f| f.field("errors", &errors))
}

pub fn pull_request_schema() -> Schema<PullRequest> {
    let login = record(|f| f.field("login", &string()));
    let repository = record(|f| f.field("nameWithOwner", &string()));
    let number = chain(integer(1), |n| u64::try_from(n).map_err(|e| e.to_string()));
    let review_decision = nullable(enumeration(REVIEW_DECISIONS));
    let reviews = edges_to_nodes(review_schema());
    let reviewer = requested_reviewer_schema();
    let review_requests = edges_to_nodes(record(move |f| f.field("requestedReviewer", &reviewer)));
    let check_suites = maybe_edge_to_node(last_commit_schema());

    record(move |f| {
        Ok(PullRequest {
            repo_full_name: f.field("repository", &repository)?,
            number: f.field("number", &number)?,
            title: f.field("title", &string())?,
            url: f.field("url", &string())?,
            branch_name: f.field("headRefName", &string())?,
            review_decision: f.field("reviewDecision", &review_decision)?,
            author: f.field("author", &login)?,
            reviews: f.field("reviews", &reviews)?,
            review_requests: f.field("reviewRequests", &review_requests)?,
            last_commit_check_suites: f.field("lastCommitCheckSuites", &check_suites)?,
        })
    })
}

fn review_schema() -> Schema<Review> {
    let login = record(|f| f.field("login", &string()));
    let state = enumeration(REVIEW_STATES);
    record(move |f| {
        Ok(Review {
            author_login: f.field("author", &login)?,
            state: f.field("state", &state)?,
        })
    })
}

/// Dispatches on the `typename` alias of `__typename`.
fn requested_reviewer_schema() -> Schema<RequestedReviewer> {
    tagged_union(
        "typename",
        vec![
            (
                "User",
                record(|f| {
                    f.field("typename", &literal("User"))?;
                    Ok(RequestedReviewer::User {
                        login: f.field("login", &string())?,
                    })
                }),
            ),
            (
                "Team",
                record(|f| {
                    f.field("typename", &literal("Team"))?;
                    Ok(RequestedReviewer::Team {
                        name: f.field("name", &string())?,
                    })
                }),
            ),
            (
                "Mannequin",
                record(|f| {
                    f.field("typename", &literal("Mannequin"))?;
                    Ok(RequestedReviewer::Mannequin {
                        name: f.field("name", &string())?,
                    })
                }),
            ),
        ],
    )
}

/// `{commit: {checkSuites: <connection>}}` reshaped to the suites.
fn last_commit_schema() -> Schema<Vec<CheckSuite>> {
    let suite = record(|f| {
        Ok(CheckSuite {
            conclusion: f.field("conclusion", &nullable(string()))?,
        })
    });
    let suites = edges_to_nodes(suite);
    let commit = record(move |f| f.field("checkSuites", &suites));
    record(move |f| f.field("commit", &commit))
}
