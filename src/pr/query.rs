use crate::scope::Scope;

/// Result-count ceiling for each search and each nested connection.
pub const PAGE_SIZE: usize = 100;

/// Only check suites created by the GitHub Actions app are reported.
pub const GITHUB_ACTIONS_APP_ID: u64 = 15368;

const CHECK_SUITE_LIMIT: usize = 10;

/// Space-joined `repo:<owner/name>` / `org:<name>` qualifiers, in argument order.
pub fn filter_clause(scopes: &[Scope]) -> String {
    scopes
        .iter()
        .map(Scope::qualifier)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build the GraphQL document requesting both PR groups in one round trip.
///
/// `user` is either a GitHub login or `@me`. Qualifiers and `user` are
/// interpolated as is; callers validate them first.
pub fn build_query(user: &str, scopes: &[Scope]) -> String {
    let filter = filter_clause(scopes);
    format!(
        r#"fragment pr on PullRequest {{
    repository {{nameWithOwner}}
    number, title, url, headRefName, reviewDecision,
    author {{login}},
    reviews(last: {page}) {{edges {{node {{
        author {{login}},
        state,
    }}}}}}
    reviewRequests(last: {page}) {{edges {{node {{
        requestedReviewer {{
            typename: __typename
            ... on User {{login}},
            ... on Team {{name}},
            ... on Mannequin {{name: login}},
        }}
    }}}}}}
    lastCommitCheckSuites: commits(last: 1) {{edges {{node {{
        commit {{
            checkSuites(first: {suites}, filterBy: {{appId: {app_id}}}) {{edges {{node {{
                conclusion,
            }}}}}}
        }}
    }}}}}}
}}
{{
    authored: search(query: "{filter} state:open is:pr author:{user}", type: ISSUE, first: {page}) {{
        edges {{node {{...pr}}}}
    }}
    toReview: search(query: "{filter} state:open is:pr review-requested:{user}", type: ISSUE, first: {page}) {{
        edges {{node {{...pr}}}}
    }}
}}
"#,
        page = PAGE_SIZE,
        suites = CHECK_SUITE_LIMIT,
        app_id = GITHUB_ACTIONS_APP_ID,
        filter = filter,
        user = user,
    )
}
