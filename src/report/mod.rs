pub mod status;
pub mod types;

pub use types::{RenderOptions, ReviewStatus, Section, TestStatus};

use crate::pr::types::{PrGroups, PullRequest, RequestedReviewer};
use colored::Colorize;
use std::io::{self, Write};
use tracing::{debug, instrument};

/// Default character budget for a rendered title.
pub const TITLE_LENGTH_LIMIT: usize = 72;

const ELLIPSIS: &str = "...";

/// Cut `title` to at most `limit` characters, ending in `...` when cut.
pub fn truncate_title(title: &str, limit: usize) -> String {
    if title.chars().count() <= limit {
        return title.to_string();
    }
    let mut truncated: String = title
        .chars()
        .take(limit.saturating_sub(ELLIPSIS.len()))
        .collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

/// `login`, `team:<name>`, or `mannequin:<name>`.
pub fn reviewer_label(reviewer: &RequestedReviewer) -> String {
    match reviewer {
        RequestedReviewer::User { login } => login.clone(),
        RequestedReviewer::Team { name } => format!("team:{}", name),
        RequestedReviewer::Mannequin { name } => format!("mannequin:{}", name),
    }
}

/// The status line of a PR, followed by a reviewer line when reviews are
/// still requested.
pub fn render_pr_lines(pr: &PullRequest, section: Section, options: &RenderOptions) -> Vec<String> {
    let test = colorize_test(status::test_status(pr));
    let review = colorize_review(status::review_status(pr, section));

    let id = if options.show_repo {
        format!("{}#{}", pr.repo_full_name, pr.number)
    } else {
        pr.number.to_string()
    };
    let id = id.blue().to_string();
    let id = if options.hyperlinks {
        hyperlink(&id, &pr.url)
    } else {
        id
    };

    let title = truncate_title(&pr.title, options.title_limit);
    let branch = format!("[{}]", pr.branch_name).cyan();

    let mut lines = vec![format!("{}{} {} {} {}", test, review, id, title, branch)];
    if !pr.review_requests.is_empty() {
        let reviewers: Vec<String> = pr.review_requests.iter().map(reviewer_label).collect();
        lines.push(format!("   requested: {}", reviewers.join(", ")));
    }
    lines
}

/// The full summary: scope header, then the authored and to-review sections,
/// each headed by its count.
pub fn render_summary(filter: &str, groups: &PrGroups, options: &RenderOptions) -> String {
    let mut out = Vec::new();
    out.push(format!("{} {}", "Scope:".bright_white(), filter));

    for (section, prs) in [
        (Section::Authored, &groups.authored),
        (Section::ToReview, &groups.to_review),
    ] {
        out.push(String::new());
        out.push(
            format!("{}: {}", section.heading(), prs.len())
                .bright_white()
                .to_string(),
        );
        for pr in prs {
            out.extend(render_pr_lines(pr, section, options));
        }
    }

    out.push(String::new());
    let mut text = out.join("\n");
    text.push('\n');
    text
}

/// Write the summary to stdout.
#[instrument(skip(groups, options), fields(authored = groups.authored.len(), to_review = groups.to_review.len()))]
pub fn print_summary(filter: &str, groups: &PrGroups, options: &RenderOptions) -> io::Result<()> {
    debug!("writing summary to terminal");
    let mut stdout = io::stdout().lock();
    stdout.write_all(render_summary(filter, groups, options).as_bytes())?;
    stdout.flush()
}

/// OSC 8 hyperlink.
fn hyperlink(text: &str, url: &str) -> String {
    format!("\x1b]8;;{}\x07{}\x1b]8;;\x07", url, text)
}

fn colorize_test(status: TestStatus) -> colored::ColoredString {
    match status {
        TestStatus::Unknown | TestStatus::Failed => status.glyph().red(),
        _ => status.glyph().normal(),
    }
}

fn colorize_review(status: ReviewStatus) -> colored::ColoredString {
    match status {
        ReviewStatus::Approved | ReviewStatus::NoReviewers | ReviewStatus::UpdateNeeded => {
            status.glyph().red()
        }
        ReviewStatus::Waiting | ReviewStatus::NotApplicable => status.glyph().normal(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pr::types::{CheckSuite, ReviewDecision};

    const AUTHORED_ONE: &str = include_str!("../../tests/fixtures/authored_one.json");

    fn plain() -> RenderOptions {
        colored::control::set_override(false);
        RenderOptions {
            title_limit: TITLE_LENGTH_LIMIT,
            show_repo: false,
            hyperlinks: false,
        }
    }

    fn sample_pr() -> PullRequest {
        PullRequest {
            repo_full_name: "octo/widgets".to_string(),
            number: 7,
            title: "Fix widget alignment".to_string(),
            url: "https://github.com/octo/widgets/pull/7".to_string(),
            branch_name: "fix-align".to_string(),
            review_decision: Some(ReviewDecision::Approved),
            author: "octocat".to_string(),
            reviews: vec![],
            review_requests: vec![],
            last_commit_check_suites: Some(vec![CheckSuite {
                conclusion: Some("FAILURE".to_string()),
            }]),
        }
    }

    #[test]
    fn test_truncate_title() {
        let long = "x".repeat(100);
        let cut = truncate_title(&long, 72);
        assert_eq!(cut.chars().count(), 72);
        assert!(cut.ends_with("..."));
        assert_eq!(&cut[..69], &long[..69]);

        let exact = "y".repeat(72);
        assert_eq!(truncate_title(&exact, 72), exact);
        assert_eq!(truncate_title("short", 72), "short");
    }

    #[test]
    fn test_truncate_counts_characters() {
        let title = "é".repeat(10);
        assert_eq!(truncate_title(&title, 8), format!("{}...", "é".repeat(5)));
    }

    #[test]
    fn test_reviewer_labels() {
        assert_eq!(
            reviewer_label(&RequestedReviewer::User { login: "monalisa".to_string() }),
            "monalisa"
        );
        assert_eq!(
            reviewer_label(&RequestedReviewer::Team { name: "core".to_string() }),
            "team:core"
        );
        assert_eq!(
            reviewer_label(&RequestedReviewer::Mannequin { name: "ghost".to_string() }),
            "mannequin:ghost"
        );
    }

    #[test]
    fn test_pr_line() {
        let lines = render_pr_lines(&sample_pr(), Section::Authored, &plain());
        assert_eq!(lines, vec!["✗A 7 Fix widget alignment [fix-align]".to_string()]);

        let lines = render_pr_lines(&sample_pr(), Section::ToReview, &plain());
        assert_eq!(lines, vec!["✗  7 Fix widget alignment [fix-align]".to_string()]);
    }

    #[test]
    fn test_pr_line_with_repo_and_reviewers() {
        let pr = PullRequest {
            review_decision: None,
            review_requests: vec![
                RequestedReviewer::User { login: "monalisa".to_string() },
                RequestedReviewer::Team { name: "core".to_string() },
            ],
            last_commit_check_suites: None,
            ..sample_pr()
        };
        let options = RenderOptions {
            show_repo: true,
            ..plain()
        };
        let lines = render_pr_lines(&pr, Section::Authored, &options);
        assert_eq!(
            lines,
            vec![
                "?w octo/widgets#7 Fix widget alignment [fix-align]".to_string(),
                "   requested: monalisa, team:core".to_string(),
            ]
        );
    }

    #[test]
    fn test_hyperlink_wraps_identifier() {
        let options = RenderOptions {
            hyperlinks: true,
            ..plain()
        };
        let lines = render_pr_lines(&sample_pr(), Section::Authored, &options);
        assert!(lines[0].contains("\x1b]8;;https://github.com/octo/widgets/pull/7\x077\x1b]8;;\x07"));
    }

    #[test]
    fn test_summary_end_to_end() {
        let groups = crate::pr::decode_response(AUTHORED_ONE).unwrap();
        let text = render_summary("repo:octo/widgets", &groups, &plain());
        let lines: Vec<&str> = text.lines().collect();

        let title = "Rework the credentials loader so missing host entries and malformed Y...";
        assert_eq!(title.chars().count(), 72);
        let pr_line = format!("✓w 42 {} [credentials-errors]", title);
        assert_eq!(
            lines,
            vec![
                "Scope: repo:octo/widgets",
                "",
                "Authored: 1",
                pr_line.as_str(),
                "   requested: monalisa",
                "",
                "To review: 0",
                "",
            ]
        );
    }

    #[test]
    fn test_summary_empty_groups() {
        let text = render_summary("org:octo", &PrGroups::default(), &plain());
        assert_eq!(text, "Scope: org:octo\n\nAuthored: 0\n\nTo review: 0\n\n");
    }
}
