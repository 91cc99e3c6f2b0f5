//! Review workflow: states, actions, history, and reviewer issues.
//!
//! State transitions are decided server-side; the client's job is to gate
//! which actions are offered, assemble action payloads, and reconcile local
//! state from the server's response. The types here model that contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Publication status of a verse or commentary entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewState {
    /// Being authored, not yet submitted
    #[default]
    Draft,
    /// Awaiting reviewer attention
    ReviewPending,
    /// Accepted by a reviewer
    Approved,
    /// Frozen against further edits
    Locked,
    /// Sent back with requested changes
    Rejected,
    /// Marked for follow-up without a verdict
    Flagged,
}

impl ReviewState {
    /// Wire name of the state, as used by the REST API.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewState::Draft => "draft",
            ReviewState::ReviewPending => "review_pending",
            ReviewState::Approved => "approved",
            ReviewState::Locked => "locked",
            ReviewState::Rejected => "rejected",
            ReviewState::Flagged => "flagged",
        }
    }

    /// Human-readable label ("review pending" rather than "review_pending").
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl std::fmt::Display for ReviewState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A review transition the client can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewAction {
    Approve,
    Reject,
    Flag,
    Lock,
}

impl ReviewAction {
    /// Path segment used by `POST /review/verse/{id}/{action}`.
    pub fn endpoint_name(&self) -> &'static str {
        match self {
            ReviewAction::Approve => "approve",
            ReviewAction::Reject => "reject",
            ReviewAction::Flag => "flag",
            ReviewAction::Lock => "lock",
        }
    }

    /// The state the server moves the verse to when the action succeeds.
    pub fn target_state(&self) -> ReviewState {
        match self {
            ReviewAction::Approve => ReviewState::Approved,
            ReviewAction::Reject => ReviewState::Rejected,
            ReviewAction::Flag => ReviewState::Flagged,
            ReviewAction::Lock => ReviewState::Locked,
        }
    }
}

impl std::fmt::Display for ReviewAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.endpoint_name())
    }
}

/// Severity of a reviewer-reported issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    #[default]
    Minor,
    Major,
    Critical,
}

/// One itemized problem attached to a reject transition.
///
/// Only `problem` is mandatory; everything else narrows the issue down to a
/// location (`path`, `lang`) or suggests a correction.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReviewHistoryIssue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub found: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(default)]
    pub severity: IssueSeverity,
}

/// Trim every text field of the issue, mapping whitespace-only values to `None`.
fn normalize_field(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Sanitize reviewer-entered issues before submission.
///
/// Fields are trimmed, empty fields become `None`, and issues without a
/// `problem` after trimming are dropped entirely. An empty result is valid:
/// a reject without itemized issues is still sent.
pub fn sanitize_issues(issues: Vec<ReviewHistoryIssue>) -> Vec<ReviewHistoryIssue> {
    issues
        .into_iter()
        .filter_map(|issue| {
            let problem = normalize_field(issue.problem)?;
            Some(ReviewHistoryIssue {
                path: normalize_field(issue.path),
                lang: normalize_field(issue.lang),
                problem: Some(problem),
                found: normalize_field(issue.found),
                expected: normalize_field(issue.expected),
                suggestion: normalize_field(issue.suggestion),
                severity: issue.severity,
            })
        })
        .collect()
}

/// Body of `POST /review/verse/{id}/{action}`.
///
/// `issues` is present only for reject; a reject with no itemized issues
/// still sends an explicit empty list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub work_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<ReviewHistoryIssue>>,
}

/// One entry in a verse's append-only review audit trail.
///
/// Server-authoritative; the client never constructs or mutates these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewHistoryEntry {
    pub ts: DateTime<Utc>,
    pub actor: String,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default)]
    pub issues: Vec<ReviewHistoryIssue>,
}

/// Reviewer roles that must still sign off on a verse.
pub fn default_required_reviewers() -> Vec<String> {
    vec![
        "editor".to_string(),
        "linguist".to_string(),
        "final".to_string(),
    ]
}

/// The review block of a verse record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewBlock {
    #[serde(default)]
    pub state: ReviewState,
    #[serde(default = "default_required_reviewers")]
    pub required_reviewers: Vec<String>,
    #[serde(default)]
    pub history: Vec<ReviewHistoryEntry>,
}

impl Default for ReviewBlock {
    fn default() -> Self {
        Self {
            state: ReviewState::Draft,
            required_reviewers: default_required_reviewers(),
            history: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn review_state_wire_names() {
        assert_eq!(
            serde_json::to_string(&ReviewState::ReviewPending).unwrap(),
            "\"review_pending\""
        );
        let state: ReviewState = serde_json::from_str("\"flagged\"").unwrap();
        assert_eq!(state, ReviewState::Flagged);
        assert_eq!(ReviewState::ReviewPending.label(), "review pending");
    }

    #[test]
    fn action_targets() {
        assert_eq!(ReviewAction::Approve.target_state(), ReviewState::Approved);
        assert_eq!(ReviewAction::Reject.target_state(), ReviewState::Rejected);
        assert_eq!(ReviewAction::Flag.target_state(), ReviewState::Flagged);
        assert_eq!(ReviewAction::Lock.target_state(), ReviewState::Locked);
        assert_eq!(ReviewAction::Lock.endpoint_name(), "lock");
    }

    #[test]
    fn sanitize_drops_issues_without_problem() {
        let issues = vec![
            ReviewHistoryIssue {
                problem: Some("  wrong diacritic  ".to_string()),
                lang: Some(" bn ".to_string()),
                found: Some("   ".to_string()),
                ..Default::default()
            },
            ReviewHistoryIssue {
                problem: Some("   ".to_string()),
                suggestion: Some("ignored".to_string()),
                ..Default::default()
            },
        ];

        let sanitized = sanitize_issues(issues);
        assert_eq!(sanitized.len(), 1);
        assert_eq!(sanitized[0].problem.as_deref(), Some("wrong diacritic"));
        assert_eq!(sanitized[0].lang.as_deref(), Some("bn"));
        assert_eq!(sanitized[0].found, None);
        assert_eq!(sanitized[0].severity, IssueSeverity::Minor);
    }

    #[test]
    fn sanitize_keeps_severity() {
        let issues = vec![ReviewHistoryIssue {
            problem: Some("misattributed origin".to_string()),
            severity: IssueSeverity::Critical,
            ..Default::default()
        }];
        assert_eq!(sanitize_issues(issues)[0].severity, IssueSeverity::Critical);
    }

    #[test]
    fn review_request_omits_absent_issues() {
        let request = ReviewRequest {
            work_id: "W001".to_string(),
            issues: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value, serde_json::json!({"work_id": "W001"}));

        let with_empty = ReviewRequest {
            work_id: "W001".to_string(),
            issues: Some(Vec::new()),
        };
        let value = serde_json::to_value(&with_empty).unwrap();
        assert_eq!(value, serde_json::json!({"work_id": "W001", "issues": []}));
    }

    #[test]
    fn review_block_defaults() {
        let block: ReviewBlock = serde_json::from_str("{}").unwrap();
        assert_eq!(block.state, ReviewState::Draft);
        assert_eq!(
            block.required_reviewers,
            vec!["editor", "linguist", "final"]
        );
        assert!(block.history.is_empty());
    }

    #[test]
    fn history_entry_round_trip() {
        let json = r#"{
            "ts": "2025-03-01T10:00:00Z",
            "actor": "reviewer@example.org",
            "action": "issue_add",
            "from": "review_pending",
            "to": "rejected",
            "issues": [{"problem": "typo", "severity": "major"}]
        }"#;
        let entry: ReviewHistoryEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.actor, "reviewer@example.org");
        assert_eq!(entry.issues[0].severity, IssueSeverity::Major);
    }
}
