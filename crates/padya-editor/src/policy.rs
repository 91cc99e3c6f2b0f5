//! Role-based gating of review actions.
//!
//! The server enforces its own checks; these functions only decide which
//! actions the editor offers. Levels: author 1, reviewer 2, final 3, admin 4.

use padya_domain::review::ReviewAction;

/// Highest level among the user's roles; unknown roles count as 0.
pub fn role_level<S: AsRef<str>>(roles: &[S]) -> u8 {
    roles
        .iter()
        .map(|role| match role.as_ref() {
            "author" => 1,
            "reviewer" => 2,
            "final" => 3,
            "admin" => 4,
            _ => 0,
        })
        .max()
        .unwrap_or(0)
}

/// Minimum level needed to request a transition.
pub fn required_level(action: ReviewAction) -> u8 {
    match action {
        ReviewAction::Approve | ReviewAction::Reject | ReviewAction::Flag => 2,
        ReviewAction::Lock => 3,
    }
}

pub fn can_perform<S: AsRef<str>>(roles: &[S], action: ReviewAction) -> bool {
    role_level(roles) >= required_level(action)
}
