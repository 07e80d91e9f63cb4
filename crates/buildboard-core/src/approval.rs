//! Pending-approval annotation for environment pills.

use serde::{Deserialize, Serialize};

use crate::domain::{Approval, ApprovalStatus, Deployment};

/// Icon shown next to an environment that waits on a person.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalIcon {
    Person,
}

impl ApprovalIcon {
    pub fn name(self) -> &'static str {
        match self {
            ApprovalIcon::Person => "person",
        }
    }
}

fn has_pending(approvals: &[Approval], environment_id: u32) -> bool {
    approvals
        .iter()
        .any(|a| a.targets(environment_id) && a.status == ApprovalStatus::Pending)
}

/// Icon for a deployment's pending approvals in `environment_id`, if any.
///
/// Pre-deploy approvals are checked before post-deploy approvals.
pub fn approval_icon(deployment: &Deployment, environment_id: u32) -> Option<ApprovalIcon> {
    if has_pending(&deployment.pre_deploy_approvals, environment_id) {
        return Some(ApprovalIcon::Person);
    }
    if has_pending(&deployment.post_deploy_approvals, environment_id) {
        return Some(ApprovalIcon::Person);
    }
    None
}
