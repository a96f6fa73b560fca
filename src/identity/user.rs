//! Resolved user context
//!
//! Built by the [`crate::identity::IdentityResolver`] from a credential
//! partition row; injected into handlers by the extractor.

use serde::{Deserialize, Serialize};

use crate::utils::{AppError, AppResult, messages};

/// Access level column E of a credential row.
/// L1 submits for its own branch; L2 reviews, approves and exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessLevel {
    L1,
    L2,
}

impl AccessLevel {
    /// Anything that is not exactly `L2` is a branch-level user.
    pub fn parse(text: &str) -> Self {
        if text.trim().eq_ignore_ascii_case("L2") {
            AccessLevel::L2
        } else {
            AccessLevel::L1
        }
    }
}

/// 当前用户上下文 (从凭证分区行解析)
///
/// 由认证解析器创建，注入到请求处理函数
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub username: String,
    /// Home branch (column C).
    pub branch: String,
    /// Column D; carried through to the frontend, no core predicate uses it.
    pub restricted: bool,
    pub level: AccessLevel,
    /// Column Z; switches the frontend to printed-form flows.
    pub paper_mode: bool,
    /// The client's order-data store id (cell F2 of the partition).
    #[serde(skip)]
    pub budget_sheet_id: String,
    /// Credential tab this user was found in.
    #[serde(skip)]
    pub partition: String,
}

impl CurrentUser {
    /// Gate for every L2-only operation.
    pub fn require_l2(&self) -> AppResult<()> {
        if self.level == AccessLevel::L2 {
            Ok(())
        } else {
            Err(AppError::forbidden(messages::L2_REQUIRED))
        }
    }

    /// Submission branch check: an L1 user may only act for their home
    /// branch; L2 users may act for any branch.
    pub fn ensure_branch(&self, branch: &str) -> AppResult<()> {
        if self.level == AccessLevel::L2 || self.branch == branch {
            Ok(())
        } else {
            Err(AppError::forbidden(messages::BRANCH_MISMATCH))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(level: AccessLevel) -> CurrentUser {
        CurrentUser {
            username: "amr".into(),
            branch: "Maadi".into(),
            restricted: false,
            level,
            paper_mode: false,
            budget_sheet_id: "budget".into(),
            partition: "ClientA".into(),
        }
    }

    #[test]
    fn test_level_parse() {
        assert_eq!(AccessLevel::parse("L2"), AccessLevel::L2);
        assert_eq!(AccessLevel::parse(" l2 "), AccessLevel::L2);
        assert_eq!(AccessLevel::parse("L1"), AccessLevel::L1);
        assert_eq!(AccessLevel::parse(""), AccessLevel::L1);
        assert_eq!(AccessLevel::parse("admin"), AccessLevel::L1);
    }

    #[test]
    fn test_branch_predicate() {
        let l1 = user(AccessLevel::L1);
        assert!(l1.ensure_branch("Maadi").is_ok());
        assert!(l1.ensure_branch("Nasr City").is_err());

        let l2 = user(AccessLevel::L2);
        assert!(l2.ensure_branch("Nasr City").is_ok());
        assert!(l2.require_l2().is_ok());
        assert!(l1.require_l2().is_err());
    }
}
