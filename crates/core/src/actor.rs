//! Actor attribution recorded on ledger movements.

use serde::{Deserialize, Serialize};

use crate::id::UserId;

/// Who performed a stock operation.
///
/// The name is a display-name snapshot taken when the movement is recorded.
/// It is never updated retroactively: the audit trail shows who the actor
/// was *at the time*, even after later renames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserId,
    pub user_name: String,
}

impl Actor {
    pub fn new(user_id: UserId, user_name: impl Into<String>) -> Self {
        Self {
            user_id,
            user_name: user_name.into(),
        }
    }
}
