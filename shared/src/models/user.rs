//! User profile model

use serde::{Deserialize, Serialize};

/// Public profile stored in the `user` collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub display_name: String,
}
