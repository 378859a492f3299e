//! Data Transfer Objects - request types for the API.

use serde::{Deserialize, Serialize};

/// Query string of `GET /api/posts`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPostsQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Only `true` restricts the list; any other value or none lists everything.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<String>,
}

impl ListPostsQuery {
    pub fn featured_only(&self) -> bool {
        self.featured.as_deref() == Some("true")
    }
}
