use serde::{Deserialize, Serialize};

/// A record from the remote posts endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub user_id: u64,
    pub id: u64,
    pub title: String,
    pub body: String,
}

/// Posts whose title contains `query`, ignoring case, in source order and
/// capped at `limit`. An empty query matches everything.
pub fn search<'a>(posts: &'a [Post], query: &str, limit: usize) -> Vec<&'a Post> {
    let needle = query.to_lowercase();
    posts
        .iter()
        .filter(|post| post.title.to_lowercase().contains(&needle))
        .take(limit)
        .collect()
}
