//! Blog post documents as served by the adoption backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::collection::Keyed;
use crate::types::BlogId;

/// A blog post. Content is markdown; the site renders it server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    #[serde(rename = "_id")]
    pub id: BlogId,
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Keyed for BlogPost {
    fn key(&self) -> &str {
        self.id.as_str()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_backend_document() {
        let json = r###"{
            "_id": "b1",
            "title": "Settling in a rescue dog",
            "author": "Priya Shah",
            "category": "Care",
            "content": "## The first week\n\nGo slow.",
            "imageUrl": "https://img.example.com/settle.jpg"
        }"###;

        let post: BlogPost = serde_json::from_str(json).unwrap();
        assert_eq!(post.title, "Settling in a rescue dog");
        assert_eq!(post.category, "Care");
    }
}
