use std::cmp;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};

use super::draft::{PostDraft, TagsInput};
use crate::error::ValidationError;

/// Display string used when a post has no read time of its own.
pub const DEFAULT_READ_TIME: &str = "5 min read";

/// Post categories accepted by the blog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    React,
    #[serde(rename = "Next.js")]
    NextJs,
    #[serde(rename = "CSS")]
    Css,
    JavaScript,
    TypeScript,
    #[serde(rename = "Node.js")]
    NodeJs,
    Python,
    Design,
    Tutorial,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::React,
        Category::NextJs,
        Category::Css,
        Category::JavaScript,
        Category::TypeScript,
        Category::NodeJs,
        Category::Python,
        Category::Design,
        Category::Tutorial,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::React => "React",
            Category::NextJs => "Next.js",
            Category::Css => "CSS",
            Category::JavaScript => "JavaScript",
            Category::TypeScript => "TypeScript",
            Category::NodeJs => "Node.js",
            Category::Python => "Python",
            Category::Design => "Design",
            Category::Tutorial => "Tutorial",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{0}` is not a known category")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Exact, case-sensitive match on the display name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Post entity - a blog post as held by either store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub author: String,
    pub category: Category,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<String>,
    #[serde(
        default,
        alias = "githubLink",
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub external_link: Option<String>,
    #[serde(default = "default_read_time", deserialize_with = "read_time_or_default")]
    pub read_time: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated post fields, ready to be stored under a new identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub author: String,
    pub category: Category,
    pub tags: Vec<String>,
    pub image: Option<String>,
    pub external_link: Option<String>,
    pub read_time: String,
    pub featured: bool,
}

impl Post {
    /// Create a new post with fresh timestamps.
    pub fn create(new: NewPost, id: String, views: i64) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: new.title,
            excerpt: new.excerpt,
            content: new.content,
            author: new.author,
            category: new.category,
            tags: new.tags,
            image: new.image,
            external_link: new.external_link,
            read_time: new.read_time,
            featured: new.featured,
            views,
            created_at: now,
            updated_at: now,
        }
    }

    /// The post's editable fields as a draft.
    pub fn to_draft(&self) -> PostDraft {
        PostDraft {
            title: Some(self.title.clone()),
            excerpt: Some(self.excerpt.clone()),
            content: Some(self.content.clone()),
            author: Some(self.author.clone()),
            category: Some(self.category.as_str().to_string()),
            tags: Some(TagsInput::List(self.tags.clone())),
            image: self.image.clone(),
            external_link: self.external_link.clone(),
            read_time: Some(self.read_time.clone()),
            featured: Some(self.featured),
        }
    }

    /// Merge `patch` over this post and re-validate the result.
    ///
    /// Identifier, views and `created_at` are carried over; `updated_at`
    /// advances to now and never moves backwards.
    pub fn apply(&self, patch: PostDraft) -> Result<Post, ValidationError> {
        let merged = self.to_draft().overlay(patch).validate()?;

        Ok(Post {
            id: self.id.clone(),
            title: merged.title,
            excerpt: merged.excerpt,
            content: merged.content,
            author: merged.author,
            category: merged.category,
            tags: merged.tags,
            image: merged.image,
            external_link: merged.external_link,
            read_time: merged.read_time,
            featured: merged.featured,
            views: self.views,
            created_at: self.created_at,
            updated_at: cmp::max(Utc::now(), self.updated_at),
        })
    }
}

/// How the central store seeds the view counter of a new post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewSeed {
    #[default]
    Zero,
    Random,
}

impl ViewSeed {
    const RANDOM_VIEWS: RangeInclusive<i64> = 100..=1099;

    pub fn initial_views(self) -> i64 {
        match self {
            ViewSeed::Zero => 0,
            ViewSeed::Random => rand::rng().random_range(Self::RANDOM_VIEWS),
        }
    }
}

impl FromStr for ViewSeed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "zero" | "0" => Ok(ViewSeed::Zero),
            "random" => Ok(ViewSeed::Random),
            other => Err(format!("unknown view seed `{}`", other)),
        }
    }
}

fn default_read_time() -> String {
    DEFAULT_READ_TIME.to_string()
}

fn read_time_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(blank_as_none(deserializer)?.unwrap_or_else(default_read_time))
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Post {
        let new = PostDraft {
            title: Some("Server components".to_string()),
            excerpt: Some("What changes".to_string()),
            content: Some("Long body".to_string()),
            author: Some("Rafi".to_string()),
            category: Some("Next.js".to_string()),
            tags: Some(TagsInput::from("next.js, react")),
            ..Default::default()
        }
        .validate()
        .unwrap();
        Post::create(new, "1".to_string(), 0)
    }

    #[test]
    fn test_category_round_trips_display_names() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>(), Ok(category));
        }
        assert!("react".parse::<Category>().is_err());
    }

    #[test]
    fn test_apply_keeps_unspecified_fields() {
        let post = sample();
        let updated = post
            .apply(PostDraft {
                title: Some("Server components, revisited".to_string()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(updated.title, "Server components, revisited");
        assert_eq!(updated.excerpt, post.excerpt);
        assert_eq!(updated.tags, post.tags);
        assert_eq!(updated.category, Category::NextJs);
        assert_eq!(updated.created_at, post.created_at);
        assert!(updated.updated_at >= post.updated_at);
    }

    #[test]
    fn test_apply_revalidates_merged_post() {
        let post = sample();
        let err = post
            .apply(PostDraft {
                category: Some("Rust".to_string()),
                ..Default::default()
            })
            .unwrap_err();

        assert!(err.mentions("category"));
    }

    #[test]
    fn test_updated_at_never_moves_backwards() {
        let mut post = sample();
        post.updated_at = Utc::now() + chrono::Duration::hours(1);
        let updated = post.apply(PostDraft::default()).unwrap();
        assert_eq!(updated.updated_at, post.updated_at);
    }

    #[test]
    fn test_decodes_legacy_local_record() {
        let raw = r#"{
            "_id": "1718000000000",
            "title": "Hello",
            "excerpt": "Short",
            "content": "Body",
            "author": "Rafi",
            "category": "React",
            "tags": ["react"],
            "image": "",
            "githubLink": "https://github.com/rafi/hello",
            "readTime": "",
            "featured": false,
            "views": 0,
            "createdAt": "2024-06-10T06:13:20.000Z",
            "updatedAt": "2024-06-10T06:13:20.000Z"
        }"#;

        let post: Post = serde_json::from_str(raw).unwrap();
        assert_eq!(post.id, "1718000000000");
        assert_eq!(post.image, None);
        assert_eq!(post.read_time, DEFAULT_READ_TIME);
        assert_eq!(
            post.external_link.as_deref(),
            Some("https://github.com/rafi/hello")
        );
    }

    #[test]
    fn test_random_view_seed_stays_in_range() {
        for _ in 0..100 {
            let views = ViewSeed::Random.initial_views();
            assert!((100..=1099).contains(&views));
        }
        assert_eq!(ViewSeed::Zero.initial_views(), 0);
    }
}
