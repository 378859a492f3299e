use super::post::Post;

/// Category value meaning "no category filter".
pub const ALL_CATEGORIES: &str = "all";

/// List filters. Every supplied filter must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    category: Option<String>,
    search: Option<String>,
    featured_only: bool,
}

impl PostFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact category match; blank or `all` clears the filter.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        self.category = if category.trim().is_empty() || category == ALL_CATEGORIES {
            None
        } else {
            Some(category)
        };
        self
    }

    /// Case-insensitive substring search over title, excerpt, content and tags.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = if search.trim().is_empty() {
            None
        } else {
            Some(search)
        };
        self
    }

    pub fn featured_only(mut self, featured_only: bool) -> Self {
        self.featured_only = featured_only;
        self
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn is_featured_only(&self) -> bool {
        self.featured_only
    }

    pub fn matches(&self, post: &Post) -> bool {
        if let Some(category) = &self.category {
            if post.category.as_str() != category {
                return false;
            }
        }

        if self.featured_only && !post.featured {
            return false;
        }

        match &self.search {
            Some(search) => {
                let needle = search.to_lowercase();
                let contains = |haystack: &str| haystack.to_lowercase().contains(&needle);

                contains(&post.title)
                    || contains(&post.excerpt)
                    || contains(&post.content)
                    || post.tags.iter().any(|tag| contains(tag))
            }
            None => true,
        }
    }

    /// Matching posts, newest `created_at` first.
    pub fn select(&self, posts: impl IntoIterator<Item = Post>) -> Vec<Post> {
        let mut selected: Vec<Post> = posts.into_iter().filter(|p| self.matches(p)).collect();
        selected.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PostDraft, TagsInput};
    use chrono::{Duration, Utc};

    fn post(id: &str, title: &str, category: &str, tags: &str, featured: bool) -> Post {
        let new = PostDraft {
            title: Some(title.to_string()),
            excerpt: Some("excerpt".to_string()),
            content: Some("content".to_string()),
            author: Some("author".to_string()),
            category: Some(category.to_string()),
            tags: Some(TagsInput::from(tags)),
            featured: Some(featured),
            ..Default::default()
        }
        .validate()
        .unwrap();
        Post::create(new, id.to_string(), 0)
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = PostFilter::new().with_category(ALL_CATEGORIES).with_search("  ");
        assert_eq!(filter, PostFilter::new());
        assert!(filter.matches(&post("1", "Hooks", "React", "", false)));
    }

    #[test]
    fn test_category_is_exact_and_case_sensitive() {
        let filter = PostFilter::new().with_category("React");
        assert!(filter.matches(&post("1", "Hooks", "React", "", false)));
        assert!(!filter.matches(&post("2", "Grid", "CSS", "react", false)));

        let lower = PostFilter::new().with_category("react");
        assert!(!lower.matches(&post("1", "Hooks", "React", "", false)));
    }

    #[test]
    fn test_search_ignores_case_and_covers_tags() {
        let filter = PostFilter::new().with_search("next.js");
        assert!(filter.matches(&post("1", "Routing in NEXT.JS", "React", "", false)));
        assert!(filter.matches(&post("2", "Routing", "React", "Next.js, app", false)));
        assert!(!filter.matches(&post("3", "Routing", "React", "remix", false)));
    }

    #[test]
    fn test_featured_only() {
        let filter = PostFilter::new().featured_only(true);
        assert!(filter.matches(&post("1", "A", "Design", "", true)));
        assert!(!filter.matches(&post("2", "B", "Design", "", false)));
    }

    #[test]
    fn test_select_orders_newest_first() {
        let mut older = post("old", "A", "Python", "", false);
        older.created_at = Utc::now() - Duration::days(2);
        let newer = post("new", "B", "Python", "", false);

        let ids: Vec<String> = PostFilter::new()
            .select(vec![older, newer])
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["new".to_string(), "old".to_string()]);
    }
}
