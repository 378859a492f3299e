//! Sample data for the central post store.

use anyhow::Context;
use chrono::Duration;
use uuid::Uuid;

use folio_core::domain::{Post, PostDraft, TagsInput};
use folio_infra::database::{DatabaseConfig, SeaOrmPostRepository, connect};

struct Sample {
    title: &'static str,
    excerpt: &'static str,
    content: &'static str,
    author: &'static str,
    category: &'static str,
    tags: &'static [&'static str],
    image: &'static str,
    read_time: &'static str,
    featured: bool,
    views: i64,
}

const SAMPLES: &[Sample] = &[
    Sample {
        title: "Getting Started with MongoDB and Next.js",
        excerpt: "Learn how to integrate MongoDB with your Next.js application for a powerful full-stack blog system.",
        content: "# Getting Started with MongoDB and Next.js\n\n\
MongoDB is a powerful NoSQL database that pairs perfectly with Next.js for building modern web applications. \
In this guide, we'll walk through setting up a complete blog system with MongoDB integration.\n\n\
## Why MongoDB?\n\n\
- **Flexible Schema**: Perfect for content management systems\n\
- **Scalable**: Grows with your application\n\
- **JSON-like Documents**: Natural fit for JavaScript applications\n\
- **Rich Querying**: Powerful search and filtering capabilities\n\n\
## Setting Up the Connection\n\n\
First, we need to establish a connection to MongoDB using Mongoose...",
        author: "John Developer",
        category: "Tutorial",
        tags: &["MongoDB", "Next.js", "Database", "Tutorial"],
        image: "https://images.unsplash.com/photo-1558494949-ef010cbdcc31?w=800&h=400&fit=crop",
        read_time: "10 min read",
        featured: true,
        views: 245,
    },
    Sample {
        title: "Advanced React Patterns with TypeScript",
        excerpt: "Explore advanced React patterns using TypeScript for better code organization and type safety.",
        content: "# Advanced React Patterns with TypeScript\n\n\
TypeScript brings powerful type safety to React applications. \
Let's explore some advanced patterns that will make your React code more maintainable and robust.\n\n\
## Compound Components Pattern\n\n\
The compound component pattern allows you to create flexible and reusable components...\n\n\
## Render Props with TypeScript\n\n\
Render props is a powerful pattern for sharing code between components...",
        author: "Sarah Tech",
        category: "React",
        tags: &["React", "TypeScript", "Patterns", "Advanced"],
        image: "https://images.unsplash.com/photo-1633356122544-f134324a6cee?w=800&h=400&fit=crop",
        read_time: "15 min read",
        featured: false,
        views: 189,
    },
    Sample {
        title: "CSS Grid Layout Mastery",
        excerpt: "Master CSS Grid layout with practical examples and real-world use cases.",
        content: "# CSS Grid Layout Mastery\n\n\
CSS Grid is one of the most powerful layout systems available in CSS. \
This comprehensive guide will take you from beginner to advanced Grid techniques.\n\n\
## Grid Basics\n\n\
CSS Grid Layout excels at dividing a page into major regions...\n\n\
## Advanced Grid Techniques\n\n\
Learn about auto-placement, grid areas, and responsive design...",
        author: "Alex Designer",
        category: "CSS",
        tags: &["CSS", "Grid", "Layout", "Design"],
        image: "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=800&h=400&fit=crop",
        read_time: "8 min read",
        featured: false,
        views: 156,
    },
];

/// Validated sample posts, listed newest first in sample order.
pub fn sample_posts() -> anyhow::Result<Vec<Post>> {
    SAMPLES
        .iter()
        .enumerate()
        .map(|(i, sample)| {
            let draft = PostDraft {
                title: Some(sample.title.to_string()),
                excerpt: Some(sample.excerpt.to_string()),
                content: Some(sample.content.to_string()),
                author: Some(sample.author.to_string()),
                category: Some(sample.category.to_string()),
                tags: Some(TagsInput::List(
                    sample.tags.iter().map(|t| t.to_string()).collect(),
                )),
                image: Some(sample.image.to_string()),
                external_link: None,
                read_time: Some(sample.read_time.to_string()),
                featured: Some(sample.featured),
            };
            let new = draft
                .validate()
                .with_context(|| format!("Sample post `{}` is invalid", sample.title))?;

            let mut post = Post::create(new, Uuid::new_v4().to_string(), sample.views);
            post.created_at -= Duration::minutes(i as i64);
            post.updated_at = post.created_at;
            Ok(post)
        })
        .collect()
}

/// Clear the central store and insert the samples.
pub async fn run(database_url: &str) -> anyhow::Result<()> {
    let db = connect(&DatabaseConfig::new(database_url))
        .await
        .context("Failed to connect to the database")?;
    let repo = SeaOrmPostRepository::new(db);

    let cleared = repo.clear().await?;
    println!("Cleared {} existing blog posts", cleared);

    let posts = sample_posts()?;
    let summary: Vec<String> = posts
        .iter()
        .map(|p| format!("- {} ({})", p.title, p.category))
        .collect();
    let inserted = repo.insert_all(posts).await?;
    println!("Seeded {} blog posts", inserted);
    for line in summary {
        println!("{}", line);
    }

    tracing::info!(inserted, "Database seeding completed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::domain::PostFilter;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_samples_validate_and_keep_presets() {
        let posts = sample_posts().unwrap();
        assert_eq!(posts.len(), 3);
        assert!(posts[0].featured);
        assert_eq!(posts[0].views, 245);
        assert_eq!(posts[2].read_time, "8 min read");
    }

    #[test]
    fn test_samples_list_in_sample_order() {
        let posts = sample_posts().unwrap();
        let titles: Vec<String> = posts.iter().map(|p| p.title.clone()).collect();

        let listed: Vec<String> = PostFilter::new()
            .select(posts)
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(listed, titles);
    }
}
