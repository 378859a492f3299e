//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use folio_core::RepoError;
use folio_core::domain::{Category, Post};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub excerpt: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub author: String,
    pub category: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub tags: Json,
    pub image: Option<String>,
    pub external_link: Option<String>,
    pub read_time: String,
    pub featured: bool,
    pub views: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Post.
///
/// Fails when the row holds a category or tag list the domain rejects.
impl TryFrom<Model> for Post {
    type Error = RepoError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let category: Category = model
            .category
            .parse()
            .map_err(|e: folio_core::domain::UnknownCategory| RepoError::Query(e.to_string()))?;
        let tags: Vec<String> = serde_json::from_value(model.tags)
            .map_err(|e| RepoError::Query(format!("Malformed tags column: {}", e)))?;

        Ok(Self {
            id: model.id.to_string(),
            title: model.title,
            excerpt: model.excerpt,
            content: model.content,
            author: model.author,
            category,
            tags,
            image: model.image,
            external_link: model.external_link,
            read_time: model.read_time,
            featured: model.featured,
            views: model.views,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        })
    }
}

/// Conversion from Domain Post to SeaORM ActiveModel.
///
/// The id must already be a UUID; callers validate it first.
impl ActiveModel {
    pub fn from_post(id: Uuid, post: Post) -> Self {
        Self {
            id: Set(id),
            title: Set(post.title),
            excerpt: Set(post.excerpt),
            content: Set(post.content),
            author: Set(post.author),
            category: Set(post.category.as_str().to_string()),
            tags: Set(Json::from(post.tags)),
            image: Set(post.image),
            external_link: Set(post.external_link),
            read_time: Set(post.read_time),
            featured: Set(post.featured),
            views: Set(post.views),
            created_at: Set(post.created_at.into()),
            updated_at: Set(post.updated_at.into()),
        }
    }
}
