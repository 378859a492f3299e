//! PostgreSQL post repository.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, DbConn, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Select,
};
use uuid::Uuid;

use folio_core::domain::{Post, PostDraft, PostFilter, ViewSeed};
use folio_core::error::RepoError;
use folio_core::ports::PostRepository;

use super::entity::post::{self, ActiveModel, Entity as PostEntity};
use super::parse_id;

/// Post repository over the `posts` table.
pub struct SeaOrmPostRepository {
    db: DbConn,
    view_seed: ViewSeed,
}

impl SeaOrmPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self {
            db,
            view_seed: ViewSeed::default(),
        }
    }

    pub fn with_view_seed(mut self, view_seed: ViewSeed) -> Self {
        self.view_seed = view_seed;
        self
    }

    /// Delete every post. Returns how many rows were removed.
    pub async fn clear(&self) -> Result<u64, RepoError> {
        let result = PostEntity::delete_many()
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(result.rows_affected)
    }

    /// Insert fully-formed posts, keeping their views and timestamps.
    pub async fn insert_all(&self, posts: Vec<Post>) -> Result<usize, RepoError> {
        if posts.is_empty() {
            return Ok(0);
        }

        let count = posts.len();
        let models = posts
            .into_iter()
            .map(|post| Ok(ActiveModel::from_post(parse_id(&post.id)?, post)))
            .collect::<Result<Vec<_>, RepoError>>()?;

        PostEntity::insert_many(models)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(count)
    }

    async fn find(&self, id: Uuid) -> Result<Post, RepoError> {
        PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(RepoError::NotFound)?
            .try_into()
    }
}

#[async_trait]
impl PostRepository for SeaOrmPostRepository {
    async fn list(&self, filter: &PostFilter) -> Result<Vec<Post>, RepoError> {
        let rows = list_query(filter)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        rows.into_iter().map(Post::try_from).collect()
    }

    async fn create(&self, draft: PostDraft) -> Result<Post, RepoError> {
        let new = draft.validate()?;
        let id = Uuid::new_v4();
        let post = Post::create(new, id.to_string(), self.view_seed.initial_views());

        let model = ActiveModel::from_post(id, post)
            .insert(&self.db)
            .await
            .map_err(map_db_err)?;

        tracing::debug!(post_id = %id, "Blog post created");
        model.try_into()
    }

    async fn read_and_count_view(&self, id: &str) -> Result<Post, RepoError> {
        let id = parse_id(id)?;
        let post = self.find(id).await?;

        PostEntity::update_many()
            .col_expr(post::Column::Views, Expr::col(post::Column::Views).add(1))
            .filter(post::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(post)
    }

    async fn update(&self, id: &str, patch: PostDraft) -> Result<Post, RepoError> {
        let uuid = parse_id(id)?;
        let updated = self.find(uuid).await?.apply(patch)?;

        // Concurrent view increments must survive an edit.
        let mut model = ActiveModel::from_post(uuid, updated);
        model.views = ActiveValue::NotSet;
        model.created_at = ActiveValue::NotSet;

        let saved = model.update(&self.db).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => RepoError::NotFound,
            other => map_db_err(other),
        })?;
        saved.try_into()
    }

    async fn delete(&self, id: &str) -> Result<(), RepoError> {
        let id = parse_id(id)?;
        let result = PostEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

fn list_query(filter: &PostFilter) -> Select<PostEntity> {
    let mut query = PostEntity::find();

    if let Some(category) = filter.category() {
        query = query.filter(post::Column::Category.eq(category));
    }
    if filter.is_featured_only() {
        query = query.filter(post::Column::Featured.eq(true));
    }
    if let Some(search) = filter.search() {
        query = query.filter(search_condition(search));
    }

    query.order_by_desc(post::Column::CreatedAt)
}

fn map_db_err(err: DbErr) -> RepoError {
    match err {
        DbErr::Conn(e) => RepoError::Connection(e.to_string()),
        DbErr::ConnectionAcquire(e) => RepoError::Connection(e.to_string()),
        other => RepoError::Query(other.to_string()),
    }
}

/// Matches when any single element of the `tags` array is LIKE the pattern.
const TAG_LIKE_SQL: &str = r#"EXISTS (SELECT 1 FROM jsonb_array_elements_text("posts"."tags") AS tag WHERE LOWER(tag) LIKE $1 ESCAPE '\')"#;

/// `search` as a case-insensitive substring of title, excerpt, content or
/// any one tag.
fn search_condition(search: &str) -> Condition {
    let pattern = format!("%{}%", escape_like(&search.to_lowercase()));
    let matches = |expr: SimpleExpr| {
        Expr::expr(Func::lower(expr)).like(LikeExpr::new(pattern.clone()).escape('\\'))
    };

    Condition::any()
        .add(matches(Expr::col(post::Column::Title).into()))
        .add(matches(Expr::col(post::Column::Excerpt).into()))
        .add(matches(Expr::col(post::Column::Content).into()))
        .add(Expr::cust_with_values(TAG_LIKE_SQL, [pattern.clone()]))
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn test_list_query_sql() {
        let filter = PostFilter::new()
            .with_category("React")
            .with_search("Hooks")
            .featured_only(true);
        let sql = list_query(&filter).build(DbBackend::Postgres).to_string();

        assert!(sql.contains(r#""posts"."category" = 'React'"#), "{sql}");
        assert!(sql.contains(r#""posts"."featured" = TRUE"#), "{sql}");
        assert!(sql.contains("LOWER"), "{sql}");
        assert!(sql.contains("'%hooks%'"), "{sql}");
        assert!(sql.contains(r#"ORDER BY "posts"."created_at" DESC"#), "{sql}");
    }

    #[test]
    fn test_tag_search_matches_array_elements() {
        let sql = list_query(&PostFilter::new().with_search("Next.JS"))
            .build(DbBackend::Postgres)
            .to_string();

        assert!(
            sql.contains(r#"jsonb_array_elements_text("posts"."tags") AS tag"#),
            "{sql}"
        );
        assert!(sql.contains("LOWER(tag) LIKE '%next.js%'"), "{sql}");
        assert!(!sql.contains("AS text"), "{sql}");
    }

    #[test]
    fn test_unfiltered_list_query_has_no_where_clause() {
        let sql = list_query(&PostFilter::new())
            .build(DbBackend::Postgres)
            .to_string();
        assert!(!sql.contains("WHERE"), "{sql}");
    }

    #[test]
    fn test_escape_like_wildcards() {
        assert_eq!(escape_like("100%_done\\"), "100\\%\\_done\\\\");
        assert_eq!(escape_like("next.js"), "next.js");
    }

}
