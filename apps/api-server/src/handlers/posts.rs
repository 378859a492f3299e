//! Blog post endpoints.

use actix_web::{HttpResponse, web};

use folio_core::domain::{PostDraft, PostFilter};
use folio_shared::ApiResponse;
use folio_shared::dto::ListPostsQuery;

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/posts
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let mut filter = PostFilter::new().featured_only(query.featured_only());
    if let Some(category) = query.category.as_deref() {
        filter = filter.with_category(category);
    }
    if let Some(search) = query.search.as_deref() {
        filter = filter.with_search(search);
    }

    let posts = state
        .posts
        .list(&filter)
        .await
        .map_err(|e| AppError::from_repo(e, "Failed to fetch blog posts"))?;

    tracing::debug!(count = posts.len(), "Listed posts");
    Ok(HttpResponse::Ok().json(ApiResponse::list(posts)))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    body: web::Json<PostDraft>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .create(body.into_inner())
        .await
        .map_err(|e| AppError::from_repo(e, "Failed to create blog post"))?;

    tracing::info!(post_id = %post.id, "Blog post created");
    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        post,
        "Blog post created successfully",
    )))
}

/// GET /api/posts/{id}
///
/// Returns the post as it was before this read's view was counted.
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .read_and_count_view(&path.into_inner())
        .await
        .map_err(|e| AppError::from_repo(e, "Failed to fetch blog post"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// PUT /api/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<PostDraft>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .update(&path.into_inner(), body.into_inner())
        .await
        .map_err(|e| AppError::from_repo(e, "Failed to update blog post"))?;

    tracing::info!(post_id = %post.id, "Blog post updated");
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        post,
        "Blog post updated successfully",
    )))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    state
        .posts
        .delete(&id)
        .await
        .map_err(|e| AppError::from_repo(e, "Failed to delete blog post"))?;

    tracing::info!(post_id = %id, "Blog post deleted");
    Ok(HttpResponse::Ok().json(ApiResponse::message("Blog post deleted successfully")))
}
