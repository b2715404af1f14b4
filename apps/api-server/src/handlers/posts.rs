//! Post CRUD handlers.

use actix_web::{HttpResponse, web};
use actix_multipart::form::{MultipartForm, bytes::Bytes, text::Text};
use uuid::Uuid;

use quill_core::domain::Post;
use quill_shared::dto::MessageResponse;

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Thumbnails are capped at 2MB.
pub const MAX_THUMBNAIL_BYTES: usize = 2_000_000;

/// Descriptions must carry at least this much text when edited.
const MIN_DESCRIPTION_LEN: usize = 12;

fn text_field(field: Option<Text<String>>) -> Option<String> {
    field.map(|text| text.0).filter(|s| !s.trim().is_empty())
}

/// Multipart body for post creation.
#[derive(MultipartForm)]
pub struct CreatePostForm {
    pub title: Option<Text<String>>,
    pub category: Option<Text<String>>,
    pub description: Option<Text<String>>,
    pub thumbnail: Option<Bytes>,
}

/// POST /api/posts
pub async fn create_post(
    identity: Identity,
    state: web::Data<AppState>,
    form: MultipartForm<CreatePostForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();

    let (Some(title), Some(category), Some(description), Some(thumbnail)) = (
        text_field(form.title),
        text_field(form.category),
        text_field(form.description),
        form.thumbnail,
    ) else {
        return Err(AppError::Unprocessable(
            "Fill in all the fields and choose thumbnail.".to_string(),
        ));
    };

    if thumbnail.data.len() > MAX_THUMBNAIL_BYTES {
        return Err(AppError::Unprocessable(
            "Thumbnail too big. File should be less than 2MB.".to_string(),
        ));
    }

    let original_name = thumbnail.file_name.as_deref().unwrap_or("thumbnail");
    let stored = state.files.store(original_name, &thumbnail.data).await?;

    let post = Post::new(identity.user_id, title, category, description, stored);
    let created = state.posts.create(post).await?;

    Ok(HttpResponse::Created().json(created))
}

/// GET /api/posts
pub async fn get_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.find_recent().await?;

    Ok(HttpResponse::Ok().json(posts))
}

/// GET /api/posts/{id}
pub async fn get_post(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found.".to_string()))?;

    Ok(HttpResponse::Ok().json(post))
}

/// GET /api/posts/categories/{category}
pub async fn get_cat_posts(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let posts = state.posts.find_by_category(&path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(posts))
}

/// GET /api/posts/users/{id}
pub async fn get_user_posts(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let posts = state.posts.find_by_creator(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(posts))
}

/// Multipart body for post edits. The thumbnail is optional; text fields are
/// validated in the handler.
#[derive(MultipartForm)]
pub struct EditPostForm {
    pub title: Option<Text<String>>,
    pub category: Option<Text<String>>,
    pub description: Option<Text<String>>,
    pub thumbnail: Option<Bytes>,
}

/// PATCH /api/posts/{id}
pub async fn edit_post(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    form: MultipartForm<EditPostForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();

    let (Some(title), Some(category), Some(description)) = (
        text_field(form.title),
        text_field(form.category),
        text_field(form.description),
    ) else {
        return Err(AppError::Unprocessable("Fill in all fields.".to_string()));
    };

    if description.len() < MIN_DESCRIPTION_LEN {
        return Err(AppError::Unprocessable("Fill in all fields.".to_string()));
    }

    let mut post = state
        .posts
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found.".to_string()))?;

    if post.creator != identity.user_id {
        return Err(AppError::Forbidden("Post couldn't be edited.".to_string()));
    }

    if let Some(thumbnail) = form.thumbnail {
        // Replace the thumbnail; losing the old file is not worth failing
        // the edit over.
        if let Err(e) = state.files.remove(&post.thumbnail).await {
            tracing::warn!(file = %post.thumbnail, "Failed to delete old thumbnail: {}", e);
        }

        if thumbnail.data.len() > MAX_THUMBNAIL_BYTES {
            return Err(AppError::Unprocessable(
                "Thumbnail too big. File should be less than 2MB.".to_string(),
            ));
        }

        let original_name = thumbnail.file_name.as_deref().unwrap_or("thumbnail");
        post.thumbnail = state.files.store(original_name, &thumbnail.data).await?;
    }

    post.title = title;
    post.category = category;
    post.description = description;
    let updated = state.posts.update(post).await?;

    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found.".to_string()))?;

    if post.creator != identity.user_id {
        return Err(AppError::Forbidden("Post couldn't be deleted.".to_string()));
    }

    if let Err(e) = state.files.remove(&post.thumbnail).await {
        tracing::warn!(file = %post.thumbnail, "Failed to delete thumbnail: {}", e);
    }

    state.posts.delete(id).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new(format!("Post {} deleted.", id))))
}
