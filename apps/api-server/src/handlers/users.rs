//! User account handlers.

use std::sync::Arc;

use actix_web::{HttpResponse, web};
use actix_multipart::form::{MultipartForm, bytes::Bytes};
use uuid::Uuid;

use quill_core::domain::User;
use quill_core::ports::{FileStoreError, PasswordService, TokenService};
use quill_shared::dto::{
    EditUserRequest, LoginRequest, LoginResponse, MessageResponse, RegisterRequest, UserResponse,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Avatars are capped at 500KB.
pub const MAX_AVATAR_BYTES: usize = 500_000;

fn present(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.trim().is_empty())
}

/// POST /api/users/register
pub async fn register(
    state: web::Data<AppState>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let (Some(name), Some(email), Some(password)) = (
        present(req.name),
        present(req.email),
        req.password.filter(|s| !s.is_empty()),
    ) else {
        return Err(AppError::Unprocessable("Fill in all fields.".to_string()));
    };

    let email = email.trim().to_lowercase();
    if state.users.find_by_email(&email).await?.is_some() {
        return Err(AppError::Unprocessable("Email already exists.".to_string()));
    }

    if password.trim().len() < 6 {
        return Err(AppError::Unprocessable(
            "Password should be at least 6 characters.".to_string(),
        ));
    }

    if password != req.password2.unwrap_or_default() {
        return Err(AppError::Unprocessable(
            "Passwords do not match.".to_string(),
        ));
    }

    let password_hash = password_service.hash(&password)?;
    let saved = state.users.insert(User::new(name, email, password_hash)).await?;

    Ok(HttpResponse::Created().json(MessageResponse::new(format!(
        "New user {} registered",
        saved.email
    ))))
}

/// POST /api/users/login
pub async fn login(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let (Some(email), Some(password)) = (
        present(req.email),
        req.password.filter(|s| !s.is_empty()),
    ) else {
        return Err(AppError::Unprocessable("Fill in all fields.".to_string()));
    };

    let email = email.trim().to_lowercase();

    // Unknown email and wrong password answer identically so a caller
    // cannot probe which one was wrong.
    let user = state
        .users
        .find_by_email(&email)
        .await?
        .ok_or_else(|| AppError::Unprocessable("Invalid credentials.".to_string()))?;

    let valid = password_service.verify(&password, &user.password_hash)?;
    if !valid {
        return Err(AppError::Unprocessable("Invalid credentials.".to_string()));
    }

    let token = token_service.generate_token(user.id, &user.name)?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        token,
        id: user.id,
        name: user.name,
    }))
}

/// GET /api/users/{id}
pub async fn get_user(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let user = state
        .users
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found.".to_string()))?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// Multipart body for avatar changes.
#[derive(MultipartForm)]
pub struct AvatarForm {
    pub avatar: Option<Bytes>,
}

/// POST /api/users/change-avatar
pub async fn change_avatar(
    identity: Identity,
    state: web::Data<AppState>,
    form: MultipartForm<AvatarForm>,
) -> AppResult<HttpResponse> {
    let Some(avatar) = form.into_inner().avatar else {
        return Err(AppError::Unprocessable(
            "Please choose an image.".to_string(),
        ));
    };

    let mut user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found.".to_string()))?;

    // Delete old avatar if it exists; a file already gone is fine.
    if let Some(old) = &user.avatar {
        match state.files.remove(old).await {
            Ok(()) | Err(FileStoreError::NotFound) => {}
            Err(e) => {
                tracing::error!(file = %old, "Failed to delete old avatar: {}", e);
                return Err(AppError::Internal(
                    "Failed to delete old avatar.".to_string(),
                ));
            }
        }
    }

    if avatar.data.len() > MAX_AVATAR_BYTES {
        return Err(AppError::Unprocessable(
            "Profile picture too big. Should be less than 500KB.".to_string(),
        ));
    }

    let original_name = avatar.file_name.as_deref().unwrap_or("avatar");
    let stored = state.files.store(original_name, &avatar.data).await?;

    user.avatar = Some(stored);
    let updated = state.users.update(user).await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(updated)))
}

/// POST /api/users/edit-user
pub async fn edit_user(
    identity: Identity,
    state: web::Data<AppState>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<EditUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let (Some(name), Some(email), Some(current_password), Some(new_password)) = (
        present(req.name),
        present(req.email),
        req.current_password.filter(|s| !s.is_empty()),
        req.new_password.filter(|s| !s.is_empty()),
    ) else {
        return Err(AppError::Unprocessable("Fill in all fields.".to_string()));
    };

    let mut user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| AppError::Forbidden("User not found.".to_string()))?;

    // The new email must not belong to a different account.
    let email = email.trim().to_lowercase();
    if let Some(existing) = state.users.find_by_email(&email).await? {
        if existing.id != identity.user_id {
            return Err(AppError::Unprocessable("Email already exists.".to_string()));
        }
    }

    let valid = password_service.verify(&current_password, &user.password_hash)?;
    if !valid {
        return Err(AppError::Unprocessable(
            "Invalid current password.".to_string(),
        ));
    }

    if new_password != req.confirm_new_password.unwrap_or_default() {
        return Err(AppError::Unprocessable(
            "New passwords do not match.".to_string(),
        ));
    }

    user.name = name;
    user.email = email;
    user.password_hash = password_service.hash(&new_password)?;
    let updated = state.users.update(user).await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(updated)))
}

/// GET /api/users/authors
pub async fn get_authors(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let authors: Vec<UserResponse> = state
        .users
        .find_all()
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(authors))
}
