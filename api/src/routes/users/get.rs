use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};

use super::common::UserResponse;
use crate::response::ApiResponse;
use db::models::user::{Column as UserCol, Entity as UserEntity};
use util::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i32>,
    pub per_page: Option<i32>,
    pub q: Option<String>, // search in username/email
}

#[derive(Debug, Serialize, Default)]
pub struct ListResponse {
    pub users: Vec<UserResponse>,
    pub page: i32,
    pub per_page: i32,
    pub total: i32,
}

/// GET /api/users
///
/// Paginated staff listing with optional username/email search.
pub async fn list_users(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> (StatusCode, Json<ApiResponse<ListResponse>>) {
    let db = state.db();
    let page = q.page.unwrap_or(1).max(1) as u64;
    let per_page = q.per_page.unwrap_or(20).clamp(1, 100) as u64;

    let mut sel = UserEntity::find().order_by_asc(UserCol::Username);
    if let Some(s) = q.q.as_ref().filter(|s| !s.trim().is_empty()) {
        sel = sel.filter(
            sea_orm::Condition::any()
                .add(UserCol::Username.contains(s))
                .add(UserCol::Email.contains(s)),
        );
    }

    let paginator = sel.paginate(db, per_page);
    let total = paginator.num_items().await.unwrap_or(0) as i32;
    let rows = paginator
        .fetch_page(page.saturating_sub(1))
        .await
        .unwrap_or_default();

    let resp = ListResponse {
        users: rows.into_iter().map(UserResponse::from).collect(),
        page: page as i32,
        per_page: per_page as i32,
        total,
    };

    (
        StatusCode::OK,
        Json(ApiResponse::success(resp, "Users retrieved")),
    )
}

/// GET /api/users/{user_id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<UserResponse>>) {
    match UserEntity::find_by_id(user_id).one(state.db()).await {
        Ok(Some(u)) => (
            StatusCode::OK,
            Json(ApiResponse::success(UserResponse::from(u), "User retrieved")),
        ),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("User not found")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Database error: {e}"))),
        ),
    }
}
