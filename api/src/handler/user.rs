use axum::{extract::State, http::StatusCode, Json};
use garde::Validate;
use kernel::model::role::{staff_email_permitted, Capability, Role};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::AuthorizedUser,
    model::user::{RegisterUserRequest, UserResponse},
};

pub async fn register_user(
    State(registry): State<AppRegistry>,
    Json(req): Json<RegisterUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    req.validate(&())?;

    // Staff は所属ドメインのメールアドレスでのみ登録できる（登録時のみの検査）
    if Role::from(req.role) == Role::Staff && !staff_email_permitted(&req.email) {
        return Err(AppError::AuthorizationDenied(
            "Staff の登録には所属ドメインのメールアドレスが必要です".into(),
        ));
    }

    let user = registry.user_repository().create(req.into()).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn get_current_user(user: AuthorizedUser) -> Json<UserResponse> {
    Json(user.user.into())
}

pub async fn purchase_membership(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    user.require(Capability::PurchaseMembership)?;

    registry
        .user_repository()
        .purchase_membership(user.id())
        .await
        .map(|_| StatusCode::OK)
}
