use axum::{extract::FromRequestParts, http::request::Parts, RequestPartsExt};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use kernel::model::{auth::AccessToken, id::UserId, role::Capability, user::User};
use registry::AppRegistry;
use shared::error::AppError;

/// Bearer トークンを解決した呼び出し元。保護されたハンドラの第一引数になる。
pub struct AuthorizedUser {
    pub access_token: AccessToken,
    pub user: User,
}

impl AuthorizedUser {
    pub fn id(&self) -> UserId {
        self.user.user_id
    }

    /// 役割の権限表を引き、許可がなければ AuthorizationDenied を返す
    pub fn require(&self, capability: Capability) -> Result<(), AppError> {
        if self.user.role.permits(capability) {
            Ok(())
        } else {
            Err(AppError::AuthorizationDenied(format!(
                "{} 権限ではこの操作を実行できません",
                self.user.role
            )))
        }
    }

}

#[axum::async_trait]
impl FromRequestParts<AppRegistry> for AuthorizedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        registry: &AppRegistry,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AppError::UnauthenticatedError)?;
        let access_token = AccessToken(bearer.token().to_string());

        let user_id = registry
            .auth_repository()
            .fetch_user_id_from_token(&access_token)
            .await?
            .ok_or(AppError::UnauthenticatedError)?;

        let user = registry
            .user_repository()
            .find_current_user(user_id)
            .await?
            .ok_or(AppError::UnauthenticatedError)?;

        Ok(Self { access_token, user })
    }
}
