use async_trait::async_trait;
use chrono::{DateTime, Duration, Local};
use derive_new::new;
use kernel::model::{
    auth::{event::CreateToken, AccessToken},
    id::UserId,
};
use kernel::repository::auth::AuthRepository;
use shared::error::{AppError, AppResult};
use uuid::Uuid;

use crate::database::ConnectionPool;

#[derive(new)]
pub struct AuthRepositoryImpl {
    db: ConnectionPool,
    ttl: u64,
}

#[derive(sqlx::FromRow)]
struct TokenRow {
    user_id: UserId,
    created_at: DateTime<Local>,
}

#[async_trait]
impl AuthRepository for AuthRepositoryImpl {
    async fn fetch_user_id_from_token(
        &self,
        access_token: &AccessToken,
    ) -> AppResult<Option<UserId>> {
        let row: Option<TokenRow> = sqlx::query_as(
            r#"
            SELECT user_id, created_at
            FROM access_tokens
            WHERE access_token = ?
            "#,
        )
        .bind(&access_token.0)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        // 期限切れは未認証と同じ扱いにする
        Ok(row
            .filter(|r| r.created_at + Duration::seconds(self.ttl as i64) > Local::now())
            .map(|r| r.user_id))
    }

    async fn verify_user(&self, user_name: &str, password: &str) -> AppResult<UserId> {
        let user_id: Option<UserId> = sqlx::query_scalar(
            r#"
            SELECT user_id
            FROM users
            WHERE user_name = ? AND password = ?
            "#,
        )
        .bind(user_name)
        .bind(password)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        user_id.ok_or(AppError::InvalidCredentials)
    }

    async fn create_token(&self, event: CreateToken) -> AppResult<AccessToken> {
        let token = Uuid::new_v4().simple().to_string();

        sqlx::query(
            r#"
            INSERT INTO access_tokens (access_token, user_id, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&token)
        .bind(event.user_id)
        .bind(Local::now())
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(AccessToken(token))
    }

    async fn delete_token(&self, access_token: AccessToken) -> AppResult<()> {
        sqlx::query("DELETE FROM access_tokens WHERE access_token = ?")
            .bind(&access_token.0)
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;
        Ok(())
    }
}
