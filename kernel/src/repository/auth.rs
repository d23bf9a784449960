use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    auth::{event::CreateToken, AccessToken},
    id::UserId,
};

#[async_trait]
pub trait AuthRepository: Send + Sync {
    /// トークンから利用者 ID を引く。期限切れ・未知のトークンは None。
    async fn fetch_user_id_from_token(&self, access_token: &AccessToken)
        -> AppResult<Option<UserId>>;
    /// 資格情報の完全一致を検証する
    async fn verify_user(&self, user_name: &str, password: &str) -> AppResult<UserId>;
    async fn create_token(&self, event: CreateToken) -> AppResult<AccessToken>;
    async fn delete_token(&self, access_token: AccessToken) -> AppResult<()>;
}
