use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::UserId,
    user::{event::CreateUser, User},
};
use kernel::repository::user::UserRepository;
use shared::error::{AppError, AppResult};

use crate::database::{model::user::UserRow, ConnectionPool};

#[derive(new)]
pub struct UserRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn create(&self, event: CreateUser) -> AppResult<User> {
        let user_id = UserId::new();

        sqlx::query(
            r#"
            INSERT INTO users (user_id, user_name, password, full_name, email, phone, role)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(&event.user_name)
        .bind(&event.password)
        .bind(&event.full_name)
        .bind(&event.email)
        .bind(&event.phone)
        .bind(event.role)
        .execute(self.db.inner_ref())
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(de) if de.is_unique_violation() => AppError::DuplicateIdentity(
                "ユーザー名またはメールアドレスは既に登録されています".into(),
            ),
            _ => AppError::SpecificOperationError(e),
        })?;

        Ok(User {
            user_id,
            user_name: event.user_name,
            full_name: event.full_name,
            email: event.email,
            phone: event.phone,
            role: event.role,
            is_member: false,
        })
    }

    async fn find_current_user(&self, user_id: UserId) -> AppResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT user_id, user_name, full_name, email, phone, role, is_member
            FROM users
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(User::from))
    }

    async fn purchase_membership(&self, user_id: UserId) -> AppResult<()> {
        let res = sqlx::query("UPDATE users SET is_member = 1 WHERE user_id = ?")
            .bind(user_id)
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() == 0 {
            return Err(AppError::EntityNotFound(format!(
                "利用者（{user_id}）が見つかりませんでした"
            )));
        }
        Ok(())
    }
}
