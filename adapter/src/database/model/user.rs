use kernel::model::{id::UserId, role::Role, user::User};

#[derive(sqlx::FromRow)]
pub struct UserRow {
    pub user_id: UserId,
    pub user_name: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
    pub is_member: bool,
}

impl From<UserRow> for User {
    fn from(value: UserRow) -> Self {
        let UserRow {
            user_id,
            user_name,
            full_name,
            email,
            phone,
            role,
            is_member,
        } = value;
        User {
            user_id,
            user_name,
            full_name,
            email,
            phone,
            role,
            is_member,
        }
    }
}
