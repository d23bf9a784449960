use garde::Validate;
use kernel::model::{
    id::UserId,
    role::Role,
    user::{event::CreateUser, User},
};
use serde::{Deserialize, Serialize};
use strum::VariantNames;

/// 登録時に選べる役割。Guest は料金区分であって登録対象ではない。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, VariantNames)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RoleName {
    Student,
    Faculty,
    Staff,
}

impl From<RoleName> for Role {
    fn from(value: RoleName) -> Self {
        match value {
            RoleName::Student => Role::Student,
            RoleName::Faculty => Role::Faculty,
            RoleName::Staff => Role::Staff,
        }
    }
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    #[garde(length(min = 1))]
    pub user_name: String,
    #[garde(length(min = 1))]
    pub password: String,
    #[garde(length(min = 1))]
    pub full_name: String,
    #[garde(email)]
    pub email: String,
    #[garde(length(min = 1))]
    pub phone: String,
    #[garde(skip)]
    pub role: RoleName,
}

impl From<RegisterUserRequest> for CreateUser {
    fn from(value: RegisterUserRequest) -> Self {
        let RegisterUserRequest {
            user_name,
            password,
            full_name,
            email,
            phone,
            role,
        } = value;
        CreateUser {
            user_name,
            password,
            full_name,
            email,
            phone,
            role: role.into(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user_id: UserId,
    pub user_name: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
    pub is_member: bool,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        let User {
            user_id,
            user_name,
            full_name,
            email,
            phone,
            role,
            is_member,
        } = value;
        Self {
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
