use derive_new::new;

use crate::model::role::Role;

#[derive(new)]
pub struct CreateUser {
    pub user_name: String,
    pub password: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
}
