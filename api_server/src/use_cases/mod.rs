pub mod avatar;
pub mod delete_user;
pub mod login;
pub mod logout;
pub mod profile;
pub mod register;
pub mod reset_password;
pub mod update_password;
pub mod validation;
