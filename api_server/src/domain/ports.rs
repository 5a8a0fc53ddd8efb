use async_trait::async_trait;

use crate::domain::{AuthUser, NewUser, PlatformError, ProfileUpdate, Session, Upload, UserProfile};

// Port for the hosted platform's auth, row and storage APIs.
#[async_trait]
pub trait Platform: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, PlatformError>;
    async fn create_user(&self, user: &NewUser) -> Result<AuthUser, PlatformError>;
    async fn send_recovery(&self, email: &str, redirect_to: &str) -> Result<(), PlatformError>;
    async fn update_password(
        &self,
        access_token: &str,
        password: &str,
    ) -> Result<AuthUser, PlatformError>;
    async fn sign_out(&self, access_token: &str) -> Result<(), PlatformError>;
    async fn get_profile(&self, user_id: &str) -> Result<UserProfile, PlatformError>;
    async fn update_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
    ) -> Result<UserProfile, PlatformError>;
    async fn upload_object(&self, upload: Upload) -> Result<(), PlatformError>;
    async fn delete_user(&self, user_id: &str) -> Result<(), PlatformError>;
}
