use storefront::avatar_path::{self, AVATAR_BUCKET, StorageBase};
use tracing::info;

use crate::domain::{ApiError, Platform, ProfileUpdate, Upload, UserProfile};
use crate::use_cases::profile::with_resolved_avatar;
use crate::use_cases::validation::validate_user_id;

// Upper bound for a single avatar image.
pub const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

// Stores an avatar image and points the profile row at its public URL.
pub struct AvatarUseCase<'a, P: ?Sized> {
    pub platform: &'a P,
    pub storage: &'a StorageBase,
}

impl<P> AvatarUseCase<'_, P>
where
    P: Platform + ?Sized,
{
    pub async fn execute(
        &self,
        user_id: &str,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<UserProfile, ApiError> {
        let user_id = validate_user_id(user_id)?;
        if bytes.is_empty() {
            return Err(ApiError::Validation("avatar image is empty"));
        }
        if bytes.len() > MAX_AVATAR_BYTES {
            return Err(ApiError::Validation("avatar image is too large"));
        }
        if !content_type.starts_with("image/") {
            return Err(ApiError::Validation("avatar must be an image"));
        }

        // Keys live directly in the bucket; no `avatars/` prefix.
        let key = avatar_path::object_key(user_id, file_name);
        self.platform
            .upload_object(Upload {
                bucket: AVATAR_BUCKET.to_string(),
                key: key.clone(),
                content_type: content_type.to_string(),
                bytes,
            })
            .await
            .map_err(ApiError::upstream("Avatar upload"))?;

        let public_url = self.storage.public_object_url(AVATAR_BUCKET, &key);
        info!(user_id, %key, "avatar uploaded");

        let profile = self
            .platform
            .update_profile(
                user_id,
                &ProfileUpdate {
                    avatar_url: Some(public_url),
                    ..ProfileUpdate::default()
                },
            )
            .await
            .map_err(ApiError::upstream("Profile update"))?;

        Ok(with_resolved_avatar(profile, self.storage))
    }
}
