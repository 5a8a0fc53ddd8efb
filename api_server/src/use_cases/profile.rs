use storefront::avatar_path::{self, StorageBase};

use crate::domain::{ApiError, Platform, PlatformError, ProfileUpdate, UserProfile};
use crate::use_cases::validation::{validate_user_id, validate_username};

// Reads and updates profile rows, always returning a resolved avatar URL.
pub struct ProfileUseCase<'a, P: ?Sized> {
    pub platform: &'a P,
    pub storage: &'a StorageBase,
}

impl<P> ProfileUseCase<'_, P>
where
    P: Platform + ?Sized,
{
    pub async fn get(&self, user_id: &str) -> Result<UserProfile, ApiError> {
        let user_id = validate_user_id(user_id)?;

        let profile = self
            .platform
            .get_profile(user_id)
            .await
            .map_err(|err| not_found_or(err, "Profile fetch"))?;

        Ok(with_resolved_avatar(profile, self.storage))
    }

    pub async fn update(
        &self,
        user_id: &str,
        update: ProfileUpdate,
    ) -> Result<UserProfile, ApiError> {
        let user_id = validate_user_id(user_id)?;
        let update = normalize_update(update)?;

        let profile = self
            .platform
            .update_profile(user_id, &update)
            .await
            .map_err(|err| not_found_or(err, "Profile update"))?;

        Ok(with_resolved_avatar(profile, self.storage))
    }
}

fn normalize_update(update: ProfileUpdate) -> Result<ProfileUpdate, ApiError> {
    if update.is_empty() {
        return Err(ApiError::Validation("no profile fields to update"));
    }

    let username = update
        .username
        .as_deref()
        .map(validate_username)
        .transpose()?;
    let full_name = update.full_name.map(|name| name.trim().to_string());
    let avatar_url = update
        .avatar_url
        .map(|url| avatar_path::fix_duplicated_segment(url.trim()));

    Ok(ProfileUpdate {
        username,
        full_name,
        avatar_url,
    })
}

fn not_found_or(err: PlatformError, action: &'static str) -> ApiError {
    match err {
        PlatformError::NotFound { entity } => ApiError::NotFound { entity },
        other => ApiError::upstream(action)(other),
    }
}

pub(crate) fn with_resolved_avatar(mut profile: UserProfile, storage: &StorageBase) -> UserProfile {
    profile.avatar_url = avatar_path::resolve(profile.avatar_url.as_deref(), storage);
    profile
}
