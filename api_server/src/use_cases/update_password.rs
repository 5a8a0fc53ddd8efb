use crate::domain::{ApiError, AuthUser, Platform};
use crate::use_cases::validation::{require_token, validate_password};

pub struct UpdatePasswordUseCase<'a, P: ?Sized> {
    pub platform: &'a P,
}

impl<P> UpdatePasswordUseCase<'_, P>
where
    P: Platform + ?Sized,
{
    pub async fn execute(
        &self,
        access_token: Option<&str>,
        password: &str,
    ) -> Result<AuthUser, ApiError> {
        let token = require_token(access_token)?;
        validate_password(password)?;

        self.platform
            .update_password(token, password)
            .await
            .map_err(ApiError::upstream("Password update"))
    }
}
