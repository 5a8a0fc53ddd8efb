use crate::domain::{ApiError, Platform};
use crate::use_cases::validation::require_token;

// Revokes the session behind the caller's bearer token.
pub struct LogoutUseCase<'a, P: ?Sized> {
    pub platform: &'a P,
}

impl<P> LogoutUseCase<'_, P>
where
    P: Platform + ?Sized,
{
    pub async fn execute(&self, access_token: Option<&str>) -> Result<(), ApiError> {
        let token = require_token(access_token)?;

        self.platform
            .sign_out(token)
            .await
            .map_err(ApiError::upstream("Sign out"))
    }
}
