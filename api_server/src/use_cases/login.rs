use crate::domain::{ApiError, Platform, Session};
use crate::use_cases::validation::validate_email;

pub struct LoginUseCase<'a, P: ?Sized> {
    pub platform: &'a P,
}

impl<P> LoginUseCase<'_, P>
where
    P: Platform + ?Sized,
{
    pub async fn execute(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let email = validate_email(email)?;
        if password.is_empty() {
            return Err(ApiError::Validation("password is required"));
        }

        self.platform
            .sign_in(&email, password)
            .await
            .map_err(ApiError::upstream("Authentication"))
    }
}
