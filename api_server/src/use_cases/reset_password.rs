use crate::domain::{ApiError, Platform};
use crate::use_cases::validation::validate_email;

// Path on the frontend where the recovery link lands.
pub const UPDATE_PASSWORD_PATH: &str = "/auth/update-password";

pub struct ResetPasswordUseCase<'a, P: ?Sized> {
    pub platform: &'a P,
    pub frontend_url: &'a str,
}

impl<P> ResetPasswordUseCase<'_, P>
where
    P: Platform + ?Sized,
{
    pub async fn execute(&self, email: &str) -> Result<(), ApiError> {
        let email = validate_email(email)?;
        let redirect_to = format!(
            "{}{}",
            self.frontend_url.trim_end_matches('/'),
            UPDATE_PASSWORD_PATH
        );

        self.platform
            .send_recovery(&email, &redirect_to)
            .await
            .map_err(ApiError::upstream("Password reset"))
    }
}
