use crate::domain::{ApiError, AuthUser, NewUser, Platform};
use crate::use_cases::validation::{validate_email, validate_password, validate_username};

// Creates a confirmed account; the profile row is created platform-side.
pub struct RegisterUseCase<'a, P: ?Sized> {
    pub platform: &'a P,
}

impl<P> RegisterUseCase<'_, P>
where
    P: Platform + ?Sized,
{
    pub async fn execute(
        &self,
        email: &str,
        password: &str,
        username: &str,
    ) -> Result<AuthUser, ApiError> {
        let email = validate_email(email)?;
        validate_password(password)?;
        let user = NewUser {
            email,
            password: password.to_string(),
            username: validate_username(username)?,
        };

        self.platform
            .create_user(&user)
            .await
            .map_err(ApiError::upstream("Registration"))
    }
}
