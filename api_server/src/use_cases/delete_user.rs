use crate::domain::{ApiError, Platform};
use crate::use_cases::validation::validate_user_id;

pub struct DeleteUserUseCase<'a, P: ?Sized> {
    pub platform: &'a P,
}

impl<P> DeleteUserUseCase<'_, P>
where
    P: Platform + ?Sized,
{
    pub async fn execute(&self, user_id: &str) -> Result<(), ApiError> {
        let user_id = validate_user_id(user_id)?;

        self.platform
            .delete_user(user_id)
            .await
            .map_err(ApiError::upstream("User deletion"))
    }
}
