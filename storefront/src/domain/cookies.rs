use cookie::time::Duration;
use cookie::{Cookie, SameSite};

// Seven days, shared by fresh sign-ins and backup restoration.
pub const TOKEN_COOKIE_MAX_AGE_SECONDS: i64 = 7 * 24 * 60 * 60;

// Attributes applied to every token cookie written by the cookie tier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CookiePolicy {
    pub max_age_seconds: i64,
    pub same_site: SameSite,
    pub secure: bool,
    pub path: String,
}

impl Default for CookiePolicy {
    fn default() -> Self {
        Self {
            max_age_seconds: TOKEN_COOKIE_MAX_AGE_SECONDS,
            same_site: SameSite::Strict,
            secure: true,
            path: "/".to_string(),
        }
    }
}

impl CookiePolicy {
    pub fn build(&self, name: &str, value: &str) -> Cookie<'static> {
        Cookie::build((name.to_string(), value.to_string()))
            .max_age(Duration::seconds(self.max_age_seconds))
            .same_site(self.same_site)
            .secure(self.secure)
            .path(self.path.clone())
            .build()
    }

    // A cookie that tells the holder to drop `name` immediately.
    pub fn expired(&self, name: &str) -> Cookie<'static> {
        let policy = Self {
            max_age_seconds: 0,
            ..self.clone()
        };
        policy.build(name, "")
    }
}
