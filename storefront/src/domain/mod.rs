pub mod avatar_path;
mod cookies;
mod entities;
mod errors;
mod ports;

// Re-export the domain boundary types and ports.
pub use cookies::CookiePolicy;
pub use entities::{AuthUser, Session, UserProfile};
pub use errors::{PlatformError, StorageError};
pub use ports::{Clock, CookieTier, KeyValueTier, SessionProvider};
