pub mod entities;
pub mod errors;
pub mod ports;

pub use entities::{NewUser, ProfileUpdate, Upload};
pub use errors::ApiError;
pub use ports::Platform;

// Platform-side types shared with the storefront client.
pub use storefront::{AuthUser, PlatformError, Session, UserProfile};
