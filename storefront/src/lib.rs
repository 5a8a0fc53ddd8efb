pub mod domain;
pub mod frameworks;
pub mod interface_adapters;
pub mod use_cases;

pub use domain::avatar_path;
pub use domain::{AuthUser, PlatformError, Session, StorageError, UserProfile};
pub use frameworks::runtime::ClientRuntime;
pub use use_cases::credential_store::{CredentialStore, WriteReport};
