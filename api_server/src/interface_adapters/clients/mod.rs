pub mod platform;

pub use platform::{AdminClientConfig, PlatformAdminClient};
