// Concrete storage tiers backing the credential store.
pub mod cookie_jar;
pub mod file;
pub mod memory;

pub use cookie_jar::CookieJarTier;
pub use file::FileTier;
pub use memory::MemoryTier;
