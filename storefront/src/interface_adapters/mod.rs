pub mod clients;
pub mod clock;
pub mod context;
pub mod storage;
