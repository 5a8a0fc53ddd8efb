pub mod credential_store;
pub mod retry;

#[cfg(test)]
pub(crate) mod test_support;
