pub mod auth;
pub mod fallback;
pub mod health;
pub mod users;

#[cfg(test)]
pub(crate) mod test_support;
