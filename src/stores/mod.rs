pub mod document;
pub mod user_store;
