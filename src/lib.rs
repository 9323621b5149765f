pub mod accounts;
pub mod auth;
pub mod core;
pub mod handlers;
pub mod models;
pub mod policy;
pub mod stores;
pub mod utils;
