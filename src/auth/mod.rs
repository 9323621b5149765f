pub mod credentials;
pub mod middleware;
pub mod service;
pub mod token;
