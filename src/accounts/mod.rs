pub mod registration;
pub mod update;
