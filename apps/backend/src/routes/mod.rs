pub mod bank;
pub mod sessions;
