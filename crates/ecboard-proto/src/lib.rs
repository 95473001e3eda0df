pub mod config;
pub mod error;
pub mod fallback;
pub mod photos;
pub mod platform;
pub mod protocol;
pub mod scheduler;
pub mod sheets;
pub mod source;
pub mod transform;

#[cfg(test)]
mod test_server;
