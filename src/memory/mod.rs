pub mod credentials;
pub mod extract;
pub mod retrieve;
pub mod store;
pub mod types;
