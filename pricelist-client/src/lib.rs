pub mod client;
pub mod error;
pub mod store;
pub mod transport;
pub mod view;
