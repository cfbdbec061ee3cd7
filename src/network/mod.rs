pub mod api;
pub mod client;
#[cfg(test)]
pub mod test_server;
pub mod transport;

pub use api::ApiClient;
pub use client::ChatClient;
