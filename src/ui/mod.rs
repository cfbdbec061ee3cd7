pub mod app;
pub mod bubble;
pub mod components;
pub mod state;

pub use app::ChatApp;
