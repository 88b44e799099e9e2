mod demo;
mod http;

pub use demo::DemoPageStore;
pub use http::{DEFAULT_TIMEOUT_SECS, HttpPageStore};
