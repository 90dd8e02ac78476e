pub mod backend;

pub use backend::{client::HttpExecutor, config::BackendConfig};
