pub mod api;
pub mod chain;
pub mod http;
pub mod retry;
