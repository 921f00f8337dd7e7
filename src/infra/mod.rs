pub mod http;
pub mod notify;
