pub mod environment;
pub mod ticket;
