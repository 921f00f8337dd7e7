pub mod board;
pub mod config;
pub mod health;
pub mod ticket;
