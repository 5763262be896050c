pub mod competitions;
pub mod connection;
pub mod derived;
pub mod matches;
pub mod models;
pub mod players;
pub mod setup;

pub use connection::{DbConn, DbPool, create_pool, default_path, get_connection};
pub use models::*;
