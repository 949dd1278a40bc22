//! Connection handling for the SQLite datastore.

pub mod pragmas;
pub mod write_connection;

pub use write_connection::WriteConnection;
