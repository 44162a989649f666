//! Domain types shared by the database and HTTP layers.

pub mod error;
pub mod record;
pub mod storage;
pub mod types;
