//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Reconnect: Restores the store connection after a transport fault

mod reconnect;

pub use reconnect::spawn_reconnect_task;
