//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Expired-key sweep: purges expired memory store keys at a fixed interval

mod sweep;

pub use sweep::spawn_sweep_task;
