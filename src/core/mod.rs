//! Core business logic modules.

pub mod latch;
pub mod notification;
pub mod persistence;
pub mod store;
pub mod sync;
pub mod views;
