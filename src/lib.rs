//! Dewtrack library crate — re-exports all modules for integration testing.
//!
//! The binary crate (`main.rs`) is the actual entry point. This library
//! crate exposes the same modules so that `tests/` integration tests can
//! import types, systems, and resources without needing a window or GPU.

pub mod shared;
pub mod input;
pub mod clock;
pub mod data;
pub mod garden;
pub mod tracker;
pub mod checklist;
pub mod layouts;
pub mod storage;
pub mod ui;
