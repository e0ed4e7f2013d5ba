// ABOUTME: Library root for talkiepi - exposes every bootstrap component for testing.
// ABOUTME: The binary in main.rs wires them together.

pub mod config;
pub mod error;
pub mod identity;
pub mod lifecycle;
pub mod session;
pub mod shutdown;
pub mod signals;
pub mod tls;
