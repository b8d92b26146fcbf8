//! Stub platform for tile verification tests.
//!
//! Provides in-process stand-ins for the three collaborators a
//! verification run talks to: the operations manager, the relay
//! application, and the target application. Stubs bind random loopback
//! ports, so tests run hermetically and in parallel.

pub mod stub_platform;

pub use stub_platform::{
    spawn_ops_manager, spawn_raw_ops_manager, spawn_relay, spawn_target, StubApp,
};
