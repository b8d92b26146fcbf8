//! Tile Deployment Verification Harness
//!
//! This crate verifies that an installed tile propagates configuration and
//! network addressing from the platform's operations manager down to a
//! running application, and that a second, independently-deployed
//! application can reach the first through an HTTP relay configured with
//! the propagated address.
//!
//! Verification is a single sequential pass: resolve the deployment's apps
//! domain, fetch the relay's environment, then run independent checks
//! against the captured context. A discovery failure aborts the run before
//! any check executes; check outcomes never affect one another.
//!
//! # Features
//!
//! - `deployment`: verification against a live platform (requires
//!   `OPSMGR_URL`)
//!
//! # Usage
//!
//! ```bash
//! # Hermetic tests against the in-process stub platform
//! cargo test -p tile-verify
//!
//! # Verification against a live deployment
//! OPSMGR_URL=https://opsmgr.example.com \
//!     cargo test -p tile-verify --features deployment
//! ```

pub mod checks;
pub mod config;
pub mod fixtures;
pub mod opsmgr;
pub mod outcome;
pub mod proxy;
