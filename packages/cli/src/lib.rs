#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Pipeline orchestration for the incident trends toolchain.
//!
//! [`pipeline::run_pipeline`] wires the loader, cleaner and aggregator
//! together; the `incident_trends` binary is a thin clap front end over it.

pub mod pipeline;
