//! Washer controller firmware library.
//!
//! Exposes the pure-logic modules for integration testing and host
//! simulation.  Nothing here depends on ESP-IDF; the firmware binary in
//! `main.rs` wires these modules to real pins behind the `espidf` feature.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod display;
pub mod drivers;
pub mod error;
pub mod fsm;
pub mod pins;
pub mod safety;
pub mod timing;
