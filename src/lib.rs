//! Turing — black-box conversational-contract checks for the Eva chat widget.
//!
//! Sends scripted user turns to a chat target, verifies each captured reply
//! against phrase and behavior rules, and reports pass/fail per scenario.
//!
//! See `DESIGN.md` for full architecture documentation.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod logging;

pub mod scenario;
pub mod verifier;

pub mod driver;
pub mod runner;

pub mod analyst;
pub mod generator;
