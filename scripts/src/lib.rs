//! Scripts for deploying the marketplace contracts and wiring them together.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod artifacts;
pub mod backend;
pub mod cli;
mod commands;
pub mod constants;
pub mod errors;
pub mod runner;
mod solidity;
pub mod steps;
pub mod types;
pub mod utils;
