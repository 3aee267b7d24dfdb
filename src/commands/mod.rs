// src/commands/mod.rs
//! Command handlers for the larder CLI

mod recipe;
mod resolve;

pub use recipe::{cmd_normalize, cmd_validate};
pub use resolve::{cmd_batch, cmd_resolve};
