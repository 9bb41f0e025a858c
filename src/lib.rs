#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), no_std)]
#![deny(
    unsafe_code,
    unused_imports,
    unused_variables,
    unused_must_use,
    missing_docs,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented
)]
#![allow(clippy::len_without_is_empty)]

extern crate alloc;

mod arena;
mod erase;
mod insert;
mod iter;
mod node;
mod render;
mod rotate;
mod tree;
mod validate;

pub use iter::{Drain, Iter};
pub use node::{Color, NodeId, Side};
pub use render::Outline;
pub use tree::RbTree;
pub use validate::{InvariantViolation, LogReport, Report};
