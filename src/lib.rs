// src/lib.rs

//! Site corpus crawler library

pub mod error;
#[cfg(feature = "lambda")]
pub mod lambda;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
