#![allow(dead_code)]

pub mod environment;
pub mod fixtures;

pub use environment::HookEnvironment;
