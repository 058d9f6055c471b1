#![forbid(unsafe_code)]

pub mod cli;
pub mod client;
pub mod info;
pub mod output;
