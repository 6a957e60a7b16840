#![doc = include_str!("RUSTDOC.md")]

pub mod client;
pub mod integration;
pub mod platform;

#[cfg(test)]
pub mod test_support;
