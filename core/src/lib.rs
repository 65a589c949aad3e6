//! bip38-core
//!
//! Streaming BIP38 private-key engine: a producer → transformer → sink
//! pipeline over rendezvous channels, wrapped around a secp256k1 + BIP38
//! key backend.

#![forbid(unsafe_code)]

// Shared and top level
pub mod config;
pub mod types;

// Key material (the crypto backend)
pub mod keys;

// Pipeline stages and wiring
pub mod pipeline;
