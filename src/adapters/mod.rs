//! Infrastructure adapters. Implement outbound ports.
//!
//! HTTP and filesystem. Map errors to DomainError.

pub mod fs;
pub mod http;
