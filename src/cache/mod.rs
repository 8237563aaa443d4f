//! Cache Module
//!
//! The cache access layer the HTTP boundary talks to.

mod service;

#[cfg(test)]
mod property_tests;

pub use service::CacheService;
