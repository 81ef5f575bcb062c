//! HTTP adapters (reqwest).

pub mod fetcher;
pub mod names;

pub use fetcher::ReqwestFetcher;
pub use names::VkNameResolver;
