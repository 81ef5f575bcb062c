//! vk-grab: extract photo attachments from exported VK dialog JSON and
//! bulk-download them, with Hexagonal Architecture.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
