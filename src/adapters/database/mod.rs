//! Record store abstraction
//!
//! This module provides the [`RecordStore`] trait the runner reads from and
//! writes to, and the factory that builds a store from configuration.

pub mod factory;
pub mod traits;

pub use factory::create_record_store;
pub use traits::RecordStore;
