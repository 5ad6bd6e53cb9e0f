//! Sample Web API definitions.
//!
//! Real applications feed the generator a JSON description extracted from
//! their assemblies; these definitions exist for tests and demos.

pub mod shop;

pub use shop::{define_shop_api, define_shop_type_mappings};
