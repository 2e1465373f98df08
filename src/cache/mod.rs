pub mod enum_registry;

pub use enum_registry::{EnumRegistry, global_registry};
