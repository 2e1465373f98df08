pub mod enum_descriptor;
pub mod enum_metadata;
pub mod enum_triggers;
pub use enum_descriptor::EnumDescriptor;
pub use enum_metadata::{EnumMetadata, EnumType, EnumValue};
pub use enum_triggers::EnumTriggers;
