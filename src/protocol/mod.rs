// Module for PostgreSQL extended-protocol encoding of enum parameters
pub mod messages;
pub mod codec;

pub use messages::*;
pub use codec::FrontendCodec;
