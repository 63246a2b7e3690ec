//! Wire codecs for the two bridged game protocols.
//!
//! `bedrock` holds the client-facing (target) protocol packets, `java` the
//! backend-facing (source) protocol packets. Both sides share the buffer
//! traits in `codec` but have their own primitive encodings: Bedrock uses
//! little-endian scalars and ZigZag varints, Java big-endian scalars and
//! unsigned varints.

pub mod bedrock;
pub mod codec;
pub mod error;
pub mod java;
pub mod types;
