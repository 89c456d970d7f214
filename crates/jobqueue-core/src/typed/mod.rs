//! Typed - job types, their tags and the payload codec.
//!
//! # Two layers
//! - **Typed**: `Job`, `TypedJob` - what application code implements
//! - **Dyn**: `DynDecoder` - object-safe, one per registered tag
//!
//! Payloads are only ever decoded into registered types.

pub mod codec;
pub mod decoder;
pub mod job;
pub mod registry;

pub use self::codec::{CodecError, PayloadCodec};
pub use self::decoder::{DynDecoder, TypedDecoder};
pub use self::job::{Job, JobTag, TypedJob};
pub use self::registry::{JobRegistry, RegistryError};
