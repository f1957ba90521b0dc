//! Wire message contract and type erasure
//!
//! [`Message`] is the contract every schema-compiled type exposes: a globally
//! unique wire name plus byte encode/decode. The registry and envelope layers
//! depend on nothing beyond it, so the serialization format itself stays a
//! black box behind [`crate::impl_wire_message!`].
//!
//! [`DynMessage`] is the type-erased form handed back by envelope extraction:
//! a receiver can inspect the wire name and downcast to a concrete type it
//! knows, without compile-time knowledge of every sender schema.

use std::any::Any;
use std::fmt;

use crate::error::ArkMsgsResult;

/// Contract exposed by every wire-serializable message type
pub trait Message: Sized + Send + Sync + 'static {
    /// Globally unique wire name, e.g. `"ark.RigidTransform"`
    const TYPE_NAME: &'static str;

    /// Encode to wire bytes
    fn to_wire(&self) -> ArkMsgsResult<Vec<u8>>;

    /// Decode from wire bytes
    fn from_wire(bytes: &[u8]) -> ArkMsgsResult<Self>;
}

/// Object-safe view over any [`Message`]
///
/// Blanket-implemented for every message type; used by the registry to hand
/// parsed payloads across a uniform boundary.
pub trait ErasedMessage: Send + Sync {
    /// The message's self-reported wire name
    fn type_name(&self) -> &'static str;

    /// Encode to wire bytes
    fn to_wire(&self) -> ArkMsgsResult<Vec<u8>>;

    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Message> ErasedMessage for T {
    fn type_name(&self) -> &'static str {
        T::TYPE_NAME
    }

    fn to_wire(&self) -> ArkMsgsResult<Vec<u8>> {
        Message::to_wire(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// A parsed message whose concrete type is only known at runtime
pub struct DynMessage(Box<dyn ErasedMessage>);

impl DynMessage {
    /// Erase a concrete message
    pub fn new<T: Message>(msg: T) -> Self {
        Self(Box::new(msg))
    }

    /// Wire name of the contained message
    pub fn type_name(&self) -> &'static str {
        self.0.type_name()
    }

    /// Re-encode the contained message to wire bytes
    pub fn to_wire(&self) -> ArkMsgsResult<Vec<u8>> {
        self.0.to_wire()
    }

    /// Check whether the contained message is a `T`
    pub fn is<T: Message>(&self) -> bool {
        self.0.as_any().is::<T>()
    }

    /// Borrow the contained message as a `T`, if it is one
    pub fn downcast_ref<T: Message>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref()
    }

    /// Take the contained message as a `T`, if it is one
    pub fn downcast<T: Message>(self) -> Option<T> {
        self.0.into_any().downcast::<T>().ok().map(|b| *b)
    }
}

impl fmt::Debug for DynMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DynMessage").field(&self.type_name()).finish()
    }
}

/// Implement [`Message`] for a serde type using the standard wire codec
///
/// The wire name must be globally unique; by convention it mirrors the
/// schema's fully qualified name (`"ark.JointState"`).
#[macro_export]
macro_rules! impl_wire_message {
    ($ty:ty, $name:literal) => {
        impl $crate::message::Message for $ty {
            const TYPE_NAME: &'static str = $name;

            fn to_wire(&self) -> $crate::error::ArkMsgsResult<Vec<u8>> {
                $crate::bincode::serialize(self)
                    .map_err(|e| $crate::error::ArkMsgsError::Serialization(e.to_string()))
            }

            fn from_wire(bytes: &[u8]) -> $crate::error::ArkMsgsResult<Self> {
                $crate::bincode::deserialize(bytes)
                    .map_err(|e| $crate::error::ArkMsgsError::Deserialization(e.to_string()))
            }
        }
    };
}
