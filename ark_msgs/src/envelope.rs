//! Self-describing envelope protocol
//!
//! An [`Envelope`] carries a type-tagged opaque payload plus timing metadata
//! across the bus. A receiver resolves the tag through the type registry and
//! recovers the typed message without compile-time knowledge of the sender's
//! schema. Extraction never mutates the envelope; the transport layer is the
//! only writer of `recv_timestamp`, and only once on receipt.

use serde::{Deserialize, Serialize};

use crate::error::{ArkMsgsError, ArkMsgsResult};
use crate::message::DynMessage;
use crate::registry::{msgs, MessageFactory, TypeRegistry};

/// Wire wrapper carrying a type tag, opaque payload and timing metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Registry key naming the payload's concrete type
    pub msg_type: String,
    /// Opaque payload bytes, encoded by the named type
    pub payload: Vec<u8>,
    /// Send time in monotonic ticks; 0 means unset
    pub sent_timestamp: i64,
    /// Receipt time stamped by the transport; 0 means unset
    pub recv_timestamp: i64,
    /// Originating request, set on response envelopes for correlation
    pub req_env: Option<Box<Envelope>>,
}

/// Result of resolving an envelope payload through the registry
#[derive(Debug)]
pub enum Extracted {
    /// Payload carried under the `__bytes__` sentinel, returned verbatim
    Bytes(Vec<u8>),
    /// Typed message reconstructed by the registered factory
    Message(DynMessage),
}

impl Extracted {
    /// Take the raw payload, if this was a sentinel extraction
    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            Extracted::Bytes(bytes) => Some(bytes),
            Extracted::Message(_) => None,
        }
    }

    /// Take the typed message, if one was parsed
    pub fn into_message(self) -> Option<DynMessage> {
        match self {
            Extracted::Bytes(_) => None,
            Extracted::Message(msg) => Some(msg),
        }
    }
}

impl Envelope {
    /// Create an outgoing envelope with both timestamps unset
    pub fn new(msg_type: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            msg_type: msg_type.into(),
            payload,
            ..Default::default()
        }
    }

    /// Recover the typed payload via the process-global registry
    ///
    /// Fails with [`ArkMsgsError::UnknownType`] when `msg_type` was never
    /// registered and [`ArkMsgsError::Deserialization`] when the payload is
    /// not a valid encoding of the resolved type.
    pub fn extract_message(&self) -> ArkMsgsResult<Extracted> {
        self.extract_message_with(msgs())
    }

    /// Recover the typed payload via an explicit registry
    pub fn extract_message_with(&self, registry: &TypeRegistry) -> ArkMsgsResult<Extracted> {
        match registry.resolve(&self.msg_type)? {
            MessageFactory::Bytes => Ok(Extracted::Bytes(self.payload.clone())),
            MessageFactory::Typed { parse, .. } => Ok(Extracted::Message(parse(&self.payload)?)),
        }
    }

    /// Recover the typed payload of the nested request envelope
    ///
    /// Used on response envelopes to correlate back to the originating
    /// request. Fails with [`ArkMsgsError::MissingRequest`] when no request
    /// envelope is attached.
    pub fn extract_request_message(&self) -> ArkMsgsResult<Extracted> {
        self.extract_request_message_with(msgs())
    }

    /// Recover the nested request payload via an explicit registry
    pub fn extract_request_message_with(&self, registry: &TypeRegistry) -> ArkMsgsResult<Extracted> {
        match &self.req_env {
            Some(req) => req.extract_message_with(registry),
            None => Err(ArkMsgsError::MissingRequest),
        }
    }

    /// One-way latency in ticks: `recv_timestamp - sent_timestamp`
    ///
    /// Fails with [`ArkMsgsError::TimestampNotSet`] while either timestamp
    /// is the unset sentinel (0). Failure, not a default, is the contract:
    /// a meaningless zero or negative latency is never returned silently.
    pub fn one_way_latency(&self) -> ArkMsgsResult<i64> {
        if self.sent_timestamp == 0 {
            return Err(ArkMsgsError::TimestampNotSet("sent"));
        }
        if self.recv_timestamp == 0 {
            return Err(ArkMsgsError::TimestampNotSet("recv"));
        }
        Ok(self.recv_timestamp - self.sent_timestamp)
    }
}

crate::impl_wire_message!(Envelope, "ark.Envelope");
