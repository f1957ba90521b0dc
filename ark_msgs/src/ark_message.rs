//! Top-level message packing
//!
//! [`ArkMessage`] binds an arbitrary outgoing message to a send timestamp and
//! its registry-resolvable wire name. It only stamps and wraps; resolving the
//! payload's concrete type at the receiving end is
//! [`crate::envelope::Envelope::extract_message`]'s job.

use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::error::ArkMsgsResult;
use crate::message::Message;

/// Generic timestamped wrapper for an outgoing message
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArkMessage {
    /// Send time read from the injected clock
    pub timestamp: i64,
    /// Wire name of the wrapped payload
    pub payload_msg_type: String,
    /// Payload encoded by its own type
    pub payload: Vec<u8>,
}

impl ArkMessage {
    /// Stamp and wrap an outgoing message
    ///
    /// The only failure mode is the payload's own serialization.
    pub fn pack<M: Message>(clock: &dyn Clock, msg: &M) -> ArkMsgsResult<Self> {
        Ok(Self {
            timestamp: clock.now(),
            payload_msg_type: M::TYPE_NAME.to_string(),
            payload: msg.to_wire()?,
        })
    }

    /// Parse raw transport bytes into a wrapped message
    pub fn from_received(bytes: &[u8]) -> ArkMsgsResult<Self> {
        Self::from_wire(bytes)
    }
}

crate::impl_wire_message!(ArkMessage, "ark.ArkMessage");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::error::ArkMsgsError;
    use crate::joint_state::JointState;

    #[test]
    fn test_pack_stamps_and_wraps() {
        let msg = JointState::single("elbow", 1.2, 0.0, 0.0);
        let packed = ArkMessage::pack(&FixedClock(42), &msg).unwrap();

        assert_eq!(packed.timestamp, 42);
        assert_eq!(packed.payload_msg_type, "ark.JointState");
        assert_eq!(packed.payload, msg.to_wire().unwrap());
    }

    #[test]
    fn test_from_received_roundtrip() {
        let packed = ArkMessage::pack(&FixedClock(7), &JointState::default()).unwrap();
        let bytes = packed.to_wire().unwrap();

        assert_eq!(ArkMessage::from_received(&bytes).unwrap(), packed);
    }

    #[test]
    fn test_from_received_malformed_fails() {
        let err = ArkMessage::from_received(&[0xba, 0xad]).unwrap_err();
        assert!(matches!(err, ArkMsgsError::Deserialization(_)));
    }
}
