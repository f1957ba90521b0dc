//! # ark_msgs
//!
//! Message-definition layer for the ARK robotics pub/sub bus.
//!
//! This crate provides the pieces a node needs to describe, tag and recover
//! typed messages crossing the bus, plus the spatial pose algebra shared by
//! every frame-aware message:
//!
//! - **Type registry**: process-wide mapping from a globally unique wire
//!   name to a factory reconstructing the typed message from bytes
//! - **Envelope protocol**: self-describing wrapper carrying a type tag,
//!   opaque payload and timing metadata
//! - **ArkMessage packing**: stamping an outgoing message with a send
//!   timestamp and its registry-resolvable name
//! - **Pose algebra**: `Rotation`, `Translation` and `RigidTransform` with
//!   interchangeable parameterizations and group operations
//!
//! Transport and schema compilation live elsewhere: the bus delivers raw
//! bytes and stamps receipt times, and message types only need to satisfy
//! the [`Message`] contract (wire name, encode, decode).
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ark_msgs::prelude::*;
//!
//! // Sender: stamp and wrap
//! let js = JointState::single("elbow", 0.4, 0.0, 0.0);
//! let packed = ArkMessage::pack(&SystemClock, &js)?;
//!
//! // Receiver: recover the typed payload off an envelope
//! match envelope.extract_message()? {
//!     Extracted::Message(msg) => {
//!         if let Some(js) = msg.downcast_ref::<JointState>() {
//!             println!("elbow at {:?}", js.position("elbow"));
//!         }
//!     }
//!     Extracted::Bytes(raw) => println!("{} raw bytes", raw.len()),
//! }
//! ```

pub mod ark_message;
pub mod clock;
pub mod envelope;
pub mod error;
pub mod joint_state;
pub mod message;
pub mod pose;
pub mod registry;

// Re-exported for the wire-message macro
pub use bincode;

pub use ark_message::ArkMessage;
pub use clock::{timestamp_now, Clock, FixedClock, SystemClock};
pub use envelope::{Envelope, Extracted};
pub use error::{ArkMsgsError, ArkMsgsResult};
pub use joint_state::JointState;
pub use message::{DynMessage, Message};
pub use pose::{AngleOrder, RigidTransform, Rotation, Translation};
pub use registry::{msgs, MessageFactory, TypeRegistry, BYTES_TYPE_NAME};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ark_message::ArkMessage;
    pub use crate::clock::{Clock, FixedClock, SystemClock};
    pub use crate::envelope::{Envelope, Extracted};
    pub use crate::error::{ArkMsgsError, ArkMsgsResult};
    pub use crate::joint_state::JointState;
    pub use crate::message::{DynMessage, Message};
    pub use crate::pose::{AngleOrder, RigidTransform, Rotation, Translation};
    pub use crate::registry::{msgs, TypeRegistry, BYTES_TYPE_NAME};
}
