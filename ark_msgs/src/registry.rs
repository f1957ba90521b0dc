//! Process-wide message type registry
//!
//! Maps a globally unique wire name to a factory capable of reconstructing
//! the typed message from payload bytes. Registration is write-once-per-name
//! behind a lock; `resolve` is safe for unsynchronized concurrent readers.
//!
//! The process-global instance ([`msgs`]) is created lazily on first use with
//! every built-in message type already registered, the Rust equivalent of
//! registering schemas at module import time. It lives for the process
//! lifetime and is never reset.

use std::collections::HashMap;
use std::sync::OnceLock;

use log::debug;
use parking_lot::RwLock;

use crate::error::{ArkMsgsError, ArkMsgsResult};
use crate::message::{DynMessage, Message};

/// Reserved wire name for raw byte payloads
///
/// Envelopes tagged with this name carry their payload through unparsed,
/// for consumers with no schema.
pub const BYTES_TYPE_NAME: &str = "__bytes__";

type ParseFn = fn(&[u8]) -> ArkMsgsResult<DynMessage>;

/// Resolved registry entry
#[derive(Debug, Clone, Copy)]
pub enum MessageFactory {
    /// Sentinel: pass the payload through unparsed
    Bytes,
    /// Reconstruct a typed message from wire bytes
    Typed {
        /// Canonical wire name of the produced type
        type_name: &'static str,
        /// Construction closure decoding payload bytes
        parse: ParseFn,
    },
}

impl MessageFactory {
    /// Factory for a concrete message type
    pub fn typed<T: Message>() -> Self {
        Self::Typed {
            type_name: T::TYPE_NAME,
            parse: parse_into::<T>,
        }
    }
}

fn parse_into<T: Message>(bytes: &[u8]) -> ArkMsgsResult<DynMessage> {
    Ok(DynMessage::new(T::from_wire(bytes)?))
}

/// Name-to-factory table resolving payload types at receive time
///
/// Duplicate names are rejected: the first registration for a name wins and
/// a second attempt fails with [`ArkMsgsError::DuplicateRegistration`].
pub struct TypeRegistry {
    entries: RwLock<HashMap<String, MessageFactory>>,
}

impl TypeRegistry {
    /// Create a registry with the `__bytes__` sentinel pre-registered
    pub fn new() -> Self {
        let mut entries = HashMap::new();
        entries.insert(BYTES_TYPE_NAME.to_string(), MessageFactory::Bytes);
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Register a message type under its own canonical wire name
    ///
    /// Reading the name from the type itself guarantees the registry key
    /// always matches the type's self-reported identity.
    pub fn register<T: Message>(&self) -> ArkMsgsResult<()> {
        self.register_with_name(T::TYPE_NAME, MessageFactory::typed::<T>())
    }

    /// Register a factory under an explicit name
    pub fn register_with_name(&self, name: &str, factory: MessageFactory) -> ArkMsgsResult<()> {
        let mut entries = self.entries.write();
        if entries.contains_key(name) {
            return Err(ArkMsgsError::DuplicateRegistration(name.to_string()));
        }
        entries.insert(name.to_string(), factory);
        debug!("registered message type '{}'", name);
        Ok(())
    }

    /// Look up the factory for a wire name
    pub fn resolve(&self, name: &str) -> ArkMsgsResult<MessageFactory> {
        self.entries
            .read()
            .get(name)
            .copied()
            .ok_or_else(|| ArkMsgsError::UnknownType(name.to_string()))
    }

    /// Check whether a name is registered
    pub fn is_registered(&self, name: &str) -> bool {
        self.entries.read().contains_key(name)
    }

    /// All registered wire names
    pub fn registered_names(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }

    /// Number of registered names, sentinel included
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-global registry with the built-in ARK message types registered
pub fn msgs() -> &'static TypeRegistry {
    static MSGS: OnceLock<TypeRegistry> = OnceLock::new();
    MSGS.get_or_init(|| {
        let registry = TypeRegistry::new();
        // Built-in wire types; a fresh registry cannot hold duplicates.
        registry
            .register::<crate::envelope::Envelope>()
            .expect("builtin registration");
        registry
            .register::<crate::ark_message::ArkMessage>()
            .expect("builtin registration");
        registry
            .register::<crate::joint_state::JointState>()
            .expect("builtin registration");
        registry
            .register::<crate::pose::Rotation>()
            .expect("builtin registration");
        registry
            .register::<crate::pose::Translation>()
            .expect("builtin registration");
        registry
            .register::<crate::pose::RigidTransform>()
            .expect("builtin registration");
        registry
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Heartbeat {
        seq: u64,
    }

    crate::impl_wire_message!(Heartbeat, "ark.test.Heartbeat");

    #[test]
    fn test_register_resolve() {
        let registry = TypeRegistry::new();
        registry.register::<Heartbeat>().unwrap();

        let factory = registry.resolve("ark.test.Heartbeat").unwrap();
        let bytes = Heartbeat { seq: 9 }.to_wire().unwrap();
        match factory {
            MessageFactory::Typed { type_name, parse } => {
                assert_eq!(type_name, "ark.test.Heartbeat");
                let msg = parse(&bytes).unwrap();
                assert_eq!(msg.downcast::<Heartbeat>().unwrap().seq, 9);
            }
            MessageFactory::Bytes => panic!("expected typed factory"),
        }
    }

    #[test]
    fn test_unknown_name_fails() {
        let registry = TypeRegistry::new();
        let err = registry.resolve("ark.test.Nothing").unwrap_err();
        assert!(matches!(err, ArkMsgsError::UnknownType(name) if name == "ark.test.Nothing"));
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let registry = TypeRegistry::new();
        registry.register::<Heartbeat>().unwrap();
        let err = registry.register::<Heartbeat>().unwrap_err();
        assert!(matches!(err, ArkMsgsError::DuplicateRegistration(_)));
    }

    #[test]
    fn test_bytes_sentinel_preregistered() {
        let registry = TypeRegistry::new();
        assert!(registry.is_registered(BYTES_TYPE_NAME));
        assert!(matches!(
            registry.resolve(BYTES_TYPE_NAME).unwrap(),
            MessageFactory::Bytes
        ));
    }

    #[test]
    fn test_global_registry_has_builtins() {
        let registry = msgs();
        assert!(registry.is_registered(BYTES_TYPE_NAME));
        assert!(registry.is_registered("ark.Envelope"));
        assert!(registry.is_registered("ark.ArkMessage"));
        assert!(registry.is_registered("ark.JointState"));
        assert!(registry.is_registered("ark.Rotation"));
        assert!(registry.is_registered("ark.Translation"));
        assert!(registry.is_registered("ark.RigidTransform"));
    }
}
