//! Trace and span identifiers.
//!
//! Both ids are fixed-size random byte strings rendered as lowercase hex. The
//! all-zero value is reserved as the "absent" sentinel on the wire and is never
//! produced by [`TraceId::new`] or [`SpanId::new`], nor accepted by the parsers.

use crate::error::{CoreError, Result};
use rand::RngCore;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

macro_rules! hex_id {
    ($(#[$meta:meta])* $name:ident, $len:expr, $sentinel:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name([u8; $len]);

        impl $name {
            /// Size of the id in raw bytes.
            pub const LEN: usize = $len;

            /// Wire rendering of an absent id.
            pub const INVALID_HEX: &'static str = $sentinel;

            /// Mint a fresh random id.
            pub fn new() -> Self {
                let mut rng = rand::thread_rng();
                let mut bytes = [0u8; $len];
                loop {
                    rng.fill_bytes(&mut bytes);
                    if bytes.iter().any(|b| *b != 0) {
                        return Self(bytes);
                    }
                }
            }

            /// Wrap raw bytes. Returns `None` for the all-zero sentinel.
            pub fn from_bytes(bytes: [u8; $len]) -> Option<Self> {
                if bytes.iter().all(|b| *b == 0) {
                    None
                } else {
                    Some(Self(bytes))
                }
            }

            /// Parse the lowercase or uppercase hex rendering.
            pub fn from_hex(s: &str) -> Result<Self> {
                if s.len() != $len * 2 {
                    return Err(CoreError::InvalidId(format!(
                        "{} must be {} hex characters, got {}",
                        stringify!($name),
                        $len * 2,
                        s.len()
                    )));
                }
                let mut bytes = [0u8; $len];
                hex::decode_to_slice(s, &mut bytes)?;
                Self::from_bytes(bytes).ok_or_else(|| {
                    CoreError::InvalidId(format!("{} is the all-zero sentinel", stringify!($name)))
                })
            }

            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.to_hex())
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self> {
                Self::from_hex(s)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Self::from_hex(&s).map_err(de::Error::custom)
            }
        }
    };
}

hex_id!(
    /// 16-byte identifier of one logical end-to-end operation.
    TraceId,
    16,
    "00000000000000000000000000000000"
);

hex_id!(
    /// 8-byte identifier of one step within a trace.
    SpanId,
    8,
    "0000000000000000"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ids_render_fixed_width_lowercase_hex() {
        let tid = TraceId::new();
        let sid = SpanId::new();

        assert_eq!(tid.to_string().len(), 32);
        assert_eq!(sid.to_string().len(), 16);
        assert!(tid.to_string().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(tid.to_string(), TraceId::INVALID_HEX);
    }

    #[test]
    fn test_from_hex_rejects_sentinel_and_bad_length() {
        assert!(TraceId::from_hex(TraceId::INVALID_HEX).is_err());
        assert!(SpanId::from_hex(SpanId::INVALID_HEX).is_err());
        assert!(SpanId::from_hex("abc").is_err());
        assert!(SpanId::from_hex("zzzzzzzzzzzzzzzz").is_err());
    }

    #[test]
    fn test_from_bytes_sentinel_is_none() {
        assert!(TraceId::from_bytes([0; 16]).is_none());
        let sid = SpanId::from_bytes([0, 0, 0, 0, 0, 0, 0, 1]).unwrap();
        assert_eq!(sid.to_hex(), "0000000000000001");
    }

    #[test]
    fn test_serde_uses_hex_string() {
        let tid = TraceId::from_hex("0af7651916cd43dd8448eb211c80319c").unwrap();
        let json = serde_json::to_string(&tid).unwrap();
        assert_eq!(json, "\"0af7651916cd43dd8448eb211c80319c\"");

        let back: TraceId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tid);
    }
}
