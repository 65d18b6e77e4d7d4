//! Serde support for [`Failure`] (feature-gated)
//!
//! A `Failure` serializes as its message. Deserialization re-checks the
//! non-empty invariant, so `""` is rejected.
//!
//! ```rust,ignore
//! use upshot::Outcome;
//!
//! let ok: Outcome<i32> = serde_json::from_str(r#"{"Success":5}"#).unwrap();
//! let failed: Outcome<i32> = serde_json::from_str(r#"{"Failure":"boom"}"#).unwrap();
//!
//! let bad: Result<Outcome<i32>, _> = serde_json::from_str(r#"{"Failure":""}"#);
//! assert!(bad.is_err());
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::Failure;

impl Serialize for Failure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.message())
    }
}

impl<'de> Deserialize<'de> for Failure {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let message = String::deserialize(deserializer)?;
        Failure::try_new(message).map_err(serde::de::Error::custom)
    }
}
