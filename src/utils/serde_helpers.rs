// Serde helper modules for custom serialization/deserialization
//
// This module provides shared serialization utilities used across the crate.

/// Module for serializing Duration with serde
/// Use with #[serde(with = "crate::utils::serde_helpers::duration_serde")]
pub mod duration_serde {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(duration.num_seconds())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let seconds = i64::deserialize(deserializer)?;
        Ok(Duration::seconds(seconds))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct TestStruct {
        #[serde(with = "super::duration_serde")]
        duration: Duration,
    }

    #[test]
    fn test_duration_serialization() {
        let test = TestStruct {
            duration: Duration::seconds(3600),
        };

        let json = serde_json::to_string(&test).unwrap();
        assert_eq!(json, r#"{"duration":3600}"#);

        let deserialized: TestStruct = serde_json::from_str(&json).unwrap();
        assert_eq!(test, deserialized);
    }
}
