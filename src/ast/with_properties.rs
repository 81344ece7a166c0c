use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{analyzer::AnalyzerError, metastore::{ColumnName, Format}};

pub const KAFKA_TOPIC_PROPERTY: &str = "KAFKA_TOPIC";
pub const VALUE_FORMAT_PROPERTY: &str = "VALUE_FORMAT";
pub const PARTITIONS_PROPERTY: &str = "PARTITIONS";
pub const REPLICAS_PROPERTY: &str = "REPLICAS";
pub const TIMESTAMP_PROPERTY: &str = "TIMESTAMP";
pub const TIMESTAMP_FORMAT_PROPERTY: &str = "TIMESTAMP_FORMAT";
pub const WRAP_SINGLE_VALUE_PROPERTY: &str = "WRAP_SINGLE_VALUE";

static KAFKA_TOPIC_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._-]{1,249}$").expect("topic name pattern must compile")
});

/// Properties from the `WITH (...)` clause of a `CREATE ... AS SELECT`.
///
/// Keys are upper-cased; only recognised keys with well-shaped values are
/// accepted. Values are kept as JSON so the properties can be stored and
/// forwarded verbatim to the sink layer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "IndexMap<String, Value>", into = "IndexMap<String, Value>")]
pub struct CreateSourceAsProperties {
    props: IndexMap<String, Value>,
}

impl CreateSourceAsProperties {
    /// No properties at all.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_map<K: AsRef<str>>(map: impl IntoIterator<Item = (K, Value)>) -> Result<Self, AnalyzerError> {
        let mut props = IndexMap::new();
        for (key, value) in map {
            let key = key.as_ref().to_uppercase();
            Self::validate(&key, &value)?;
            props.insert(key, value);
        }
        Ok(Self { props })
    }

    /// Build from a JSON object, e.g. `{"kafka_topic": "out", "partitions": 4}`.
    pub fn from_json(value: &Value) -> Result<Self, AnalyzerError> {
        match value {
            Value::Object(map) => Self::from_map(map.iter().map(|(k, v)| (k.as_str(), v.clone()))),
            other => Err(AnalyzerError::InvalidProperty {
                name: "WITH".into(),
                reason: format!("expected an object of properties, got {}", other),
            }),
        }
    }

    fn validate(key: &str, value: &Value) -> Result<(), AnalyzerError> {
        let invalid = |reason: String| AnalyzerError::InvalidProperty { name: key.to_string(), reason };

        match key {
            KAFKA_TOPIC_PROPERTY => {
                let topic = value.as_str().ok_or_else(|| invalid("expected a string".into()))?;
                if !KAFKA_TOPIC_NAME.is_match(topic) || topic == "." || topic == ".." {
                    return Err(invalid(format!("illegal topic name '{}'", topic)));
                }
            }
            VALUE_FORMAT_PROPERTY => {
                let format = value.as_str().ok_or_else(|| invalid("expected a string".into()))?;
                format.parse::<Format>().map_err(invalid)?;
            }
            PARTITIONS_PROPERTY => {
                match value.as_u64() {
                    Some(n) if n > 0 && n <= u32::MAX as u64 => {}
                    _ => return Err(invalid("expected a positive integer".into())),
                }
            }
            REPLICAS_PROPERTY => {
                match value.as_u64() {
                    Some(n) if n > 0 && n <= u16::MAX as u64 => {}
                    _ => return Err(invalid("expected a positive integer".into())),
                }
            }
            TIMESTAMP_PROPERTY => {
                match value.as_str() {
                    Some(column) if !column.trim().is_empty() => {}
                    _ => return Err(invalid("expected a column name".into())),
                }
            }
            TIMESTAMP_FORMAT_PROPERTY => {
                value.as_str().ok_or_else(|| invalid("expected a string".into()))?;
            }
            WRAP_SINGLE_VALUE_PROPERTY => {
                value.as_bool().ok_or_else(|| invalid("expected a boolean".into()))?;
            }
            _ => return Err(invalid("unknown property".into())),
        }

        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.props.get(&key.to_uppercase())
    }

    pub fn kafka_topic(&self) -> Option<&str> {
        self.get(KAFKA_TOPIC_PROPERTY).and_then(Value::as_str)
    }

    pub fn value_format(&self) -> Option<Format> {
        self.get(VALUE_FORMAT_PROPERTY)
            .and_then(Value::as_str)
            .and_then(|f| f.parse().ok())
    }

    pub fn partitions(&self) -> Option<u32> {
        self.get(PARTITIONS_PROPERTY)
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
    }

    pub fn replicas(&self) -> Option<u16> {
        self.get(REPLICAS_PROPERTY)
            .and_then(Value::as_u64)
            .and_then(|n| u16::try_from(n).ok())
    }

    pub fn timestamp_column(&self) -> Option<ColumnName> {
        self.get(TIMESTAMP_PROPERTY).and_then(Value::as_str).map(ColumnName::of)
    }

    pub fn timestamp_format(&self) -> Option<&str> {
        self.get(TIMESTAMP_FORMAT_PROPERTY).and_then(Value::as_str)
    }

    pub fn wrap_single_values(&self) -> Option<bool> {
        self.get(WRAP_SINGLE_VALUE_PROPERTY).and_then(Value::as_bool)
    }
}

impl TryFrom<IndexMap<String, Value>> for CreateSourceAsProperties {
    type Error = AnalyzerError;

    fn try_from(map: IndexMap<String, Value>) -> Result<Self, Self::Error> {
        Self::from_map(map)
    }
}

impl From<CreateSourceAsProperties> for IndexMap<String, Value> {
    fn from(props: CreateSourceAsProperties) -> Self {
        props.props
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_none_is_empty() {
        let props = CreateSourceAsProperties::none();
        assert!(props.is_empty());
        assert_eq!(props.kafka_topic(), None);
        assert_eq!(props.partitions(), None);
    }

    #[test]
    fn test_typed_getters() {
        let props = CreateSourceAsProperties::from_json(&json!({
            "kafka_topic": "orders_out",
            "value_format": "avro",
            "partitions": 4,
            "replicas": 3,
            "timestamp": "event_ts",
            "timestamp_format": "yyyy-MM-dd",
            "wrap_single_value": false
        })).unwrap();

        assert_eq!(props.kafka_topic(), Some("orders_out"));
        assert_eq!(props.value_format(), Some(Format::Avro));
        assert_eq!(props.partitions(), Some(4));
        assert_eq!(props.replicas(), Some(3));
        assert_eq!(props.timestamp_column(), Some(ColumnName::of("EVENT_TS")));
        assert_eq!(props.timestamp_format(), Some("yyyy-MM-dd"));
        assert_eq!(props.wrap_single_values(), Some(false));
    }

    #[test]
    fn test_unknown_property_rejected() {
        let err = CreateSourceAsProperties::from_json(&json!({"colour": "blue"})).unwrap_err();
        assert_eq!(err, AnalyzerError::InvalidProperty { name: "COLOUR".into(), reason: "unknown property".into() });
    }

    #[test]
    fn test_illegal_topic_name_rejected() {
        for topic in ["bad topic!", ".", ".."] {
            let err = CreateSourceAsProperties::from_json(&json!({"kafka_topic": topic})).unwrap_err();
            match err {
                AnalyzerError::InvalidProperty { name, .. } => assert_eq!(name, "KAFKA_TOPIC"),
                other => panic!("unexpected error for {:?}: {:?}", topic, other),
            }
        }
        assert!(CreateSourceAsProperties::from_json(&json!({"kafka_topic": "..orders"})).is_ok());
    }

    #[test]
    fn test_bad_value_shapes_rejected() {
        assert!(CreateSourceAsProperties::from_json(&json!({"partitions": 0})).is_err());
        assert!(CreateSourceAsProperties::from_json(&json!({"partitions": "4"})).is_err());
        assert!(CreateSourceAsProperties::from_json(&json!({"replicas": 70000})).is_err());
        assert!(CreateSourceAsProperties::from_json(&json!({"value_format": "xml"})).is_err());
        assert!(CreateSourceAsProperties::from_json(&json!({"wrap_single_value": "yes"})).is_err());
        assert!(CreateSourceAsProperties::from_json(&json!({"timestamp": " "})).is_err());
        assert!(CreateSourceAsProperties::from_json(&json!(["kafka_topic"])).is_err());
    }

    #[test]
    fn test_serde_round_trip_validates() {
        let props = CreateSourceAsProperties::from_json(&json!({"KAFKA_TOPIC": "t1", "PARTITIONS": 2})).unwrap();
        let text = serde_json::to_string(&props).unwrap();
        assert_eq!(text, r#"{"KAFKA_TOPIC":"t1","PARTITIONS":2}"#);

        let back: CreateSourceAsProperties = serde_json::from_str(&text).unwrap();
        assert_eq!(back, props);

        let bad: Result<CreateSourceAsProperties, _> = serde_json::from_str(r#"{"NOPE": 1}"#);
        assert!(bad.is_err());
    }
}
