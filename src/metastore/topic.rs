use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

/// Serialization format of a record key or value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Format {
    Kafka,
    Json,
    Avro,
    Delimited,
    Protobuf,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "KAFKA" => Ok(Format::Kafka),
            "JSON" => Ok(Format::Json),
            "AVRO" => Ok(Format::Avro),
            "DELIMITED" => Ok(Format::Delimited),
            "PROTOBUF" => Ok(Format::Protobuf),
            other => Err(format!("Unknown format: {}", other)),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Kafka => "KAFKA",
            Format::Json => "JSON",
            Format::Avro => "AVRO",
            Format::Delimited => "DELIMITED",
            Format::Protobuf => "PROTOBUF",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WindowType {
    Tumbling,
    Hopping,
    Session,
}

/// Window carried by a windowed key. Session windows have no fixed size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowInfo {
    pub window_type: WindowType,
    pub size: Option<Duration>,
}

impl WindowInfo {
    pub fn new(window_type: WindowType, size: Option<Duration>) -> Self {
        Self { window_type, size }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyFormat {
    pub format: Format,
    pub window: Option<WindowInfo>,
}

impl KeyFormat {
    pub fn non_windowed(format: Format) -> Self {
        Self { format, window: None }
    }

    pub fn windowed(format: Format, window: WindowInfo) -> Self {
        Self { format, window: Some(window) }
    }

    /// True when every key carries a window boundary.
    pub fn is_windowed(&self) -> bool {
        self.window.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValueFormat {
    pub format: Format,
}

impl ValueFormat {
    pub fn of(format: Format) -> Self {
        Self { format }
    }
}

/// The Kafka topic backing a source or sink, with its key and value formats.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KsqlTopic {
    pub kafka_topic_name: String,
    pub key_format: KeyFormat,
    pub value_format: ValueFormat,
}

impl KsqlTopic {
    pub fn new(kafka_topic_name: impl Into<String>, key_format: KeyFormat, value_format: ValueFormat) -> Self {
        Self { kafka_topic_name: kafka_topic_name.into(), key_format, value_format }
    }
}
