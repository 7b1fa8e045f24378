use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::time::Duration;

/// Connection settings handed to [`FtpClient::connect`](crate::FtpClient::connect)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectOptions {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Negotiate TLS on the control connection
    pub secure: bool,
    /// Passed to the transport once, at connection time. Seconds when serialized.
    #[serde(with = "seconds")]
    pub timeout: Duration,
    pub passive: bool,
    /// Deepest directory level a recursive operation will enter
    pub max_depth: usize,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            host: "localhost".to_owned(),
            port: 21,
            username: "anonymous".to_owned(),
            password: String::new(),
            secure: false,
            timeout: Duration::from_secs(90),
            passive: true,
            max_depth: 256,
        }
    }
}

mod seconds {
    use super::{Deserialize, Deserializer, Duration, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
