//! Chart detail record returned by the controller

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rudder_core::{ChartMetadata, Values};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Everything needed to present or install one chart version
///
/// Binary payloads (`values_raw`, template bodies) serialize as standard
/// base64 strings. `chart_url` and `chart_file` are for local use and are
/// not serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDetail {
    /// Decoded `Chart.yaml`
    pub metadata: ChartMetadata,

    /// Raw `values.yaml`
    #[serde(with = "base64_bytes")]
    pub values_raw: Vec<u8>,

    /// Decoded `values.yaml`
    pub values: Values,

    /// Template files keyed by their path below `templates/`
    #[serde(with = "base64_map")]
    pub templates: BTreeMap<String, Vec<u8>>,

    /// URL the archive was downloaded from
    #[serde(skip)]
    pub chart_url: String,

    /// Cache file holding the archive
    #[serde(skip)]
    pub chart_file: PathBuf,
}

impl ChartDetail {
    /// Template body as UTF-8 text, if it is valid UTF-8
    pub fn template_text(&self, name: &str) -> Option<&str> {
        self.templates
            .get(name)
            .and_then(|data| std::str::from_utf8(data).ok())
    }
}

mod base64_bytes {
    use super::*;

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

mod base64_map {
    use super::*;

    pub fn serialize<S: Serializer>(
        map: &BTreeMap<String, Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let encoded: BTreeMap<&str, String> = map
            .iter()
            .map(|(k, v)| (k.as_str(), STANDARD.encode(v)))
            .collect();
        encoded.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<String, Vec<u8>>, D::Error> {
        let encoded = BTreeMap::<String, String>::deserialize(deserializer)?;
        encoded
            .into_iter()
            .map(|(k, v)| {
                STANDARD
                    .decode(v.as_bytes())
                    .map(|data| (k, data))
                    .map_err(serde::de::Error::custom)
            })
            .collect()
    }
}
