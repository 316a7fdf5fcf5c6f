use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::error::EvoError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Generator seed. `None` seeds from the operating system.
    pub seed: Option<u64>,
}

impl ConfigSection for RunConfig {
    fn section_name() -> &'static str {
        "run"
    }

    fn validate(&self) -> Result<(), EvoError> {
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Run".to_string(),
            fields: vec![FieldManifest::new(
                "seed",
                "integer",
                serde_json::Value::Null,
                Some(0.0),
                None,
                "Random seed; leave unset for a fresh seed each run",
            )],
        }
    }
}
