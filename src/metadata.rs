use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::archive::SourceArchive;

/// Fabric loader metadata entry: a JSON object.
pub const FABRIC_METADATA: &str = "fabric.mod.json";
/// Forge loader metadata entry: a JSON array of mod descriptors.
pub const FORGE_METADATA: &str = "mcmod.info";

/// Which mod-loader ecosystem the archive targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    Fabric,
    Forge,
}

impl Flavor {
    pub fn as_str(self) -> &'static str {
        match self {
            Flavor::Fabric => "Fabric",
            Flavor::Forge => "Forge",
        }
    }
}

/// Dependency table. Fabric uses a name -> version-constraint map; some
/// mods ship a bare list of names instead.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Depends {
    Map(BTreeMap<String, Value>),
    List(Vec<String>),
}

/// The fields we read from a metadata entry. Everything is optional;
/// whatever is missing falls back to a default during synthesis.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModMetadata {
    pub id: Option<String>,
    pub modid: Option<String>,
    pub name: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "requires")]
    pub depends: Option<Depends>,
}

/// Outcome of scanning an archive for known metadata entries.
#[derive(Debug, Clone, Default)]
pub struct Detection {
    pub flavor: Option<Flavor>,
    pub metadata: ModMetadata,
    /// Mod id taken from the metadata, pre-sanitization.
    pub id: Option<String>,
}

/// Locate and parse mod metadata. A fabric.mod.json entry takes priority;
/// mcmod.info is only consulted when it is absent. An entry that is present
/// but does not parse with the expected shape is the no-metadata branch: it
/// yields no flavor and no id override, and is never an error.
pub fn detect(archive: &SourceArchive) -> Detection {
    if let Some(raw) = archive.read(FABRIC_METADATA) {
        match serde_json::from_slice::<Value>(raw) {
            Ok(value @ Value::Object(_)) => {
                let metadata = fields_of(value);
                let id = metadata.id.clone().filter(|id| !id.is_empty());
                debug!(?id, "detected Fabric metadata");
                return Detection {
                    flavor: Some(Flavor::Fabric),
                    metadata,
                    id,
                };
            }
            Ok(_) => warn!(entry = FABRIC_METADATA, "metadata is not a JSON object"),
            Err(error) => warn!(entry = FABRIC_METADATA, %error, "metadata is not valid JSON"),
        }
    } else if let Some(raw) = archive.read(FORGE_METADATA) {
        match serde_json::from_slice::<Value>(raw) {
            Ok(Value::Array(descriptors)) => {
                let metadata = descriptors
                    .into_iter()
                    .next()
                    .filter(Value::is_object)
                    .map(fields_of)
                    .unwrap_or_default();
                let id = metadata.modid.clone().filter(|id| !id.is_empty());
                debug!(?id, "detected Forge metadata");
                return Detection {
                    flavor: Some(Flavor::Forge),
                    metadata,
                    id,
                };
            }
            Ok(_) => warn!(entry = FORGE_METADATA, "metadata is not a JSON array"),
            Err(error) => warn!(entry = FORGE_METADATA, %error, "metadata is not valid JSON"),
        }
    }

    Detection::default()
}

/// Best-effort field extraction: a descriptor with unexpected field types
/// degrades to empty metadata rather than failing detection.
fn fields_of(value: Value) -> ModMetadata {
    serde_json::from_value(value).unwrap_or_default()
}
