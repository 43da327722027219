use serde::Serialize;
use tracing::debug;

use crate::{
    archive::{OutputArchive, SourceArchive},
    classify::{default_mod_id, relocate_entries, sanitize_id, BucketCounts},
    error::ConvertError,
    metadata::{detect, Flavor},
};

/// Runtime API the converted layout targets.
pub const TARGET_API: &str = "EaglerAPI";
const TARGET_API_VERSION: &str = "1.0.0";
const OUTPUT_SUFFIX: &str = "_EaglerConverted.zip";

const REPORT_NOTES: [&str; 2] = [
    "Classes are kept under classes/ for manual porting",
    "mod.js is a stub for your EaglerJS logic",
];

const API_PLACEHOLDER: &str =
    "// Minimal placeholder for EaglerAPI. Launcher provides full API.";

/// Result of one conversion: the output blob plus what a caller needs to
/// report on it without reopening the archive.
#[derive(Debug)]
pub struct Conversion {
    pub mod_id: String,
    pub flavor: Option<Flavor>,
    pub counts: BucketCounts,
    /// Suggested output file name, `<mod_id>_EaglerConverted.zip`.
    pub file_name: String,
    pub blob: Vec<u8>,
}

#[derive(Serialize)]
struct ModDescriptor<'a> {
    id: &'a str,
    name: &'a str,
    version: &'a str,
    description: &'a str,
    requires: Vec<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConversionReport<'a> {
    mod_id: &'a str,
    original_name: &'a str,
    counts: BucketCounts,
    notes: [&'a str; 2],
}

#[derive(Serialize)]
struct ApiManifest<'a> {
    name: &'a str,
    version: &'a str,
}

/// Convert one mod archive into the EaglerAPI folder layout.
///
/// Fails only when `source_bytes` is not a usable zip container. Missing or
/// malformed metadata never fails a conversion; it falls back to an id
/// derived from `source_name` and default descriptor fields.
pub fn convert(source_name: &str, source_bytes: &[u8]) -> Result<Conversion, ConvertError> {
    let source = SourceArchive::open(source_bytes)?;

    let detection = detect(&source);
    let candidate = match &detection.id {
        Some(id) => id.clone(),
        None => default_mod_id(source_name),
    };
    let mod_id = sanitize_id(&candidate);
    debug!(
        %mod_id,
        flavor = detection.flavor.map(Flavor::as_str).unwrap_or("none"),
        "identified mod"
    );

    let files: Vec<_> = source.files().collect();
    let (relocated, counts) = relocate_entries(&mod_id, &files);

    let mut out = OutputArchive::new();
    out.extend(relocated);

    let requires_api = detection.flavor.is_some();
    let descriptor = ModDescriptor {
        id: &mod_id,
        name: detection.metadata.name.as_deref().unwrap_or(&mod_id),
        version: detection.metadata.version.as_deref().unwrap_or("converted"),
        description: detection.metadata.description.as_deref().unwrap_or(""),
        requires: if requires_api { vec![TARGET_API] } else { vec![] },
    };
    out.push(
        format!("{mod_id}/mod.json"),
        serde_json::to_vec_pretty(&descriptor)?,
    );

    out.push(
        format!("{mod_id}/mod.js"),
        runtime_stub(&mod_id, requires_api).into_bytes(),
    );

    let report = ConversionReport {
        mod_id: &mod_id,
        original_name: source_name,
        counts,
        notes: REPORT_NOTES,
    };
    out.push(
        format!("{mod_id}/conversion_report.json"),
        serde_json::to_vec_pretty(&report)?,
    );

    // Mods that targeted a loader API get a placeholder shim tree; the
    // launcher is expected to supply the real thing.
    if requires_api {
        let manifest = ApiManifest {
            name: TARGET_API,
            version: TARGET_API_VERSION,
        };
        out.push(
            format!("{mod_id}/eaglerapi/manifest.json"),
            serde_json::to_vec_pretty(&manifest)?,
        );
        out.push(
            format!("{mod_id}/eaglerapi/api.js"),
            API_PLACEHOLDER.as_bytes().to_vec(),
        );
    }

    let blob = out.into_blob()?;

    Ok(Conversion {
        file_name: format!("{mod_id}{OUTPUT_SUFFIX}"),
        mod_id,
        flavor: detection.flavor,
        counts,
        blob,
    })
}

/// Self-invoking stub executed by the target runtime, not by us: warns when
/// the API shim is required but absent, and registers an init callback when
/// the shim's hook is available.
fn runtime_stub(mod_id: &str, requires_api: bool) -> String {
    [
        format!("// Auto-generated mod stub for {mod_id}"),
        "(function(){".to_string(),
        format!(
            "  if (!window.EaglerAPI && {requires_api}) console.warn('EaglerAPI required for {mod_id}');"
        ),
        format!(
            "  if (window.EaglerAPI?.onInit) {{ window.EaglerAPI.onInit(()=>{{ console.log('{mod_id} initialized'); }}); }}"
        ),
        "})();".to_string(),
    ]
    .join("\n")
}
