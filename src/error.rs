use thiserror::Error;

/// Failures that abort the conversion of a single archive.
///
/// Missing or malformed mod metadata is deliberately not represented here;
/// it degrades to defaults instead of failing the conversion.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The input buffer could not be opened as a zip container.
    #[error("not a valid zip archive: {0}")]
    ArchiveFormat(#[source] zip::result::ZipError),

    /// An entry inside an otherwise valid container could not be read.
    #[error("failed to read entry {path:?}: {source}")]
    EntryRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The output container could not be serialized.
    #[error("failed to write output archive: {0}")]
    Serialize(#[source] zip::result::ZipError),

    /// A synthesized descriptor file could not be encoded as JSON.
    #[error("failed to encode descriptor: {0}")]
    Descriptor(#[from] serde_json::Error),
}
