use thiserror::Error;

/// Errors raised at the engine's boundaries (decode, configuration JSON).
///
/// None of these reach rendering: decode errors become a rejected outcome
/// and save errors (`anyhow`, from the collaborators) a failed status, both
/// logged where they are caught.
#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("{name}: not an image (mime {mime})")]
    NotAnImage { name: String, mime: String },

    #[error("{name}: unrecognized image data")]
    UnknownFormat { name: String },

    #[error("{name}: failed to decode image: {source}")]
    Decode {
        name: String,
        #[source]
        source: image::ImageError,
    },

    #[error("{name}: image has zero size")]
    EmptyImage { name: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("{name}: decoder panicked")]
    DecoderPanicked { name: String },
}
