// Asset loading
//
// Resolves files under the asset root and decodes them into images or
// metadata. GPU upload happens separately in the renderer.

mod loader;

pub use loader::AssetLoader;

/// Asset loading errors
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Failed to decode image {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Malformed metadata in {path}: {source}")]
    Metadata {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid clip '{state}': {reason}")]
    InvalidClip {
        state: &'static str,
        reason: &'static str,
    },

    #[error("Missing clip '{0}' required by the configured locomotion")]
    MissingClip(&'static str),

    #[error("Failed to load asset: {0}")]
    LoadError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_error_display() {
        let err = AssetError::NotFound("background.png".to_string());
        assert_eq!(err.to_string(), "Asset not found: background.png");

        let err = AssetError::MissingClip("move_state");
        assert_eq!(
            err.to_string(),
            "Missing clip 'move_state' required by the configured locomotion"
        );
    }
}
