use std::fs;
use std::path::Path;

use image::GenericImageView;
use serde::Serialize;

use crate::error::AssetError;

pub const LOGO_PLACEHOLDER: &str = "Logo image not found.";

/// What the front end shows in the logo slot.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Branding {
    Image {
        path: String,
        width: u32,
        height: u32,
    },
    Placeholder {
        text: &'static str,
    },
}

fn read_logo(path: &Path) -> Result<(u32, u32), AssetError> {
    let shown = path.display().to_string();
    let bytes = fs::read(path).map_err(|source| AssetError::Missing {
        path: shown.clone(),
        source,
    })?;
    let img = image::load_from_memory(&bytes)
        .map_err(|source| AssetError::Decode { path: shown, source })?;
    Ok(img.dimensions())
}

/// Load the branding image, falling back to a text placeholder.
pub fn load_branding(path: impl AsRef<Path>) -> Branding {
    let path = path.as_ref();
    match read_logo(path) {
        Ok((width, height)) => Branding::Image {
            path: path.display().to_string(),
            width,
            height,
        },
        Err(e) => {
            tracing::warn!(error = %e, "branding image unavailable, using placeholder");
            Branding::Placeholder {
                text: LOGO_PLACEHOLDER,
            }
        }
    }
}
