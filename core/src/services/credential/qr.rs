//! QR rendering of credential payloads

use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::QrCode;

use crate::errors::CredentialError;

/// Smallest edge of the rendered image in pixels
const MIN_DIMENSION: u32 = 240;

/// Renders `payload` as a PNG QR code and returns it as a `data:image/png;base64,` URL
pub fn render_data_url(payload: &str) -> Result<String, CredentialError> {
    let png = render_png(payload)?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
}

/// Renders `payload` as raw PNG bytes
pub fn render_png(payload: &str) -> Result<Vec<u8>, CredentialError> {
    let code = QrCode::new(payload.as_bytes()).map_err(|e| CredentialError::RenderFailed {
        reason: e.to_string(),
    })?;

    let pixels = code
        .render::<Luma<u8>>()
        .min_dimensions(MIN_DIMENSION, MIN_DIMENSION)
        .build();

    let mut bytes = Vec::new();
    DynamicImage::ImageLuma8(pixels)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| CredentialError::RenderFailed {
            reason: e.to_string(),
        })?;

    Ok(bytes)
}
