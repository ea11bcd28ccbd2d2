//! Image encoding: `DynamicImage` → base64 PNG wrapped in `ImageData`.
//!
//! Vision APIs accept images as base64 data embedded in the JSON request
//! body. PNG is chosen over JPEG because it is lossless — the QPF charts are
//! colour-keyed rainfall bins, and JPEG artefacts along the bin boundaries
//! would blur exactly the information the model is asked to read. `detail:
//! "high"` keeps the full image-tile budget so small map labels and the
//! legend stay legible.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use edgequake_llm::ImageData;
use image::DynamicImage;
use std::io::Cursor;
use tracing::debug;

/// Encode a fetched chart as a base64 PNG ready for the generation request.
pub fn encode_chart(img: &DynamicImage) -> Result<ImageData, image::ImageError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;

    let b64 = STANDARD.encode(&buf);
    debug!("Encoded chart → {} bytes base64", b64.len());

    Ok(ImageData::new(b64, "image/png").with_detail("high"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn encode_small_chart() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255])));
        let data = encode_chart(&img).expect("encode should succeed");
        assert_eq!(data.mime_type, "image/png");
        assert!(!data.data.is_empty());
        // Verify it's valid base64 holding a decodable PNG
        let decoded = STANDARD.decode(&data.data).expect("valid base64");
        let roundtrip = image::load_from_memory(&decoded).expect("valid PNG");
        assert_eq!((roundtrip.width(), roundtrip.height()), (10, 10));
    }
}
