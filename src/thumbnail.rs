use eframe::egui::ColorImage;

use crate::error::ClientResult;

/// Downloads a thumbnail and decodes it for egui. Blocking; run it on a
/// blocking worker.
pub fn fetch_thumbnail(url: &str) -> ClientResult<ColorImage> {
    let bytes = reqwest::blocking::get(url)?.error_for_status()?.bytes()?;
    decode_thumbnail(&bytes)
}

/// Decodes any format `image` understands into an unmultiplied RGBA image.
pub fn decode_thumbnail(bytes: &[u8]) -> ClientResult<ColorImage> {
    let img = image::load_from_memory(bytes)?.to_rgba8();
    let size = [img.width() as usize, img.height() as usize];
    Ok(ColorImage::from_rgba_unmultiplied(size, &img))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageOutputFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    #[test]
    fn decodes_png_bytes() {
        let img = RgbaImage::from_pixel(4, 3, Rgba([255, 0, 0, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png).unwrap();

        let decoded = decode_thumbnail(&bytes).unwrap();
        assert_eq!(decoded.size, [4, 3]);
    }

    #[test]
    fn rejects_garbage() {
        assert!(decode_thumbnail(b"not an image").is_err());
    }
}
