use crate::types::RgbFrame;
use anyhow::{Result, anyhow};
use image::imageops::FilterType;
use image::{ImageBuffer, RgbImage};
use std::io::Cursor;

/// Scale a captured frame to the target resolution and encode it as PNG.
pub fn frame_to_png(frame: &RgbFrame, target_width: u32, target_height: u32) -> Result<Vec<u8>> {
    let expected = (frame.width * frame.height * 3) as usize;
    if frame.pixels.len() != expected {
        return Err(anyhow!(
            "Pixel buffer size mismatch: expected {} bytes for {}x{}, got {}",
            expected,
            frame.width,
            frame.height,
            frame.pixels.len()
        ));
    }

    let img: RgbImage = ImageBuffer::from_raw(frame.width, frame.height, frame.pixels.clone())
        .ok_or_else(|| anyhow!("Failed to create image from raw data"))?;

    let img = if (frame.width, frame.height) != (target_width, target_height) {
        image::imageops::resize(&img, target_width, target_height, FilterType::Triangle)
    } else {
        img
    };

    let mut png_bytes = Cursor::new(Vec::new());
    img.write_to(&mut png_bytes, image::ImageFormat::Png)?;

    Ok(png_bytes.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    fn solid_frame(width: u32, height: u32) -> RgbFrame {
        RgbFrame {
            width,
            height,
            pixels: vec![200u8; (width * height * 3) as usize],
        }
    }

    #[test]
    fn encodes_png_at_native_resolution() {
        let png = frame_to_png(&solid_frame(4, 4), 4, 4).unwrap();
        assert_eq!(&png[..8], &PNG_MAGIC);
    }

    #[test]
    fn scales_to_target_resolution() {
        let png = frame_to_png(&solid_frame(8, 8), 4, 2).unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!(decoded.width(), 4);
        assert_eq!(decoded.height(), 2);
    }

    #[test]
    fn rejects_truncated_pixel_buffer() {
        let frame = RgbFrame {
            width: 4,
            height: 4,
            pixels: vec![0u8; 10],
        };
        assert!(frame_to_png(&frame, 4, 4).is_err());
    }
}
