//! PNG / JPEG bytes → [`Raster`].
//!
//! The native channel layout is kept (gray stays 1 channel, RGBA stays 4),
//! so images the classifier cannot handle are rejected by the classifier
//! with a format error instead of being silently converted here. Samples
//! wider than 8 bits are narrowed to 8 bits.

use std::path::Path;

use image::DynamicImage;

use crate::error::DecodeError;
use crate::raster::Raster;

pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// True if `path` has an extension the decoder is built for.
pub fn is_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.iter().any(|s| e.eq_ignore_ascii_case(s)))
        .unwrap_or(false)
}

/// Decode an in-memory image, format detected from its magic bytes.
pub fn decode_image(bytes: &[u8]) -> Result<Raster, DecodeError> {
    let img = image::load_from_memory(bytes)?;
    let raster = to_raster(img)?;
    log::trace!(
        "decoded {}x{} image with {} channel(s)",
        raster.width(),
        raster.height(),
        raster.channels()
    );
    Ok(raster)
}

/// Read and decode an image file.
pub fn open_image(path: &Path) -> Result<Raster, DecodeError> {
    let bytes = std::fs::read(path).map_err(|source| DecodeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_image(&bytes)
}

fn to_raster(img: DynamicImage) -> Result<Raster, DecodeError> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    let channels = img.color().channel_count() as usize;

    let data = match channels {
        1 => img.into_luma8().into_raw(),
        2 => img.into_luma_alpha8().into_raw(),
        3 => img.into_rgb8().into_raw(),
        _ => img.into_rgba8().into_raw(),
    };
    Ok(Raster::new(data, width, height, channels.min(4))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_png(width: u32, height: u32, color: png::ColorType, depth: png::BitDepth, data: &[u8]) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut enc = png::Encoder::new(&mut buf, width, height);
            enc.set_color(color);
            enc.set_depth(depth);
            let mut writer = enc.write_header().unwrap();
            writer.write_image_data(data).unwrap();
        }
        buf
    }

    #[test]
    fn rgb_png_keeps_pixels() {
        let data = [0u8, 255, 0, 139, 69, 19];
        let png = encode_png(2, 1, png::ColorType::Rgb, png::BitDepth::Eight, &data);
        let r = decode_image(&png).unwrap();
        assert_eq!((r.width(), r.height(), r.channels()), (2, 1, 3));
        assert_eq!(r.data(), data);
    }

    #[test]
    fn grayscale_and_alpha_keep_channel_count() {
        let gray = encode_png(2, 2, png::ColorType::Grayscale, png::BitDepth::Eight, &[1, 2, 3, 4]);
        assert_eq!(decode_image(&gray).unwrap().channels(), 1);

        let rgba = encode_png(1, 1, png::ColorType::Rgba, png::BitDepth::Eight, &[9, 8, 7, 255]);
        let r = decode_image(&rgba).unwrap();
        assert_eq!(r.channels(), 4);
        assert_eq!(r.data(), [9, 8, 7, 255]);
    }

    #[test]
    fn sixteen_bit_is_narrowed() {
        // Big-endian 16-bit samples: 0xFFFF, 0x0000, 0x8080.
        let data = [0xFF, 0xFF, 0x00, 0x00, 0x80, 0x80];
        let png = encode_png(1, 1, png::ColorType::Rgb, png::BitDepth::Sixteen, &data);
        let r = decode_image(&png).unwrap();
        assert_eq!(r.channels(), 3);
        assert_eq!(r.data(), [255, 0, 128]);
    }

    #[test]
    fn garbage_bytes_fail() {
        assert!(matches!(decode_image(b"not an image"), Err(DecodeError::Image(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = open_image(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, DecodeError::Io { .. }));
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(is_supported_extension(Path::new("a/b/photo.JPG")));
        assert!(is_supported_extension(Path::new("x.jpeg")));
        assert!(is_supported_extension(Path::new("x.png")));
        assert!(!is_supported_extension(Path::new("x.tiff")));
        assert!(!is_supported_extension(Path::new("noext")));
    }
}
