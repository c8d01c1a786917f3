//! Document I/O collaborator: multi-page raster load/save.
//!
//! The core treats documents as opaque bytes plus a format tag. This module
//! provides the collaborator trait and [`RasterIo`], the bundled
//! implementation for multi-page TIFF and single-page PNG. DPI and color
//! mode are captured in [`DocumentMetadata`] on load and restored on save.

use std::io::Cursor;

use async_trait::async_trait;
use image::{DynamicImage, RgbaImage};
use serde::{Deserialize, Serialize};
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::encoder::{colortype, Rational, TiffEncoder};
use tiff::tags::{ResolutionUnit, Tag};
use tracing::debug;

use crate::{BlackoutError, Result};

/// Supported raster container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Tiff,
    Png,
}

impl DocumentFormat {
    /// Detect the format from magic bytes.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        if data.starts_with(b"II\x2A\x00") || data.starts_with(b"MM\x00\x2A") {
            Some(Self::Tiff)
        } else if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            Some(Self::Png)
        } else {
            None
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "tif" | "tiff" => Some(Self::Tiff),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tiff => "tiff",
            Self::Png => "png",
        }
    }
}

/// Color mode of the source document, restored on save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    Gray,
    Rgb,
    #[default]
    Rgba,
}

/// Metadata that must round-trip through load/save.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Dots per inch `(x, y)` when the container declares it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dpi: Option<(f64, f64)>,
    pub color_mode: ColorMode,
}

/// Raster document collaborator.
///
/// Only these calls (and the providers) may suspend; all pure-core work is
/// synchronous.
#[async_trait]
pub trait DocumentIo: Send + Sync {
    /// Decode a document into per-page RGBA buffers plus metadata.
    async fn load(&self, bytes: &[u8], format: DocumentFormat) -> Result<(Vec<RgbaImage>, DocumentMetadata)>;

    /// Re-encode pages in the given format, restoring metadata.
    async fn save(&self, pages: &[RgbaImage], metadata: &DocumentMetadata, format: DocumentFormat) -> Result<Vec<u8>>;

    /// Encode pages for OCR submission, downscaling until the payload fits
    /// under `max_size_mb`.
    async fn optimize_for_ocr(
        &self,
        pages: &[RgbaImage],
        metadata: &DocumentMetadata,
        format: DocumentFormat,
        max_size_mb: f64,
    ) -> Result<Vec<u8>>;
}

/// Bundled TIFF/PNG implementation of [`DocumentIo`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterIo;

#[async_trait]
impl DocumentIo for RasterIo {
    async fn load(&self, bytes: &[u8], format: DocumentFormat) -> Result<(Vec<RgbaImage>, DocumentMetadata)> {
        match format {
            DocumentFormat::Tiff => load_tiff(bytes),
            DocumentFormat::Png => load_png(bytes),
        }
    }

    async fn save(&self, pages: &[RgbaImage], metadata: &DocumentMetadata, format: DocumentFormat) -> Result<Vec<u8>> {
        match format {
            DocumentFormat::Tiff => save_tiff(pages, metadata),
            DocumentFormat::Png => save_png(pages, metadata),
        }
    }

    async fn optimize_for_ocr(
        &self,
        pages: &[RgbaImage],
        metadata: &DocumentMetadata,
        format: DocumentFormat,
        max_size_mb: f64,
    ) -> Result<Vec<u8>> {
        let cap_bytes = (max_size_mb.max(0.1) * 1024.0 * 1024.0) as usize;
        let mut current: Vec<RgbaImage> = pages.to_vec();
        let mut encoded = self.save(&current, metadata, format).await?;

        // Downscale by the area ratio until the encoding fits; a handful of
        // rounds is always enough because the factor is bounded away from 1.
        let mut rounds = 0;
        while encoded.len() > cap_bytes && rounds < 5 {
            let factor = (cap_bytes as f64 / encoded.len() as f64).sqrt().clamp(0.3, 0.9);
            current = current
                .iter()
                .map(|page| {
                    let nw = ((f64::from(page.width()) * factor) as u32).max(1);
                    let nh = ((f64::from(page.height()) * factor) as u32).max(1);
                    image::imageops::resize(page, nw, nh, image::imageops::FilterType::Triangle)
                })
                .collect();
            encoded = self.save(&current, metadata, format).await?;
            rounds += 1;
            debug!(factor, size = encoded.len(), cap = cap_bytes, "downscaled for OCR");
        }
        Ok(encoded)
    }
}

fn load_error(message: impl Into<String>) -> impl FnOnce(tiff::TiffError) -> BlackoutError {
    let message = message.into();
    move |e| BlackoutError::DocumentLoad {
        message,
        source: Some(Box::new(e)),
    }
}

fn load_tiff(bytes: &[u8]) -> Result<(Vec<RgbaImage>, DocumentMetadata)> {
    let mut decoder = Decoder::new(Cursor::new(bytes))
        .map_err(load_error("not a TIFF container"))?
        .with_limits(Limits::unlimited());

    let mut pages = Vec::new();
    let mut metadata = DocumentMetadata::default();

    loop {
        let (width, height) = decoder.dimensions().map_err(load_error("missing TIFF dimensions"))?;
        let colortype = decoder.colortype().map_err(load_error("missing TIFF color type"))?;
        let data = decoder.read_image().map_err(load_error("undecodable TIFF page"))?;

        if pages.is_empty() {
            metadata.dpi = read_tiff_dpi(&mut decoder);
            metadata.color_mode = match colortype {
                tiff::ColorType::Gray(_) | tiff::ColorType::GrayA(_) => ColorMode::Gray,
                tiff::ColorType::RGB(_) => ColorMode::Rgb,
                _ => ColorMode::Rgba,
            };
        }

        pages.push(tiff_page_to_rgba(width, height, colortype, data)?);

        if !decoder.more_images() {
            break;
        }
        decoder.next_image().map_err(load_error("truncated TIFF directory"))?;
    }

    debug!(pages = pages.len(), dpi = ?metadata.dpi, "TIFF loaded");
    Ok((pages, metadata))
}

fn tiff_page_to_rgba(width: u32, height: u32, colortype: tiff::ColorType, data: DecodingResult) -> Result<RgbaImage> {
    let DecodingResult::U8(buf) = data else {
        return Err(BlackoutError::DocumentLoad {
            message: "only 8-bit TIFF samples are supported".to_string(),
            source: None,
        });
    };

    let unsupported = |kind: &str| BlackoutError::DocumentLoad {
        message: format!("unsupported TIFF color type: {kind}"),
        source: None,
    };
    let truncated = || BlackoutError::DocumentLoad {
        message: "TIFF pixel data does not match its dimensions".to_string(),
        source: None,
    };

    let dynamic = match colortype {
        tiff::ColorType::Gray(8) => {
            DynamicImage::ImageLuma8(image::GrayImage::from_raw(width, height, buf).ok_or_else(truncated)?)
        }
        tiff::ColorType::GrayA(8) => {
            DynamicImage::ImageLumaA8(image::GrayAlphaImage::from_raw(width, height, buf).ok_or_else(truncated)?)
        }
        tiff::ColorType::RGB(8) => {
            DynamicImage::ImageRgb8(image::RgbImage::from_raw(width, height, buf).ok_or_else(truncated)?)
        }
        tiff::ColorType::RGBA(8) => {
            DynamicImage::ImageRgba8(RgbaImage::from_raw(width, height, buf).ok_or_else(truncated)?)
        }
        other => return Err(unsupported(&format!("{other:?}"))),
    };
    Ok(dynamic.to_rgba8())
}

fn read_tiff_dpi<R: std::io::Read + std::io::Seek>(decoder: &mut Decoder<R>) -> Option<(f64, f64)> {
    let rational = |value: tiff::decoder::ifd::Value| match value {
        tiff::decoder::ifd::Value::Rational(n, d) if d != 0 => Some(f64::from(n) / f64::from(d)),
        _ => None,
    };
    let x = decoder.find_tag(Tag::XResolution).ok().flatten().and_then(rational)?;
    let y = decoder.find_tag(Tag::YResolution).ok().flatten().and_then(rational)?;

    // Unit 3 is centimeters; anything else is treated as inches.
    let unit = decoder
        .find_tag(Tag::ResolutionUnit)
        .ok()
        .flatten()
        .and_then(|v| v.into_u32().ok())
        .unwrap_or(2);
    let scale = if unit == 3 { 2.54 } else { 1.0 };
    Some((x * scale, y * scale))
}

fn save_tiff(pages: &[RgbaImage], metadata: &DocumentMetadata) -> Result<Vec<u8>> {
    let encode_error = |e: tiff::TiffError| BlackoutError::ImageEncode {
        message: "TIFF encoding failed".to_string(),
        source: Some(Box::new(e)),
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut encoder = TiffEncoder::new(&mut cursor).map_err(encode_error)?;
        for page in pages {
            let dpi = metadata.dpi.map(|(x, y)| (to_rational(x), to_rational(y)));
            match metadata.color_mode {
                ColorMode::Gray => {
                    let gray = DynamicImage::ImageRgba8(page.clone()).to_luma8();
                    let mut image = encoder
                        .new_image::<colortype::Gray8>(gray.width(), gray.height())
                        .map_err(encode_error)?;
                    if let Some((x, y)) = dpi {
                        image.resolution_unit(ResolutionUnit::Inch);
                        image.x_resolution(x);
                        image.y_resolution(y);
                    }
                    image.write_data(gray.as_raw()).map_err(encode_error)?;
                }
                ColorMode::Rgb => {
                    let rgb = DynamicImage::ImageRgba8(page.clone()).to_rgb8();
                    let mut image = encoder
                        .new_image::<colortype::RGB8>(rgb.width(), rgb.height())
                        .map_err(encode_error)?;
                    if let Some((x, y)) = dpi {
                        image.resolution_unit(ResolutionUnit::Inch);
                        image.x_resolution(x);
                        image.y_resolution(y);
                    }
                    image.write_data(rgb.as_raw()).map_err(encode_error)?;
                }
                ColorMode::Rgba => {
                    let mut image = encoder
                        .new_image::<colortype::RGBA8>(page.width(), page.height())
                        .map_err(encode_error)?;
                    if let Some((x, y)) = dpi {
                        image.resolution_unit(ResolutionUnit::Inch);
                        image.x_resolution(x);
                        image.y_resolution(y);
                    }
                    image.write_data(page.as_raw()).map_err(encode_error)?;
                }
            }
        }
    }
    Ok(cursor.into_inner())
}

fn to_rational(value: f64) -> Rational {
    Rational {
        n: (value * 100.0).round() as u32,
        d: 100,
    }
}

fn load_png(bytes: &[u8]) -> Result<(Vec<RgbaImage>, DocumentMetadata)> {
    let dynamic = image::load_from_memory_with_format(bytes, image::ImageFormat::Png).map_err(|e| {
        BlackoutError::DocumentLoad {
            message: "not a PNG image".to_string(),
            source: Some(Box::new(e)),
        }
    })?;
    let color_mode = match &dynamic {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageLumaA8(_) => ColorMode::Gray,
        DynamicImage::ImageRgb8(_) => ColorMode::Rgb,
        _ => ColorMode::Rgba,
    };
    Ok((
        vec![dynamic.to_rgba8()],
        DocumentMetadata {
            dpi: None,
            color_mode,
        },
    ))
}

fn save_png(pages: &[RgbaImage], metadata: &DocumentMetadata) -> Result<Vec<u8>> {
    let page = match pages {
        [single] => single,
        _ => {
            return Err(BlackoutError::ImageEncode {
                message: format!("PNG holds exactly one page, got {}", pages.len()),
                source: None,
            })
        }
    };

    let dynamic = match metadata.color_mode {
        ColorMode::Gray => DynamicImage::ImageLuma8(DynamicImage::ImageRgba8(page.clone()).to_luma8()),
        ColorMode::Rgb => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(page.clone()).to_rgb8()),
        ColorMode::Rgba => DynamicImage::ImageRgba8(page.clone()),
    };

    let mut cursor = Cursor::new(Vec::new());
    dynamic
        .write_to(&mut cursor, image::ImageFormat::Png)
        .map_err(|e| BlackoutError::ImageEncode {
            message: "PNG encoding failed".to_string(),
            source: Some(Box::new(e)),
        })?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn gradient_page(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
        })
    }

    #[test]
    fn test_format_detection_magic_bytes() {
        assert_eq!(DocumentFormat::from_bytes(b"II\x2A\x00rest"), Some(DocumentFormat::Tiff));
        assert_eq!(DocumentFormat::from_bytes(b"MM\x00\x2Arest"), Some(DocumentFormat::Tiff));
        assert_eq!(
            DocumentFormat::from_bytes(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A]),
            Some(DocumentFormat::Png)
        );
        assert_eq!(DocumentFormat::from_bytes(b"random"), None);
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(DocumentFormat::from_extension("TIF"), Some(DocumentFormat::Tiff));
        assert_eq!(DocumentFormat::from_extension("png"), Some(DocumentFormat::Png));
        assert_eq!(DocumentFormat::from_extension("pdf"), None);
    }

    #[tokio::test]
    async fn test_png_roundtrip_pixels() {
        let io = RasterIo;
        let page = gradient_page(64, 48);
        let metadata = DocumentMetadata::default();

        let bytes = io.save(&[page.clone()], &metadata, DocumentFormat::Png).await.unwrap();
        let (loaded, loaded_meta) = io.load(&bytes, DocumentFormat::Png).await.unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0], page);
        assert_eq!(loaded_meta.color_mode, ColorMode::Rgba);
    }

    #[tokio::test]
    async fn test_tiff_multipage_roundtrip() {
        let io = RasterIo;
        let pages = vec![gradient_page(60, 40), gradient_page(30, 20)];
        let metadata = DocumentMetadata {
            dpi: Some((300.0, 300.0)),
            color_mode: ColorMode::Rgba,
        };

        let bytes = io.save(&pages, &metadata, DocumentFormat::Tiff).await.unwrap();
        assert_eq!(DocumentFormat::from_bytes(&bytes), Some(DocumentFormat::Tiff));

        let (loaded, loaded_meta) = io.load(&bytes, DocumentFormat::Tiff).await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0], pages[0]);
        assert_eq!(loaded[1], pages[1]);
        let (dx, dy) = loaded_meta.dpi.expect("dpi round-trips");
        assert!((dx - 300.0).abs() < 0.01);
        assert!((dy - 300.0).abs() < 0.01);
    }

    #[tokio::test]
    async fn test_tiff_gray_color_mode_roundtrip() {
        let io = RasterIo;
        let page = RgbaImage::from_fn(16, 16, |x, _| {
            let v = (x * 16) as u8;
            Rgba([v, v, v, 255])
        });
        let metadata = DocumentMetadata {
            dpi: None,
            color_mode: ColorMode::Gray,
        };

        let bytes = io.save(&[page.clone()], &metadata, DocumentFormat::Tiff).await.unwrap();
        let (loaded, loaded_meta) = io.load(&bytes, DocumentFormat::Tiff).await.unwrap();
        assert_eq!(loaded_meta.color_mode, ColorMode::Gray);
        assert_eq!(loaded[0], page);
    }

    #[tokio::test]
    async fn test_load_rejects_garbage() {
        let io = RasterIo;
        let err = io.load(b"not a document", DocumentFormat::Tiff).await.unwrap_err();
        assert!(matches!(err, BlackoutError::DocumentLoad { .. }));
    }

    #[tokio::test]
    async fn test_png_save_rejects_multiple_pages() {
        let io = RasterIo;
        let pages = vec![gradient_page(8, 8), gradient_page(8, 8)];
        let err = io
            .save(&pages, &DocumentMetadata::default(), DocumentFormat::Png)
            .await
            .unwrap_err();
        assert!(matches!(err, BlackoutError::ImageEncode { .. }));
    }

    #[tokio::test]
    async fn test_optimize_for_ocr_respects_cap() {
        let io = RasterIo;
        // Uncompressed RGBA TIFF: 512 * 512 * 4 = 1 MiB per page.
        let pages = vec![gradient_page(512, 512)];
        let metadata = DocumentMetadata::default();

        let optimized = io
            .optimize_for_ocr(&pages, &metadata, DocumentFormat::Tiff, 0.25)
            .await
            .unwrap();
        assert!(optimized.len() < 1024 * 1024);
        // Still a decodable TIFF.
        let (loaded, _) = io.load(&optimized, DocumentFormat::Tiff).await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(loaded[0].width() < 512);
    }
}
