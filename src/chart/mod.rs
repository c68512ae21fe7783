/// Chart rendering
///
/// Turns aggregates into PNG images, base64-encoded for embedding in an
/// `<img src="data:...">`. Charts are drawn into an in-memory RGB buffer with
/// plotters and encoded with the image crate; nothing is written to disk.

pub mod bar;
pub mod fonts;
pub mod palette;
pub mod pie;

pub use bar::render_daily_chart;
pub use pie::render_category_chart;

use crate::error::{ExpenseError, Result};
use base64::Engine;
use serde::Serialize;
use std::io::Cursor;

/// An encoded chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartImage {
    #[serde(skip)]
    png: Vec<u8>,
    base64: String,
}

impl ChartImage {
    fn from_png(png: Vec<u8>) -> Self {
        let base64 = base64::engine::general_purpose::STANDARD.encode(&png);
        Self { png, base64 }
    }

    /// Raw PNG bytes
    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    /// PNG bytes as standard base64 text
    pub fn base64(&self) -> &str {
        &self.base64
    }

    /// `data:image/png;base64,...` for direct use as an image source
    pub fn data_uri(&self) -> String {
        format!("data:image/png;base64,{}", self.base64)
    }
}

/// Map any plotters drawing error into ours
pub(crate) fn draw_error<E: std::fmt::Display>(err: E) -> ExpenseError {
    ExpenseError::Chart(err.to_string())
}

/// Allocate a white-initialized RGB pixel buffer for a `width` x `height` chart
pub(crate) fn pixel_buffer((width, height): (u32, u32)) -> Vec<u8> {
    vec![0xff; width as usize * height as usize * 3]
}

/// Encode a finished RGB pixel buffer as PNG
pub(crate) fn encode_png(pixels: Vec<u8>, (width, height): (u32, u32)) -> Result<ChartImage> {
    let image = image::RgbImage::from_raw(width, height, pixels).ok_or_else(|| {
        ExpenseError::Chart("pixel buffer does not match chart dimensions".to_string())
    })?;

    let mut png = Vec::new();
    image.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)?;

    Ok(ChartImage::from_png(png))
}
