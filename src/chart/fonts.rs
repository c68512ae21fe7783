// Font registration for chart text
//
// plotters rasterizes text with ab_glyph from fonts registered at runtime. On
// first use we register one TrueType font as "sans-serif": the file named by
// EXPENSE_TRACKER_FONT, else a common system font, else the DejaVu Sans copy
// compiled into the binary (assets/fonts, Bitstream Vera license).

use plotters::style::{register_font, FontStyle};
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Path of a TTF/OTF file to use instead of the system search
pub const FONT_VAR: &str = "EXPENSE_TRACKER_FONT";

/// Family name the renderers ask for
pub const FONT_FAMILY: &str = "sans-serif";

const CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Last resort when no usable font file is found
const BUNDLED_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

static TEXT_READY: OnceLock<bool> = OnceLock::new();

/// Read a font file, keeping it only if ab_glyph can parse it
fn load_font(path: &str) -> Option<Vec<u8>> {
    let bytes = std::fs::read(path).ok()?;
    if ab_glyph::FontRef::try_from_slice(&bytes).is_err() {
        warn!(path, "Unusable font file");
        return None;
    }
    Some(bytes)
}

/// Whether chart text can be drawn. Registers a font on the first call.
pub fn text_available() -> bool {
    *TEXT_READY.get_or_init(|| {
        let override_path = std::env::var(FONT_VAR).ok();
        let paths = override_path
            .iter()
            .map(String::as_str)
            .chain(CANDIDATES.iter().copied());

        for path in paths {
            let Some(bytes) = load_font(path) else {
                continue;
            };

            // plotters keeps registered fonts for the life of the process
            let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
            if register_font(FONT_FAMILY, FontStyle::Normal, bytes).is_ok() {
                debug!(path, "Registered chart font");
                return true;
            }
        }

        match register_font(FONT_FAMILY, FontStyle::Normal, BUNDLED_FONT) {
            Ok(()) => {
                debug!("Registered bundled chart font");
                true
            }
            Err(_) => {
                warn!("No usable font, charts will be drawn without text");
                false
            }
        }
    })
}
