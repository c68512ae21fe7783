// Category colours
//
// Well-known categories keep their fixed colour everywhere. Anything else is
// assigned from a fallback cycle in order of first appearance, so any number of
// categories gets a colour and neighbouring unknown slices stay distinguishable.

use plotters::style::RGBColor;

/// Colour used for "Other"
pub const NEUTRAL: RGBColor = RGBColor(0x6b, 0x72, 0x80);

const KNOWN: &[(&str, RGBColor)] = &[
    ("Food", RGBColor(0x84, 0xcc, 0x16)),
    ("Transportation", RGBColor(0x3b, 0x82, 0xf6)),
    ("Entertainment", RGBColor(0x8b, 0x5c, 0xf6)),
    ("Utilities", RGBColor(0xf9, 0x73, 0x16)),
    ("Housing", RGBColor(0xef, 0x44, 0x44)),
    ("Healthcare", RGBColor(0x06, 0xb6, 0xd4)),
    ("Personal", RGBColor(0xec, 0x48, 0x99)),
    ("Education", RGBColor(0x14, 0xb8, 0xa6)),
    ("Other", NEUTRAL),
];

const FALLBACK: &[RGBColor] = &[
    RGBColor(0xea, 0xb3, 0x08),
    RGBColor(0x63, 0x66, 0xf1),
    RGBColor(0x10, 0xb9, 0x81),
    RGBColor(0xf4, 0x3f, 0x5e),
    RGBColor(0x0e, 0xa5, 0xe9),
    RGBColor(0xa8, 0x55, 0xf7),
    RGBColor(0xd9, 0x77, 0x06),
    RGBColor(0x22, 0xc5, 0x5e),
];

/// The fixed colour of a well-known category
pub fn known_color(category: &str) -> Option<RGBColor> {
    KNOWN
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, color)| *color)
}

/// One colour per category, in the order given
pub fn colors_for<S: AsRef<str>>(categories: &[S]) -> Vec<RGBColor> {
    let mut next_fallback = 0;
    categories
        .iter()
        .map(|category| {
            known_color(category.as_ref()).unwrap_or_else(|| {
                let color = FALLBACK[next_fallback % FALLBACK.len()];
                next_fallback += 1;
                color
            })
        })
        .collect()
}
