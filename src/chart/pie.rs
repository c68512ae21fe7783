// Spending-by-category pie chart

use crate::chart::fonts::{self, FONT_FAMILY};
use crate::chart::{draw_error, encode_png, palette, pixel_buffer, ChartImage};
use crate::error::Result;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::collections::BTreeMap;
use std::f64::consts::{FRAC_PI_2, TAU};
use tracing::{debug, warn};

/// Output size in pixels. Square so the pie stays circular.
pub const PIE_SIZE: (u32, u32) = (600, 600);

/// Pie radius as a fraction of the shorter side
const RADIUS_RATIO: f64 = 0.32;

/// Arc resolution: polygon points per full turn
const ARC_STEPS: f64 = 360.0;

/// One slice of the pie, angles in radians clockwise from three o'clock
#[derive(Debug, Clone, PartialEq)]
struct Slice<'a> {
    label: &'a str,
    share: f64,
    start: f64,
    end: f64,
}

impl Slice<'_> {
    fn mid(&self) -> f64 {
        (self.start + self.end) / 2.0
    }
}

/// Lay slices out from twelve o'clock in the given order
fn layout<'a>(slices: &[(&'a str, f64)]) -> Vec<Slice<'a>> {
    let sum: f64 = slices.iter().map(|(_, value)| value).sum();
    let mut angle = -FRAC_PI_2;

    slices
        .iter()
        .map(|&(label, value)| {
            let share = value / sum;
            let start = angle;
            angle += share * TAU;
            Slice {
                label,
                share,
                start,
                end: angle,
            }
        })
        .collect()
}

fn point_at(center: (i32, i32), radius: f64, angle: f64) -> (i32, i32) {
    (
        center.0 + (radius * angle.cos()).round() as i32,
        center.1 + (radius * angle.sin()).round() as i32,
    )
}

/// Closed outline of a slice: centre, then the arc
fn wedge(center: (i32, i32), radius: f64, slice: &Slice<'_>) -> Vec<(i32, i32)> {
    let steps = ((slice.end - slice.start) / TAU * ARC_STEPS).ceil().max(1.0) as usize;
    let mut points = Vec::with_capacity(steps + 2);
    points.push(center);
    for step in 0..=steps {
        let angle = slice.start + (slice.end - slice.start) * step as f64 / steps as f64;
        points.push(point_at(center, radius, angle));
    }
    points
}

/// Render one slice per category with its label and percentage
///
/// Returns `Ok(None)` for an empty map. A pie cannot show negative or zero
/// shares, so only categories with a positive total become slices; if none
/// qualify there is no chart either.
pub fn render_category_chart(categories: &BTreeMap<String, f64>) -> Result<Option<ChartImage>> {
    let positive: Vec<(&str, f64)> = categories
        .iter()
        .filter(|(_, total)| total.is_finite() && **total > 0.0)
        .map(|(name, total)| (name.as_str(), *total))
        .collect();

    if positive.is_empty() {
        if !categories.is_empty() {
            warn!(
                categories = categories.len(),
                "No category has a positive total, skipping pie chart"
            );
        }
        return Ok(None);
    }

    let slices = layout(&positive);
    let labels: Vec<&str> = slices.iter().map(|s| s.label).collect();
    let colors = palette::colors_for(&labels);
    let with_text = fonts::text_available();

    let (width, height) = PIE_SIZE;
    let center = ((width / 2) as i32, (height / 2) as i32);
    let radius = f64::from(width.min(height)) * RADIUS_RATIO;

    let mut pixels = pixel_buffer(PIE_SIZE);
    {
        let root = BitMapBackend::with_buffer(&mut pixels, PIE_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(draw_error)?;

        for (slice, color) in slices.iter().zip(&colors) {
            root.draw(&Polygon::new(wedge(center, radius, slice), color.filled()))
                .map_err(draw_error)?;
        }

        if with_text {
            for slice in &slices {
                let angle = slice.mid();
                let anchor = if angle.cos() >= 0.0 { HPos::Left } else { HPos::Right };
                let label_style = TextStyle::from((FONT_FAMILY, 18).into_font())
                    .color(&BLACK)
                    .pos(Pos::new(anchor, VPos::Center));
                root.draw(&Text::new(
                    slice.label,
                    point_at(center, radius * 1.08, angle),
                    label_style,
                ))
                .map_err(draw_error)?;

                let percent_style = TextStyle::from((FONT_FAMILY, 14).into_font())
                    .color(&WHITE)
                    .pos(Pos::new(HPos::Center, VPos::Center));
                root.draw(&Text::new(
                    format!("{:.1}%", slice.share * 100.0),
                    point_at(center, radius * 0.6, angle),
                    percent_style,
                ))
                .map_err(draw_error)?;
            }
        }

        root.present().map_err(draw_error)?;
    }

    debug!(slices = slices.len(), with_text, "Rendered category chart");
    encode_png(pixels, PIE_SIZE).map(Some)
}
