// Daily spending bar chart for the trailing window

use crate::chart::fonts::{self, FONT_FAMILY};
use crate::chart::{draw_error, encode_png, pixel_buffer, ChartImage};
use crate::db::DailyTotal;
use crate::error::{ExpenseError, Result};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontTransform;
use tracing::debug;

/// Output size in pixels
pub const BAR_SIZE: (u32, u32) = (800, 400);

pub const BAR_COLOR: RGBColor = RGBColor(0x87, 0xce, 0xeb); // skyblue

/// Headroom above the tallest bar for its value label
const HEADROOM: f64 = 1.15;

/// Y axis range covering every total and zero
///
/// Totals must be finite. Headroom saturates at `f64::MAX`; a range whose
/// span still overflows is rejected.
fn value_range(daily: &[DailyTotal]) -> Result<(f64, f64)> {
    let low = daily.iter().map(|d| d.total).fold(0.0_f64, f64::min);
    let high = daily.iter().map(|d| d.total).fold(0.0_f64, f64::max);

    let low = if low < 0.0 { (low * HEADROOM).max(f64::MIN) } else { 0.0 };
    let high = if high > 0.0 { (high * HEADROOM).min(f64::MAX) } else { 0.0 };

    let span = high - low;
    if !span.is_finite() {
        return Err(ExpenseError::Chart(
            "daily totals span too wide a range to chart".to_string(),
        ));
    }

    if span > f64::EPSILON {
        Ok((low, high))
    } else {
        Ok((0.0, 1.0))
    }
}

/// Render one bar per date, labelled with its dollar total
///
/// Returns `Ok(None)` when there are no days to show. Bars appear in the
/// order given. A non-finite total is an `ExpenseError::Chart`.
pub fn render_daily_chart(daily: &[DailyTotal]) -> Result<Option<ChartImage>> {
    if daily.is_empty() {
        return Ok(None);
    }

    if let Some(day) = daily.iter().find(|d| !d.total.is_finite()) {
        return Err(ExpenseError::Chart(format!(
            "total for {} is not a finite amount",
            day.date
        )));
    }

    let (y_low, y_high) = value_range(daily)?;
    let date_label = |value: &SegmentValue<usize>| match value {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
            daily.get(*i).map(|d| d.date.clone()).unwrap_or_default()
        }
        SegmentValue::Last => String::new(),
    };
    let dollar_label = |value: &f64| format!("${:.2}", value);

    let with_text = fonts::text_available();

    let mut pixels = pixel_buffer(BAR_SIZE);
    {
        let root = BitMapBackend::with_buffer(&mut pixels, BAR_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(draw_error)?;

        let mut builder = ChartBuilder::on(&root);
        builder.margin(12);
        if with_text {
            builder
                .caption("Daily Expenses (Last 7 Days)", (FONT_FAMILY, 22))
                .x_label_area_size(90)
                .y_label_area_size(70);
        }
        let mut chart = builder
            .build_cartesian_2d((0..daily.len()).into_segmented(), y_low..y_high)
            .map_err(draw_error)?;

        if with_text {
            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_desc("Date")
                .y_desc("Amount ($)")
                .x_labels(daily.len())
                .x_label_formatter(&date_label)
                .x_label_style(
                    (FONT_FAMILY, 13)
                        .into_font()
                        .transform(FontTransform::Rotate90),
                )
                .y_label_formatter(&dollar_label)
                .draw()
                .map_err(draw_error)?;
        } else {
            // Axes only
            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![
                        (SegmentValue::Exact(0), 0.0),
                        (SegmentValue::Last, 0.0),
                    ],
                    BLACK,
                )))
                .map_err(draw_error)?;
        }

        chart
            .draw_series(daily.iter().enumerate().map(|(i, day)| {
                let mut bar = Rectangle::new(
                    [
                        (SegmentValue::Exact(i), 0.0),
                        (SegmentValue::Exact(i + 1), day.total),
                    ],
                    BAR_COLOR.filled(),
                );
                bar.set_margin(0, 0, 10, 10);
                bar
            }))
            .map_err(draw_error)?;

        if with_text {
            let value_style = TextStyle::from((FONT_FAMILY, 13).into_font())
                .pos(Pos::new(HPos::Center, VPos::Bottom));
            chart
                .draw_series(daily.iter().enumerate().map(|(i, day)| {
                    Text::new(
                        format!("${:.2}", day.total),
                        (SegmentValue::CenterOf(i), day.total),
                        value_style.clone(),
                    )
                }))
                .map_err(draw_error)?;
        }

        root.present().map_err(draw_error)?;
    }

    debug!(days = daily.len(), with_text, "Rendered daily chart");
    encode_png(pixels, BAR_SIZE).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;

    fn day(date: &str, total: f64) -> DailyTotal {
        DailyTotal {
            date: date.to_string(),
            total,
        }
    }

    #[test]
    fn test_empty_window_has_no_chart() {
        assert!(render_daily_chart(&[]).unwrap().is_none());
    }

    #[test]
    fn test_week_renders_png() {
        let daily = vec![
            day("2024-03-04", 12.5),
            day("2024-03-06", 40.0),
            day("2024-03-10", 3.25),
        ];

        let chart = render_daily_chart(&daily).unwrap().unwrap();
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(chart.base64())
            .unwrap();
        let image = image::load_from_memory_with_format(&bytes, image::ImageFormat::Png).unwrap();
        assert_eq!((image.width(), image.height()), BAR_SIZE);

        let rgb = image.to_rgb8();
        let has_bar = rgb.pixels().any(|p| p.0 == [0x87, 0xce, 0xeb]);
        assert!(has_bar);
    }

    #[test]
    fn test_single_negative_day_renders() {
        let chart = render_daily_chart(&[day("2024-03-10", -15.0)]).unwrap();
        assert!(chart.is_some());
    }

    #[test]
    fn test_value_range() {
        assert_eq!(value_range(&[day("d", 0.0)]).unwrap(), (0.0, 1.0));

        let (low, high) = value_range(&[day("a", 10.0), day("b", 20.0)]).unwrap();
        assert_eq!(low, 0.0);
        assert!((high - 23.0).abs() < 1e-9);

        let (low, high) = value_range(&[day("a", -10.0), day("b", 20.0)]).unwrap();
        assert!((low + 11.5).abs() < 1e-9);
        assert!((high - 23.0).abs() < 1e-9);
    }

    #[test]
    fn test_value_range_saturates_near_max() {
        let (low, high) = value_range(&[day("a", f64::MAX * 0.99)]).unwrap();
        assert_eq!(low, 0.0);
        assert_eq!(high, f64::MAX);

        let both_ways = [day("a", f64::MIN * 0.99), day("b", f64::MAX * 0.99)];
        assert!(matches!(
            value_range(&both_ways),
            Err(ExpenseError::Chart(_))
        ));
    }

    #[test]
    fn test_infinite_total_is_an_error() {
        // Two 1e308 rows summed by SQLite come back as inf
        let daily = vec![day("2024-03-09", 5.0), day("2024-03-10", 1e308 + 1e308)];
        assert!(matches!(
            render_daily_chart(&daily),
            Err(ExpenseError::Chart(_))
        ));

        let nan = vec![day("2024-03-10", f64::NAN)];
        assert!(matches!(render_daily_chart(&nan), Err(ExpenseError::Chart(_))));
    }

    #[test]
    fn test_near_max_total_renders() {
        let daily = vec![day("2024-03-09", 1.0), day("2024-03-10", f64::MAX * 0.99)];
        let chart = render_daily_chart(&daily).unwrap();
        assert!(chart.is_some());
    }

    #[test]
    fn test_axis_text_is_drawn() {
        let chart = render_daily_chart(&[day("2024-03-10", 12.5)]).unwrap().unwrap();
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(chart.base64())
            .unwrap();
        let rgb = image::load_from_memory_with_format(&bytes, image::ImageFormat::Png)
            .unwrap()
            .to_rgb8();

        // Left of the plot area holds only the y tick labels and axis title
        let inked = rgb
            .enumerate_pixels()
            .filter(|(x, _, p)| *x < 60 && p.0 != [0xff, 0xff, 0xff])
            .count();
        assert!(inked > 50, "only {} non-white pixels in the y label area", inked);
    }
}
