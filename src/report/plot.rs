use crate::engine::Backtester;
use crate::metrics::CumulativePoint;
use crate::report::glyphs::{draw_text, draw_text_vertical, put, text_width, GLYPH_HEIGHT};
use crate::report::{PlotLabels, ReportError};
use image::{Rgb, RgbImage};
use std::path::{Path, PathBuf};
use tracing::info;

pub mod colors {
    use image::Rgb;

    pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
    pub const GRID_GRAY: Rgb<u8> = Rgb([220, 220, 220]);
    pub const BLUE: Rgb<u8> = Rgb([31, 119, 180]);
}

//layout and colours of the cumulative return chart
#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    pub background: Rgb<u8>,
    pub line_color: Rgb<u8>,
    pub axis_color: Rgb<u8>,
    pub grid_color: Rgb<u8>,
    pub text_color: Rgb<u8>,
    pub margin_left: u32,
    pub margin_right: u32,
    pub margin_top: u32,
    pub margin_bottom: u32,
    //grid divisions per axis
    pub grid_divisions: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig {
            width: 1000,
            height: 600,
            background: colors::WHITE,
            line_color: colors::BLUE,
            axis_color: colors::BLACK,
            grid_color: colors::GRID_GRAY,
            text_color: colors::BLACK,
            margin_left: 100,
            margin_right: 50,
            margin_top: 60,
            margin_bottom: 80,
            grid_divisions: 5,
        }
    }
}

struct PlotArea {
    left: i64,
    right: i64,
    top: i64,
    bottom: i64,
}

impl PlotArea {
    fn new(config: &ChartConfig) -> Self {
        let left = config.margin_left as i64;
        let top = config.margin_top as i64;
        PlotArea {
            left,
            right: (config.width as i64 - config.margin_right as i64).max(left + 1),
            top,
            bottom: (config.height as i64 - config.margin_bottom as i64).max(top + 1),
        }
    }

    fn x_at(&self, index: usize, count: usize) -> i64 {
        if count < 2 {
            return (self.left + self.right) / 2;
        }
        let t = index as f64 / (count - 1) as f64;
        self.left + ((self.right - self.left) as f64 * t).round() as i64
    }

    fn y_at(&self, value: f64, low: f64, high: f64) -> i64 {
        let t = (value - low) / (high - low);
        self.bottom - ((self.bottom - self.top) as f64 * t).round() as i64
    }
}

//bresenham line between two points, clipped to the image
pub fn draw_line(img: &mut RgbImage, from: (i64, i64), to: (i64, i64), color: Rgb<u8>) {
    let (mut x, mut y) = from;
    let dx = (to.0 - x).abs();
    let dy = -(to.1 - y).abs();
    let sx = if x < to.0 { 1 } else { -1 };
    let sy = if y < to.1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        put(img, x, y, color);
        if x == to.0 && y == to.1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

//y-axis bounds with a little headroom, safe for flat series
fn value_range(points: &[CumulativePoint]) -> (f64, f64) {
    let finite = points.iter().map(|p| p.value).filter(|v| v.is_finite());
    let (low, high) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });

    if !low.is_finite() {
        return (0.0, 1.0);
    }

    let span = high - low;
    let pad = if span > 0.0 {
        span * 0.05
    } else {
        (low.abs() * 0.05).max(0.01)
    };
    (low - pad, high + pad)
}

//renders the cumulative return curve as a titled line chart with grid
pub fn render_chart(points: &[CumulativePoint], title: &str, config: &ChartConfig) -> RgbImage {
    let mut img = RgbImage::from_pixel(config.width, config.height, config.background);
    let area = PlotArea::new(config);
    let (low, high) = value_range(points);
    let divisions = config.grid_divisions.max(1);
    let glyph_h = GLYPH_HEIGHT as i64;

    //horizontal grid and value ticks
    for k in 0..=divisions {
        let value = low + (high - low) * k as f64 / divisions as f64;
        let y = area.y_at(value, low, high);
        draw_line(&mut img, (area.left, y), (area.right, y), config.grid_color);

        let label = format!("{:.2}", value);
        let x = area.left - 8 - text_width(&label, 1) as i64;
        draw_text(&mut img, x, y - glyph_h / 2, &label, 1, config.text_color);
    }

    //vertical grid and date ticks
    for k in 0..=divisions {
        let x = area.left + (area.right - area.left) * k as i64 / divisions as i64;
        draw_line(&mut img, (x, area.top), (x, area.bottom), config.grid_color);

        if let Some(last) = points.len().checked_sub(1) {
            let index = ((last as f64) * k as f64 / divisions as f64).round() as usize;
            let label = points[index].date.format("%Y-%m-%d").to_string();
            let half = text_width(&label, 1) as i64 / 2;
            draw_text(&mut img, x - half, area.bottom + 10, &label, 1, config.text_color);
        }
    }

    //axes
    draw_line(&mut img, (area.left, area.top), (area.left, area.bottom), config.axis_color);
    draw_line(&mut img, (area.left, area.bottom), (area.right, area.bottom), config.axis_color);

    //series, two pixels thick
    let count = points.len();
    let coords: Vec<Option<(i64, i64)>> = points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            p.value
                .is_finite()
                .then(|| (area.x_at(i, count), area.y_at(p.value, low, high)))
        })
        .collect();

    for pair in coords.windows(2) {
        if let (Some(a), Some(b)) = (pair[0], pair[1]) {
            draw_line(&mut img, a, b, config.line_color);
            draw_line(&mut img, (a.0, a.1 + 1), (b.0, b.1 + 1), config.line_color);
        }
    }
    if let [Some(only)] = coords.as_slice() {
        put(&mut img, only.0, only.1, config.line_color);
    }

    //title and axis labels
    let title_x = (config.width as i64 - text_width(title, 2) as i64) / 2;
    let title_y = (config.margin_top as i64 - 2 * glyph_h) / 2;
    draw_text(&mut img, title_x, title_y, title, 2, config.text_color);

    let x_label = "Date";
    let x_label_x = (area.left + area.right - text_width(x_label, 2) as i64) / 2;
    draw_text(&mut img, x_label_x, area.bottom + 35, x_label, 2, config.text_color);

    let y_label = "Cumulative Return";
    let y_label_bottom = (area.top + area.bottom + text_width(y_label, 2) as i64) / 2;
    draw_text_vertical(&mut img, 12, y_label_bottom, y_label, 2, config.text_color);

    img
}

//renders the backtester's cumulative returns into output_dir under the
//file name derived from the labels
pub fn save_plot(
    backtester: &Backtester,
    labels: &PlotLabels,
    output_dir: &Path,
    config: &ChartConfig,
) -> Result<PathBuf, ReportError> {
    let points = backtester
        .cumulative_returns()
        .ok_or(ReportError::NotEvaluated)?;

    let path = output_dir.join(labels.file_name());
    let img = render_chart(&points, &labels.title(), config);
    img.save(&path)?;

    info!(path = ?path, points = points.len(), "saved cumulative return plot");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn curve(values: &[f64]) -> Vec<CumulativePoint> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        start
            .iter_days()
            .zip(values)
            .map(|(date, &value)| CumulativePoint { date, value })
            .collect()
    }

    fn small_config() -> ChartConfig {
        ChartConfig {
            width: 320,
            height: 200,
            ..Default::default()
        }
    }

    fn count_color(img: &RgbImage, color: Rgb<u8>) -> usize {
        img.pixels().filter(|&&p| p == color).count()
    }

    #[test]
    fn test_render_dimensions_and_line() {
        let config = small_config();
        let img = render_chart(&curve(&[1.0, 1.1, 0.95, 1.2]), "TEST", &config);

        assert_eq!(img.width(), 320);
        assert_eq!(img.height(), 200);
        assert!(count_color(&img, config.line_color) > 0);
        assert!(count_color(&img, config.grid_color) > 0);
        //corner stays background
        assert_eq!(*img.get_pixel(319, 199), config.background);
    }

    #[test]
    fn test_render_flat_and_empty_series() {
        let config = small_config();
        let flat = render_chart(&curve(&[1.0, 1.0, 1.0]), "FLAT", &config);
        assert!(count_color(&flat, config.line_color) > 0);

        let empty = render_chart(&[], "EMPTY", &config);
        assert_eq!(count_color(&empty, config.line_color), 0);
    }

    #[test]
    fn test_value_range_pads_flat_series() {
        let (low, high) = value_range(&curve(&[2.0, 2.0]));
        assert!(low < 2.0 && high > 2.0);
        assert_eq!(value_range(&[]), (0.0, 1.0));
    }

    #[test]
    fn test_draw_line_endpoints() {
        let mut img = RgbImage::from_pixel(10, 10, colors::WHITE);
        draw_line(&mut img, (1, 1), (8, 5), colors::BLACK);
        assert_eq!(*img.get_pixel(1, 1), colors::BLACK);
        assert_eq!(*img.get_pixel(8, 5), colors::BLACK);
    }

    #[test]
    fn test_draw_line_clips_outside_image() {
        let mut img = RgbImage::from_pixel(10, 10, colors::WHITE);
        draw_line(&mut img, (-5, -5), (14, 14), colors::BLACK);
        assert_eq!(*img.get_pixel(0, 0), colors::BLACK);
        assert_eq!(*img.get_pixel(9, 9), colors::BLACK);
    }
}
