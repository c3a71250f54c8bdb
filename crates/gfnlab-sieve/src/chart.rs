//! PNG line chart of percentage retained against sieve number.
//!
//! Drawn directly into an RGB buffer: light grid, labelled axes with a tick
//! per sieve, the percentage polyline and a round marker on every point,
//! under the chart title. Text uses the built-in bitmap fonts of
//! `embedded-graphics`, so no font files are needed at runtime.

use std::convert::Infallible;
use std::io::Cursor;

use embedded_graphics::{
    mono_font::{
        ascii::{FONT_6X10, FONT_7X13, FONT_9X15_BOLD},
        MonoFont, MonoTextStyle,
    },
    pixelcolor::Rgb888,
    prelude::*,
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};
use image::{imageops, ImageFormat, Rgb, RgbImage};
use thiserror::Error;

use crate::calculator::ChartDataset;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("chart has no points")]
    Empty,

    #[error("chart has {sieves} sieves but {percentages} percentages")]
    LengthMismatch { sieves: usize, percentages: usize },

    #[error("chart point ({0}, {1}) is not finite")]
    NonFinite(f64, f64),

    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

#[derive(Debug, Clone)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub background: Rgb<u8>,
    pub grid: Rgb<u8>,
    /// Axis lines, ticks and all text
    pub axis: Rgb<u8>,
    pub line: Rgb<u8>,
    pub line_width: i64,
    pub marker_radius: i64,
    /// Approximate number of intervals on the y axis
    pub grid_divisions: u32,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 600,
            height: 400,
            background: Rgb([255, 255, 255]),
            grid: Rgb([220, 220, 220]),
            axis: Rgb([40, 40, 40]),
            line: Rgb([0, 0, 255]),
            line_width: 2,
            marker_radius: 4,
            grid_divisions: 5,
            title: "Sieve Analysis Graph".to_string(),
            x_label: "Sieve No.".to_string(),
            y_label: "P (%)".to_string(),
        }
    }
}

const MARGIN_LEFT: u32 = 70;
const MARGIN_RIGHT: u32 = 20;
const MARGIN_TOP: u32 = 40;
const MARGIN_BOTTOM: u32 = 60;

const TICK_LEN: i64 = 5;
const TICK_FONT: &MonoFont<'static> = &FONT_6X10;
const LABEL_FONT: &MonoFont<'static> = &FONT_7X13;
const TITLE_FONT: &MonoFont<'static> = &FONT_9X15_BOLD;

/// Render with the default 600×400 style.
pub fn render_png(data: &ChartDataset) -> Result<Vec<u8>, ChartError> {
    render_png_with(data, &ChartStyle::default())
}

pub fn render_png_with(data: &ChartDataset, style: &ChartStyle) -> Result<Vec<u8>, ChartError> {
    if data.sieves.len() != data.percentages.len() {
        return Err(ChartError::LengthMismatch {
            sieves: data.sieves.len(),
            percentages: data.percentages.len(),
        });
    }
    if data.sieves.is_empty() {
        return Err(ChartError::Empty);
    }
    if let Some((x, y)) = data.points().find(|(x, y)| !(x.is_finite() && y.is_finite())) {
        return Err(ChartError::NonFinite(x, y));
    }

    let frame = Frame::fit(data, style);
    let mut img = RgbImage::from_pixel(style.width, style.height, style.background);

    frame.draw_grid(&mut img, data, style);
    frame.draw_axes(&mut img, data, style);
    frame.draw_titles(&mut img, style);

    let pixels: Vec<(i64, i64)> = data.points().map(|(x, y)| frame.to_pixel(x, y)).collect();
    for pair in pixels.windows(2) {
        draw_line(&mut img, pair[0], pair[1], style.line, style.line_width);
    }
    for &p in &pixels {
        fill_circle(&mut img, p, style.marker_radius, style.line);
    }

    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    tracing::debug!(points = pixels.len(), size = bytes.len(), "chart rendered");
    Ok(bytes)
}

/// Data range, y ticks and plot rectangle.
struct Frame {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    y_ticks: Vec<f64>,
    y_decimals: usize,
    left: f64,
    top: f64,
    plot_w: f64,
    plot_h: f64,
}

impl Frame {
    fn fit(data: &ChartDataset, style: &ChartStyle) -> Self {
        let (x_min, x_max) = padded_range(data.sieves.iter().copied(), 0.05);
        // Percentages are anchored at zero unless negative weights pushed them below.
        let (lo, hi) = bounds(data.percentages.iter().copied());
        let (y_min, y_max) = padded_range([lo.min(0.0), hi.max(0.0)].into_iter(), 0.1);

        let step = nice_step(y_max - y_min, style.grid_divisions);
        let y_ticks = ticks(y_min, y_max, step);

        Self {
            x_min,
            x_max,
            y_min,
            y_max,
            y_ticks,
            y_decimals: decimals_for(step),
            left: MARGIN_LEFT as f64,
            top: MARGIN_TOP as f64,
            plot_w: style.width.saturating_sub(MARGIN_LEFT + MARGIN_RIGHT).max(1) as f64,
            plot_h: style.height.saturating_sub(MARGIN_TOP + MARGIN_BOTTOM).max(1) as f64,
        }
    }

    fn to_pixel(&self, x: f64, y: f64) -> (i64, i64) {
        let px = self.left + (x - self.x_min) / (self.x_max - self.x_min) * self.plot_w;
        let py = self.top + self.plot_h - (y - self.y_min) / (self.y_max - self.y_min) * self.plot_h;
        (px.round() as i64, py.round() as i64)
    }

    fn right(&self) -> i64 {
        (self.left + self.plot_w) as i64
    }

    fn bottom(&self) -> i64 {
        (self.top + self.plot_h) as i64
    }

    /// Grid lines follow the ticks: one vertical per sieve, one horizontal per y tick.
    fn draw_grid(&self, img: &mut RgbImage, data: &ChartDataset, style: &ChartStyle) {
        for &sieve in &data.sieves {
            let (x, _) = self.to_pixel(sieve, self.y_min);
            draw_line(img, (x, self.top as i64), (x, self.bottom()), style.grid, 1);
        }
        for &tick in &self.y_ticks {
            let (_, y) = self.to_pixel(self.x_min, tick);
            draw_line(img, (self.left as i64, y), (self.right(), y), style.grid, 1);
        }
    }

    fn draw_axes(&self, img: &mut RgbImage, data: &ChartDataset, style: &ChartStyle) {
        let (left, bottom) = (self.left as i64, self.bottom());
        draw_line(img, (left, self.top as i64), (left, bottom), style.axis, 1);
        draw_line(img, (left, bottom), (self.right(), bottom), style.axis, 1);

        for &sieve in &data.sieves {
            let (x, _) = self.to_pixel(sieve, self.y_min);
            draw_line(img, (x, bottom), (x, bottom + TICK_LEN), style.axis, 1);
            draw_text(
                img,
                &fmt_tick(sieve),
                (x, bottom + TICK_LEN + 3),
                Alignment::Center,
                Baseline::Top,
                TICK_FONT,
                style.axis,
            );
        }
        for &tick in &self.y_ticks {
            let (_, y) = self.to_pixel(self.x_min, tick);
            draw_line(img, (left - TICK_LEN, y), (left, y), style.axis, 1);
            draw_text(
                img,
                &format!("{tick:.prec$}", prec = self.y_decimals),
                (left - TICK_LEN - 3, y),
                Alignment::Right,
                Baseline::Middle,
                TICK_FONT,
                style.axis,
            );
        }
        if self.y_min < 0.0 {
            let (_, zero) = self.to_pixel(self.x_min, 0.0);
            draw_line(img, (left, zero), (self.right(), zero), style.axis, 1);
        }
    }

    fn draw_titles(&self, img: &mut RgbImage, style: &ChartStyle) {
        let centre_x = (self.left + self.plot_w / 2.0) as i64;
        let centre_y = (self.top + self.plot_h / 2.0) as i64;

        draw_text(
            img,
            &style.title,
            (centre_x, self.top as i64 / 2),
            Alignment::Center,
            Baseline::Middle,
            TITLE_FONT,
            style.axis,
        );
        draw_text(
            img,
            &style.x_label,
            (centre_x, self.bottom() + TICK_LEN + 20),
            Alignment::Center,
            Baseline::Top,
            LABEL_FONT,
            style.axis,
        );

        // The y title reads bottom to top: render it flat, then rotate.
        let (w, h) = text_size(&style.y_label, LABEL_FONT);
        let mut flat = RgbImage::from_pixel(w.max(1), h.max(1), style.background);
        draw_text(&mut flat, &style.y_label, (0, 0), Alignment::Left, Baseline::Top, LABEL_FONT, style.axis);
        let rotated = imageops::rotate270(&flat);
        imageops::overlay(img, &rotated, 10, centre_y - i64::from(w) / 2);
    }
}

/// Adapter letting `embedded-graphics` draw into an `image` buffer.
struct Canvas<'a>(&'a mut RgbImage);

impl OriginDimensions for Canvas<'_> {
    fn size(&self) -> Size {
        Size::new(self.0.width(), self.0.height())
    }
}

impl DrawTarget for Canvas<'_> {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            put(self.0, point.x.into(), point.y.into(), Rgb([color.r(), color.g(), color.b()]));
        }
        Ok(())
    }
}

fn draw_text(
    img: &mut RgbImage,
    text: &str,
    at: (i64, i64),
    alignment: Alignment,
    baseline: Baseline,
    font: &MonoFont<'_>,
    color: Rgb<u8>,
) {
    let Rgb([r, g, b]) = color;
    let character_style = MonoTextStyle::new(font, Rgb888::new(r, g, b));
    let text_style = TextStyleBuilder::new().alignment(alignment).baseline(baseline).build();
    let position = Point::new(at.0 as i32, at.1 as i32);
    let text = Text::with_text_style(text, position, character_style, text_style);
    if let Err(never) = text.draw(&mut Canvas(img)) {
        match never {}
    }
}

fn text_size(text: &str, font: &MonoFont<'_>) -> (u32, u32) {
    let style = MonoTextStyle::new(font, Rgb888::BLACK);
    let size = Text::with_baseline(text, Point::zero(), style, Baseline::Top).bounding_box().size;
    (size.width, size.height)
}

/// Sieve numbers are usually whole; print them without a trailing ".0".
fn fmt_tick(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

/// Smallest of 1, 2, 2.5, 5 × 10ⁿ giving at most `target` intervals over `span`.
fn nice_step(span: f64, target: u32) -> f64 {
    let raw = span / f64::from(target.max(1));
    let magnitude = 10f64.powf(raw.log10().floor());
    [1.0, 2.0, 2.5, 5.0, 10.0]
        .into_iter()
        .map(|m| m * magnitude)
        .find(|&step| step >= raw)
        .unwrap_or(10.0 * magnitude)
}

/// Multiples of `step` inside `[lo, hi]`.
fn ticks(lo: f64, hi: f64, step: f64) -> Vec<f64> {
    let first = (lo / step).ceil() as i64;
    let last = (hi / step).floor() as i64;
    // `+ 0.0` turns a -0.0 tick into 0.0
    (first..=last).map(|k| k as f64 * step + 0.0).collect()
}

fn decimals_for(step: f64) -> usize {
    (0..6)
        .find(|&d| {
            let scaled = step * 10f64.powi(d);
            (scaled - scaled.round()).abs() < 1e-9 * scaled.abs().max(1.0)
        })
        .map_or(6, |d| d as usize)
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

fn padded_range(values: impl Iterator<Item = f64>, pad: f64) -> (f64, f64) {
    let (lo, hi) = bounds(values);
    if (hi - lo).abs() < f64::EPSILON {
        return (lo - 1.0, hi + 1.0);
    }
    let margin = (hi - lo) * pad;
    (lo - margin, hi + margin)
}

fn put(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, color);
    }
}

/// Bresenham line, thickened by stamping a square brush.
fn draw_line(img: &mut RgbImage, from: (i64, i64), to: (i64, i64), color: Rgb<u8>, width: i64) {
    let (mut x, mut y) = from;
    let dx = (to.0 - x).abs();
    let dy = -(to.1 - y).abs();
    let sx = if x < to.0 { 1 } else { -1 };
    let sy = if y < to.1 { 1 } else { -1 };
    let mut err = dx + dy;
    let lo = -(width - 1) / 2;
    let hi = width / 2;

    loop {
        for ox in lo..=hi {
            for oy in lo..=hi {
                put(img, x + ox, y + oy, color);
            }
        }
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

fn fill_circle(img: &mut RgbImage, center: (i64, i64), radius: i64, color: Rgb<u8>) {
    for oy in -radius..=radius {
        for ox in -radius..=radius {
            if ox * ox + oy * oy <= radius * radius {
                put(img, center.0 + ox, center.1 + oy, color);
            }
        }
    }
}
