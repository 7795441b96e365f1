//! # Bitmap Chart Rendering
//!
//! Draws the two speed curves with `embedded-graphics` into a 1-bit
//! [`Bitmap`] and exports it as a binary PBM (P4) image for `--plot`.
//!
//! The drawing functions take any `DrawTarget<Color = BinaryColor>`, so the
//! same code can drive a physical monochrome panel.
//!
//! Layout (default 640×260): two panels side by side, coverage on the left
//! and total cost on the right, each with axes, min/max labels and the
//! optimum circled.

use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Circle, Line, PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};

use crate::CurveSample;

pub const DEFAULT_WIDTH: u32 = 640;
pub const DEFAULT_HEIGHT: u32 = 260;

/// Packed 1-bit canvas; `BinaryColor::On` is ink.
#[derive(Clone, Debug, PartialEq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    row_bytes: usize,
    pixels: Vec<u8>,
}

impl Bitmap {
    pub fn new(width: u32, height: u32) -> Self {
        let row_bytes = width.div_ceil(8) as usize;
        Self {
            width,
            height,
            row_bytes,
            pixels: vec![0; row_bytes * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: BinaryColor) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = y as usize * self.row_bytes + (x / 8) as usize;
        let bit = 0x80 >> (x % 8);
        match color {
            BinaryColor::On => self.pixels[index] |= bit,
            BinaryColor::Off => self.pixels[index] &= !bit,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<BinaryColor> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = y as usize * self.row_bytes + (x / 8) as usize;
        let bit = 0x80 >> (x % 8);
        Some(if self.pixels[index] & bit != 0 {
            BinaryColor::On
        } else {
            BinaryColor::Off
        })
    }

    /// Number of inked pixels
    pub fn ink_count(&self) -> u32 {
        self.pixels.iter().map(|b| b.count_ones()).sum()
    }

    /// Binary PBM (P4) encoding; PBM uses 1 for black, matching the packing.
    pub fn to_pbm(&self) -> Vec<u8> {
        let mut out = format!("P4\n{} {}\n", self.width, self.height).into_bytes();
        out.extend_from_slice(&self.pixels);
        out
    }
}

impl OriginDimensions for Bitmap {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Bitmap {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0 && point.y >= 0 {
                self.set_pixel(point.x as u32, point.y as u32, color);
            }
        }
        Ok(())
    }
}

/// Axis bounds for a series, padded when the series is flat.
fn bounds(points: &[(f64, f64)]) -> ((f64, f64), (f64, f64)) {
    let (mut x0, mut x1, mut y0, mut y1) = points.iter().fold(
        (
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::INFINITY,
            f64::NEG_INFINITY,
        ),
        |(x0, x1, y0, y1), (x, y)| (x0.min(*x), x1.max(*x), y0.min(*y), y1.max(*y)),
    );
    if x1 - x0 <= f64::EPSILON {
        x0 -= 0.5;
        x1 += 0.5;
    }
    if y1 - y0 <= f64::EPSILON {
        y0 -= 0.5;
        y1 += 0.5;
    }
    ((x0, x1), (y0, y1))
}

/// Draw one series inside `area`, circling the point nearest `marker_x`.
pub fn draw_series<D>(
    target: &mut D,
    area: Rectangle,
    title: &str,
    points: &[(f64, f64)],
    marker_x: Option<f64>,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let text_style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
    let axis = PrimitiveStyle::with_stroke(BinaryColor::On, 1);
    let curve = PrimitiveStyle::with_stroke(BinaryColor::On, 2);

    // Room for the title above and labels left/below
    let left = area.top_left.x + 40;
    let top = area.top_left.y + 16;
    let right = area.top_left.x + area.size.width as i32 - 8;
    let bottom = area.top_left.y + area.size.height as i32 - 16;

    Text::with_baseline(
        title,
        area.top_left + Point::new(4, 2),
        text_style,
        Baseline::Top,
    )
    .draw(target)?;
    Line::new(Point::new(left, top), Point::new(left, bottom))
        .into_styled(axis)
        .draw(target)?;
    Line::new(Point::new(left, bottom), Point::new(right, bottom))
        .into_styled(axis)
        .draw(target)?;

    if points.is_empty() {
        return Ok(());
    }

    let ((x0, x1), (y0, y1)) = bounds(points);
    let to_screen = |(x, y): (f64, f64)| {
        let px = left as f64 + (x - x0) / (x1 - x0) * (right - left) as f64;
        let py = bottom as f64 - (y - y0) / (y1 - y0) * (bottom - top) as f64;
        Point::new(px.round() as i32, py.round() as i32)
    };

    let label = |v: f64| {
        if v.abs() >= 1000.0 {
            format!("{:.0}k", v / 1000.0)
        } else {
            format!("{v:.1}")
        }
    };
    let label_x = area.top_left.x + 2;
    Text::with_baseline(
        &label(y1),
        Point::new(label_x, top),
        text_style,
        Baseline::Middle,
    )
    .draw(target)?;
    Text::with_baseline(
        &label(y0),
        Point::new(label_x, bottom),
        text_style,
        Baseline::Middle,
    )
    .draw(target)?;
    Text::with_baseline(
        &format!("{x0:.1}"),
        Point::new(left - 6, bottom + 3),
        text_style,
        Baseline::Top,
    )
    .draw(target)?;
    Text::with_baseline(
        &format!("{x1:.1} km/h"),
        Point::new(right - 54, bottom + 3),
        text_style,
        Baseline::Top,
    )
    .draw(target)?;

    for pair in points.windows(2) {
        Line::new(to_screen(pair[0]), to_screen(pair[1]))
            .into_styled(curve)
            .draw(target)?;
    }
    if points.len() == 1 {
        Pixel(to_screen(points[0]), BinaryColor::On).draw(target)?;
    }

    if let Some(mx) = marker_x {
        let nearest = points
            .iter()
            .min_by(|a, b| (a.0 - mx).abs().total_cmp(&(b.0 - mx).abs()));
        if let Some(point) = nearest {
            let centre = to_screen(*point);
            Circle::with_center(centre, 9)
                .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
                .draw(target)?;
            Line::new(Point::new(centre.x, centre.y + 6), Point::new(centre.x, bottom))
                .into_styled(axis)
                .draw(target)?;
        }
    }
    Ok(())
}

/// Draw both curves side by side on `target`.
pub fn draw_curves<D>(
    target: &mut D,
    sample: &CurveSample,
    optimum_speed: Option<f64>,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor> + OriginDimensions,
{
    let size = target.size();
    let half = size.width / 2;
    let left_panel = Rectangle::new(Point::zero(), Size::new(half, size.height));
    let right_panel = Rectangle::new(
        Point::new(half as i32, 0),
        Size::new(size.width - half, size.height),
    );

    draw_series(target, left_panel, "Coverage (ha/h)", &sample.coverage, optimum_speed)?;
    draw_series(target, right_panel, "Total cost", &sample.cost, optimum_speed)
}

/// Render both curves to a fresh bitmap of the default size.
pub fn render_curves(sample: &CurveSample, optimum_speed: Option<f64>) -> Bitmap {
    let mut bitmap = Bitmap::new(DEFAULT_WIDTH, DEFAULT_HEIGHT);
    match draw_curves(&mut bitmap, sample, optimum_speed) {
        Ok(()) => bitmap,
        Err(never) => match never {},
    }
}
