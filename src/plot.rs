//! Altitude-versus-time charts for one or more named flights.

use std::fs;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use thiserror::Error;
use tracing::warn;

/// One line on the chart.
#[derive(Debug, Clone)]
pub struct AltitudeSeries {
    pub name: String,
    /// `(time_s, altitude_m)` pairs.
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("nothing to plot: every series is empty")]
    NoData,
    #[error("failed to prepare output directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to render chart: {0}")]
    Draw(String),
}

#[derive(Debug, Clone, Copy)]
struct Bounds {
    t_min: f64,
    t_max: f64,
    z_min: f64,
    z_max: f64,
}

/// Render every series into a PNG at `output`.
///
/// If the labelled chart cannot be drawn (typically no usable system font), the chart is
/// redrawn without caption, axis labels, or legend.
pub fn render_altitude_plot(
    output: &Path,
    series: &[AltitudeSeries],
    width: u32,
    height: u32,
) -> Result<(), PlotError> {
    let bounds = bounds(series).ok_or(PlotError::NoData)?;

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let root = BitMapBackend::new(output, (width, height)).into_drawing_area();
    root.fill(&WHITE).map_err(draw_error)?;
    if let Err(err) = draw_chart(&root, series, bounds, true) {
        warn!(error = %err, "labelled altitude chart failed, redrawing without text");
        root.fill(&WHITE).map_err(draw_error)?;
        draw_chart(&root, series, bounds, false).map_err(draw_error)?;
    }
    root.present().map_err(draw_error)?;
    Ok(())
}

fn draw_error<E: std::fmt::Display>(err: E) -> PlotError {
    PlotError::Draw(err.to_string())
}

fn bounds(series: &[AltitudeSeries]) -> Option<Bounds> {
    let mut points = series
        .iter()
        .flat_map(|s| s.points.iter())
        .filter(|(t, z)| t.is_finite() && z.is_finite())
        .peekable();
    let (t0, z0) = **points.peek()?;
    let mut b = Bounds {
        t_min: t0,
        t_max: t0,
        z_min: z0,
        z_max: z0,
    };
    for &(t, z) in points {
        b.t_min = b.t_min.min(t);
        b.t_max = b.t_max.max(t);
        b.z_min = b.z_min.min(z);
        b.z_max = b.z_max.max(z);
    }
    if b.t_max - b.t_min < f64::EPSILON {
        b.t_min -= 1.0;
        b.t_max += 1.0;
    }
    let pad = ((b.z_max - b.z_min) * 0.05).max(1.0);
    b.z_min -= pad;
    b.z_max += pad;
    Some(b)
}

fn select_font_family() -> FontFamily<'static> {
    if cfg!(target_os = "macos") {
        FontFamily::Name("Helvetica")
    } else if cfg!(target_os = "windows") {
        FontFamily::Name("Arial")
    } else {
        FontFamily::Name("DejaVu Sans")
    }
}

fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    series: &[AltitudeSeries],
    bounds: Bounds,
    labelled: bool,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let font_family = select_font_family();
    let caption_font = FontDesc::new(font_family, 24.0, FontStyle::Bold);
    let label_font = FontDesc::new(font_family, 16.0, FontStyle::Normal);

    let mut builder = ChartBuilder::on(root);
    builder.margin(20);
    if labelled {
        builder
            .caption("Altitude Plot", caption_font)
            .x_label_area_size(50)
            .y_label_area_size(80);
    }
    let mut chart = builder.build_cartesian_2d(
        bounds.t_min..bounds.t_max,
        bounds.z_min..bounds.z_max,
    )?;

    if labelled {
        chart
            .configure_mesh()
            .x_desc("Time (sec)")
            .y_desc("Altitude (m)")
            .label_style(label_font.clone())
            .x_labels(8)
            .y_labels(8)
            .draw()?;
    } else {
        chart.configure_mesh().x_labels(0).y_labels(0).draw()?;
    }

    for (idx, s) in series.iter().enumerate() {
        let color = Palette99::pick(idx).mix(1.0);
        let points = s
            .points
            .iter()
            .copied()
            .filter(|(t, z)| t.is_finite() && z.is_finite());
        let drawn = chart.draw_series(LineSeries::new(points, color.stroke_width(2)))?;
        if labelled {
            drawn.label(s.name.as_str()).legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
        }
    }

    if labelled {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .label_font(label_font)
            .draw()?;
    }
    Ok(())
}
