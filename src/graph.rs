#![cfg(not(tarpaulin_include))]

use crate::aggregate::GroupTotal;
use crate::error::GraphError;
use plotters::coord::Shift;
use plotters::prelude::*;

/// Shown in an empty chart.
pub const EMPTY_MESSAGE: &str = "无数据";

/// Sequential color scale used to shade bars by value.
///
/// Bars are colored along the scale from the light end (smallest value) to
/// the dark end (largest value).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Palette {
    Blues,
    Oranges,
}

impl Palette {
    fn endpoints(self) -> ((u8, u8, u8), (u8, u8, u8)) {
        match self {
            Palette::Blues => ((198, 219, 239), (8, 48, 107)),
            Palette::Oranges => ((253, 208, 162), (127, 39, 4)),
        }
    }

    /// Color at position `t` of the scale, clamped to `0.0..=1.0`.
    pub fn shade(self, t: f64) -> RGBColor {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let ((r0, g0, b0), (r1, g1, b1)) = self.endpoints();
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        RGBColor(mix(r0, r1), mix(g0, g1), mix(b0, b1))
    }
}

/// Direction the bars grow in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    /// Categories on the Y axis, values on the X axis
    Horizontal,
    /// Categories on the X axis, values on the Y axis
    Vertical,
}

/// Configuration options for chart generation
#[derive(Clone, Debug)]
pub struct GraphOptions {
    /// Title displayed at the top of the chart
    pub title: String,

    /// Label for the X-axis
    pub x_label: String,

    /// Label for the Y-axis
    pub y_label: String,

    /// Width of the chart in pixels
    pub width: u32,

    /// Height of the chart in pixels
    pub height: u32,

    pub palette: Palette,

    pub orientation: Orientation,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            title: "Chart".to_string(),
            x_label: "X Axis".to_string(),
            y_label: "Y Axis".to_string(),
            width: 640,
            height: 400,
            palette: Palette::Blues,
            orientation: Orientation::Vertical,
        }
    }
}

impl GraphOptions {
    /// Horizontal bars of sales per product type.
    pub fn product_sales() -> Self {
        Self {
            title: "按产品类型划分的销售额".to_string(),
            x_label: "销售额（RMB）".to_string(),
            y_label: "产品类型".to_string(),
            palette: Palette::Blues,
            orientation: Orientation::Horizontal,
            ..Self::default()
        }
    }

    /// Vertical bars of sales per hour of day.
    pub fn hourly_sales() -> Self {
        Self {
            title: "按小时数划分的销售额".to_string(),
            x_label: "交易小时（24小时制）".to_string(),
            y_label: "销售额（RMB）".to_string(),
            palette: Palette::Oranges,
            orientation: Orientation::Vertical,
            ..Self::default()
        }
    }
}

/// Category labels and bar values, in drawing order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BarSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl From<&[GroupTotal<String>]> for BarSeries {
    fn from(groups: &[GroupTotal<String>]) -> Self {
        Self {
            labels: groups.iter().map(|g| g.key.clone()).collect(),
            values: groups.iter().map(|g| g.total).collect(),
        }
    }
}

impl From<&[GroupTotal<u8>]> for BarSeries {
    fn from(groups: &[GroupTotal<u8>]) -> Self {
        Self {
            labels: groups.iter().map(|g| g.key.to_string()).collect(),
            values: groups.iter().map(|g| g.total).collect(),
        }
    }
}

fn render_err<E: std::fmt::Display>(e: E) -> GraphError {
    GraphError::Render(e.to_string())
}

/// Draws `series` as a bar chart onto `root`.
///
/// Bars keep the series order: the first entry is at the bottom of a
/// horizontal chart and at the left of a vertical one.
fn draw_bars<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    series: &BarSeries,
    options: &GraphOptions,
) -> Result<(), GraphError> {
    root.fill(&WHITE).map_err(render_err)?;

    if series.values.is_empty() {
        let (width, height) = root.dim_in_pixel();
        root.draw(&Text::new(
            options.title.clone(),
            (10, 10),
            ("sans-serif", 22).into_font(),
        ))
        .map_err(render_err)?;
        root.draw(&Text::new(
            EMPTY_MESSAGE,
            (width as i32 / 2 - 30, height as i32 / 2),
            ("sans-serif", 18).into_font(),
        ))
        .map_err(render_err)?;
        root.present().map_err(render_err)?;
        return Ok(());
    }

    let max = series.values.iter().copied().fold(0.0, f64::max);
    let min = series.values.iter().copied().fold(0.0, f64::min);
    let upper = if max > 0.0 { max * 1.1 } else { 1.0 };
    let count = series.labels.len() as i32;

    let category_label = |v: &SegmentValue<i32>| match v {
        SegmentValue::CenterOf(i) => series.labels.get(*i as usize).cloned().unwrap_or_default(),
        _ => String::new(),
    };
    let value_label = |v: &f64| format!("{:.0}", v);
    let shade = |v: f64| options.palette.shade(v / upper).filled();

    match options.orientation {
        Orientation::Horizontal => {
            let mut chart = ChartBuilder::on(root)
                .caption(&options.title, ("sans-serif", 22).into_font())
                .margin(10)
                .x_label_area_size(40)
                .y_label_area_size(110)
                .build_cartesian_2d(min..upper, (0..count).into_segmented())
                .map_err(render_err)?;

            chart
                .configure_mesh()
                .disable_y_mesh()
                .y_labels(series.labels.len())
                .y_label_formatter(&category_label)
                .x_label_formatter(&value_label)
                .x_desc(options.x_label.as_str())
                .y_desc(options.y_label.as_str())
                .draw()
                .map_err(render_err)?;

            chart
                .draw_series(series.values.iter().enumerate().map(|(i, &v)| {
                    let i = i as i32;
                    let mut bar = Rectangle::new(
                        [(0.0, SegmentValue::Exact(i)), (v, SegmentValue::Exact(i + 1))],
                        shade(v),
                    );
                    bar.set_margin(4, 4, 0, 0);
                    bar
                }))
                .map_err(render_err)?;
        }
        Orientation::Vertical => {
            let mut chart = ChartBuilder::on(root)
                .caption(&options.title, ("sans-serif", 22).into_font())
                .margin(10)
                .x_label_area_size(40)
                .y_label_area_size(70)
                .build_cartesian_2d((0..count).into_segmented(), min..upper)
                .map_err(render_err)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_labels(series.labels.len())
                .x_label_formatter(&category_label)
                .y_label_formatter(&value_label)
                .x_desc(options.x_label.as_str())
                .y_desc(options.y_label.as_str())
                .draw()
                .map_err(render_err)?;

            chart
                .draw_series(series.values.iter().enumerate().map(|(i, &v)| {
                    let i = i as i32;
                    let mut bar = Rectangle::new(
                        [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), v)],
                        shade(v),
                    );
                    bar.set_margin(0, 0, 4, 4);
                    bar
                }))
                .map_err(render_err)?;
        }
    }

    root.present().map_err(render_err)?;
    Ok(())
}

/// Renders a bar chart as an SVG document.
///
/// # Examples
/// ```
/// use dashpage::graph::{BarSeries, GraphOptions, bar_chart_svg};
///
/// let series = BarSeries {
///     labels: vec!["A".to_string(), "B".to_string()],
///     values: vec![15.0, 30.0],
/// };
/// let svg = bar_chart_svg(&series, &GraphOptions::product_sales()).unwrap();
/// assert!(svg.contains("<svg"));
/// ```
pub fn bar_chart_svg(series: &BarSeries, options: &GraphOptions) -> Result<String, GraphError> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (options.width, options.height))
            .into_drawing_area();
        draw_bars(&root, series, options)?;
    }
    Ok(svg)
}

/// Horizontal bar chart of sales per product type, as SVG.
pub fn product_sales_chart(groups: &[GroupTotal<String>]) -> Result<String, GraphError> {
    bar_chart_svg(&BarSeries::from(groups), &GraphOptions::product_sales())
}

/// Vertical bar chart of sales per hour, as SVG.
pub fn hourly_sales_chart(groups: &[GroupTotal<u8>]) -> Result<String, GraphError> {
    bar_chart_svg(&BarSeries::from(groups), &GraphOptions::hourly_sales())
}
