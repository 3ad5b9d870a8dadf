use crate::error::ChartError;
use chrono::{DateTime, Utc};
use std::fmt::{self, Write};

/// Format of the labels under the time axis.
pub const TIME_TICK_FORMAT: &str = "%Y-%m-%d %H:%M";

const MARGIN_LEFT: f64 = 72.0;
const MARGIN_RIGHT: f64 = 180.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 64.0;

const X_INTERVALS: i64 = 5;
const Y_INTERVALS: f64 = 5.0;
const MAX_Y_TICKS: usize = 20;
// Half of the x range used when every point sits on the same instant.
const SINGLE_INSTANT_PAD_MS: i64 = 30_000;
const EMPTY_RANGE_MS: i64 = 3_600_000;

/// One labelled line of a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    pub color: String,
    /// Points in ascending time order.
    pub points: Vec<(DateTime<Utc>, f64)>,
}

impl ChartSeries {
    pub fn new(
        label: impl Into<String>,
        color: impl Into<String>,
        points: Vec<(DateTime<Utc>, f64)>,
    ) -> Self {
        Self {
            label: label.into(),
            color: color.into(),
            points,
        }
    }
}

/// A time-based step chart: each value holds until the next point of its series.
#[derive(Debug, Clone)]
pub struct StepChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub width: u32,
    pub height: u32,
    /// Only whole numbers on the y axis (for counts like stock levels).
    pub integer_y: bool,
    pub series: Vec<ChartSeries>,
}

impl StepChart {
    pub fn new(
        title: impl Into<String>,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            width,
            height,
            integer_y: false,
            series: Vec::new(),
        }
    }

    pub fn integer_y(mut self, integer_y: bool) -> Self {
        self.integer_y = integer_y;
        self
    }

    pub fn push_series(&mut self, series: ChartSeries) {
        self.series.push(series);
    }

    /// Renders the chart as a standalone SVG document.
    ///
    /// The y axis always starts at zero; values below it are drawn on the
    /// axis. Series without points are left out entirely, legend included.
    pub fn render_svg(&self) -> Result<String, ChartError> {
        let (width, height) = (f64::from(self.width), f64::from(self.height));
        if width <= MARGIN_LEFT + MARGIN_RIGHT || height <= MARGIN_TOP + MARGIN_BOTTOM {
            return Err(ChartError::InvalidGeometry {
                title: self.title.clone(),
                width: self.width,
                height: self.height,
            });
        }

        let visible: Vec<&ChartSeries> = self.series.iter().filter(|s| !s.points.is_empty()).collect();
        if let Some(bad) = visible
            .iter()
            .find(|s| s.points.iter().any(|(_, v)| !v.is_finite()))
        {
            return Err(ChartError::NonFiniteValue {
                series: bad.label.clone(),
            });
        }

        let frame = Frame::fit(&visible, width, height, self.integer_y).ok_or_else(|| {
            ChartError::ValueOutOfRange {
                title: self.title.clone(),
            }
        })?;
        let mut svg = String::new();

        writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif" font-size="12">"#,
            w = self.width,
            h = self.height
        )?;
        writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#)?;
        writeln!(
            svg,
            r#"<text x="{:.2}" y="{:.2}" text-anchor="middle" font-size="16">{}</text>"#,
            width / 2.0,
            MARGIN_TOP / 2.0 + 6.0,
            escape(&self.title)
        )?;

        self.write_axes(&mut svg, &frame)?;

        if visible.is_empty() {
            writeln!(
                svg,
                r##"<text x="{:.2}" y="{:.2}" text-anchor="middle" fill="#777">No data</text>"##,
                (frame.left + frame.right) / 2.0,
                (frame.top + frame.bottom) / 2.0
            )?;
        }

        for series in &visible {
            writeln!(
                svg,
                r#"<path d="{}" fill="none" stroke="{}" stroke-width="1.5"/>"#,
                step_path(&frame, &series.points)?,
                escape(&series.color)
            )?;
            if let [(t, v)] = series.points.as_slice() {
                writeln!(
                    svg,
                    r#"<circle cx="{:.2}" cy="{:.2}" r="2.5" fill="{}"/>"#,
                    frame.x(t.timestamp_millis()),
                    frame.y(*v),
                    escape(&series.color)
                )?;
            }
        }

        for (row, series) in visible.iter().enumerate() {
            let x = frame.right + 16.0;
            let y = frame.top + 8.0 + 18.0 * row as f64;
            writeln!(
                svg,
                r#"<line x1="{:.2}" y1="{y:.2}" x2="{:.2}" y2="{y:.2}" stroke="{}" stroke-width="2"/>"#,
                x,
                x + 20.0,
                escape(&series.color)
            )?;
            writeln!(
                svg,
                r#"<text x="{:.2}" y="{:.2}">{}</text>"#,
                x + 26.0,
                y + 4.0,
                escape(&series.label)
            )?;
        }

        writeln!(svg, "</svg>")?;

        tracing::debug!(title = %self.title, series = visible.len(), "Rendered step chart.");
        Ok(svg)
    }

    fn write_axes(&self, svg: &mut String, frame: &Frame) -> fmt::Result {
        writeln!(
            svg,
            r##"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="none" stroke="#333"/>"##,
            frame.left,
            frame.top,
            frame.right - frame.left,
            frame.bottom - frame.top
        )?;

        for value in frame.y_ticks() {
            let y = frame.y(value);
            writeln!(
                svg,
                r##"<line x1="{:.2}" y1="{y:.2}" x2="{:.2}" y2="{y:.2}" stroke="#ddd"/>"##,
                frame.left, frame.right
            )?;
            writeln!(
                svg,
                r#"<text x="{:.2}" y="{:.2}" text-anchor="end">{}</text>"#,
                frame.left - 6.0,
                y + 4.0,
                frame.y_tick_label(value, self.integer_y)
            )?;
        }

        for millis in frame.x_ticks() {
            let Some(instant) = DateTime::<Utc>::from_timestamp_millis(millis) else {
                continue;
            };
            let x = frame.x(millis);
            writeln!(
                svg,
                r##"<line x1="{x:.2}" y1="{:.2}" x2="{x:.2}" y2="{:.2}" stroke="#333"/>"##,
                frame.bottom,
                frame.bottom + 5.0
            )?;
            writeln!(
                svg,
                r#"<text x="{x:.2}" y="{:.2}" text-anchor="middle">{}</text>"#,
                frame.bottom + 18.0,
                instant.format(TIME_TICK_FORMAT)
            )?;
        }

        writeln!(
            svg,
            r#"<text x="{:.2}" y="{:.2}" text-anchor="middle">{}</text>"#,
            (frame.left + frame.right) / 2.0,
            frame.bottom + 44.0,
            escape(&self.x_label)
        )?;
        let (lx, ly) = (18.0, (frame.top + frame.bottom) / 2.0);
        writeln!(
            svg,
            r#"<text x="{lx:.2}" y="{ly:.2}" text-anchor="middle" transform="rotate(-90 {lx:.2} {ly:.2})">{}</text>"#,
            escape(&self.y_label)
        )
    }
}

/// Maps data coordinates onto the plot area.
#[derive(Debug, Clone, PartialEq)]
struct Frame {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
    t_min: i64,
    t_max: i64,
    v_max: f64,
    y_step: f64,
}

impl Frame {
    /// `None` when the largest value leaves no finite room for a padded axis.
    fn fit(series: &[&ChartSeries], width: f64, height: f64, integer_y: bool) -> Option<Self> {
        let instants = series
            .iter()
            .flat_map(|s| s.points.iter().map(|(t, _)| t.timestamp_millis()));
        let (t_min, t_max) = match (instants.clone().min(), instants.max()) {
            (Some(lo), Some(hi)) if lo < hi => (lo, hi),
            (Some(at), Some(_)) => (at - SINGLE_INSTANT_PAD_MS, at + SINGLE_INSTANT_PAD_MS),
            _ => (0, EMPTY_RANGE_MS),
        };

        let peak = series
            .iter()
            .flat_map(|s| s.points.iter().map(|(_, v)| *v))
            .fold(0.0_f64, f64::max);
        let peak = if peak > 0.0 { peak } else { 1.0 };
        let y_step = nice_step(peak / Y_INTERVALS, integer_y);
        let v_max = ((peak / y_step).floor() + 1.0) * y_step;
        if !v_max.is_finite() {
            return None;
        }

        Some(Self {
            left: MARGIN_LEFT,
            right: width - MARGIN_RIGHT,
            top: MARGIN_TOP,
            bottom: height - MARGIN_BOTTOM,
            t_min,
            t_max,
            v_max,
            y_step,
        })
    }

    fn x(&self, millis: i64) -> f64 {
        let share = (millis - self.t_min) as f64 / (self.t_max - self.t_min) as f64;
        self.left + share * (self.right - self.left)
    }

    fn y(&self, value: f64) -> f64 {
        let shown = value.clamp(0.0, self.v_max);
        self.bottom - shown / self.v_max * (self.bottom - self.top)
    }

    fn x_ticks(&self) -> impl Iterator<Item = i64> + '_ {
        (0..=X_INTERVALS).map(move |i| self.t_min + (self.t_max - self.t_min) * i / X_INTERVALS)
    }

    fn y_ticks(&self) -> impl Iterator<Item = f64> + '_ {
        let count = ((self.v_max / self.y_step).round() as usize).min(MAX_Y_TICKS);
        (0..=count).map(move |i| i as f64 * self.y_step)
    }

    fn y_tick_label(&self, value: f64, integer_y: bool) -> String {
        if integer_y || self.y_step >= 1.0 {
            format!("{value:.0}")
        } else {
            let decimals = (-self.y_step.log10()).ceil() as usize;
            format!("{value:.decimals$}")
        }
    }
}

/// Rounds a raw tick distance up to 1, 2 or 5 times a power of ten.
fn nice_step(raw: f64, integer: bool) -> f64 {
    if raw <= 0.0 || !raw.is_finite() {
        return 1.0;
    }
    let magnitude = 10f64.powi(raw.log10().floor() as i32);
    let nice = match raw / magnitude {
        n if n <= 1.0 => 1.0,
        n if n <= 2.0 => 2.0,
        n if n <= 5.0 => 5.0,
        _ => 10.0,
    } * magnitude;
    if integer { nice.max(1.0).round() } else { nice }
}

/// Post-step outline: horizontal to the next instant, then vertical to the next value.
fn step_path(frame: &Frame, points: &[(DateTime<Utc>, f64)]) -> Result<String, fmt::Error> {
    let mut d = String::new();
    let mut points = points.iter();
    if let Some((t, v)) = points.next() {
        write!(d, "M{:.2},{:.2}", frame.x(t.timestamp_millis()), frame.y(*v))?;
    }
    for (t, v) in points {
        write!(d, " H{:.2} V{:.2}", frame.x(t.timestamp_millis()), frame.y(*v))?;
    }
    Ok(d)
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(millis: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(millis).unwrap()
    }

    fn unit_frame() -> Frame {
        Frame {
            left: 0.0,
            right: 100.0,
            top: 0.0,
            bottom: 100.0,
            t_min: 0,
            t_max: 1000,
            v_max: 10.0,
            y_step: 2.0,
        }
    }

    fn chart_with(series: Vec<ChartSeries>) -> StepChart {
        let mut chart = StepChart::new("Inventory", "Time", "Level", 960, 540);
        for s in series {
            chart.push_series(s);
        }
        chart
    }

    #[test]
    fn path_holds_each_value_until_the_next_point() {
        let points = vec![(at(0), 5.0), (at(500), 10.0), (at(1000), 0.0)];
        let d = step_path(&unit_frame(), &points).unwrap();
        assert_eq!(d, "M0.00,50.00 H50.00 V0.00 H100.00 V100.00");
    }

    #[test]
    fn negative_values_sit_on_the_zero_floor() {
        let frame = unit_frame();
        assert_eq!(frame.y(-5.0), frame.y(0.0));
        assert_eq!(frame.y(0.0), frame.bottom);
    }

    #[test]
    fn integer_axis_only_has_whole_ticks() {
        assert_eq!(nice_step(0.6, true), 1.0);
        assert_eq!(nice_step(0.6, false), 1.0);
        assert_eq!(nice_step(0.3, false), 0.5);
        assert_eq!(nice_step(0.3, true), 1.0);
        assert_eq!(nice_step(14.0, true), 20.0);

        let series = ChartSeries::new("m1", "#000", vec![(at(0), 3.0), (at(10), 1.0)]);
        let frame = Frame::fit(&[&series], 960.0, 540.0, true).unwrap();
        assert!(frame.y_ticks().all(|v| v.fract() == 0.0));
        assert!(frame.v_max > 3.0);
    }

    #[test]
    fn single_instant_gets_a_padded_time_range() {
        let series = ChartSeries::new("m1", "#000", vec![(at(60_000), 4.0)]);
        let frame = Frame::fit(&[&series], 960.0, 540.0, false).unwrap();
        assert_eq!(frame.t_max - frame.t_min, 2 * SINGLE_INSTANT_PAD_MS);
        assert!(frame.x(60_000) > frame.left && frame.x(60_000) < frame.right);
    }

    #[test]
    fn largest_finite_value_fails_instead_of_overflowing_the_axis() {
        let series = ChartSeries::new("m1", "#000", vec![(at(0), f64::MAX)]);
        assert_eq!(Frame::fit(&[&series], 960.0, 540.0, false), None);

        let chart = chart_with(vec![series]);
        assert!(matches!(
            chart.render_svg(),
            Err(ChartError::ValueOutOfRange { title }) if title == "Inventory"
        ));
    }

    #[test]
    fn huge_but_representable_axis_keeps_few_ticks() {
        let series = ChartSeries::new("m1", "#000", vec![(at(0), 1e300)]);
        let frame = Frame::fit(&[&series], 960.0, 540.0, false).unwrap();
        assert!(frame.v_max.is_finite());
        assert!(frame.y_ticks().count() <= MAX_Y_TICKS + 1);
    }

    #[test]
    fn renders_a_complete_document() {
        let chart = chart_with(vec![ChartSeries::new(
            "Acme",
            "#1f77b4",
            vec![(at(0), 5.0), (at(1000), 3.0)],
        )]);
        let svg = chart.render_svg().unwrap();

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains(">Inventory</text>"));
        assert!(svg.contains(">Acme</text>"));
        assert!(svg.contains(r##"stroke="#1f77b4""##));
        assert!(svg.contains("1970-01-01 00:00"));
    }

    #[test]
    fn labels_are_escaped() {
        let chart = chart_with(vec![ChartSeries::new("A&B <x>", "#000", vec![(at(0), 1.0)])]);
        let svg = chart.render_svg().unwrap();
        assert!(svg.contains("A&amp;B &lt;x&gt;"));
        assert!(!svg.contains("A&B <x>"));
    }

    #[test]
    fn empty_series_are_left_out() {
        let chart = chart_with(vec![
            ChartSeries::new("ghost", "#000", vec![]),
            ChartSeries::new("real", "#111", vec![(at(0), 1.0), (at(5), 2.0)]),
        ]);
        let svg = chart.render_svg().unwrap();
        assert!(!svg.contains("ghost"));
        assert_eq!(svg.matches("<path").count(), 1);
    }

    #[test]
    fn chart_without_data_still_renders() {
        let svg = chart_with(vec![]).render_svg().unwrap();
        assert!(svg.contains("No data"));
        assert_eq!(svg.matches("<path").count(), 0);
    }

    #[test]
    fn rejects_non_finite_values_and_tiny_canvases() {
        let chart = chart_with(vec![ChartSeries::new("bad", "#000", vec![(at(0), f64::NAN)])]);
        assert!(matches!(
            chart.render_svg(),
            Err(ChartError::NonFiniteValue { series }) if series == "bad"
        ));

        let tiny = StepChart::new("t", "x", "y", 100, 50);
        assert!(matches!(tiny.render_svg(), Err(ChartError::InvalidGeometry { .. })));
    }
}
