use std::path::{Path, PathBuf};

use chrono::DateTime;
use plotters::prelude::*;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{AreaStyle, ChartPlan, SeriesType, Theme};
use crate::services::chart_service::HALLMARK_LABEL_STEP;
use crate::utils::errors::ChartError;

/// A plotters-backed drawing surface bound to one output file
///
/// Keeps the last applied plan so a resize can redraw without re-planning.
pub struct ChartSurface {
    id: Uuid,
    output: PathBuf,
    size: (u32, u32),
    theme: Theme,
    title: String,
    current: Option<ChartPlan>,
    renders: usize,
}

impl ChartSurface {
    fn new(output: PathBuf, size: (u32, u32), theme: Theme, title: String) -> Self {
        let id = Uuid::new_v4();
        info!("🎨 Created chart surface {} ({}x{}) -> {}", id, size.0, size.1, output.display());
        ChartSurface {
            id,
            output,
            size,
            theme,
            title,
            current: None,
            renders: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn renders(&self) -> usize {
        self.renders
    }

    /// Replace the configuration and redraw
    pub fn apply(&mut self, plan: ChartPlan) -> Result<(), ChartError> {
        self.current = Some(plan);
        self.draw()
    }

    /// Redraw the current configuration at a new size
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), ChartError> {
        if self.size == (width, height) {
            return Ok(());
        }
        debug!("Resizing surface {} to {}x{}", self.id, width, height);
        self.size = (width, height);
        self.draw()
    }

    fn draw(&mut self) -> Result<(), ChartError> {
        let plan = match &self.current {
            Some(plan) => plan,
            None => return Ok(()),
        };
        draw_plan(&self.output, self.size, self.theme, &self.title, plan)?;
        self.renders += 1;
        debug!("Surface {} rendered ({} total)", self.id, self.renders);
        Ok(())
    }
}

impl Drop for ChartSurface {
    fn drop(&mut self) {
        debug!("Chart surface {} disposed after {} render(s)", self.id, self.renders);
    }
}

/// Owns at most one surface: created lazily on first render, reused afterwards,
/// torn down on `dispose` or drop
pub struct ChartHost {
    output: PathBuf,
    size: (u32, u32),
    theme: Theme,
    title: String,
    surface: Option<ChartSurface>,
}

impl ChartHost {
    pub fn new(output: PathBuf, size: (u32, u32), theme: Theme, title: &str) -> Self {
        ChartHost {
            output,
            size,
            theme,
            title: title.to_string(),
            surface: None,
        }
    }

    /// The existing surface, or a new one
    pub fn surface(&mut self) -> &mut ChartSurface {
        let (output, size, theme, title) = (&self.output, self.size, self.theme, &self.title);
        self.surface
            .get_or_insert_with(|| ChartSurface::new(output.clone(), size, theme, title.clone()))
    }

    pub fn is_mounted(&self) -> bool {
        self.surface.is_some()
    }

    pub fn render(&mut self, plan: ChartPlan) -> Result<(), ChartError> {
        self.surface().apply(plan)
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), ChartError> {
        self.size = (width, height);
        match self.surface.as_mut() {
            Some(surface) => surface.resize(width, height),
            None => Ok(()),
        }
    }

    pub fn dispose(&mut self) {
        if let Some(surface) = self.surface.take() {
            info!("Disposing chart surface {}", surface.id());
        }
    }
}

impl Drop for ChartHost {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Parse `#rrggbb`, `#rgb` or `rgb(a)(r, g, b[, a])`; `transparent` and unknown forms give None
pub fn parse_color(value: &str) -> Option<RGBColor> {
    let value = value.trim();

    if let Some(hex_digits) = value.strip_prefix('#') {
        let expanded: String = match hex_digits.len() {
            3 => hex_digits.chars().flat_map(|c| [c, c]).collect(),
            6 => hex_digits.to_string(),
            _ => return None,
        };
        let bytes = hex::decode(expanded).ok()?;
        return Some(RGBColor(bytes[0], bytes[1], bytes[2]));
    }

    let inner = value
        .strip_prefix("rgba(")
        .or_else(|| value.strip_prefix("rgb("))?
        .strip_suffix(')')?;
    let channels: Vec<u8> = inner
        .split(',')
        .take(3)
        .map(|c| c.trim().parse::<u8>())
        .collect::<Result<_, _>>()
        .ok()?;
    if channels.len() != 3 {
        return None;
    }
    Some(RGBColor(channels[0], channels[1], channels[2]))
}

fn render_err<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Render(e.to_string())
}

fn palette(theme: Theme) -> (RGBColor, RGBColor) {
    match theme {
        Theme::Light => (WHITE, BLACK),
        Theme::Dark => (RGBColor(22, 22, 26), RGBColor(220, 220, 220)),
    }
}

/// Min/max timestamp (ms) over every series
fn time_range(plan: &ChartPlan) -> Option<(i64, i64)> {
    let stamps = plan
        .series
        .iter()
        .flat_map(|s| s.data.iter().map(|p| p.0.timestamp_millis()));
    let (min, max) = stamps.fold(None, |acc: Option<(i64, i64)>, t| match acc {
        Some((lo, hi)) => Some((lo.min(t), hi.max(t))),
        None => Some((t, t)),
    })?;

    // single point: widen to one day so the axis has a span
    if min == max {
        Some((min, max + 86_400_000))
    } else {
        Some((min, max))
    }
}

/// Value range of an axis, anchored at zero with 10% headroom
fn value_range(plan: &ChartPlan, axis_index: usize) -> (f64, f64) {
    let (min, max) = plan
        .series
        .iter()
        .filter(|s| s.y_axis_index == axis_index)
        .flat_map(|s| s.data.iter().filter_map(|p| p.1.as_f64()))
        .fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));

    let span = (max - min).max(1e-8);
    (min, max + span * 0.1)
}

fn normalize(value: f64, (lo, hi): (f64, f64)) -> f64 {
    (value - lo) / (hi - lo)
}

fn denormalize(value: f64, (lo, hi): (f64, f64)) -> f64 {
    lo + value * (hi - lo)
}

/// Draw a plan to a PNG file
///
/// Every axis is normalized onto one 0..1 plotting range. The first axis labels
/// the left edge and the second the right edge; later axes share the scale.
pub fn draw_plan(
    path: &Path,
    (width, height): (u32, u32),
    theme: Theme,
    title: &str,
    plan: &ChartPlan,
) -> Result<(), ChartError> {
    let (x_min, x_max) =
        time_range(plan).ok_or_else(|| ChartError::Render("no data points to draw".to_string()))?;

    let ranges: Vec<(f64, f64)> = plan
        .axis_groups
        .iter()
        .map(|axis| value_range(plan, axis.index))
        .collect();
    if ranges.is_empty() {
        return Err(ChartError::Render("plan has no axes".to_string()));
    }
    if plan.axis_groups.len() > 2 {
        debug!(
            "{} axes planned; axes beyond the second share the normalized scale",
            plan.axis_groups.len()
        );
    }

    let (background, foreground) = palette(theme);
    let has_secondary = plan.axis_groups.len() > 1;

    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&background).map_err(render_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28).into_font().color(&foreground))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .right_y_label_area_size(if has_secondary { 60 } else { 0 })
        .build_cartesian_2d(x_min..x_max, 0f64..1f64)
        .map_err(render_err)?
        .set_secondary_coord(x_min..x_max, 0f64..1f64);

    let primary = &plan.axis_groups[0];
    let primary_range = ranges[0];
    let primary_fmt = |v: &f64| primary.formatter.format(denormalize(*v, primary_range));
    let date_fmt = |x: &i64| {
        DateTime::from_timestamp_millis(*x)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    };

    chart
        .configure_mesh()
        .light_line_style(foreground.mix(0.05))
        .bold_line_style(foreground.mix(0.1))
        .axis_style(foreground)
        .label_style(("sans-serif", 12).into_font().color(&foreground))
        .x_labels(6)
        .x_label_formatter(&date_fmt)
        .y_label_formatter(&primary_fmt)
        .draw()
        .map_err(render_err)?;

    if has_secondary {
        let secondary = &plan.axis_groups[1];
        let secondary_range = ranges[1];
        let secondary_fmt = |v: &f64| secondary.formatter.format(denormalize(*v, secondary_range));
        let axis_color = secondary
            .axis_line
            .as_ref()
            .and_then(|line| line.color.as_deref())
            .and_then(parse_color)
            .unwrap_or(foreground);

        chart
            .configure_secondary_axes()
            .axis_style(axis_color)
            .label_style(("sans-serif", 12).into_font().color(&foreground))
            .y_label_formatter(&secondary_fmt)
            .draw()
            .map_err(render_err)?;
    }

    let longest = plan.series.iter().map(|s| s.data.len()).max().unwrap_or(1).max(1) as i64;
    let bar_half_width = ((x_max - x_min) / (longest * 2) * 8 / 10).max(1);

    for series in &plan.series {
        let slot = plan
            .axis_groups
            .iter()
            .position(|a| a.index == series.y_axis_index)
            .unwrap_or(0);
        let range = ranges[slot];
        let baseline = normalize(0.0, range).clamp(0.0, 1.0);
        let color = parse_color(&series.color).unwrap_or(foreground);

        let points: Vec<(i64, Option<f64>)> = series
            .data
            .iter()
            .map(|p| (p.0.timestamp_millis(), p.1.as_f64().map(|v| normalize(v, range))))
            .collect();

        match series.kind {
            SeriesType::Bar => {
                chart
                    .draw_series(points.iter().filter_map(|(x, y)| {
                        y.map(|y| {
                            Rectangle::new(
                                [(*x - bar_half_width, baseline), (*x + bar_half_width, y)],
                                color.filled(),
                            )
                        })
                    }))
                    .map_err(render_err)?
                    .label(series.name.as_str())
                    .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
            }
            SeriesType::Line => {
                // missing values break the line into separate segments
                let mut segments: Vec<Vec<(i64, f64)>> = Vec::new();
                let mut current: Vec<(i64, f64)> = Vec::new();
                for (x, y) in &points {
                    match y {
                        Some(y) => current.push((*x, *y)),
                        None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
                        None => {}
                    }
                }
                if !current.is_empty() {
                    segments.push(current);
                }

                let fill = match &series.area_style {
                    Some(AreaStyle { color: Some(gradient) }) => {
                        parse_color(&gradient.top).map(|top| top.mix(0.25))
                    }
                    Some(AreaStyle { color: None }) => Some(color.mix(0.2)),
                    None => None,
                };

                for (i, segment) in segments.into_iter().enumerate() {
                    if let Some(fill) = fill {
                        chart
                            .draw_series(AreaSeries::new(segment.clone(), baseline, fill))
                            .map_err(render_err)?;
                    }
                    let anno = chart
                        .draw_series(LineSeries::new(segment, color.stroke_width(2)))
                        .map_err(render_err)?;
                    if i == 0 {
                        anno.label(series.name.as_str()).legend(move |(x, y)| {
                            PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                        });
                    }
                }
            }
        }
    }

    // Hallmark lines with staggered labels
    if let Some(first) = plan.series.first() {
        let plot_height = (height.saturating_sub(100)).max(1) as f64;
        for [start, end] in &first.mark_line.data {
            let x = start.x_axis.timestamp_millis();
            if x < x_min || x > x_max {
                continue;
            }
            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(x, 0.0), (x, 1.0)],
                    foreground.mix(0.5),
                )))
                .map_err(render_err)?;

            let label_y = 1.0 - end.y.unwrap_or(HALLMARK_LABEL_STEP) as f64 / plot_height;
            chart
                .draw_series(std::iter::once(Text::new(
                    start.name.clone(),
                    (x, label_y.clamp(0.0, 1.0)),
                    ("sans-serif", 14).into_font().color(&foreground),
                )))
                .map_err(render_err)?;
        }
    }

    if plan.legend_visible {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(background.mix(0.8))
            .border_style(foreground)
            .label_font(("sans-serif", 12).into_font().color(&foreground))
            .draw()
            .map_err(render_err)?;
    }

    root.present().map_err(render_err)?;
    info!("✓ Chart written to {}", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChartRecord, Hallmark, PlanOptions};
    use crate::services::chart_service;

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#ff8000"), Some(RGBColor(255, 128, 0)));
        assert_eq!(parse_color("#0f0"), Some(RGBColor(0, 255, 0)));
        assert_eq!(parse_color("rgba(0, 0, 0, 0.2)"), Some(RGBColor(0, 0, 0)));
        assert_eq!(parse_color("rgb(1,2,3)"), Some(RGBColor(1, 2, 3)));
        assert_eq!(parse_color("transparent"), None);
        assert_eq!(parse_color("#zzzzzz"), None);
    }

    #[test]
    fn test_value_range_anchors_at_zero() {
        let records = vec![ChartRecord::new(1).with("TVL", 50.0), ChartRecord::new(2).with("TVL", 100.0)];
        let plan = chart_service::plan(&["TVL".to_string()], &records, &PlanOptions::default());
        let (lo, hi) = value_range(&plan, 0);
        assert_eq!(lo, 0.0);
        assert!((hi - 110.0).abs() < 1e-9);
        assert!((normalize(55.0, (lo, hi)) - 0.5).abs() < 1e-9);
        assert!((denormalize(0.5, (lo, hi)) - 55.0).abs() < 1e-9);
    }

    #[test]
    fn test_host_creates_surface_lazily_and_disposes() {
        let path = std::env::temp_dir().join(format!("protocol_charts_{}.png", Uuid::new_v4()));
        let mut host = ChartHost::new(path.clone(), (400, 300), Theme::Light, "Test");
        assert!(!host.is_mounted());

        // resizing before mount only records the size
        host.resize(640, 480).unwrap();
        assert!(!host.is_mounted());

        let id = host.surface().id();
        assert_eq!(host.surface().id(), id);
        assert_eq!(host.surface().size(), (640, 480));
        assert_eq!(host.surface().renders(), 0);

        host.dispose();
        assert!(!host.is_mounted());
        assert!(!path.exists());
    }

    #[test]
    fn test_render_reuses_surface_and_redraws_on_resize() {
        let path = std::env::temp_dir().join(format!("protocol_charts_{}.png", Uuid::new_v4()));
        let records = vec![
            ChartRecord::new(1_650_000_000).with("TVL", 100.0).with("Fees", 5.0).with("Token Price", 1.2),
            ChartRecord::new(1_650_086_400).with("TVL", 120.0).with("Token Price", 1.4),
            ChartRecord::new(1_650_172_800).with("TVL", 90.0).with("Fees", 8.0).with("Token Price", 1.1),
        ];
        let options = PlanOptions {
            hallmarks: vec![Hallmark::new(1_650_086_400, "Launch")],
            title: "Demo".to_string(),
            ..PlanOptions::default()
        };
        let stacks: Vec<String> = ["TVL", "Fees", "Token Price"].iter().map(|s| s.to_string()).collect();
        let plan = chart_service::plan(&stacks, &records, &options);
        assert!(plan.legend_visible);
        assert_eq!(plan.axis_groups.len(), 3);

        let mut host = ChartHost::new(path.clone(), (640, 480), Theme::Light, "Demo");
        host.render(plan.clone()).unwrap();
        assert!(path.exists());
        let id = host.surface().id();
        assert_eq!(host.surface().renders(), 1);

        host.render(plan).unwrap();
        assert_eq!(host.surface().id(), id);
        assert_eq!(host.surface().renders(), 2);

        host.resize(800, 600).unwrap();
        assert_eq!(host.surface().size(), (800, 600));
        assert_eq!(host.surface().renders(), 3);

        host.dispose();
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_apply_without_points_is_render_error() {
        let path = std::env::temp_dir().join(format!("protocol_charts_{}.png", Uuid::new_v4()));
        let plan = chart_service::plan(&["TVL".to_string()], &[], &PlanOptions::default());

        let mut host = ChartHost::new(path.clone(), (640, 480), Theme::Dark, "Empty");
        let err = host.render(plan).unwrap_err();
        assert!(matches!(err, ChartError::Render(_)));
        assert!(host.is_mounted());
        assert_eq!(host.surface().renders(), 0);
        assert!(!path.exists());
    }
}
