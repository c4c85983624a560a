//! Duration chart: one panel per bond, discounted cash flows drawn as bars
//! on a plank, with the duration marked as the plank's centre of mass.

mod canvas;
mod font;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use bond_metrics_core::simulation::BondAnalysis;

use crate::output::format_thousands;
use canvas::{Canvas, Rgb};
use font::{text_width, GLYPH_HEIGHT};

pub const CHART_FILE_NAME: &str = "svb_duration_analysis.png";

const WIDTH: u32 = 1200;
const PANEL_HEIGHT: u32 = 500;

const WHITE: Rgb = [255, 255, 255];
const BLACK: Rgb = [0, 0, 0];
const GRID: Rgb = [176, 176, 176];
const FRAME: Rgb = [120, 120, 120];
const SKY_BLUE: Rgb = [135, 206, 235];
const MARKER_RED: Rgb = [220, 20, 60];
const TEXT: Rgb = [34, 34, 34];

const BAR_ALPHA: f64 = 0.7;
const BAR_HALF_WIDTH: f64 = 0.2;
const MARKER_SIZE: i64 = 16;
const Y_TICKS: i64 = 5;

/// Render and write the chart into `output_dir`, creating the directory
/// first. Returns the path written.
pub fn save_chart(
    output_dir: &Path,
    bonds: &[&BondAnalysis],
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let canvas = render_chart(bonds);
    tracing::debug!(width = canvas.width(), height = canvas.height(), "rendered chart");
    let bytes = canvas
        .encode_png()
        .map_err(|e| format!("Failed to encode chart: {}", e))?;

    fs::create_dir_all(output_dir)
        .map_err(|e| format!("Failed to create '{}': {}", output_dir.display(), e))?;

    let path = output_dir.join(CHART_FILE_NAME);
    let file = File::create(&path)
        .map_err(|e| format!("Failed to create '{}': {}", path.display(), e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(&bytes)
        .and_then(|_| writer.flush())
        .map_err(|e| format!("Failed to write '{}': {}", path.display(), e))?;

    Ok(path)
}

/// Stack one panel per bond vertically.
pub fn render_chart(bonds: &[&BondAnalysis]) -> Canvas {
    let panels = bonds.len().max(1) as u32;
    let mut canvas = Canvas::new(WIDTH, PANEL_HEIGHT * panels, WHITE);

    for (i, bond) in bonds.iter().enumerate() {
        let top = i as i64 * PANEL_HEIGHT as i64;
        let panel = Panel::layout(bond, top);
        panel.draw(&mut canvas, bond);
    }

    canvas
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Plot area of one panel and its data-to-pixel mapping.
struct Panel {
    left: i64,
    right: i64,
    top: i64,
    bottom: i64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl Panel {
    fn layout(bond: &BondAnalysis, panel_top: i64) -> Self {
        let pvs: Vec<f64> = bond
            .metrics
            .period_present_values
            .iter()
            .map(|pv| to_f64(*pv))
            .collect();
        let hi = pvs.iter().copied().fold(0.0_f64, f64::max);
        let lo = pvs.iter().copied().fold(0.0_f64, f64::min);
        let (y_min, mut y_max) = (lo * 1.1, hi * 1.1);
        if y_max - y_min <= f64::EPSILON {
            y_max = y_min + 1.0;
        }

        Self {
            left: 110,
            right: WIDTH as i64 - 30,
            top: panel_top + 60,
            bottom: panel_top + PANEL_HEIGHT as i64 - 60,
            x_max: bond.cash_flows.len() as f64 + 1.0,
            y_min,
            y_max,
        }
    }

    fn x(&self, period: f64) -> i64 {
        let span = (self.right - self.left) as f64;
        self.left + (period / self.x_max * span).round() as i64
    }

    fn y(&self, value: f64) -> i64 {
        let span = (self.bottom - self.top) as f64;
        self.bottom - ((value - self.y_min) / (self.y_max - self.y_min) * span).round() as i64
    }

    fn draw(&self, canvas: &mut Canvas, bond: &BondAnalysis) {
        let zero = self.y(0.0);
        let duration = to_f64(bond.metrics.duration);
        let max_pv = to_f64(bond.metrics.max_present_value());

        // y grid and tick labels
        for k in 0..=Y_TICKS {
            let value = self.y_min + (self.y_max - self.y_min) * k as f64 / Y_TICKS as f64;
            let py = self.y(value);
            canvas.dashed_hline(self.left, self.right, py, 4, GRID, 0.6);
            let label = Decimal::from_f64_retain(value)
                .map(|d| format_thousands(d, 0))
                .unwrap_or_default();
            let w = text_width(&label, 1);
            canvas.text(self.left - 8 - w, py - GLYPH_HEIGHT / 2, &label, 1, TEXT);
        }

        // discounted cash flows
        for (t, pv) in bond.metrics.period_present_values.iter().enumerate() {
            let period = t as f64 + 1.0;
            let x0 = self.x(period - BAR_HALF_WIDTH);
            let x1 = self.x(period + BAR_HALF_WIDTH);
            canvas.fill_rect(x0, zero, x1, self.y(to_f64(*pv)), SKY_BLUE, BAR_ALPHA);
        }

        // x tick labels, thinned for long maturities
        let n = bond.cash_flows.len();
        let step = n.div_ceil(20).max(1);
        for period in (1..=n).filter(|p| p % step == 0 || *p == 1) {
            let label = period.to_string();
            let px = self.x(period as f64);
            canvas.text(px - text_width(&label, 1) / 2, self.bottom + 10, &label, 1, TEXT);
        }

        // plank
        canvas.hline(self.left, self.right, zero, 2, BLACK);
        canvas.stroke_rect(self.left, self.top, self.right, self.bottom, FRAME);

        // centre of mass
        let mx = self.x(duration);
        canvas.fill_triangle_up(mx, zero, MARKER_SIZE, MARKER_RED);

        let note = "CENTER OF MASS (DURATION)";
        let note_y = self.y(max_pv * 0.5);
        canvas.text(mx - text_width(note, 1) / 2, note_y - GLYPH_HEIGHT - 5, note, 1, TEXT);
        canvas.line(mx, note_y, mx, zero - MARKER_SIZE / 2 - 2, BLACK);
        canvas.line(mx - 4, zero - MARKER_SIZE / 2 - 8, mx, zero - MARKER_SIZE / 2 - 2, BLACK);
        canvas.line(mx + 4, zero - MARKER_SIZE / 2 - 8, mx, zero - MARKER_SIZE / 2 - 2, BLACK);

        // legend
        let duration_label = format!("DURATION: {:.2} YRS", bond.metrics.duration.round_dp(2));
        let legend_w = text_width(&duration_label, 1).max(text_width("PV OF CASH FLOWS", 1)) + 40;
        let lx = self.right - legend_w - 10;
        let ly = self.top + 10;
        canvas.fill_rect(lx, ly, lx + legend_w, ly + 44, WHITE, 0.85);
        canvas.stroke_rect(lx, ly, lx + legend_w, ly + 44, GRID);
        canvas.fill_rect(lx + 8, ly + 8, lx + 24, ly + 18, SKY_BLUE, BAR_ALPHA);
        canvas.text(lx + 32, ly + 10, "PV OF CASH FLOWS", 1, TEXT);
        canvas.fill_triangle_up(lx + 16, ly + 32, 10, MARKER_RED);
        canvas.text(lx + 32, ly + 29, &duration_label, 1, TEXT);

        // title and axis labels
        let title = format!(
            "{} (PRICE: ${})",
            bond.name,
            format_thousands(bond.metrics.total_present_value, 0)
        );
        let tw = text_width(&title, 2);
        let centre = (self.left + self.right) / 2;
        canvas.text(centre - tw / 2, self.top - 40, &title, 2, TEXT);
        canvas.text(self.left, self.top - 2 * GLYPH_HEIGHT, "PRESENT VALUE ($)", 1, TEXT);
        let x_label = "TIME (YEARS)";
        canvas.text(centre - text_width(x_label, 1) / 2, self.bottom + 26, x_label, 1, TEXT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bond_metrics_core::config::BondParameters;
    use bond_metrics_core::simulation::run_simulation;

    fn reference_bonds() -> Vec<BondAnalysis> {
        let out = run_simulation(&BondParameters::default()).unwrap();
        vec![out.result.treasury, out.result.mortgage]
    }

    #[test]
    fn test_render_two_panels() {
        let bonds = reference_bonds();
        let refs: Vec<&BondAnalysis> = bonds.iter().collect();
        let canvas = render_chart(&refs);
        assert_eq!(canvas.width(), WIDTH);
        assert_eq!(canvas.height(), 2 * PANEL_HEIGHT);
    }

    #[test]
    fn test_duration_marker_on_plank() {
        let bonds = reference_bonds();
        let canvas = render_chart(&[&bonds[0]]);
        let panel = Panel::layout(&bonds[0], 0);
        let mx = panel.x(to_f64(bonds[0].metrics.duration));
        // just above the plank line, inside the triangle
        let pixel = canvas.pixel(mx, panel.y(0.0) - 2).unwrap();
        assert_eq!(pixel, MARKER_RED);
    }

    #[test]
    fn test_axis_label_sits_one_line_above_plot() {
        let bonds = reference_bonds();
        let canvas = render_chart(&[&bonds[0]]);
        let panel = Panel::layout(&bonds[0], 0);
        let label_top = panel.top - 2 * GLYPH_HEIGHT;
        // top-left stroke of the 'P' in "PRESENT VALUE ($)"
        assert_eq!(canvas.pixel(panel.left, label_top), Some(TEXT));
        assert_eq!(canvas.pixel(panel.left, label_top - 1), Some(WHITE));
    }

    #[test]
    fn test_bar_drawn_at_maturity() {
        let bonds = reference_bonds();
        let canvas = render_chart(&[&bonds[0]]);
        let panel = Panel::layout(&bonds[0], 0);
        let last_pv = to_f64(*bonds[0].metrics.period_present_values.last().unwrap());
        let pixel = canvas
            .pixel(panel.x(20.0), panel.y(last_pv * 0.9))
            .unwrap();
        assert_ne!(pixel, WHITE);
    }

    #[test]
    fn test_save_chart_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("charts").join("run1");
        let bonds = reference_bonds();
        let refs: Vec<&BondAnalysis> = bonds.iter().collect();

        let path = save_chart(&nested, &refs).unwrap();
        assert_eq!(path, nested.join(CHART_FILE_NAME));
        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn test_save_chart_into_file_path_fails() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let bonds = reference_bonds();
        let err = save_chart(file.path(), &[&bonds[0]]).unwrap_err();
        assert!(err.to_string().starts_with("Failed to create"), "{err}");
    }
}
