// SVG export of a figure: gap chart on the left, results table on the right

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::{Figure, GapChart, ResultsTable, teams::hex_color};
use crate::errors::GridgapError;

/// Relative widths of the chart and table regions
const REGION_WIDTH_RATIOS: (f32, f32) = (3.0, 2.5);
/// Relative widths of the Pos, Driver, Team, Gap and Status columns
const TABLE_COLUMN_WIDTHS: [f32; 5] = [0.08, 0.12, 0.30, 0.20, 0.12];
const Y_AXIS_TICKS: usize = 5;

/// Configuration for SVG figure export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SvgConfig {
    /// Canvas dimensions (width, height) in pixels
    pub canvas_size: (u32, u32),
    /// Base font size for labels and table cells
    pub font_size: f32,
    /// Space around each region in pixels
    pub margin: f32,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            canvas_size: (1400, 600),
            font_size: 11.0,
            margin: 50.0,
        }
    }
}

/// Pixel rectangle a region is drawn into
#[derive(Debug, Clone, Copy)]
struct Region {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl Figure {
    /// Renders the figure as a standalone SVG document.
    pub fn to_svg(&self, config: &SvgConfig) -> Result<String, GridgapError> {
        let (width, height) = config.canvas_size;
        if width == 0 || height == 0 {
            return Err(GridgapError::ExportError {
                reason: format!("Invalid canvas size {}x{}", width, height),
            });
        }
        if config.font_size <= 0.0 || config.margin < 0.0 {
            return Err(GridgapError::ExportError {
                reason: format!(
                    "Invalid font size {} or margin {}",
                    config.font_size, config.margin
                ),
            });
        }

        let chart_share = REGION_WIDTH_RATIOS.0 / (REGION_WIDTH_RATIOS.0 + REGION_WIDTH_RATIOS.1);
        let chart_width = width as f32 * chart_share;
        let chart_region = Region {
            x: config.margin + 20.0,
            y: config.margin,
            width: chart_width - 2.0 * config.margin - 20.0,
            height: height as f32 - 2.0 * config.margin - 30.0,
        };
        let table_region = Region {
            x: chart_width + config.margin / 2.0,
            y: config.margin,
            width: width as f32 - chart_width - config.margin,
            height: height as f32 - 2.0 * config.margin,
        };

        let mut svg = String::with_capacity(4096 + self.table.rows.len() * 400);
        svg.push_str(&format!(
            r#"<svg width="{w}" height="{h}" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}">
  <defs>
    <style>
      text {{ font-family: sans-serif; font-size: {fs:.1}px; fill: #222; }}
      .title {{ font-size: {title_fs:.1}px; font-weight: bold; }}
      .axis {{ stroke: #333; stroke-width: 1; }}
      .grid {{ stroke: #ddd; stroke-width: 1; }}
      .cell {{ fill: #fff; stroke: #888; stroke-width: 0.5; }}
      .header {{ fill: #eee; stroke: #888; stroke-width: 0.5; }}
    </style>
  </defs>
  <rect width="100%" height="100%" fill="white" />"#,
            w = width,
            h = height,
            fs = config.font_size,
            title_fs = config.font_size * 1.3,
        ));

        write_chart(&mut svg, &self.chart, chart_region, config);
        write_table(&mut svg, &self.table, table_region, config);
        svg.push_str("\n</svg>");

        debug!(
            "Generated SVG figure with {} bars and {} table rows ({} characters)",
            self.chart.bars.len(),
            self.table.rows.len(),
            svg.len()
        );
        Ok(svg)
    }
}

fn write_chart(svg: &mut String, chart: &GapChart, region: Region, config: &SvgConfig) {
    let _ = write!(
        svg,
        "\n  <text class=\"title\" x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\">{}</text>",
        region.x + region.width / 2.0,
        region.y - 15.0,
        escape_xml(&chart.title)
    );

    let bottom = region.y + region.height;
    // axes
    let _ = write!(
        svg,
        "\n  <line class=\"axis\" x1=\"{x:.2}\" y1=\"{top:.2}\" x2=\"{x:.2}\" y2=\"{bottom:.2}\" />\
         \n  <line class=\"axis\" x1=\"{x:.2}\" y1=\"{bottom:.2}\" x2=\"{right:.2}\" y2=\"{bottom:.2}\" />",
        x = region.x,
        top = region.y,
        bottom = bottom,
        right = region.x + region.width,
    );

    // y range leaves headroom for lap-down labels
    let max_y = match chart.max_height() * 1.1 {
        y if y > 0.0 && y.is_finite() => y,
        _ => 1.0,
    };
    let to_px = |value: f64| bottom - (value / max_y) as f32 * region.height;

    for tick in 0..=Y_AXIS_TICKS {
        let value = max_y * tick as f64 / Y_AXIS_TICKS as f64;
        let y = to_px(value);
        let _ = write!(
            svg,
            "\n  <line class=\"grid\" x1=\"{:.2}\" y1=\"{y:.2}\" x2=\"{:.2}\" y2=\"{y:.2}\" />\
             \n  <text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"end\">{:.1}</text>",
            region.x,
            region.x + region.width,
            region.x - 6.0,
            y + config.font_size / 3.0,
            value,
        );
    }

    let _ = write!(
        svg,
        "\n  <text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\">{}</text>\
         \n  <text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" transform=\"rotate(-90 {:.2} {:.2})\">{}</text>",
        region.x + region.width / 2.0,
        bottom + 45.0,
        escape_xml(&chart.x_label),
        region.x - 45.0,
        region.y + region.height / 2.0,
        region.x - 45.0,
        region.y + region.height / 2.0,
        escape_xml(&chart.y_label),
    );

    if chart.is_empty() {
        return;
    }

    let slot = region.width / chart.bars.len() as f32;
    let bar_width = slot * 0.8;
    for (i, bar) in chart.bars.iter().enumerate() {
        let center = region.x + slot * (i as f32 + 0.5);
        let top = to_px(bar.gap_s.max(0.0));
        let _ = write!(
            svg,
            "\n  <rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\" />\
             \n  <text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"end\" transform=\"rotate(-45 {:.2} {:.2})\">{}</text>",
            center - bar_width / 2.0,
            top,
            bar_width,
            bottom - top,
            hex_color(bar.color),
            center,
            bottom + 14.0,
            center,
            bottom + 14.0,
            escape_xml(&bar.driver_code),
        );
        if let Some(annotation) = &bar.annotation {
            let _ = write!(
                svg,
                "\n  <text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-size=\"{:.1}\">{}</text>",
                center,
                to_px(annotation.y),
                config.font_size * 0.8,
                escape_xml(&annotation.text),
            );
        }
    }
}

fn write_table(svg: &mut String, table: &ResultsTable, region: Region, config: &SvgConfig) {
    let _ = write!(
        svg,
        "\n  <text class=\"title\" x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\">{}</text>",
        region.x + region.width / 2.0,
        region.y - 15.0,
        escape_xml(&table.title)
    );

    let total_ratio: f32 = TABLE_COLUMN_WIDTHS.iter().sum();
    let column_widths: Vec<f32> = TABLE_COLUMN_WIDTHS
        .iter()
        .map(|w| w / total_ratio * region.width)
        .collect();
    let row_height = (region.height / (table.rows.len() + 1) as f32).min(config.font_size * 2.0);

    let mut y = region.y;
    write_table_row(svg, &table.headers, &column_widths, region.x, y, row_height, "header", config);
    for row in &table.rows {
        y += row_height;
        write_table_row(svg, &row.cells(), &column_widths, region.x, y, row_height, "cell", config);
    }
}

#[allow(clippy::too_many_arguments)]
fn write_table_row(
    svg: &mut String,
    cells: &[&str],
    column_widths: &[f32],
    x: f32,
    y: f32,
    row_height: f32,
    class: &str,
    config: &SvgConfig,
) {
    let mut cell_x = x;
    for (text, width) in cells.iter().zip(column_widths) {
        let _ = write!(
            svg,
            "\n  <rect class=\"{}\" x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" />\
             \n  <text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-size=\"{:.1}\">{}</text>",
            class,
            cell_x,
            y,
            width,
            row_height,
            cell_x + width / 2.0,
            y + row_height / 2.0 + config.font_size / 3.0,
            config.font_size.min(row_height * 0.7),
            escape_xml(text),
        );
        cell_x += width;
    }
}

fn escape_xml(text: &str) -> String {
    text.chars()
        .fold(String::with_capacity(text.len()), |mut out, c| {
            match c {
                '&' => out.push_str("&amp;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '"' => out.push_str("&quot;"),
                '\'' => out.push_str("&apos;"),
                _ => out.push(c),
            }
            out
        })
}

/// Writes the figure to `path` as an SVG file.
pub fn export_svg(figure: &Figure, path: &Path, config: &SvgConfig) -> Result<(), GridgapError> {
    let svg = figure.to_svg(config)?;
    fs::write(path, svg).map_err(|e| GridgapError::WriterError { source: e })?;
    info!("Exported figure to {:?}", path);
    Ok(())
}
