use egui::{Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, GridMark, Plot, PlotPoint, Text};
use gridgap::{
    Figure, SessionFigure, SessionRequest,
    presentation::{GapChart, ResultsTable, SvgConfig, export_svg},
};
use log::error;

use super::{GapVisualizerApp, PALETTE_ORANGE};
use crate::writer;

const BAR_WIDTH: f64 = 0.7;
const TABLE_ROW_HEIGHT: f32 = 18.0;
/// Width ratio of the table region to the chart region
const TABLE_WIDTH_RATIO: f32 = 2.5 / 5.5;

/// Default file name for an exported figure, e.g. `2023_monaco_grand_prix_r.svg`
fn export_file_name(request: &SessionRequest, extension: &str) -> String {
    let event: String = request
        .event_name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    format!(
        "{}_{}_{}.{}",
        request.year,
        event,
        request.session_type.code().to_lowercase(),
        extension
    )
}

impl GapVisualizerApp {
    pub(crate) fn show_figure(&mut self, ctx: &egui::Context, result: &SessionFigure) {
        egui::TopBottomPanel::bottom("ExportControls")
            .frame(egui::Frame::new().inner_margin(4))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if ui.button("💾 Export SVG").clicked() {
                        self.export_figure(result);
                    }
                    if ui.button("📄 Export rows").clicked() {
                        self.export_rows(result);
                    }
                    if let Some(status) = &self.export_status {
                        ui.label(status);
                    }
                });
            });

        let table_width = ctx.available_rect().width() * TABLE_WIDTH_RATIO;
        egui::SidePanel::right("ResultsTable")
            .resizable(true)
            .default_width(table_width)
            .show(ctx, |ui| {
                show_table(ui, &result.figure.table);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            show_chart(ui, &result.figure);
        });
    }

    fn export_figure(&mut self, result: &SessionFigure) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("SVG", &["svg"])
            .set_file_name(export_file_name(&result.request, "svg"))
            .save_file()
        else {
            return;
        };
        self.export_status = Some(
            match export_svg(&result.figure, &path, &SvgConfig::default()) {
                Ok(()) => format!("✓ Saved {}", path.display()),
                Err(e) => {
                    error!("Could not export figure: {}", e);
                    format!("⚠ {}", e)
                }
            },
        );
    }

    fn export_rows(&mut self, result: &SessionFigure) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON lines", &["jsonl"])
            .set_file_name(export_file_name(&result.request, "jsonl"))
            .save_file()
        else {
            return;
        };
        self.export_status = Some(match writer::write_classification(&path, &result.rows) {
            Ok(()) => format!("✓ Saved {}", path.display()),
            Err(e) => {
                error!("Could not export rows: {}", e);
                format!("⚠ {}", e)
            }
        });
    }
}

fn show_chart(ui: &mut Ui, figure: &Figure) {
    let chart: &GapChart = &figure.chart;
    ui.vertical_centered(|ui| {
        ui.heading(RichText::new(&chart.title).color(Color32::WHITE));
    });

    if chart.is_empty() {
        ui.centered_and_justified(|ui| {
            ui.label("No finishers to plot");
        });
        return;
    }

    let bars = chart
        .bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            Bar::new(i as f64, bar.gap_s)
                .width(BAR_WIDTH)
                .fill(bar.color)
                .name(&bar.driver_code)
        })
        .collect();

    let driver_codes: Vec<String> = chart.bars.iter().map(|b| b.driver_code.clone()).collect();
    let label_for_mark = move |mark: GridMark, _range: &std::ops::RangeInclusive<f64>| {
        if mark.value.fract() != 0.0 || mark.value < 0.0 {
            return String::new();
        }
        driver_codes
            .get(mark.value as usize)
            .cloned()
            .unwrap_or_default()
    };

    Plot::new("gap_chart")
        .show_background(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .include_y(0.0)
        .include_y(chart.max_height() * 1.05)
        .include_x(-0.5)
        .include_x(chart.bars.len() as f64 - 0.5)
        .x_axis_label(chart.x_label.as_str())
        .y_axis_label(chart.y_label.as_str())
        .x_grid_spacer(egui_plot::uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
        .x_axis_formatter(label_for_mark)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new("Gap to winner", bars));
            for (i, bar) in chart.bars.iter().enumerate() {
                if let Some(annotation) = &bar.annotation {
                    plot_ui.text(
                        Text::new(
                            &bar.driver_code,
                            PlotPoint::new(i as f64, annotation.y),
                            RichText::new(&annotation.text).color(PALETTE_ORANGE).small(),
                        )
                        .anchor(egui::Align2::CENTER_BOTTOM),
                    );
                }
            }
        });
}

fn show_table(ui: &mut Ui, table: &ResultsTable) {
    ui.vertical_centered(|ui| {
        ui.heading(RichText::new(&table.title).color(Color32::WHITE));
    });

    TableBuilder::new(ui)
        .striped(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .columns(Column::auto().at_least(40.0), 4)
        .column(Column::remainder())
        .header(TABLE_ROW_HEIGHT + 2.0, |mut header| {
            for title in table.headers {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for row in &table.rows {
                body.row(TABLE_ROW_HEIGHT, |mut table_row| {
                    for cell in row.cells() {
                        table_row.col(|ui| {
                            ui.label(cell);
                        });
                    }
                });
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridgap::SessionType;

    #[test]
    fn test_export_file_name() {
        let request = SessionRequest::new(2023, "São Paulo Grand Prix", SessionType::Practice2);
        assert_eq!(
            export_file_name(&request, "svg"),
            "2023_são_paulo_grand_prix_fp2.svg"
        );
    }
}
