// Presentation layer
// Builds a renderer independent figure (gap chart + results table) from classified rows

pub mod status;
pub mod svg;
pub mod teams;

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::classification::{NormalizedResultRow, position_order};

pub use status::{LapStatusMatcher, gap_display, lap_annotation};
pub use svg::{SvgConfig, export_svg};
pub use teams::{team_color, team_display_name};

/// Height above a bar where the first lap-down label is drawn, in seconds
pub const LAP_LABEL_BASE_OFFSET_S: f64 = 0.6;
/// Extra height added for every further lap-down label so they don't overlap
pub const LAP_LABEL_STAGGER_S: f64 = 0.4;

pub const TABLE_TITLE: &str = "Race Results";
pub const TABLE_HEADERS: [&str; 5] = ["Pos", "Driver", "Team", "Gap", "Status"];

/// What the figure is about, rendered verbatim in the chart title
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FigureContext {
    pub year: u16,
    pub event_name: String,
    pub session_label: String,
}

impl FigureContext {
    pub fn new(year: u16, event_name: &str, session_label: &str) -> Self {
        Self {
            year,
            event_name: event_name.to_string(),
            session_label: session_label.to_string(),
        }
    }

    pub fn chart_title(&self) -> String {
        format!(
            "{} {} – {} gaps to winner",
            self.year, self.event_name, self.session_label
        )
    }
}

/// Label drawn above a lapped car's bar
#[derive(Clone, Debug, PartialEq)]
pub struct BarAnnotation {
    pub text: String,
    /// Vertical position of the label's baseline, in seconds
    pub y: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GapBar {
    pub driver_code: String,
    pub gap_s: f64,
    pub color: Color32,
    pub annotation: Option<BarAnnotation>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GapChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<GapBar>,
}

impl GapChart {
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Highest point drawn on the chart, bar or label
    pub fn max_height(&self) -> f64 {
        self.bars
            .iter()
            .map(|b| b.annotation.as_ref().map_or(b.gap_s, |a| a.y.max(b.gap_s)))
            .fold(0.0, f64::max)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TableRow {
    pub position: String,
    pub driver_code: String,
    pub team: String,
    pub gap: String,
    pub status: String,
}

impl TableRow {
    pub fn cells(&self) -> [&str; 5] {
        [
            self.position.as_str(),
            self.driver_code.as_str(),
            self.team.as_str(),
            self.gap.as_str(),
            self.status.as_str(),
        ]
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResultsTable {
    pub title: String,
    pub headers: [&'static str; 5],
    pub rows: Vec<TableRow>,
}

/// A two-region figure: gap chart on the left, results table on the right
#[derive(Clone, Debug, PartialEq)]
pub struct Figure {
    pub context: FigureContext,
    pub chart: GapChart,
    pub table: ResultsTable,
}

/// Lays out classified rows as a gap chart of the finishers and a table of every driver.
///
/// Both are laid out in ascending position with unclassified drivers last, whatever order
/// the rows come in. A session without finishers produces an empty chart rather than an
/// error.
pub fn render(rows: &[NormalizedResultRow], context: &FigureContext) -> Figure {
    let mut ordered: Vec<&NormalizedResultRow> = rows.iter().collect();
    ordered.sort_by_key(|r| position_order(r));
    Figure {
        context: context.clone(),
        chart: gap_chart(&ordered, context),
        table: results_table(&ordered),
    }
}

fn gap_chart(rows: &[&NormalizedResultRow], context: &FigureContext) -> GapChart {
    let mut lapped_index = 0;
    let bars = rows
        .iter()
        .filter(|r| r.is_finisher())
        .filter_map(|r| {
            let gap_s = r.gap_to_winner_s?;
            let annotation = lap_annotation(&r.raw_classification_status).map(|text| {
                let offset = LAP_LABEL_BASE_OFFSET_S + LAP_LABEL_STAGGER_S * lapped_index as f64;
                lapped_index += 1;
                BarAnnotation {
                    text,
                    y: gap_s + offset,
                }
            });
            Some(GapBar {
                driver_code: r.driver_code.clone(),
                gap_s,
                color: team_color(&r.team_name),
                annotation,
            })
        })
        .collect();

    GapChart {
        title: context.chart_title(),
        x_label: "Driver".to_string(),
        y_label: "Gap to winner (s)".to_string(),
        bars,
    }
}

fn results_table(rows: &[&NormalizedResultRow]) -> ResultsTable {
    ResultsTable {
        title: TABLE_TITLE.to_string(),
        headers: TABLE_HEADERS,
        rows: rows
            .iter()
            .map(|r| TableRow {
                position: r.position.map(|p| p.to_string()).unwrap_or_default(),
                driver_code: r.driver_code.clone(),
                team: team_display_name(&r.team_name).to_string(),
                gap: gap_display(r),
                status: r.finish_status.to_string(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::FinishStatus;

    fn row(position: Option<u32>, code: &str, team: &str, gap: Option<f64>, status: &str) -> NormalizedResultRow {
        NormalizedResultRow {
            position,
            driver_code: code.to_string(),
            driver_name: code.to_string(),
            team_name: team.to_string(),
            gap_to_winner_s: gap,
            finish_status: if gap.is_some() {
                FinishStatus::Finished
            } else {
                FinishStatus::Dnf
            },
            raw_classification_status: status.to_string(),
        }
    }

    fn context() -> FigureContext {
        FigureContext::new(2023, "Italian Grand Prix", "Race")
    }

    #[test]
    fn test_render_leader_and_gap() {
        let rows = vec![
            row(Some(1), "VER", "Red Bull Racing", Some(0.0), "Finished"),
            row(Some(2), "PER", "Red Bull Racing", Some(8.778), "Finished"),
        ];

        let figure = render(&rows, &context());

        let gaps: Vec<&str> = figure.table.rows.iter().map(|r| r.gap.as_str()).collect();
        assert_eq!(gaps, vec!["Leader", "+8.778s"]);
        assert_eq!(figure.chart.bars.len(), 2);
        assert_eq!(figure.chart.bars[1].gap_s, 8.778);
        assert_eq!(figure.table.rows[0].team, "Red Bull");
        assert_eq!(figure.table.rows[0].status, "FINISHED");
    }

    #[test]
    fn test_chart_title_carries_context_verbatim() {
        let figure = render(&[], &FigureContext::new(2024, "São Paulo Grand Prix", "Sprint"));
        assert!(figure.chart.title.contains("2024"));
        assert!(figure.chart.title.contains("São Paulo Grand Prix"));
        assert!(figure.chart.title.contains("Sprint"));
        assert!(figure.chart.is_empty());
        assert!(figure.table.rows.is_empty());
        assert_eq!(figure.chart.max_height(), 0.0);
    }

    #[test]
    fn test_lapped_finisher_annotated() {
        let rows = vec![
            row(Some(1), "HAM", "Mercedes", Some(0.0), "Finished"),
            row(Some(2), "SAR", "Williams", Some(95.2), "Lapped"),
        ];

        let figure = render(&rows, &context());

        let annotation = figure.chart.bars[1].annotation.as_ref().unwrap();
        assert_eq!(annotation.text, "+1 Lap");
        assert!(annotation.y > 95.2);
        assert_eq!(figure.table.rows[1].gap, "+1 Lap");
        assert!(figure.chart.bars[0].annotation.is_none());
    }

    #[test]
    fn test_lap_labels_staggered() {
        let rows = vec![
            row(Some(1), "VER", "Red Bull Racing", Some(0.0), "Finished"),
            row(Some(2), "TSU", "RB", Some(80.0), "Lapped"),
            row(Some(3), "ZHO", "Kick Sauber", Some(80.0), "+1 Lap"),
            row(Some(4), "SAR", "Williams", Some(80.0), "+2 Laps"),
        ];

        let figure = render(&rows, &context());
        let offsets: Vec<f64> = figure.chart.bars[1..]
            .iter()
            .map(|b| b.annotation.as_ref().unwrap().y - b.gap_s)
            .collect();

        assert!(offsets.windows(2).all(|w| w[1] > w[0]));
        assert_eq!(figure.chart.bars[3].annotation.as_ref().unwrap().text, "+2 Laps");
        assert!(figure.chart.max_height() > 80.0);
    }

    #[test]
    fn test_dnf_in_table_only() {
        let rows = vec![
            row(Some(1), "LEC", "Ferrari", Some(0.0), "Finished"),
            row(None, "SAI", "Ferrari", None, "Retired"),
        ];

        let figure = render(&rows, &context());

        assert_eq!(figure.chart.bars.len(), 1);
        assert_eq!(figure.table.rows.len(), 2);
        assert_eq!(figure.table.rows[1].gap, "");
        assert_eq!(figure.table.rows[1].position, "");
        assert_eq!(figure.table.rows[1].status, "DNF");
    }

    #[test]
    fn test_unordered_rows_laid_out_by_position() {
        let rows = vec![
            row(None, "ALB", "Williams", None, "Collision"),
            row(Some(2), "NOR", "McLaren", Some(4.1), "Finished"),
            row(None, "STR", "Aston Martin", None, "Brakes"),
            row(Some(1), "PIA", "McLaren", Some(0.0), "Finished"),
        ];

        let figure = render(&rows, &context());

        let bars: Vec<&str> = figure.chart.bars.iter().map(|b| b.driver_code.as_str()).collect();
        assert_eq!(bars, vec!["PIA", "NOR"]);
        let table: Vec<&str> = figure
            .table
            .rows
            .iter()
            .map(|r| r.driver_code.as_str())
            .collect();
        // unclassified drivers keep their relative order
        assert_eq!(table, vec!["PIA", "NOR", "ALB", "STR"]);
    }

    #[test]
    fn test_unknown_team_gets_default_color() {
        let rows = vec![row(Some(1), "XXX", "Unknown Racing", Some(0.0), "Finished")];
        let figure = render(&rows, &context());
        assert_eq!(figure.chart.bars[0].color, teams::DEFAULT_TEAM_COLOR);
        assert_eq!(figure.table.rows[0].team, "Unknown Racing");
    }
}
