// Integration tests for the full request path
//
// Timing data is written to a temporary directory in the cache layout, then read back
// through the offline provider:
// 1. Resolve and load the raw session
// 2. Classify it into result rows
// 3. Render the chart and table
// 4. Export the figure as SVG

use gridgap::presentation::{SvgConfig, export_svg, team_color};
use gridgap::provider::{CachedProvider, FileProvider, SessionCache};
use gridgap::session::EventInfo;
use gridgap::{
    FinishStatus, GridgapError, RawSession, RawSessionRecord, SessionRequest, SessionType,
    TimeBasis, TimeColumn, TimingProvider, build_figure,
};
use tempfile::TempDir;

const YEAR: u16 = 2019;
const EVENT: &str = "Brazilian Grand Prix";

fn schedule() -> Vec<EventInfo> {
    vec![
        EventInfo {
            round: 20,
            event_name: "Brazilian Grand Prix".to_string(),
            circuit_name: "Autódromo José Carlos Pace".to_string(),
            locality: "São Paulo".to_string(),
            country: "Brazil".to_string(),
            has_sprint: false,
        },
        EventInfo {
            round: 21,
            event_name: "Abu Dhabi Grand Prix".to_string(),
            circuit_name: "Yas Marina Circuit".to_string(),
            locality: "Abu Dhabi".to_string(),
            country: "UAE".to_string(),
            has_sprint: false,
        },
    ]
}

fn race() -> RawSession {
    RawSession::new(
        &[TimeColumn::Time],
        TimeBasis::Elapsed,
        vec![
            RawSessionRecord::new(Some(1), "VER", "Max Verstappen", "Red Bull Racing", "Finished")
                .with_time(TimeColumn::Time, 5400.123),
            RawSessionRecord::new(Some(2), "GAS", "Pierre Gasly", "Toro Rosso", "Finished")
                .with_time(TimeColumn::Time, 5408.901),
            RawSessionRecord::new(Some(3), "RAI", "Kimi Räikkönen", "Alfa Romeo Racing", "Lapped")
                .with_time(TimeColumn::Time, 5495.323),
            RawSessionRecord::new(Some(4), "KUB", "Robert Kubica", "Williams", "+2 Laps")
                .with_time(TimeColumn::Time, 5590.0),
            RawSessionRecord::new(None, "BOT", "Valtteri Bottas", "Mercedes", "Engine"),
        ],
    )
}

fn qualifying() -> RawSession {
    RawSession::new(
        &[TimeColumn::Q1, TimeColumn::Q2, TimeColumn::Q3],
        TimeBasis::Elapsed,
        vec![
            RawSessionRecord::new(Some(1), "VER", "Max Verstappen", "Red Bull Racing", "")
                .with_time(TimeColumn::Q1, 90.1)
                .with_time(TimeColumn::Q2, 89.8)
                .with_time(TimeColumn::Q3, 89.5),
            RawSessionRecord::new(Some(11), "NOR", "Lando Norris", "McLaren", "")
                .with_time(TimeColumn::Q1, 91.0)
                .with_time(TimeColumn::Q2, 90.2),
            RawSessionRecord::new(Some(20), "RUS", "George Russell", "Williams", ""),
        ],
    )
}

fn fixture_dir() -> TempDir {
    let root = TempDir::new().unwrap();
    let files = SessionCache::new(root.path().to_path_buf());
    files.store_schedule(YEAR, &schedule()).unwrap();
    files
        .store_session(YEAR, EVENT, SessionType::Race, &race())
        .unwrap();
    files
        .store_session(YEAR, EVENT, SessionType::Qualifying, &qualifying())
        .unwrap();
    root
}

#[test]
fn test_race_classification_and_figure() {
    let root = fixture_dir();
    let provider = FileProvider::new(root.path().to_path_buf());
    let request = SessionRequest::new(YEAR, "Brazil", SessionType::Race);

    let result = build_figure(&provider, &request).unwrap();

    // winner at zero, runner-up measured against the winner's elapsed time
    assert_eq!(result.rows[0].gap_to_winner_s, Some(0.0));
    let runner_up_gap = result.rows[1].gap_to_winner_s.unwrap();
    assert!((runner_up_gap - 8.778).abs() < 1e-6);
    assert_eq!(result.figure.table.rows[0].gap, "Leader");
    assert_eq!(result.figure.table.rows[1].gap, "+8.778s");

    // lapped cars keep their bar and get a lap label above it
    assert_eq!(result.figure.table.rows[2].gap, "+1 Lap");
    assert_eq!(result.figure.table.rows[3].gap, "+2 Laps");
    let lapped_bar = &result.figure.chart.bars[2];
    let annotation = lapped_bar.annotation.as_ref().unwrap();
    assert_eq!(annotation.text, "+1 Lap");
    assert!(annotation.y > lapped_bar.gap_s);
    let second_label = result.figure.chart.bars[3].annotation.as_ref().unwrap();
    assert!(second_label.y - result.figure.chart.bars[3].gap_s > annotation.y - lapped_bar.gap_s);

    // retirement is in the table but not on the chart
    let bottas = result.rows.last().unwrap();
    assert_eq!(bottas.finish_status, FinishStatus::Dnf);
    assert_eq!(result.figure.table.rows.len(), 5);
    assert_eq!(result.figure.table.rows[4].gap, "");
    assert_eq!(result.figure.table.rows[4].status, "DNF");
    assert_eq!(result.figure.chart.bars.len(), 4);
    assert!(result.figure.chart.bars.iter().all(|b| b.driver_code != "BOT"));

    assert_eq!(result.figure.chart.bars[0].color, team_color("Red Bull Racing"));
    assert_eq!(
        result.figure.chart.title,
        "2019 Brazil – Race gaps to winner"
    );
}

#[test]
fn test_qualifying_best_segment_gaps() {
    let root = fixture_dir();
    let provider = FileProvider::new(root.path().to_path_buf());
    let request = SessionRequest::new(YEAR, EVENT, SessionType::Qualifying);

    let result = build_figure(&provider, &request).unwrap();

    // best of Q1/Q2 against the fastest time in the field
    let norris = result.rows.iter().find(|r| r.driver_code == "NOR").unwrap();
    assert!((norris.gap_to_winner_s.unwrap() - 0.7).abs() < 1e-9);
    let russell = result.rows.iter().find(|r| r.driver_code == "RUS").unwrap();
    assert_eq!(russell.finish_status, FinishStatus::Dnf);
    assert!(
        result
            .rows
            .iter()
            .filter_map(|r| r.gap_to_winner_s)
            .all(|gap| gap >= 0.0)
    );
}

#[test]
fn test_svg_export_of_full_figure() {
    let root = fixture_dir();
    let provider = FileProvider::new(root.path().to_path_buf());
    let result = build_figure(
        &provider,
        &SessionRequest::new(YEAR, EVENT, SessionType::Race),
    )
    .unwrap();

    let output = root.path().join("out").join("brazil.svg");
    std::fs::create_dir_all(output.parent().unwrap()).unwrap();
    export_svg(&result.figure, &output, &SvgConfig::default()).unwrap();

    let svg = std::fs::read_to_string(&output).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("Race Results"));
    assert!(svg.contains("+1 Lap"));
    assert!(svg.contains("RAI"));
    assert!(svg.contains("DNF"));
}

#[test]
fn test_missing_session_and_event_errors() {
    let root = fixture_dir();
    let provider = FileProvider::new(root.path().to_path_buf());

    let sprint = build_figure(
        &provider,
        &SessionRequest::new(YEAR, EVENT, SessionType::Sprint),
    );
    match sprint {
        Err(e @ GridgapError::SessionLoad { .. }) => assert!(e.is_provider_error()),
        other => panic!("Expected SessionLoad error, got {:?}", other.map(|r| r.rows)),
    }

    assert!(provider.event_schedule(1950).is_err());
}

#[test]
fn test_cached_provider_over_offline_files() {
    let source = fixture_dir();
    let cache_root = TempDir::new().unwrap();
    let provider = CachedProvider::new(
        FileProvider::new(source.path().to_path_buf()),
        SessionCache::new(cache_root.path().join("gridgap")),
    )
    .unwrap();

    let first = provider.load_session(YEAR, EVENT, SessionType::Race).unwrap();
    // the source can go away once the session is cached
    drop(source);
    let second = provider.load_session(YEAR, EVENT, SessionType::Race).unwrap();

    assert_eq!(first, second);
    assert!(
        provider
            .cache()
            .session_path(YEAR, EVENT, SessionType::Race)
            .exists()
    );
}
