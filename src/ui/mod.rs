mod figure_view;
mod selectors;
mod worker;

use egui::{Color32, RichText, Visuals, style::Widgets};
use gridgap::{
    GridgapError, SessionFigure, SessionRequest, SessionType, TimingProvider,
    config::AppConfig,
};
use log::{error, info, warn};

use worker::{Worker, WorkerRequest, WorkerResponse};

pub(crate) const PALETTE_BLACK: Color32 = Color32::from_rgb(12, 12, 12);
pub(crate) const PALETTE_BROWN: Color32 = Color32::from_rgb(72, 30, 20);
pub(crate) const PALETTE_MAROON: Color32 = Color32::from_rgb(155, 57, 34);
pub(crate) const PALETTE_ORANGE: Color32 = Color32::from_rgb(242, 97, 63);

/// Text shown in place of the figure when a request fails
fn error_message(e: &GridgapError) -> String {
    if e.is_provider_error() {
        format!("Could not load timing data. {}", e)
    } else {
        format!("Could not plot this session. {}", e)
    }
}

#[derive(Clone)]
pub(crate) enum UiState {
    /// Nothing requested yet
    Idle,
    Loading,
    Error { message: String },
    Display { result: Box<SessionFigure> },
}

/// Status of the event list for the selected year
#[derive(Clone, PartialEq)]
pub(crate) enum ScheduleState {
    Loading,
    Ready,
    Failed(String),
}

/// `GapVisualizerApp` lets the user pick a season, event and session and shows the gaps to
/// the winner as a bar chart next to the classification table.
///
/// Provider calls run on a [`Worker`] thread. The window polls it every frame, so the
/// selectors stay responsive while a session downloads.
pub struct GapVisualizerApp {
    app_config: AppConfig,
    worker: Worker,
    ui_state: UiState,
    years: Vec<u16>,
    selected_year: u16,
    /// Event names of the selected year's schedule
    events: Vec<String>,
    schedule_state: ScheduleState,
    selected_event: String,
    selected_session: SessionType,
    export_status: Option<String>,
}

impl GapVisualizerApp {
    pub fn new(
        provider: Box<dyn TimingProvider>,
        app_config: AppConfig,
        cc: &eframe::CreationContext<'_>,
    ) -> Self {
        let default_visuals = Visuals {
            dark_mode: true,
            hyperlink_color: PALETTE_MAROON,
            faint_bg_color: PALETTE_BLACK,
            extreme_bg_color: PALETTE_BROWN,
            panel_fill: PALETTE_BLACK,
            button_frame: true,
            widgets: Widgets::dark(),
            striped: true,
            ..Default::default()
        };
        cc.egui_ctx.set_visuals(default_visuals);

        let years = app_config.years();
        let (selected_year, selected_event, selected_session) =
            match app_config.last_selection.as_ref() {
                Some(last) if years.contains(&last.year) => {
                    (last.year, last.event_name.clone(), last.session_type)
                }
                _ => (
                    years.first().copied().unwrap_or(app_config.last_year),
                    String::new(),
                    SessionType::Race,
                ),
            };

        let worker = Worker::spawn(provider, cc.egui_ctx.clone());
        worker.submit(WorkerRequest::Schedule(selected_year));

        Self {
            app_config,
            worker,
            ui_state: UiState::Idle,
            years,
            selected_year,
            events: Vec::new(),
            schedule_state: ScheduleState::Loading,
            selected_event,
            selected_session,
            export_status: None,
        }
    }

    fn is_loading(&self) -> bool {
        matches!(self.ui_state, UiState::Loading)
    }

    fn current_request(&self) -> SessionRequest {
        SessionRequest::new(
            self.selected_year,
            self.selected_event.trim(),
            self.selected_session,
        )
    }

    fn request_schedule(&mut self, year: u16) {
        info!("Loading {} schedule", year);
        self.events.clear();
        self.schedule_state = ScheduleState::Loading;
        self.worker.submit(WorkerRequest::Schedule(year));
    }

    fn request_figure(&mut self) {
        let request = self.current_request();
        self.export_status = None;
        if self.worker.submit(WorkerRequest::Figure(request.clone())) {
            self.app_config.last_selection = Some(request);
            self.ui_state = UiState::Loading;
        } else {
            self.ui_state = UiState::Error {
                message: "Timing data worker stopped, restart the application".to_string(),
            };
        }
    }

    fn handle_responses(&mut self) {
        while let Some(response) = self.worker.poll() {
            match response {
                WorkerResponse::Schedule { year, result } => {
                    // a newer year was picked while this one loaded
                    if year != self.selected_year {
                        continue;
                    }
                    match result {
                        Ok(schedule) => {
                            self.events = schedule.into_iter().map(|e| e.event_name).collect();
                            self.schedule_state = ScheduleState::Ready;
                        }
                        Err(e) => {
                            warn!("Could not load {} schedule: {}", year, e);
                            self.schedule_state = ScheduleState::Failed(e.to_string());
                        }
                    }
                }
                WorkerResponse::Figure(Ok(result)) => {
                    self.ui_state = UiState::Display {
                        result: Box::new(result),
                    };
                }
                WorkerResponse::Figure(Err(e)) => {
                    warn!("Request failed: {}", e);
                    self.ui_state = UiState::Error {
                        message: error_message(&e),
                    };
                }
            }
        }
    }
}

impl eframe::App for GapVisualizerApp {
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Err(e) = self.app_config.save() {
            error!("Error while saving config file: {}", e);
        }
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_responses();

        egui::TopBottomPanel::top("SessionSelector")
            .frame(egui::Frame::new().inner_margin(6))
            .show(ctx, |ui| {
                self.show_selectors(ui);
            });

        let cur_ui_state = self.ui_state.clone();
        match cur_ui_state {
            UiState::Idle => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.centered_and_justified(|ui| {
                        ui.label("Pick a session and press \"Generate plot\"");
                    });
                });
            }
            UiState::Loading => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.centered_and_justified(|ui| {
                        ui.add(egui::Spinner::new().size(32.0).color(PALETTE_ORANGE));
                    });
                });
            }
            UiState::Error { message } => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading(RichText::new(message).color(Color32::RED).strong());
                });
            }
            UiState::Display { result } => {
                self.show_figure(ctx, &result);
            }
        }
    }
}
