use std::{
    sync::mpsc::{self, Receiver, Sender},
    thread,
};

use gridgap::{
    GridgapError, SessionFigure, SessionRequest, TimingProvider, build_figure,
    session::EventInfo,
};
use log::{debug, error};

pub(crate) enum WorkerRequest {
    Schedule(u16),
    Figure(SessionRequest),
}

pub(crate) enum WorkerResponse {
    Schedule {
        year: u16,
        result: Result<Vec<EventInfo>, GridgapError>,
    },
    Figure(Result<SessionFigure, GridgapError>),
}

/// Runs provider calls off the UI thread, one at a time, in the order they were submitted.
pub(crate) struct Worker {
    requests: Sender<WorkerRequest>,
    responses: Receiver<WorkerResponse>,
}

impl Worker {
    pub(crate) fn spawn(provider: Box<dyn TimingProvider>, ctx: egui::Context) -> Self {
        let (request_tx, request_rx) = mpsc::channel::<WorkerRequest>();
        let (response_tx, response_rx) = mpsc::channel::<WorkerResponse>();

        thread::spawn(move || {
            for request in request_rx {
                let response = match request {
                    WorkerRequest::Schedule(year) => WorkerResponse::Schedule {
                        year,
                        result: provider.event_schedule(year),
                    },
                    WorkerRequest::Figure(request) => {
                        WorkerResponse::Figure(build_figure(provider.as_ref(), &request))
                    }
                };
                if response_tx.send(response).is_err() {
                    break;
                }
                // wake the UI so the response is picked up without user input
                ctx.request_repaint();
            }
            debug!("Timing worker exiting");
        });

        Self {
            requests: request_tx,
            responses: response_rx,
        }
    }

    pub(crate) fn submit(&self, request: WorkerRequest) -> bool {
        match self.requests.send(request) {
            Ok(()) => true,
            Err(_) => {
                error!("Timing worker is gone, request dropped");
                false
            }
        }
    }

    pub(crate) fn poll(&self) -> Option<WorkerResponse> {
        self.responses.try_recv().ok()
    }
}
