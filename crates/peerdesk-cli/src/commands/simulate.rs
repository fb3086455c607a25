use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use peerdesk_shared::active_view::ActiveViewRegistry;
use peerdesk_shared::coordinator::{Coordinator, NotificationEvent};
use peerdesk_shared::db::{self, Connection};
use peerdesk_shared::dispatcher::{DispatchOutcome, RecordingRouter};
use peerdesk_shared::models::{AppLifecycle, Arrival};
use peerdesk_shared::presentation::PresentationPolicy;
use peerdesk_shared::routes::RouteBuilder;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{emit_result, CommandResult};

/// One line of a simulation script.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum ScriptEvent {
    /// Cold-start query result; no payload means the app was launched normally.
    Launch {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        payload: Option<Value>,
    },
    Opened {
        #[serde(default)]
        id: Option<String>,
        payload: Value,
    },
    /// Delivered while the app is running; only the alert decision applies.
    Received {
        #[serde(default)]
        id: Option<String>,
        payload: Value,
    },
    AuthResolved,
    PresentationReady,
    AppState {
        state: AppLifecycle,
    },
    Focus {
        #[serde(rename = "receiverId")]
        receiver_id: String,
    },
    Blur {
        #[serde(rename = "receiverId")]
        receiver_id: String,
    },
}

/// Script driver. Pipeline events go to a coordinator running on its own
/// thread; each send waits for that event's batch so output keeps script order.
struct Simulation {
    events: Sender<NotificationEvent>,
    batches: Receiver<Vec<DispatchOutcome>>,
    worker: JoinHandle<RecordingRouter>,
    policy: PresentationPolicy,
    active_view: ActiveViewRegistry,
    journal: Option<Connection>,
}

impl Simulation {
    fn new(routes: RouteBuilder, journal: Option<Connection>) -> Self {
        let coordinator = Coordinator::new(
            RecordingRouter::default(),
            routes,
            ActiveViewRegistry::new(),
        );
        let policy = coordinator.presentation_policy();
        let active_view = coordinator.active_view().clone();

        let (events, rx) = mpsc::channel();
        let (batch_tx, batches) = mpsc::channel();
        let worker = thread::spawn(move || {
            coordinator.run(rx, move |batch| {
                if batch_tx.send(batch).is_err() {
                    log::warn!("Simulation stopped listening for outcomes");
                }
            })
        });

        Simulation {
            events,
            batches,
            worker,
            policy,
            active_view,
            journal,
        }
    }

    fn journal<F>(&self, write: F)
    where
        F: FnOnce(&Connection) -> db::DbResult<i64>,
    {
        if let Some(conn) = &self.journal {
            if let Err(e) = write(conn) {
                log::warn!("Failed to write journal entry: {}", e);
            }
        }
    }

    /// Apply one script event and return the lines to print.
    fn step(&self, event: ScriptEvent) -> Vec<Value> {
        let (notification_id, event) = match event {
            ScriptEvent::Received { id, payload } => {
                return vec![self.present(id.as_deref().unwrap_or_default(), &payload)];
            }
            ScriptEvent::Focus { receiver_id } => {
                self.active_view.set_active(Some(receiver_id.as_str()));
                return Vec::new();
            }
            ScriptEvent::Blur { receiver_id } => {
                self.active_view.release(&receiver_id);
                return Vec::new();
            }
            ScriptEvent::Launch { id, payload } => (
                id.clone(),
                NotificationEvent::LaunchResponse(payload.map(|payload| Arrival { id, payload })),
            ),
            ScriptEvent::Opened { id, payload } => (
                id.clone(),
                NotificationEvent::Opened(Arrival { id, payload }),
            ),
            ScriptEvent::AuthResolved => (None, NotificationEvent::AuthResolved),
            ScriptEvent::PresentationReady => (None, NotificationEvent::PresentationReady),
            ScriptEvent::AppState { state } => (None, NotificationEvent::AppStateChanged(state)),
        };

        let batch = match self.dispatch(event) {
            Ok(batch) => batch,
            Err(e) => {
                log::error!("{}", e);
                return vec![json!({"outcome": "error", "error": e})];
            }
        };

        let notification_id = notification_id.unwrap_or_default();
        batch
            .into_iter()
            .map(|outcome| {
                self.journal(|conn| db::record_outcome(conn, &outcome, &notification_id));
                serde_json::to_value(&outcome).unwrap_or_else(|e| {
                    json!({"outcome": "error", "error": e.to_string()})
                })
            })
            .collect()
    }

    fn dispatch(&self, event: NotificationEvent) -> Result<Vec<DispatchOutcome>, String> {
        self.events
            .send(event)
            .map_err(|_| "Coordinator thread is gone".to_string())?;
        self.batches
            .recv()
            .map_err(|_| "Coordinator thread stopped before replying".to_string())
    }

    /// Close the channel and wait for the coordinator. Returns the navigation count.
    fn finish(self) -> usize {
        drop(self.events);
        match self.worker.join() {
            Ok(router) => router.navigations.len(),
            Err(_) => {
                log::error!("Coordinator thread panicked");
                0
            }
        }
    }

    fn present(&self, notification_id: &str, payload: &Value) -> Value {
        let presentation = self.policy.decide(payload);
        let screen = payload
            .get("screen")
            .and_then(Value::as_str)
            .unwrap_or_default();
        self.journal(|conn| db::record_presentation(conn, &presentation, screen, notification_id));
        let kind = if presentation.is_suppressed() {
            "suppressed"
        } else {
            "presented"
        };
        json!({
            "outcome": kind,
            "screen": screen,
            "presentation": presentation,
        })
    }
}

fn open_journal(enabled: bool) -> Option<Connection> {
    if !enabled {
        return None;
    }
    let path = peerdesk_shared::config::db_path();
    match db::open(&path) {
        Ok(conn) => Some(conn),
        Err(e) => {
            log::warn!("Journal disabled, failed to open {:?}: {}", path, e);
            None
        }
    }
}

/// Run every line of `input` through a fresh coordinator, printing one JSON
/// object per outcome. Bad lines are reported and skipped.
pub fn run_script<R: Read>(input: R, routes: RouteBuilder, journal_enabled: bool) -> usize {
    let sim = Simulation::new(routes, open_journal(journal_enabled));

    for (index, line) in BufReader::new(input).lines().enumerate() {
        let line_no = index + 1;
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                log::error!("Failed to read script line {}: {}", line_no, e);
                break;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let outputs = match serde_json::from_str::<ScriptEvent>(trimmed) {
            Ok(event) => sim.step(event),
            Err(e) => {
                log::warn!("Skipping script line {}: {}", line_no, e);
                vec![json!({"outcome": "error", "error": format!("Invalid event: {}", e)})]
            }
        };
        for mut output in outputs {
            output["line"] = json!(line_no);
            println!("{}", output);
        }
    }

    sim.finish()
}

pub fn handle(script: Option<&Path>, routes: RouteBuilder, journal_enabled: bool) {
    let navigations = match script {
        Some(path) => match std::fs::File::open(path) {
            Ok(file) => run_script(file, routes, journal_enabled),
            Err(e) => {
                emit_result(CommandResult::from_run(Err(format!(
                    "Failed to open script {}: {}",
                    path.display(),
                    e
                ))));
                return;
            }
        },
        None => run_script(std::io::stdin().lock(), routes, journal_enabled),
    };
    log::info!("Simulation finished with {} navigation(s)", navigations);
}
