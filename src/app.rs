//! Application shell.
//!
//! Owns the API client, the three polling loops, the visibility source and
//! the notice channel, and drives the draw/handle/update loop. Mutations
//! are spawned onto the runtime so the UI never blocks on the network;
//! each one triggers a refetch of the affected resource when it completes,
//! shortening the staleness window below the poll interval.

use std::sync::Arc;
use std::time::Duration;

use color_eyre::Result;
use crossterm::event::KeyEvent;
use futures::StreamExt;
use ratatui::backend::Backend;
use ratatui::Terminal;
use tokio::sync::mpsc;

use crate::client::{ApiClient, EngineStatus, Task, TaskQuery, Worker, BASE_URL_ENV, DEFAULT_BASE_URL};
use crate::event::{Event, EventHandler};
use crate::ops::{self, Notice, Notices};
use crate::poll::{Poller, RefetchHandle, Visibility, VisibilitySource, DEFAULT_POLL_INTERVAL};
use crate::state::AppState;
use crate::ui::{Ui, UpdateKind};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub base_url: String,
    pub poll_interval: Duration,
}

impl AppConfig {
    /// Read configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var(BASE_URL_ENV)
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Main application.
pub struct App {
    /// Shared API client
    client: Arc<ApiClient>,
    /// Rendered state, refreshed from the pollers each pass
    state: AppState,
    /// View controller
    ui: Ui,
    /// Terminal focus feeds this; pollers subscribe to it
    visibility: VisibilitySource,
    /// Task list poller
    tasks: Poller<Vec<Task>>,
    /// Worker list poller
    workers: Poller<Vec<Worker>>,
    /// Engine status poller
    engine: Poller<EngineStatus>,
    /// Sending side of the notice channel, cloned into mutation tasks
    notices: Notices,
    /// Receiving side, drained into the state each pass
    notice_rx: mpsc::UnboundedReceiver<Notice>,
    /// Should the application exit?
    should_quit: bool,
}

impl App {
    /// Create the application and start its polling loops.
    pub fn new(config: AppConfig) -> Self {
        let client = Arc::new(ApiClient::new(config.base_url.clone()));
        let visibility = VisibilitySource::new(Visibility::Visible);
        let (notices, notice_rx) = Notices::channel();

        let tasks = Poller::spawn(
            {
                let client = Arc::clone(&client);
                move || {
                    let client = Arc::clone(&client);
                    async move {
                        client
                            .list_tasks(&TaskQuery::for_board())
                            .await
                            .map(|page| page.content)
                    }
                }
            },
            config.poll_interval,
            visibility.subscribe(),
        );

        let workers = Poller::spawn(
            {
                let client = Arc::clone(&client);
                move || {
                    let client = Arc::clone(&client);
                    async move { client.list_workers().await }
                }
            },
            config.poll_interval,
            visibility.subscribe(),
        );

        let engine = Poller::spawn(
            {
                let client = Arc::clone(&client);
                move || {
                    let client = Arc::clone(&client);
                    async move { client.engine_status().await }
                }
            },
            config.poll_interval,
            visibility.subscribe(),
        );

        Self {
            client,
            state: AppState::new(),
            ui: Ui::new(),
            visibility,
            tasks,
            workers,
            engine,
            notices,
            notice_rx,
            should_quit: false,
        }
    }

    /// Run the application main loop.
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<impl Backend>,
        events: &mut EventHandler,
    ) -> Result<()> {
        self.probe_backend();

        while !self.should_quit {
            self.refresh_state();
            terminal.draw(|frame| self.ui.render(frame, &self.state))?;

            if let Some(event) = events.next().await {
                self.handle_event(event);
            }
        }

        Ok(())
    }

    /// One-off liveness probe so an unreachable backend is called out
    /// immediately instead of via a silently stale board.
    fn probe_backend(&self) {
        let client = Arc::clone(&self.client);
        let notices = self.notices.clone();
        tokio::spawn(async move {
            if let Err(err) = client.health().await {
                tracing::warn!(error = %err, "health probe failed");
                notices.error("Backend unreachable", err.message());
            }
        });
    }

    /// Copy the latest poller snapshots into the rendered state and drain
    /// pending notices.
    fn refresh_state(&mut self) {
        self.state.apply_tasks(self.tasks.snapshot());
        self.state.apply_workers(self.workers.snapshot());
        self.state.apply_engine(self.engine.snapshot());
        while let Ok(notice) = self.notice_rx.try_recv() {
            self.state.push_notice(notice);
        }
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key_event(key),
            Event::FocusLost => self.visibility.set(Visibility::Hidden),
            Event::FocusGained => self.visibility.set(Visibility::Visible),
            Event::Resize(_, _) | Event::Tick => {}
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        match self.ui.handle_key_event(key) {
            UpdateKind::Quit => self.should_quit = true,
            UpdateKind::ToggleHelp => self.ui.toggle_help(),
            UpdateKind::SubmitTask => {
                self.spawn_tasks_mutation(|client, notices| async move {
                    ops::submission::submit_task(
                        client.as_ref(),
                        &notices,
                        ops::submission::random_submission(),
                        false,
                    )
                    .await;
                });
            }
            UpdateKind::SubmitNamedTask(request) => {
                self.spawn_tasks_mutation(move |client, notices| async move {
                    ops::submission::submit_task(client.as_ref(), &notices, request, false).await;
                });
            }
            UpdateKind::BulkSubmit(count) => {
                self.spawn_tasks_mutation(move |client, notices| async move {
                    ops::submission::bulk_submit(client.as_ref(), &notices, count).await;
                });
            }
            UpdateKind::AddWorker => {
                if self.state.utilization.total >= ops::scaling::MAX_WORKERS {
                    self.notices.info(
                        "Worker limit reached",
                        format!("The pool is capped at {} workers", ops::scaling::MAX_WORKERS),
                    );
                } else {
                    self.spawn_workers_mutation(|client, notices| async move {
                        ops::scaling::add_worker(client.as_ref(), &notices).await;
                    });
                }
            }
            UpdateKind::RemoveWorker => match self.state.first_active_worker().and_then(|w| w.id) {
                Some(id) => {
                    self.spawn_workers_mutation(move |client, notices| async move {
                        ops::scaling::remove_worker(client.as_ref(), &notices, id).await;
                    });
                }
                None => self.notices.info("No active workers", "Nothing to stop"),
            },
            UpdateKind::ScaleWorkers(target) => {
                let current = self.state.utilization.active();
                self.spawn_workers_mutation(move |client, notices| async move {
                    ops::scaling::scale_workers(client.as_ref(), &notices, target, current).await;
                });
            }
            UpdateKind::StartEngine => {
                self.spawn_engine_mutation(|client, notices| async move {
                    ops::engine::start_engine(client.as_ref(), &notices).await;
                });
            }
            UpdateKind::PauseEngine => {
                self.spawn_engine_mutation(|client, notices| async move {
                    ops::engine::pause_engine(client.as_ref(), &notices).await;
                });
            }
            UpdateKind::ResumeEngine => {
                self.spawn_engine_mutation(|client, notices| async move {
                    ops::engine::resume_engine(client.as_ref(), &notices).await;
                });
            }
            UpdateKind::StopEngine => {
                self.spawn_engine_mutation(|client, notices| async move {
                    ops::engine::stop_engine(client.as_ref(), &notices).await;
                });
            }
            UpdateKind::ClearDatabase => {
                let refetch = [
                    self.tasks.refetch_handle(),
                    self.workers.refetch_handle(),
                    self.engine.refetch_handle(),
                ];
                self.spawn_mutation(refetch.to_vec(), |client, notices| async move {
                    ops::engine::clear_database(client.as_ref(), &notices).await;
                });
            }
            UpdateKind::Refresh => {
                self.tasks.refetch();
                self.workers.refetch();
                self.engine.refetch();
            }
            UpdateKind::Other => {}
        }
    }

    fn spawn_tasks_mutation<F, Fut>(&self, op: F)
    where
        F: FnOnce(Arc<ApiClient>, Notices) -> Fut + Send + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        self.spawn_mutation(vec![self.tasks.refetch_handle()], op);
    }

    fn spawn_workers_mutation<F, Fut>(&self, op: F)
    where
        F: FnOnce(Arc<ApiClient>, Notices) -> Fut + Send + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        // Worker mutations also move the engine's active worker count.
        self.spawn_mutation(
            vec![self.workers.refetch_handle(), self.engine.refetch_handle()],
            op,
        );
    }

    fn spawn_engine_mutation<F, Fut>(&self, op: F)
    where
        F: FnOnce(Arc<ApiClient>, Notices) -> Fut + Send + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        self.spawn_mutation(vec![self.engine.refetch_handle()], op);
    }

    /// Run a mutation off the UI loop, then refetch the listed resources
    /// so the effect shows up before the next scheduled tick.
    fn spawn_mutation<F, Fut>(&self, refetch: Vec<RefetchHandle>, op: F)
    where
        F: FnOnce(Arc<ApiClient>, Notices) -> Fut + Send + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        let client = Arc::clone(&self.client);
        let notices = self.notices.clone();
        tokio::spawn(async move {
            op(client, notices).await;
            for handle in refetch {
                handle.trigger();
            }
        });
    }
}
