use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::warn;

/// Progress of a long-running command, reported by phase.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    PhaseStart { name: String },
    PhaseFinish,

    TaskStart { total: u64 },
    TaskIncrement { amount: u64 },
    TaskFinish,

    StatusUpdate { text: String },
    Message(String),
}

#[derive(Debug)]
pub enum UiEvent {
    Progress(Progress),
    Log(String),
}

pub struct UiManager {
    mp: Arc<MultiProgress>,
    state: BarState,
    event_receiver: mpsc::Receiver<UiEvent>,
    shutdown_receiver: watch::Receiver<bool>,
    sentinel_bar: ProgressBar,
}

#[derive(Default)]
struct BarState {
    active_bar: Option<ProgressBar>,
    base_message: String,
}

impl UiManager {
    pub fn new() -> (Self, mpsc::Sender<UiEvent>, watch::Sender<bool>) {
        Self::with_draw_target(ProgressDrawTarget::stderr_with_hz(12))
    }

    fn with_draw_target(
        target: ProgressDrawTarget,
    ) -> (Self, mpsc::Sender<UiEvent>, watch::Sender<bool>) {
        let (event_sender, event_receiver) = mpsc::channel(1024);
        let (shutdown_sender, shutdown_receiver) = watch::channel(false);
        let mp = Arc::new(MultiProgress::new());
        mp.set_draw_target(target);
        let sentinel_bar = mp.add(ProgressBar::hidden());
        let manager = Self {
            mp,
            state: BarState::default(),
            event_receiver,
            shutdown_receiver,
            sentinel_bar,
        };

        (manager, event_sender, shutdown_sender)
    }

    pub async fn run(mut self) {
        loop {
            tokio::select! {
                Some(event) = self.event_receiver.recv() => {
                    self.handle_event(event);
                }
                result = self.shutdown_receiver.changed() => {
                    if result.is_err() || *self.shutdown_receiver.borrow() {
                        break;
                    }
                }
            }
        }
        while let Ok(event) = self.event_receiver.try_recv() {
            self.handle_event(event);
        }
        if let Some(bar) = self.state.active_bar.take() {
            bar.finish_and_clear();
        }
        self.sentinel_bar.finish_and_clear();
    }

    fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Log(msg) => {
                self.mp.println(msg).ok();
            }
            UiEvent::Progress(progress) => self.handle_progress(progress),
        }
    }

    fn handle_progress(&mut self, progress: Progress) {
        match progress {
            Progress::PhaseStart { name } => {
                if let Some(bar) = self.state.active_bar.take() {
                    bar.finish_and_clear();
                }

                let pb = self.mp.add(ProgressBar::new_spinner());
                pb.enable_steady_tick(Duration::from_millis(80));
                pb.set_style(Self::spinner_style());
                pb.set_message(name.clone());

                self.state.active_bar = Some(pb);
                self.state.base_message = name;
            }
            Progress::PhaseFinish => {
                if let Some(bar) = self.state.active_bar.take() {
                    bar.finish_and_clear();
                }
                if !self.state.base_message.is_empty() {
                    self.mp.println(format!("✓ {}", self.state.base_message)).ok();
                }
                self.state.base_message.clear();
            }
            Progress::TaskStart { total } => {
                if let Some(bar) = self.state.active_bar.as_ref() {
                    bar.set_style(Self::bar_style());
                    bar.set_length(total);
                    bar.set_position(0);
                    bar.disable_steady_tick();
                }
            }
            Progress::TaskIncrement { amount } => {
                if let Some(bar) = self.state.active_bar.as_ref() {
                    bar.inc(amount);
                }
            }
            Progress::TaskFinish => {
                if let Some(bar) = self.state.active_bar.as_ref() {
                    bar.finish();
                }
            }
            Progress::StatusUpdate { text } => {
                if let Some(bar) = self.state.active_bar.as_ref() {
                    bar.set_message(format!("{} ({})", self.state.base_message, text));
                }
            }
            Progress::Message(msg) => {
                self.mp.println(format!("  {}", msg)).ok();
            }
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<45} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .with_key(
                "eta",
                |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                    let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
                },
            )
            .progress_chars("━╸ ")
    }
}

/// Cloneable handle commands use to report progress to the [`UiManager`].
#[derive(Clone)]
pub struct CliProgressHandler {
    sender: mpsc::Sender<UiEvent>,
}

impl CliProgressHandler {
    pub fn new(sender: mpsc::Sender<UiEvent>) -> Self {
        Self { sender }
    }

    pub fn report(&self, progress: Progress) {
        if let Err(e) = self.sender.try_send(UiEvent::Progress(progress)) {
            warn!("Failed to send progress update to UI channel: {}", e);
        }
    }

    pub fn phase(&self, name: impl Into<String>) {
        self.report(Progress::PhaseStart { name: name.into() });
    }

    pub fn finish_phase(&self) {
        self.report(Progress::PhaseFinish);
    }

    pub fn message(&self, msg: impl Into<String>) {
        self.report(Progress::Message(msg.into()));
    }

    /// Prints a line above any active progress bar.
    pub fn log(&self, line: impl Into<String>) {
        if let Err(e) = self.sender.try_send(UiEvent::Log(line.into())) {
            warn!("Failed to send log line to UI channel: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_manager() -> (UiManager, mpsc::Sender<UiEvent>) {
        let (manager, sender, _) = UiManager::with_draw_target(ProgressDrawTarget::hidden());
        (manager, sender)
    }

    fn start(manager: &mut UiManager, name: &str) {
        manager.handle_event(UiEvent::Progress(Progress::PhaseStart { name: name.into() }));
    }

    #[test]
    fn handle_phase_start_creates_new_spinner() {
        let (mut manager, _) = setup_manager();
        assert!(manager.state.active_bar.is_none());

        start(&mut manager, "Searching UniProt");

        let bar = manager.state.active_bar.as_ref().unwrap();
        assert_eq!(bar.message(), "Searching UniProt");
        assert_eq!(manager.state.base_message, "Searching UniProt");
    }

    #[test]
    fn handle_phase_start_replaces_existing_bar() {
        let (mut manager, _) = setup_manager();
        start(&mut manager, "First Phase");
        start(&mut manager, "Second Phase");

        let second_bar = manager.state.active_bar.as_ref().unwrap();
        assert_eq!(second_bar.message(), "Second Phase");
        assert_eq!(manager.state.base_message, "Second Phase");
    }

    #[test]
    fn handle_phase_finish_clears_active_bar() {
        let (mut manager, _) = setup_manager();
        start(&mut manager, "Test Phase");

        manager.handle_event(UiEvent::Progress(Progress::PhaseFinish));

        assert!(manager.state.active_bar.is_none());
        assert!(manager.state.base_message.is_empty());
    }

    #[test]
    fn task_events_drive_bar_position() {
        let (mut manager, _) = setup_manager();
        start(&mut manager, "Translating descriptions");
        manager.handle_event(UiEvent::Progress(Progress::TaskStart { total: 4 }));
        manager.handle_event(UiEvent::Progress(Progress::TaskIncrement { amount: 3 }));

        let bar = manager.state.active_bar.as_ref().unwrap();
        assert_eq!(bar.length(), Some(4));
        assert_eq!(bar.position(), 3);

        manager.handle_event(UiEvent::Progress(Progress::TaskFinish));
        assert!(manager.state.active_bar.as_ref().unwrap().is_finished());
    }

    #[test]
    fn handle_status_update_changes_bar_message() {
        let (mut manager, _) = setup_manager();
        start(&mut manager, "Fetching");

        manager.handle_event(UiEvent::Progress(Progress::StatusUpdate {
            text: "retrying".into(),
        }));

        let bar = manager.state.active_bar.as_ref().unwrap();
        assert_eq!(bar.message(), "Fetching (retrying)");
    }

    #[tokio::test]
    async fn progress_handler_forwards_events() {
        let (sender, mut receiver) = mpsc::channel(4);
        let handler = CliProgressHandler::new(sender);

        handler.phase("Testing");
        handler.finish_phase();

        match receiver.recv().await.unwrap() {
            UiEvent::Progress(Progress::PhaseStart { name }) => assert_eq!(name, "Testing"),
            other => panic!("Unexpected event: {:?}", other),
        }
        assert!(matches!(
            receiver.recv().await.unwrap(),
            UiEvent::Progress(Progress::PhaseFinish)
        ));
    }

    #[tokio::test]
    async fn run_exits_on_shutdown_signal() {
        let (manager, sender, shutdown) = UiManager::with_draw_target(ProgressDrawTarget::hidden());
        let handle = tokio::spawn(manager.run());
        sender.send(UiEvent::Log("hello".into())).await.unwrap();
        shutdown.send(true).unwrap();
        handle.await.unwrap();
    }
}
