use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use std::sync::Arc;
use std::time::Instant;

use crate::api::PropertySource;
use crate::dashboard::{Dashboard, LoadPoll, PendingLoad};

/// Seconds a status message stays on the info line
const STATUS_MESSAGE_SECS: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Selector,  // Property dropdown
    Help,
}

pub struct App {
    pub popup: Popup,

    // Mounted dashboard and its in-flight load, if any
    pub dashboard: Dashboard,
    source: Arc<dyn PropertySource>,
    pending: Option<PendingLoad>,

    // Row highlighted in the open dropdown
    pub highlighted: usize,

    // Status message (shown in info line, auto-clears after timeout)
    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,
}

impl App {
    /// Create the app and mount its dashboard. Must run inside the tokio
    /// runtime since mounting spawns the load.
    pub fn new(source: Arc<dyn PropertySource>) -> Self {
        let mut dashboard = Dashboard::new();
        let pending = dashboard.mount(source.clone());

        Self {
            popup: Popup::None,
            dashboard,
            source,
            pending,
            highlighted: 0,
            status_message: None,
            status_message_time: None,
        }
    }

    fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_message_time = Some(Instant::now());
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        match self.popup {
            Popup::Selector => self.handle_selector_key(key),
            Popup::Help => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::Enter | KeyCode::Char('q')) {
                    self.popup = Popup::None;
                }
                Ok(())
            }
            Popup::None => self.handle_normal_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => self.open_selector(),
            KeyCode::Char('R') => self.remount(),
            KeyCode::Char('?') | KeyCode::Char('h') => self.popup = Popup::Help,
            _ => {}
        }
        Ok(())
    }

    fn handle_selector_key(&mut self, key: KeyEvent) -> Result<()> {
        let count = self.dashboard.properties().len();

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if count > 0 {
                    self.highlighted = (self.highlighted + 1) % count;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if count > 0 {
                    self.highlighted = (self.highlighted + count - 1) % count;
                }
            }
            KeyCode::Home => self.highlighted = 0,
            KeyCode::End => self.highlighted = count.saturating_sub(1),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(property) = self.dashboard.properties().get(self.highlighted) {
                    let id = property.id.clone();
                    tracing::debug!(property = %id, "Property selected");
                    self.dashboard.select(id);
                }
                self.popup = Popup::None;
            }
            KeyCode::Esc | KeyCode::Char('q') => self.popup = Popup::None,
            _ => {}
        }
        Ok(())
    }

    /// Open the dropdown with the current selection highlighted
    fn open_selector(&mut self) {
        if !self.dashboard.selector_enabled() {
            return;
        }

        let selected = self.dashboard.selected();
        self.highlighted = self
            .dashboard
            .properties()
            .iter()
            .position(|p| p.id == selected)
            .unwrap_or(0);
        self.popup = Popup::Selector;
    }

    /// Tear the dashboard down and mount a fresh one. This is the only way
    /// to retry a failed load.
    fn remount(&mut self) {
        tracing::info!("Remounting dashboard");
        self.dashboard.unmount();
        self.dashboard = Dashboard::new();
        self.pending = self.dashboard.mount(self.source.clone());
        self.popup = Popup::None;
        self.highlighted = 0;
        self.set_status("Reloading properties");
    }

    /// Apply a finished load, clear expired status messages
    pub fn tick(&mut self) {
        if !self.dashboard.is_live() {
            self.pending = None;
        }

        if let Some(pending) = self.pending.as_mut() {
            match pending.poll() {
                LoadPoll::Pending => {}
                LoadPoll::Ready(outcome) => {
                    self.dashboard.apply(outcome);
                    self.pending = None;
                }
                LoadPoll::Abandoned => self.pending = None,
            }
        }

        if let Some(time) = self.status_message_time {
            if time.elapsed().as_secs() >= STATUS_MESSAGE_SECS {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }

    /// Unmount before exit so a load still in flight is discarded
    pub fn shutdown(&mut self) {
        self.dashboard.unmount();
        self.pending = None;
    }
}
