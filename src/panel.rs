//! Progress panel for one selected day.
//!
//! The panel is a value: [`update`] takes the current snapshot and a [`Msg`]
//! and returns the next snapshot plus the [`Effect`]s the host has to run.
//! Network results come back as messages, so the snapshot is only ever
//! replaced, never shared and mutated.

use crate::calendar::date_key;
use crate::slots::display_label;
use chrono::NaiveDate;
use tracing::debug;

pub type RequestId = u64;

/// Where a slot stands relative to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// As loaded, not touched since.
    Pending,
    /// Optimistically flipped, toggle request in flight.
    Submitting,
    /// The server answered and its value was adopted.
    Confirmed,
    /// The toggle failed and the flip was rolled back.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub completed: bool,
    pub sync: SyncState,
    /// Id of the toggle request this slot is waiting on.
    toggle: Option<RequestId>,
}

impl Slot {
    fn loaded(completed: bool) -> Self {
        Self {
            completed,
            sync: SyncState::Pending,
            toggle: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loading(RequestId),
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    DateSelected(NaiveDate),
    Reload,
    Loaded {
        request: RequestId,
        date: NaiveDate,
        result: Result<Vec<bool>, String>,
    },
    SlotsLoaded(Result<Vec<String>, String>),
    Toggle(usize),
    ToggleResolved {
        request: RequestId,
        date: NaiveDate,
        index: usize,
        result: Result<Vec<bool>, String>,
    },
    DismissError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    FetchProgress { request: RequestId, date: NaiveDate },
    FetchSlots,
    SubmitToggle {
        request: RequestId,
        date: NaiveDate,
        index: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelState {
    date: NaiveDate,
    load: LoadStatus,
    slots: Vec<Slot>,
    labels: Vec<String>,
    error: Option<String>,
    last_request: RequestId,
}

impl PanelState {
    /// A panel for `date` that still has to fetch its progress and the slot labels.
    pub fn init(date: NaiveDate) -> (Self, Vec<Effect>) {
        let blank = Self {
            date,
            load: LoadStatus::Ready,
            slots: Vec::new(),
            labels: Vec::new(),
            error: None,
            last_request: 0,
        };
        let (state, mut effects) = update(&blank, Msg::DateSelected(date));
        effects.push(Effect::FetchSlots);
        (state, effects)
    }

    /// A panel whose progress is already known, as the server renders it.
    pub fn loaded(date: NaiveDate, progress: &[bool], labels: Vec<String>) -> Self {
        Self {
            date,
            load: LoadStatus::Ready,
            slots: progress.iter().copied().map(Slot::loaded).collect(),
            labels,
            error: None,
            last_request: 0,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn load_status(&self) -> &LoadStatus {
        &self.load
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.load, LoadStatus::Loading(_))
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn label(&self, index: usize) -> String {
        display_label(&self.labels, index)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn progress(&self) -> Vec<bool> {
        self.slots.iter().map(|slot| slot.completed).collect()
    }

    pub fn completed_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.completed).count()
    }

    fn next_request(&mut self) -> RequestId {
        self.last_request += 1;
        self.last_request
    }

    fn begin_load(&mut self, date: NaiveDate) -> Vec<Effect> {
        let request = self.next_request();
        self.date = date;
        self.slots.clear();
        self.load = LoadStatus::Loading(request);
        vec![Effect::FetchProgress { request, date }]
    }

    fn finish_load(
        &mut self,
        request: RequestId,
        date: NaiveDate,
        result: Result<Vec<bool>, String>,
    ) {
        if self.load != LoadStatus::Loading(request) || self.date != date {
            debug!(request, date = %date_key(date), "dropping stale progress response");
            return;
        }
        match result {
            Ok(progress) => {
                self.slots = progress.into_iter().map(Slot::loaded).collect();
                self.load = LoadStatus::Ready;
            }
            Err(err) => {
                self.error = Some(format!(
                    "Could not load progress for {}: {err}",
                    date_key(date)
                ));
                self.load = LoadStatus::Failed(err);
            }
        }
    }

    fn begin_toggle(&mut self, index: usize) -> Vec<Effect> {
        if self.load != LoadStatus::Ready {
            return Vec::new();
        }
        match self.slots.get(index) {
            Some(slot) if slot.sync != SyncState::Submitting => {}
            _ => return Vec::new(),
        }
        let request = self.next_request();
        let slot = &mut self.slots[index];
        slot.completed = !slot.completed;
        slot.sync = SyncState::Submitting;
        slot.toggle = Some(request);
        vec![Effect::SubmitToggle {
            request,
            date: self.date,
            index,
        }]
    }

    fn finish_toggle(
        &mut self,
        request: RequestId,
        date: NaiveDate,
        index: usize,
        result: Result<Vec<bool>, String>,
    ) {
        if date != self.date || self.load != LoadStatus::Ready {
            debug!(index, date = %date_key(date), "dropping toggle response for a moved panel");
            return;
        }
        let label = self.label(index);
        let Some(slot) = self.slots.get_mut(index) else {
            return;
        };
        if slot.sync != SyncState::Submitting || slot.toggle != Some(request) {
            debug!(request, index, "dropping response for a superseded toggle");
            return;
        }
        slot.toggle = None;

        let confirmed = result.and_then(|updated| {
            updated
                .get(index)
                .copied()
                .ok_or_else(|| format!("response has no value for slot {}", index + 1))
        });
        match confirmed {
            Ok(completed) => {
                slot.completed = completed;
                slot.sync = SyncState::Confirmed;
            }
            Err(err) => {
                slot.completed = !slot.completed;
                slot.sync = SyncState::Failed;
                self.error = Some(format!(
                    "Could not update {label} on {}: {err}",
                    date_key(date)
                ));
            }
        }
    }
}

pub fn update(state: &PanelState, msg: Msg) -> (PanelState, Vec<Effect>) {
    let mut next = state.clone();
    let effects = match msg {
        Msg::DateSelected(date) => next.begin_load(date),
        Msg::Reload => {
            let date = next.date;
            next.begin_load(date)
        }
        Msg::Loaded {
            request,
            date,
            result,
        } => {
            next.finish_load(request, date, result);
            Vec::new()
        }
        Msg::SlotsLoaded(Ok(labels)) => {
            next.labels = labels;
            Vec::new()
        }
        Msg::SlotsLoaded(Err(err)) => {
            next.error = Some(format!("Could not load time slots: {err}"));
            Vec::new()
        }
        Msg::Toggle(index) => next.begin_toggle(index),
        Msg::ToggleResolved {
            request,
            date,
            index,
            result,
        } => {
            next.finish_toggle(request, date, index, result);
            Vec::new()
        }
        Msg::DismissError => {
            next.error = None;
            Vec::new()
        }
    };
    (next, effects)
}
