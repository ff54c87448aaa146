use crate::client::ProgressApi;
use crate::panel::{update, Effect, Msg, PanelState};
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Owns the panel snapshot and runs its effects against a [`ProgressApi`].
///
/// Effects run as tokio tasks; their results are queued as messages and only
/// applied when the owner awaits [`PanelStore::next_completion`] or
/// [`PanelStore::settle`].
pub struct PanelStore<A> {
    api: Arc<A>,
    state: PanelState,
    tx: mpsc::UnboundedSender<Msg>,
    rx: mpsc::UnboundedReceiver<Msg>,
    in_flight: usize,
}

impl<A: ProgressApi + 'static> PanelStore<A> {
    pub fn new(api: Arc<A>, date: NaiveDate) -> Self {
        let (state, effects) = PanelState::init(date);
        let (tx, rx) = mpsc::unbounded_channel();
        let mut store = Self {
            api,
            state,
            tx,
            rx,
            in_flight: 0,
        };
        store.spawn_all(effects);
        store
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn dispatch(&mut self, msg: Msg) {
        let (next, effects) = update(&self.state, msg);
        self.state = next;
        self.spawn_all(effects);
    }

    /// Applies the next finished effect. Returns `false` when nothing is pending.
    pub async fn next_completion(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        match self.rx.recv().await {
            Some(msg) => {
                self.in_flight -= 1;
                self.dispatch(msg);
                true
            }
            None => false,
        }
    }

    /// Waits until every request, including ones spawned along the way, has landed.
    pub async fn settle(&mut self) {
        while self.next_completion().await {}
    }

    fn spawn_all(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            self.in_flight += 1;
            let api = Arc::clone(&self.api);
            let tx = self.tx.clone();
            tokio::spawn(async move {
                let msg = run_effect(api.as_ref(), effect).await;
                if tx.send(msg).is_err() {
                    debug!("panel store dropped before {effect:?} finished");
                }
            });
        }
    }
}

pub async fn run_effect<A: ProgressApi + ?Sized>(api: &A, effect: Effect) -> Msg {
    match effect {
        Effect::FetchProgress { request, date } => Msg::Loaded {
            request,
            date,
            result: api.fetch_progress(date).await.map_err(|err| {
                warn!("progress load failed: {err}");
                err.to_string()
            }),
        },
        Effect::FetchSlots => Msg::SlotsLoaded(api.fetch_slots().await.map_err(|err| {
            warn!("slot label load failed: {err}");
            err.to_string()
        })),
        Effect::SubmitToggle {
            request,
            date,
            index,
        } => Msg::ToggleResolved {
            request,
            date,
            index,
            result: api
                .toggle_slot(date, index)
                .await
                .map(|response| response.updated)
                .map_err(|err| {
                    warn!("toggle of slot {index} failed: {err}");
                    err.to_string()
                }),
        },
    }
}
