//! Fetch orchestration for one dashboard view.
//!
//! The session owns the view state and the forecast service. Exactly one
//! fetch is in flight at a time; starting a new cycle cancels the previous
//! token and bumps the state generation, so a late completion can neither
//! resume nor overwrite the newer view.

use tokio_util::sync::CancellationToken;

use cuaca_weather::ForecastService;

use crate::state::{DashboardState, Phase};

pub struct DashboardSession {
    service: ForecastService,
    state: DashboardState,
    cancel_token: Option<CancellationToken>,
}

impl DashboardSession {
    pub fn new(service: ForecastService, state: DashboardState) -> Self {
        Self {
            service,
            state,
            cancel_token: None,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut DashboardState {
        &mut self.state
    }

    /// Cancel the in-flight fetch, if any. The superseded cycle's events
    /// are additionally rejected by the state's generation check.
    pub fn cancel(&mut self) {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
            tracing::debug!("Forecast fetch cancelled");
        }
    }

    /// Run one fetch cycle to completion, applying each transition to the
    /// view state as it happens. `observe` is called after every applied
    /// transition so a renderer can repaint incrementally.
    pub async fn reload_with<F: FnMut(&DashboardState)>(&mut self, mut observe: F) -> Phase {
        self.cancel();

        let token = CancellationToken::new();
        self.cancel_token = Some(token.clone());

        let generation = self.state.begin_fetch();
        let service = &self.service;
        let state = &mut self.state;

        let cycle = service.fetch_latest(|event| {
            state.apply(generation, event);
            observe(&*state);
        });

        tokio::select! {
            _ = cycle => {}
            _ = token.cancelled() => {
                tracing::debug!("Fetch cycle abandoned before completion");
            }
        }

        self.cancel_token = None;
        self.state.phase()
    }

    /// Run one fetch cycle without observing intermediate transitions.
    pub async fn reload(&mut self) -> Phase {
        self.reload_with(|_| {}).await
    }
}
