// ── Session ──
//
// Glue between the pure update functions and the controller: owns the
// dashboard state and the outcome channel, and counts tasks in flight.

use tokio::sync::mpsc;

use crate::command::Command;
use crate::config::ClientConfig;
use crate::controller::Controller;
use crate::error::CoreError;
use crate::state::DashboardState;
use crate::update::{Notice, Outcome, Task, handle_command, handle_outcome};
use crate::view::ViewId;

pub struct Session {
    state: DashboardState,
    controller: Controller,
    outcomes: mpsc::UnboundedReceiver<Outcome>,
    in_flight: usize,
}

impl Session {
    pub fn new(config: &ClientConfig) -> Result<Self, CoreError> {
        let (controller, outcomes) = Controller::new(config)?;
        Ok(Self::with_controller(config, controller, outcomes))
    }

    pub fn with_controller(
        config: &ClientConfig,
        controller: Controller,
        outcomes: mpsc::UnboundedReceiver<Outcome>,
    ) -> Self {
        Self {
            state: DashboardState::new(config),
            controller,
            outcomes,
            in_flight: 0,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Mutable state, for editing the open modal's form.
    pub fn state_mut(&mut self) -> &mut DashboardState {
        &mut self.state
    }

    /// Load the initial view.
    pub fn start(&mut self) -> Vec<Notice> {
        self.dispatch(Command::SelectTab(ViewId::Dashboard))
    }

    pub fn dispatch(&mut self, command: Command) -> Vec<Notice> {
        let tasks = handle_command(&mut self.state, command);
        self.run(tasks)
    }

    /// Feed a completed task back into the state.
    pub fn apply(&mut self, outcome: Outcome) -> Vec<Notice> {
        let tasks = handle_outcome(&mut self.state, outcome);
        self.run(tasks)
    }

    /// Wait for the next outcome. `None` only if the controller is gone.
    pub async fn next_outcome(&mut self) -> Option<Outcome> {
        let outcome = self.outcomes.recv().await;
        if outcome.is_some() {
            self.in_flight = self.in_flight.saturating_sub(1);
        }
        outcome
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Apply outcomes until nothing is in flight; returns every notice raised.
    pub async fn settle(&mut self) -> Vec<Notice> {
        let mut notices = Vec::new();
        while self.in_flight > 0 {
            let Some(outcome) = self.next_outcome().await else {
                break;
            };
            notices.extend(self.apply(outcome));
        }
        notices
    }

    fn run(&mut self, tasks: Vec<Task>) -> Vec<Notice> {
        let dispatch = self.controller.execute(tasks);
        self.in_flight += dispatch.spawned;
        dispatch.notices
    }
}
