//! Scenario execution against a live session.
//!
//! The runner replays a scenario's script as the UI layer would: one
//! frame at a time, placements and deletions between frames, and a JSON
//! report of the end state.

use serde::{Deserialize, Serialize};

use basedef_core::prelude::*;

use crate::scenario::{Scenario, ScenarioStep};

/// Frame length used when advancing scripted time, in seconds.
///
/// Time passes in these slices so the session's one-tick-per-frame rule
/// behaves as it would under a real 60 FPS loop (ticks land on time, with
/// no multi-second frames that would defer them).
pub const FRAME_SECONDS: f64 = 1.0 / 60.0;

/// A rejected request recorded during the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    /// Zero-based index of the script step.
    pub step: usize,
    /// What the step asked for.
    pub request: String,
    /// Why it was refused.
    pub outcome: String,
}

/// End-of-run summary, serialized as the runner's stdout report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Scenario name.
    pub scenario: String,
    /// Production ticks fired during the run.
    pub ticks_fired: u64,
    /// Final gold stockpile.
    pub gold: u32,
    /// Final wood stockpile.
    pub wood: u32,
    /// Final iron stockpile.
    pub iron: u32,
    /// Final undistributed ammo cores.
    pub ammo_cores: u32,
    /// Reservoir level per cannon, sorted by position.
    pub cannon_reservoirs: Vec<(i32, i32, u32)>,
    /// Buildings placed at the end of the run.
    pub buildings: usize,
    /// Buildings powered at the end of the run.
    pub powered: usize,
    /// Network link segments among powered buildings.
    pub links: usize,
    /// Whether the Base was placed.
    pub base_placed: bool,
    /// Requests that were refused, with their outcomes.
    pub rejections: Vec<Rejection>,
}

/// Executes scenarios and produces reports.
pub struct HeadlessRunner {
    session: GameSession,
}

impl HeadlessRunner {
    /// Create a runner with a freshly generated session for the scenario.
    #[must_use]
    pub fn new(scenario: &Scenario) -> Self {
        Self {
            session: GameSession::new(&scenario.generation),
        }
    }

    /// Run the scenario script to completion and report the end state.
    pub fn run(mut self, scenario: &Scenario) -> RunReport {
        let rejections = self.execute(scenario);
        self.report(scenario, rejections)
    }

    /// Run the scenario and return only the end-state hash. Used by
    /// determinism verification, where the full report is noise.
    #[must_use]
    pub fn run_for_hash(mut self, scenario: &Scenario) -> u64 {
        self.execute(scenario);
        self.session.state_hash()
    }

    fn execute(&mut self, scenario: &Scenario) -> Vec<Rejection> {
        tracing::info!(name = %scenario.name, steps = scenario.script.len(), "running scenario");
        let mut rejections = Vec::new();

        for (index, step) in scenario.script.iter().enumerate() {
            match *step {
                ScenarioStep::Place { kind, x, y } => {
                    let outcome = self.session.try_place(kind, TilePos::new(x, y));
                    if !outcome.is_accepted() {
                        tracing::warn!(step = index, ?kind, x, y, ?outcome, "placement rejected");
                        rejections.push(Rejection {
                            step: index,
                            request: format!("Place {kind:?} at ({x}, {y})"),
                            outcome: format!("{outcome:?}"),
                        });
                    }
                }
                ScenarioStep::Delete { x, y } => {
                    let outcome = self.session.try_delete(TilePos::new(x, y));
                    if !matches!(outcome, DeletionOutcome::Removed(_)) {
                        tracing::warn!(step = index, x, y, ?outcome, "deletion refused");
                        rejections.push(Rejection {
                            step: index,
                            request: format!("Delete at ({x}, {y})"),
                            outcome: format!("{outcome:?}"),
                        });
                    }
                }
                ScenarioStep::SetSpeed(scale) => {
                    self.session.set_time_scale(scale);
                }
                ScenarioStep::Advance { seconds } => {
                    let mut remaining = seconds;
                    while remaining > 0.0 {
                        let dt = remaining.min(FRAME_SECONDS);
                        self.session.advance(dt);
                        remaining -= dt;
                    }
                }
            }
        }

        rejections
    }

    fn report(&self, scenario: &Scenario, rejections: Vec<Rejection>) -> RunReport {
        let session = &self.session;
        let economy = session.economy();

        let mut cannon_reservoirs: Vec<(i32, i32, u32)> = economy
            .cannon_ammo
            .iter()
            .map(|(pos, &ammo)| (pos.x, pos.y, ammo))
            .collect();
        cannon_reservoirs.sort_unstable();

        // Recompute rather than reading the session's cached set; the
        // script may end without an Advance step.
        let connected = recompute(session.registry());
        let powered = session
            .registry()
            .iter()
            .filter(|b| connected.contains(b.pos))
            .count();
        let links = powered_links(session.registry(), &connected).len();

        RunReport {
            scenario: scenario.name.clone(),
            ticks_fired: session.ticks_fired(),
            gold: economy.gold,
            wood: economy.wood,
            iron: economy.iron,
            ammo_cores: economy.ammo_cores,
            cannon_reservoirs,
            buildings: session.registry().len(),
            powered,
            links,
            base_placed: session.base_placed(),
            rejections,
        }
    }
}
