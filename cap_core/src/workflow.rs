//! # Design Workflow
//!
//! Sequences the design steps: generate a pile layout, confirm saved
//! reactions, compute pile forces, run the advanced pile-cap design.
//!
//! Every step is split in two. A `begin_*` call checks the step's
//! preconditions, performs any invalidation and hands back a job describing
//! the request to send. The matching `apply_*` call takes that job back with
//! the service outcome. Jobs carry the layout generation they were issued
//! for; once the layout moves on, late answers are reported as
//! [`Applied::Stale`] and dropped.
//!
//! The current [`WorkflowStage`] is derived from the results held, never
//! stored.
//!
//! ```rust
//! use cap_core::layout::{DesignInputs, LayoutRequest};
//! use cap_core::pile::PileCoordinate;
//! use cap_core::service::CoordinatesResponse;
//! use cap_core::workflow::{Applied, WorkflowController, WorkflowStage};
//!
//! let mut wf = WorkflowController::new();
//! let job = wf.begin_layout(LayoutRequest::default(), DesignInputs::default()).unwrap();
//!
//! let response = CoordinatesResponse {
//!     coordinates: vec![PileCoordinate::new(1, 0.0, 0.0)],
//!     ..CoordinatesResponse::default()
//! };
//! assert_eq!(wf.apply_layout(job, Ok(response)).unwrap(), Applied::Updated);
//! assert_eq!(wf.stage(), WorkflowStage::CoordinatesReady);
//!
//! // No reactions saved yet
//! assert!(wf.begin_forces().is_err());
//! ```

use serde_json::Value;

use crate::errors::{CapError, CapResult};
use crate::layout::{DesignInputs, LayoutRequest, LayoutSpec};
use crate::pile::PileCoordinate;
use crate::reactions::ReactionRow;
use crate::service::{AdvancedDesignRequest, CoordinatesResponse};

pub const NEED_COORDINATES: &str = "Please generate pile coordinates first.";
pub const NEED_REACTIONS: &str = "Please save load combinations in the reaction table first.";
pub const LAYOUT_EMPTY: &str = "Failed to generate pile coordinates. Please check your input.";
pub const FORCES_EMPTY: &str = "Failed to calculate pile forces. Please check your reactions and try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WorkflowStage {
    Idle,
    CoordinatesReady,
    ReactionsSaved,
    ForcesReady,
    FootingReady,
    AdvancedReady,
}

impl WorkflowStage {
    pub fn label(self) -> &'static str {
        match self {
            WorkflowStage::Idle => "Idle",
            WorkflowStage::CoordinatesReady => "Coordinates ready",
            WorkflowStage::ReactionsSaved => "Reactions saved",
            WorkflowStage::ForcesReady => "Forces ready",
            WorkflowStage::FootingReady => "Footing checks ready",
            WorkflowStage::AdvancedReady => "Advanced design ready",
        }
    }
}

/// Layout generation a job was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Outcome of applying a service answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Updated,
    /// Answer belongs to a superseded layout and was dropped
    Stale,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutJob {
    pub ticket: Ticket,
    pub spec: LayoutSpec,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForceJob {
    pub ticket: Ticket,
    /// Layout that produced the current coordinates
    pub spec: LayoutSpec,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdvancedJob {
    pub ticket: Ticket,
    pub request: AdvancedDesignRequest,
}

/// Force-augmented piles and the opaque footing checks returned with them.
#[derive(Debug, Clone, PartialEq)]
pub struct ForceResults {
    pub piles: Vec<PileCoordinate>,
    pub footing_calculations: Option<Value>,
    pub shear_check: Option<Value>,
}

/// Owner of every derived design result.
#[derive(Debug, Clone, Default)]
pub struct WorkflowController {
    coordinates: Vec<PileCoordinate>,
    layout: Option<LayoutSpec>,
    forces: Option<ForceResults>,
    advanced: Option<Value>,
    reactions_saved: bool,
    generation: u64,
    error: Option<String>,
}

impl WorkflowController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every derived result for a fresh session.
    ///
    /// The generation keeps counting, so jobs issued before the reset come
    /// back [`Applied::Stale`]. The reaction flag is kept: the reaction
    /// store lives on the service and is not part of a session.
    pub fn reset(&mut self) {
        self.coordinates.clear();
        self.layout = None;
        self.forces = None;
        self.advanced = None;
        self.error = None;
        self.generation += 1;
        tracing::info!(generation = self.generation, "workflow reset");
    }

    pub fn stage(&self) -> WorkflowStage {
        if self.advanced.is_some() {
            WorkflowStage::AdvancedReady
        } else if let Some(forces) = &self.forces {
            if forces.footing_calculations.is_some() {
                WorkflowStage::FootingReady
            } else {
                WorkflowStage::ForcesReady
            }
        } else if self.coordinates.is_empty() {
            WorkflowStage::Idle
        } else if self.reactions_saved {
            WorkflowStage::ReactionsSaved
        } else {
            WorkflowStage::CoordinatesReady
        }
    }

    pub fn coordinates(&self) -> &[PileCoordinate] {
        &self.coordinates
    }

    /// Layout that produced the current coordinates.
    pub fn layout(&self) -> Option<&LayoutSpec> {
        self.layout.as_ref()
    }

    pub fn forces(&self) -> Option<&ForceResults> {
        self.forces.as_ref()
    }

    pub fn advanced(&self) -> Option<&Value> {
        self.advanced.as_ref()
    }

    /// Piles to draw: force-augmented when forces exist.
    pub fn display_piles(&self) -> &[PileCoordinate] {
        match &self.forces {
            Some(forces) => &forces.piles,
            None => &self.coordinates,
        }
    }

    pub fn reactions_saved(&self) -> bool {
        self.reactions_saved
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Surface an error that did not come from a workflow step.
    pub fn report(&mut self, err: &CapError) {
        self.error = Some(err.user_message());
    }

    fn fail<T>(&mut self, err: CapError) -> CapResult<T> {
        tracing::warn!(code = err.error_code(), error = %err, "workflow step failed");
        self.error = Some(err.user_message());
        Err(err)
    }

    fn ticket(&self) -> Ticket {
        Ticket(self.generation)
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.generation
    }

    /// Start generating a layout. Force and advanced results are dropped as
    /// soon as a valid request is issued.
    pub fn begin_layout(&mut self, request: LayoutRequest, inputs: DesignInputs) -> CapResult<LayoutJob> {
        self.error = None;
        if let Err(err) = request.validate() {
            return self.fail(err);
        }

        self.forces = None;
        self.advanced = None;
        self.generation += 1;
        tracing::info!(n_x = request.n_x, n_y = request.n_y, generation = self.generation, "layout requested");

        Ok(LayoutJob {
            ticket: self.ticket(),
            spec: LayoutSpec::new(request, inputs),
        })
    }

    pub fn apply_layout(&mut self, job: LayoutJob, outcome: CapResult<CoordinatesResponse>) -> CapResult<Applied> {
        if !self.is_current(job.ticket) {
            tracing::debug!("dropping superseded layout response");
            return Ok(Applied::Stale);
        }
        // Jobs issued against the previous coordinates are no longer valid
        self.generation += 1;
        self.forces = None;
        self.advanced = None;

        let response = match outcome {
            Ok(response) if !response.coordinates.is_empty() => response,
            Ok(_) => {
                self.coordinates.clear();
                self.layout = None;
                return self.fail(CapError::empty_result(LAYOUT_EMPTY));
            }
            Err(err) => {
                self.coordinates.clear();
                self.layout = None;
                return self.fail(err);
            }
        };

        tracing::info!(piles = response.coordinates.len(), "layout applied");
        self.coordinates = response.coordinates;
        self.layout = Some(job.spec);
        Ok(Applied::Updated)
    }

    /// Recompute the reaction flag from the rows the store returned after a
    /// save.
    pub fn confirm_reactions(&mut self, server_rows: &[ReactionRow]) -> bool {
        self.reactions_saved = server_rows.iter().any(ReactionRow::is_valid);
        tracing::info!(saved = self.reactions_saved, rows = server_rows.len(), "reaction store confirmed");
        self.reactions_saved
    }

    /// Start a force calculation. Fails without touching existing results
    /// when there are no coordinates or no saved reactions.
    pub fn begin_forces(&mut self) -> CapResult<ForceJob> {
        self.error = None;
        let Some(spec) = self.layout.clone().filter(|_| !self.coordinates.is_empty()) else {
            return self.fail(CapError::precondition("calculate pile forces", NEED_COORDINATES));
        };
        if !self.reactions_saved {
            return self.fail(CapError::precondition("calculate pile forces", NEED_REACTIONS));
        }
        Ok(ForceJob {
            ticket: self.ticket(),
            spec,
        })
    }

    pub fn apply_forces(&mut self, job: ForceJob, outcome: CapResult<CoordinatesResponse>) -> CapResult<Applied> {
        if !self.is_current(job.ticket) {
            tracing::debug!("dropping force response for a superseded layout");
            return Ok(Applied::Stale);
        }

        let response = match outcome {
            Ok(response) if !response.coordinates.is_empty() => response,
            Ok(_) => {
                self.forces = None;
                return self.fail(CapError::empty_result(FORCES_EMPTY));
            }
            Err(err) => {
                self.forces = None;
                return self.fail(err);
            }
        };

        tracing::info!(
            piles = response.coordinates.len(),
            footing = response.footing_calculations.is_some(),
            "pile forces applied"
        );
        self.forces = Some(ForceResults {
            piles: response.coordinates,
            footing_calculations: response.footing_calculations,
            shear_check: response.shear_check,
        });
        Ok(Applied::Updated)
    }

    /// Start an advanced design from the current form values and pile list.
    pub fn begin_advanced(&mut self, request: &LayoutRequest, inputs: &DesignInputs) -> CapResult<AdvancedJob> {
        self.error = None;
        if self.coordinates.is_empty() {
            return self.fail(CapError::precondition("run the advanced design", NEED_COORDINATES));
        }
        Ok(AdvancedJob {
            ticket: self.ticket(),
            request: AdvancedDesignRequest::build(request, inputs, &self.coordinates),
        })
    }

    pub fn apply_advanced(&mut self, job: AdvancedJob, outcome: CapResult<Value>) -> CapResult<Applied> {
        if !self.is_current(job.ticket) {
            tracing::debug!("dropping advanced design for a superseded layout");
            return Ok(Applied::Stale);
        }
        match outcome {
            Ok(result) => {
                tracing::info!("advanced design applied");
                self.advanced = Some(result);
                Ok(Applied::Updated)
            }
            Err(err) => {
                self.advanced = None;
                self.fail(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pile::{footing_extent, PileForces};
    use crate::service::{require_server_reactions, ADVANCED_FAILED, NO_SERVER_LOAD_CASES};
    use serde_json::json;

    fn grid(request: &LayoutRequest) -> Vec<PileCoordinate> {
        let x0 = -((request.n_x - 1) as f64) * request.s_x / 2.0;
        let y0 = -((request.n_y - 1) as f64) * request.s_y / 2.0;
        let mut piles = Vec::new();
        for j in 0..request.n_y {
            for i in 0..request.n_x {
                let id = j * request.n_x + i + 1;
                piles.push(PileCoordinate::new(id, x0 + i as f64 * request.s_x, y0 + j as f64 * request.s_y));
            }
        }
        piles
    }

    fn coordinates(request: &LayoutRequest) -> CoordinatesResponse {
        CoordinatesResponse {
            coordinates: grid(request),
            ..CoordinatesResponse::default()
        }
    }

    fn with_forces(request: &LayoutRequest, footing: bool) -> CoordinatesResponse {
        let piles = grid(request)
            .into_iter()
            .map(|p| {
                p.with_forces(PileForces {
                    pmax: 90.0,
                    pmin: 10.0,
                    ..PileForces::default()
                })
            })
            .collect();
        CoordinatesResponse {
            coordinates: piles,
            footing_calculations: footing.then(|| json!({"footing_length": 24.0})),
            ..CoordinatesResponse::default()
        }
    }

    fn saved_row() -> ReactionRow {
        ReactionRow {
            load_case: "Strength I".to_string(),
            ..ReactionRow::blank()
        }
    }

    fn ready_for_forces() -> WorkflowController {
        let mut wf = WorkflowController::new();
        let request = LayoutRequest::default();
        let job = wf.begin_layout(request, DesignInputs::default()).unwrap();
        wf.apply_layout(job, Ok(coordinates(&request))).unwrap();
        wf.confirm_reactions(&[saved_row()]);
        wf
    }

    #[test]
    fn test_default_layout_scenario() {
        let mut wf = WorkflowController::new();
        assert_eq!(wf.stage(), WorkflowStage::Idle);

        let request = LayoutRequest::default();
        let job = wf.begin_layout(request, DesignInputs::default()).unwrap();
        assert_eq!(wf.apply_layout(job, Ok(coordinates(&request))).unwrap(), Applied::Updated);

        assert_eq!(wf.stage(), WorkflowStage::CoordinatesReady);
        assert_eq!(wf.coordinates().len(), 48);
        let extent = footing_extent(wf.coordinates(), request.overhang).unwrap();
        assert!((extent.width() - 29.5).abs() < 1e-9);
        assert!((extent.length() - 24.0).abs() < 1e-9);
        assert_eq!(wf.layout().unwrap().request, request);
    }

    #[test]
    fn test_invalid_request_keeps_state() {
        let mut wf = ready_for_forces();
        let bad = LayoutRequest {
            n_x: 0,
            ..LayoutRequest::default()
        };
        let err = wf.begin_layout(bad, DesignInputs::default()).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION");
        assert_eq!(wf.error(), Some("Please enter valid pile numbers and spacing."));
        assert_eq!(wf.coordinates().len(), 48);
    }

    #[test]
    fn test_empty_layout_stores_nothing() {
        let mut wf = WorkflowController::new();
        let job = wf.begin_layout(LayoutRequest::default(), DesignInputs::default()).unwrap();
        let err = wf.apply_layout(job, Ok(CoordinatesResponse::default())).unwrap_err();
        assert_eq!(err.error_code(), "EMPTY_RESULT");
        assert_eq!(wf.error(), Some(LAYOUT_EMPTY));
        assert!(wf.coordinates().is_empty());
        assert_eq!(wf.stage(), WorkflowStage::Idle);
    }

    #[test]
    fn test_force_gate_requires_saved_reactions() {
        let mut wf = WorkflowController::new();
        let request = LayoutRequest::default();
        assert_eq!(wf.begin_forces().unwrap_err().user_message(), NEED_COORDINATES);

        let job = wf.begin_layout(request, DesignInputs::default()).unwrap();
        wf.apply_layout(job, Ok(coordinates(&request))).unwrap();

        let err = wf.begin_forces().unwrap_err();
        assert_eq!(err.error_code(), "PRECONDITION");
        assert_eq!(wf.error(), Some(NEED_REACTIONS));

        assert!(!wf.confirm_reactions(&[ReactionRow::blank()]));
        assert!(wf.begin_forces().is_err());
        assert!(wf.confirm_reactions(&[ReactionRow::blank(), saved_row()]));
        assert_eq!(wf.stage(), WorkflowStage::ReactionsSaved);
        assert!(wf.begin_forces().is_ok());
    }

    #[test]
    fn test_gate_failure_leaves_forces() {
        let mut wf = ready_for_forces();
        let job = wf.begin_forces().unwrap();
        wf.apply_forces(job, Ok(with_forces(&LayoutRequest::default(), false))).unwrap();
        assert_eq!(wf.stage(), WorkflowStage::ForcesReady);

        wf.confirm_reactions(&[]);
        assert!(wf.begin_forces().is_err());
        assert!(wf.forces().is_some());
    }

    #[test]
    fn test_force_job_uses_stored_layout() {
        let mut wf = ready_for_forces();
        let job = wf.begin_forces().unwrap();
        assert_eq!(job.spec, LayoutSpec::default());
    }

    #[test]
    fn test_forces_and_footing_stages() {
        let mut wf = ready_for_forces();
        let request = LayoutRequest::default();

        let job = wf.begin_forces().unwrap();
        wf.apply_forces(job, Ok(with_forces(&request, true))).unwrap();
        assert_eq!(wf.stage(), WorkflowStage::FootingReady);
        assert_eq!(wf.display_piles()[0].pmax(), Some(90.0));
        assert!(wf.coordinates()[0].forces.is_none());

        let job = wf.begin_advanced(&request, &DesignInputs::default()).unwrap();
        assert_eq!(job.request.pile_coords.len(), 48);
        wf.apply_advanced(job, Ok(json!({"compliance": true}))).unwrap();
        assert_eq!(wf.stage(), WorkflowStage::AdvancedReady);
    }

    #[test]
    fn test_regenerate_invalidates_late_force_response() {
        let mut wf = ready_for_forces();
        let request = LayoutRequest::default();
        let force_job = wf.begin_forces().unwrap();
        let advanced_job = wf.begin_advanced(&request, &DesignInputs::default()).unwrap();

        let smaller = LayoutRequest {
            n_x: 2,
            n_y: 2,
            ..request
        };
        let layout_job = wf.begin_layout(smaller, DesignInputs::default()).unwrap();
        assert!(wf.forces().is_none());
        assert!(wf.advanced().is_none());

        // Old answers arrive while the new layout is pending
        assert_eq!(wf.apply_forces(force_job.clone(), Ok(with_forces(&request, true))).unwrap(), Applied::Stale);
        assert_eq!(wf.apply_advanced(advanced_job.clone(), Ok(json!({}))).unwrap(), Applied::Stale);

        wf.apply_layout(layout_job, Ok(coordinates(&smaller))).unwrap();
        assert_eq!(wf.coordinates().len(), 4);

        // ...and after it applied
        assert_eq!(wf.apply_forces(force_job, Ok(with_forces(&request, true))).unwrap(), Applied::Stale);
        assert_eq!(wf.apply_advanced(advanced_job, Ok(json!({}))).unwrap(), Applied::Stale);
        assert!(wf.forces().is_none());
        assert!(wf.advanced().is_none());
        assert_eq!(wf.stage(), WorkflowStage::ReactionsSaved);
    }

    #[test]
    fn test_force_job_issued_during_pending_layout_goes_stale() {
        let mut wf = ready_for_forces();
        let layout_job = wf.begin_layout(LayoutRequest::default(), DesignInputs::default()).unwrap();
        let force_job = wf.begin_forces().unwrap();
        wf.apply_layout(layout_job, Ok(coordinates(&LayoutRequest::default()))).unwrap();
        let applied = wf.apply_forces(force_job, Ok(with_forces(&LayoutRequest::default(), false)));
        assert_eq!(applied.unwrap(), Applied::Stale);
    }

    #[test]
    fn test_only_latest_layout_applies() {
        let mut wf = WorkflowController::new();
        let request = LayoutRequest::default();
        let first = wf.begin_layout(request, DesignInputs::default()).unwrap();
        let second = wf.begin_layout(LayoutRequest { n_x: 1, n_y: 1, ..request }, DesignInputs::default()).unwrap();

        assert_eq!(wf.apply_layout(second.clone(), Ok(coordinates(&second.spec.request))).unwrap(), Applied::Updated);
        assert_eq!(wf.apply_layout(first, Ok(coordinates(&request))).unwrap(), Applied::Stale);
        assert_eq!(wf.coordinates().len(), 1);
    }

    #[test]
    fn test_force_failure_clears_previous_forces() {
        let mut wf = ready_for_forces();
        let job = wf.begin_forces().unwrap();
        wf.apply_forces(job, Ok(with_forces(&LayoutRequest::default(), true))).unwrap();

        let job = wf.begin_forces().unwrap();
        let err = wf.apply_forces(job, Ok(CoordinatesResponse::default())).unwrap_err();
        assert_eq!(err.user_message(), FORCES_EMPTY);
        assert!(wf.forces().is_none());
        assert_eq!(wf.stage(), WorkflowStage::ReactionsSaved);
    }

    #[test]
    fn test_transport_failure_clears_layout() {
        let mut wf = ready_for_forces();
        let job = wf.begin_layout(LayoutRequest::default(), DesignInputs::default()).unwrap();
        let err = wf.apply_layout(job, Err(CapError::transport("connection refused"))).unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(wf.error(), Some(crate::errors::SERVICE_UNREACHABLE));
        assert!(wf.coordinates().is_empty());
        assert!(wf.layout().is_none());
        assert_eq!(wf.stage(), WorkflowStage::Idle);
    }

    #[test]
    fn test_advanced_failure_clears_result() {
        let mut wf = ready_for_forces();
        let request = LayoutRequest::default();
        let job = wf.begin_advanced(&request, &DesignInputs::default()).unwrap();
        wf.apply_advanced(job, Ok(json!({"compliance": false}))).unwrap();
        assert_eq!(wf.stage(), WorkflowStage::AdvancedReady);

        let job = wf.begin_advanced(&request, &DesignInputs::default()).unwrap();
        wf.apply_advanced(job, Err(CapError::service(ADVANCED_FAILED))).unwrap_err();
        assert!(wf.advanced().is_none());
        assert_eq!(wf.error(), Some(ADVANCED_FAILED));
    }

    #[test]
    fn test_advanced_requires_coordinates() {
        let mut wf = WorkflowController::new();
        let err = wf
            .begin_advanced(&LayoutRequest::default(), &DesignInputs::default())
            .unwrap_err();
        assert_eq!(err.user_message(), NEED_COORDINATES);
    }

    #[test]
    fn test_next_action_clears_error() {
        let mut wf = ready_for_forces();
        wf.report(&CapError::transport("down"));
        assert!(wf.error().is_some());
        wf.begin_forces().unwrap();
        assert!(wf.error().is_none());
    }

    #[test]
    fn test_reset_makes_pending_jobs_stale() {
        let mut wf = ready_for_forces();
        let old_forces = wf.begin_forces().unwrap();
        let old_advanced = wf.begin_advanced(&LayoutRequest::default(), &DesignInputs::default()).unwrap();

        wf.reset();
        assert_eq!(wf.stage(), WorkflowStage::Idle);

        let small = LayoutRequest {
            n_x: 2,
            n_y: 2,
            ..LayoutRequest::default()
        };
        let job = wf.begin_layout(small, DesignInputs::default()).unwrap();
        wf.apply_layout(job, Ok(coordinates(&small))).unwrap();

        let applied = wf.apply_forces(old_forces, Ok(with_forces(&LayoutRequest::default(), false))).unwrap();
        assert_eq!(applied, Applied::Stale);
        assert_eq!(wf.apply_advanced(old_advanced, Ok(json!({}))).unwrap(), Applied::Stale);
        assert_eq!(wf.coordinates().len(), 4);
        assert_eq!(wf.display_piles().len(), 4);
        assert!(wf.forces().is_none());
    }

    #[test]
    fn test_reset_keeps_reaction_flag() {
        let mut wf = ready_for_forces();
        assert!(wf.reactions_saved());
        wf.reset();
        assert!(wf.reactions_saved());

        let request = LayoutRequest::default();
        let job = wf.begin_layout(request, DesignInputs::default()).unwrap();
        wf.apply_layout(job, Ok(coordinates(&request))).unwrap();
        assert_eq!(wf.stage(), WorkflowStage::ReactionsSaved);
        assert!(wf.begin_forces().is_ok());
    }

    #[test]
    fn test_empty_reaction_store_clears_forces() {
        let mut wf = ready_for_forces();
        let request = LayoutRequest::default();
        let job = wf.begin_forces().unwrap();
        wf.apply_forces(job, Ok(with_forces(&request, false))).unwrap();
        assert!(wf.forces().is_some());

        // Flag still set locally, but the store came back empty
        assert!(wf.reactions_saved());
        let fetched = require_server_reactions(&[]);
        let err = fetched.clone().unwrap_err();
        assert_eq!(err.error_code(), "EMPTY_RESULT");
        assert_eq!(err.user_message(), NO_SERVER_LOAD_CASES);

        let job = wf.begin_forces().unwrap();
        wf.apply_forces(job, fetched.map(|_| CoordinatesResponse::default())).unwrap_err();
        assert!(wf.forces().is_none());
        assert_eq!(wf.error(), Some(NO_SERVER_LOAD_CASES));

        assert!(require_server_reactions(&[saved_row()]).is_ok());
    }
}
