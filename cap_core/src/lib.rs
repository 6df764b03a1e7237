//! # cap_core - Pile Cap Design Client Core
//!
//! `cap_core` holds everything the pile-cap design client does that is not
//! drawing pixels or waiting on a window: the pile and layout model, the
//! model/device coordinate mapping, pan/zoom state and hover detection, a
//! pure description of the plan drawing, the staged design workflow, the
//! reaction table with spreadsheet paste, result tabulation, the HTTP client
//! for the calculation service, and session files.
//!
//! ## Design Philosophy
//!
//! - **Framework-free**: the GUI and CLI are thin drivers over this crate
//! - **Explicit state**: workflow, viewport and reaction table are owned structs
//!   changed through methods, never shared mutable globals
//! - **Stale-safe**: every service call carries a ticket; late answers are dropped
//!
//! ## Quick Start
//!
//! ```rust
//! use cap_core::layout::{DesignInputs, LayoutRequest};
//! use cap_core::workflow::{WorkflowController, WorkflowStage};
//!
//! let mut workflow = WorkflowController::new();
//! let job = workflow.begin_layout(LayoutRequest::default(), DesignInputs::default()).unwrap();
//! assert_eq!(job.spec.request.pile_count(), 48);
//! assert_eq!(workflow.stage(), WorkflowStage::Idle);
//! ```
//!
//! ## Modules
//!
//! - [`pile`], [`layout`] - Pile coordinates, force results and the layout grid
//! - [`geometry`], [`viewport`], [`hit_test`] - Coordinate mapping, pan/zoom, hover
//! - [`scene`] - What the plan drawing contains
//! - [`workflow`] - Coordinates → reactions → forces → advanced design
//! - [`reactions`], [`ingest`] - Reaction table editing and clipboard paste
//! - [`report`] - Result tables and drawing summary
//! - [`service`], [`config`] - Calculation service client and its settings
//! - [`session`], [`file_io`] - Session files with atomic saves and locking
//! - [`errors`] - Structured error types

pub mod config;
pub mod errors;
#[cfg(not(target_arch = "wasm32"))]
pub mod file_io;
pub mod geometry;
pub mod hit_test;
pub mod ingest;
pub mod layout;
pub mod pile;
pub mod reactions;
pub mod report;
pub mod scene;
pub mod service;
pub mod session;
pub mod viewport;
pub mod workflow;

pub use config::ClientConfig;
pub use errors::{CapError, CapResult};
#[cfg(not(target_arch = "wasm32"))]
pub use file_io::{load_session, save_session, SessionLock};
pub use layout::{DesignInputs, LayoutRequest, LayoutSpec};
pub use pile::{PileCoordinate, PileForces};
pub use service::ServiceClient;
pub use session::DesignSession;
pub use viewport::Viewport;
pub use workflow::{WorkflowController, WorkflowStage};
