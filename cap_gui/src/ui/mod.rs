//! UI module for the Pilecap GUI
//!
//! # Panel Structure
//! - `toolbar` - Session operations (New, Open, Save, Save As)
//! - `input_panel` - Left panel: session info, design inputs, reaction table
//! - `results_panel` - Right panel: dispatches to result_* child modules
//! - `status_bar` - Bottom status messages
//! - `modal` - Unsaved-changes prompt
//!
//! # Input Panel Children
//! - `input_project_info` - Engineer, Job ID, Client fields
//! - `reaction_table` - Load combination editor with clipboard paste
//!
//! # Results Panel Children
//! - `result_plan` - Pile plan drawing, zoom controls, legend, drawing details
//! - `result_tables` - Force tables, per-pile breakdowns, footing summaries
//!
//! # Shared Components
//! - `shared/pile_canvas` - Canvas program that paints a core `Scene`

// Top-level panels
pub mod toolbar;
pub mod input_panel;
pub mod results_panel;
pub mod status_bar;
pub mod modal;

// Input panel children
pub mod input_project_info;
pub mod reaction_table;

// Results panel children
pub mod result_plan;
pub mod result_tables;

// Shared components
pub mod shared;
