//! Shared UI components reusable across panels
//!
//! Contains:
//! - `pile_canvas` - Canvas program for the pile layout plan, plus its legend

pub mod pile_canvas;
