//! # Pile Model
//!
//! Pile coordinates as returned by the layout generator, optionally carrying
//! the force results of a force calculation, plus the plan-geometry helpers
//! (footing extent, pile spacing) derived from a pile list.
//!
//! The service names fields after its table headings (`"No."`, `"x (ft)"`,
//! `"Pmax (k)"`, ...). Records are read through [`PileRecord`] so a record
//! with only half of the force fields is rejected as a whole.
//!
//! ```rust
//! use cap_core::pile::PileCoordinate;
//!
//! let pile: PileCoordinate =
//!     serde_json::from_str(r#"{"No.": 3, "x (ft)": -13.13, "y (ft)": 4.15}"#).unwrap();
//! assert_eq!(pile.id, 3);
//! assert!(pile.forces.is_none());
//! ```

use serde::{Deserialize, Serialize};

/// Force breakdown of a pile reaction into its axial and moment terms (kips).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ForceComponents {
    pub axial: f64,
    pub moment_x: f64,
    pub moment_y: f64,
}

impl ForceComponents {
    pub fn total(&self) -> f64 {
        self.axial + self.moment_x + self.moment_y
    }
}

/// Pile reaction for a single load case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PValue {
    pub load_case: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<ForceComponents>,
}

/// Force results attached to a pile once a force calculation has run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PileForces {
    /// Governing maximum axial force (kips)
    pub pmax: f64,
    /// Governing minimum axial force (kips), negative in tension
    pub pmin: f64,
    pub max_load_case: String,
    pub min_load_case: String,
    pub pmax_components: Option<ForceComponents>,
    pub pmin_components: Option<ForceComponents>,
    /// One entry per evaluated load case, in service order
    pub p_values: Vec<PValue>,
}

/// A pile position in plan, in feet from the column centroid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PileRecord", into = "PileRecord")]
pub struct PileCoordinate {
    /// 1-based pile number, stable within a layout
    pub id: u32,
    pub x: f64,
    pub y: f64,
    pub forces: Option<PileForces>,
}

impl PileCoordinate {
    pub fn new(id: u32, x: f64, y: f64) -> Self {
        PileCoordinate { id, x, y, forces: None }
    }

    pub fn with_forces(mut self, forces: PileForces) -> Self {
        self.forces = Some(forces);
        self
    }

    pub fn pmax(&self) -> Option<f64> {
        self.forces.as_ref().map(|f| f.pmax)
    }

    pub fn pmin(&self) -> Option<f64> {
        self.forces.as_ref().map(|f| f.pmin)
    }
}

/// Wire shape of a pile record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PileRecord {
    #[serde(rename = "No.")]
    pub id: u32,
    #[serde(rename = "x (ft)")]
    pub x: f64,
    #[serde(rename = "y (ft)")]
    pub y: f64,
    #[serde(rename = "Pmax (k)", default, skip_serializing_if = "Option::is_none")]
    pub pmax: Option<f64>,
    #[serde(rename = "Pmin (k)", default, skip_serializing_if = "Option::is_none")]
    pub pmin: Option<f64>,
    #[serde(rename = "Max Load Case", default, skip_serializing_if = "Option::is_none")]
    pub max_load_case: Option<String>,
    #[serde(rename = "Min Load Case", default, skip_serializing_if = "Option::is_none")]
    pub min_load_case: Option<String>,
    #[serde(rename = "Pmax Components", default, skip_serializing_if = "Option::is_none")]
    pub pmax_components: Option<ForceComponents>,
    #[serde(rename = "Pmin Components", default, skip_serializing_if = "Option::is_none")]
    pub pmin_components: Option<ForceComponents>,
    #[serde(rename = "P values", default, skip_serializing_if = "Option::is_none")]
    pub p_values: Option<Vec<PValue>>,
}

impl From<PileRecord> for PileCoordinate {
    fn from(record: PileRecord) -> Self {
        let forces = match (record.pmax, record.pmin) {
            (Some(pmax), Some(pmin)) => Some(PileForces {
                pmax,
                pmin,
                max_load_case: record.max_load_case.unwrap_or_default(),
                min_load_case: record.min_load_case.unwrap_or_default(),
                pmax_components: record.pmax_components,
                pmin_components: record.pmin_components,
                p_values: record.p_values.unwrap_or_default(),
            }),
            (None, None) => None,
            _ => {
                tracing::warn!(pile = record.id, "pile record carries partial force fields, ignoring them");
                None
            }
        };

        PileCoordinate {
            id: record.id,
            x: record.x,
            y: record.y,
            forces,
        }
    }
}

impl From<PileCoordinate> for PileRecord {
    fn from(pile: PileCoordinate) -> Self {
        let mut record = PileRecord {
            id: pile.id,
            x: pile.x,
            y: pile.y,
            ..PileRecord::default()
        };
        if let Some(f) = pile.forces {
            record.pmax = Some(f.pmax);
            record.pmin = Some(f.pmin);
            record.max_load_case = Some(f.max_load_case);
            record.min_load_case = Some(f.min_load_case);
            record.pmax_components = f.pmax_components;
            record.pmin_components = f.pmin_components;
            record.p_values = Some(f.p_values);
        }
        record
    }
}

/// Axis-aligned footing (pile cap) outline in model space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FootingExtent {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl FootingExtent {
    /// Plan dimension along X (ft)
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Plan dimension along Y (ft)
    pub fn length(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Footing outline: pile bounding box grown by the overhang on every side.
///
/// Returns `None` for an empty pile list.
pub fn footing_extent(piles: &[PileCoordinate], overhang: f64) -> Option<FootingExtent> {
    let first = piles.first()?;
    let mut extent = FootingExtent {
        min_x: first.x,
        max_x: first.x,
        min_y: first.y,
        max_y: first.y,
    };
    for pile in &piles[1..] {
        extent.min_x = extent.min_x.min(pile.x);
        extent.max_x = extent.max_x.max(pile.x);
        extent.min_y = extent.min_y.min(pile.y);
        extent.max_y = extent.max_y.max(pile.y);
    }
    extent.min_x -= overhang;
    extent.max_x += overhang;
    extent.min_y -= overhang;
    extent.max_y += overhang;
    Some(extent)
}

/// Largest gap between neighbouring distinct pile rows/columns, as `(x, y)`.
///
/// A single row or column reports 0 in that direction.
pub fn pile_spacing(piles: &[PileCoordinate]) -> (f64, f64) {
    (max_gap(piles.iter().map(|p| p.x)), max_gap(piles.iter().map(|p| p.y)))
}

fn max_gap(values: impl Iterator<Item = f64>) -> f64 {
    let mut sorted: Vec<f64> = values.collect();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted.dedup();
    sorted
        .windows(2)
        .map(|w| w[1] - w[0])
        .fold(0.0, f64::max)
}
