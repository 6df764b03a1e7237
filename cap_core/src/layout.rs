//! # Layout Inputs
//!
//! The rectangular pile grid request ([`LayoutRequest`]) and the footing and
//! material parameters sent along with it ([`DesignInputs`]). Together they
//! form a [`LayoutSpec`], the identity of a generated layout.
//!
//! ```rust
//! use cap_core::layout::LayoutRequest;
//!
//! let request = LayoutRequest::default();
//! assert!(request.validate().is_ok());
//! assert_eq!(request.pile_count(), 48);
//!
//! let bad = LayoutRequest { s_x: 0.0, ..LayoutRequest::default() };
//! assert!(bad.validate().is_err());
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CapError, CapResult};

/// Rectangular pile grid definition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutRequest {
    /// Number of piles along X
    pub n_x: u32,
    /// Pile spacing along X (ft)
    pub s_x: f64,
    /// Number of piles along Y
    pub n_y: u32,
    /// Pile spacing along Y (ft)
    pub s_y: f64,
    /// Distance from the outermost pile centers to the footing edge (ft)
    pub overhang: f64,
}

impl Default for LayoutRequest {
    fn default() -> Self {
        LayoutRequest {
            n_x: 8,
            s_x: 3.75,
            n_y: 6,
            s_y: 4.15,
            overhang: 1.625,
        }
    }
}

impl LayoutRequest {
    /// Reject grids the generator cannot lay out.
    pub fn validate(&self) -> CapResult<()> {
        const MSG: &str = "Please enter valid pile numbers and spacing.";
        if self.n_x < 1 {
            return Err(CapError::validation("n_x", self.n_x.to_string(), MSG));
        }
        if self.n_y < 1 {
            return Err(CapError::validation("n_y", self.n_y.to_string(), MSG));
        }
        if !(self.s_x.is_finite() && self.s_x > 0.0) {
            return Err(CapError::validation("s_x", self.s_x.to_string(), MSG));
        }
        if !(self.s_y.is_finite() && self.s_y > 0.0) {
            return Err(CapError::validation("s_y", self.s_y.to_string(), MSG));
        }
        if !(self.overhang.is_finite() && self.overhang >= 0.0) {
            return Err(CapError::validation(
                "pile_overhang",
                self.overhang.to_string(),
                "Pile overhang must be zero or positive.",
            ));
        }
        Ok(())
    }

    pub fn pile_count(&self) -> u32 {
        self.n_x * self.n_y
    }

    /// Footing plan size `(X, Y)` implied by the grid: spacing × (count - 1) + 2 × overhang.
    pub fn footing_plan(&self) -> (f64, f64) {
        let n_x = self.n_x.max(1) as f64;
        let n_y = self.n_y.max(1) as f64;
        (
            self.s_x * (n_x - 1.0) + 2.0 * self.overhang,
            self.s_y * (n_y - 1.0) + 2.0 * self.overhang,
        )
    }
}

/// Footing, material and pile parameters from the design form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignInputs {
    /// Concrete f'c (ksi)
    pub fc: f64,
    /// Reinforcing steel fy (ksi)
    pub fy: f64,
    /// Reinforcing cover (in)
    pub cover: f64,
    /// Column x-dimension or diameter (ft)
    pub col_x_dim: f64,
    /// Column y-dimension (ft)
    pub col_y_dim: f64,
    pub ecc_x: f64,
    pub ecc_y: f64,
    /// Footing thickness (in)
    pub footing_thickness: f64,
    /// Pile embedment (ft)
    pub pile_embedment: f64,
    pub ground_elev: f64,
    pub footing_top_elev: f64,
    pub water_elev: f64,
    /// Soil unit weight (kcf)
    pub soil_weight: f64,
    /// Seal thickness (in)
    pub seal_thickness: f64,
    /// Pile size (in)
    pub pile_size: f64,
    pub max_pile_driving_resistance: f64,
    pub boring: String,
    pub pile_tip_elevation: f64,
    pub nominal_pile_bearing_capacity: f64,
    /// Soil ultimate side friction (psf)
    pub soil_ultimate_side_friction: f64,
    pub comp_reduction_factor: f64,
    pub uplift_reduction_factor: f64,
}

impl Default for DesignInputs {
    fn default() -> Self {
        DesignInputs {
            fc: 5.5,
            fy: 60.0,
            cover: 4.5,
            col_x_dim: 9.0,
            col_y_dim: 16.0,
            ecc_x: 0.0,
            ecc_y: 0.0,
            footing_thickness: 9.0,
            pile_embedment: 12.0,
            ground_elev: 73.4,
            footing_top_elev: 70.4,
            water_elev: 68.0,
            soil_weight: 0.115,
            seal_thickness: 0.0,
            pile_size: 15.0,
            max_pile_driving_resistance: 225.0,
            boring: "P41-1".to_string(),
            pile_tip_elevation: -8.4,
            nominal_pile_bearing_capacity: 225.0,
            soil_ultimate_side_friction: 100.0,
            comp_reduction_factor: 0.75,
            uplift_reduction_factor: 0.6,
        }
    }
}

impl DesignInputs {
    pub fn column(&self) -> ColumnGeometry {
        ColumnGeometry {
            width: self.col_x_dim,
            depth: self.col_y_dim,
        }
    }
}

/// Column footprint (ft), centered on the model origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnGeometry {
    pub width: f64,
    pub depth: f64,
}

impl Default for ColumnGeometry {
    fn default() -> Self {
        ColumnGeometry { width: 9.0, depth: 16.0 }
    }
}

/// Everything that identifies a generated layout.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutSpec {
    pub request: LayoutRequest,
    pub inputs: DesignInputs,
}

impl LayoutSpec {
    pub fn new(request: LayoutRequest, inputs: DesignInputs) -> Self {
        LayoutSpec { request, inputs }
    }

    /// Query parameters for the coordinate generator.
    pub fn query_params(&self, with_calculations: bool) -> Vec<(&'static str, String)> {
        let r = &self.request;
        let i = &self.inputs;
        vec![
            ("n_x", r.n_x.to_string()),
            ("s_x", r.s_x.to_string()),
            ("n_y", r.n_y.to_string()),
            ("s_y", r.s_y.to_string()),
            ("with_calculations", with_calculations.to_string()),
            ("fc", i.fc.to_string()),
            ("fy", i.fy.to_string()),
            ("cover", i.cover.to_string()),
            ("col_x_dim", i.col_x_dim.to_string()),
            ("col_y_dim", i.col_y_dim.to_string()),
            ("ecc_x", i.ecc_x.to_string()),
            ("ecc_y", i.ecc_y.to_string()),
            ("footing_thickness", i.footing_thickness.to_string()),
            ("pile_embedment", i.pile_embedment.to_string()),
            ("pile_overhang", r.overhang.to_string()),
            ("ground_elev", i.ground_elev.to_string()),
            ("footing_top_elev", i.footing_top_elev.to_string()),
            ("water_elev", i.water_elev.to_string()),
            ("soil_weight", i.soil_weight.to_string()),
            ("seal_thickness", i.seal_thickness.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_request_is_valid() {
        assert!(LayoutRequest::default().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_grids() {
        let cases = [
            LayoutRequest { n_x: 0, ..LayoutRequest::default() },
            LayoutRequest { n_y: 0, ..LayoutRequest::default() },
            LayoutRequest { s_x: -1.0, ..LayoutRequest::default() },
            LayoutRequest { s_y: f64::NAN, ..LayoutRequest::default() },
            LayoutRequest { overhang: -0.5, ..LayoutRequest::default() },
        ];
        for case in cases {
            let err = case.validate().unwrap_err();
            assert_eq!(err.error_code(), "VALIDATION");
        }
    }

    #[test]
    fn test_footing_plan() {
        let (b, l) = LayoutRequest::default().footing_plan();
        assert!((b - 29.5).abs() < 1e-9);
        assert!((l - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_query_params() {
        let spec = LayoutSpec::default();
        let params = spec.query_params(true);
        assert!(params.contains(&("n_x", "8".to_string())));
        assert!(params.contains(&("with_calculations", "true".to_string())));
        assert!(params.contains(&("pile_overhang", "1.625".to_string())));
        assert_eq!(params.len(), 20);
    }

    #[test]
    fn test_design_inputs_fill_missing_fields() {
        let inputs: DesignInputs = serde_json::from_str(r#"{"fc": 4.0}"#).unwrap();
        assert_eq!(inputs.fc, 4.0);
        assert_eq!(inputs.col_y_dim, 16.0);
        assert_eq!(inputs.column(), ColumnGeometry { width: 9.0, depth: 16.0 });
    }
}
