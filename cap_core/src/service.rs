//! # Calculation Service
//!
//! Wire types and the HTTP client for the remote pile-cap service: layout
//! generation (optionally with pile forces), the reaction store, and the
//! advanced pile-cap design endpoint.
//!
//! The client only moves data. Deciding what a response means for the
//! workflow (empty layouts, stale answers) is left to
//! [`crate::workflow::WorkflowController`].

#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::errors::{CapError, CapResult};
use crate::layout::{DesignInputs, LayoutRequest, LayoutSpec};
use crate::pile::{PileCoordinate, PileRecord};
use crate::reactions::ReactionRow;

pub const COORDINATES_PATH: &str = "/api/pile-coordinates";
pub const REACTIONS_PATH: &str = "/api/reactions";
pub const DESIGN_PATH: &str = "/api/pile-cap/design";
pub const CALCULATE_PATH: &str = "/api/calculate";

/// Shown when the design endpoint fails without saying why.
pub const ADVANCED_FAILED: &str = "Advanced pile cap calculation failed.";
/// Shown when the design check answers without results.
pub const CHECK_EMPTY: &str = "Design check returned no results.";
/// Shown when the reaction store is empty at force time.
pub const NO_SERVER_LOAD_CASES: &str = "No valid load cases found on the server. Please add and save load cases first.";

/// Unit weight of concrete sent with every design request (kcf)
const GAMMA_CONCRETE: f64 = 0.15;

/// Response of the coordinate generator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CoordinatesResponse {
    #[serde(default)]
    pub coordinates: Vec<PileCoordinate>,
    #[serde(default)]
    pub footing_calculations: Option<Value>,
    #[serde(default)]
    pub shear_check: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of both reaction store endpoints.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReactionsPayload {
    #[serde(default)]
    pub reactions: Vec<ReactionRow>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct SaveResponse {
    #[serde(default)]
    pub message: String,
}

/// Body of the quick design check: the design inputs plus the overhang.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignCheckRequest {
    #[serde(flatten)]
    pub inputs: DesignInputs,
    pub pile_overhang: f64,
}

impl DesignCheckRequest {
    pub fn build(request: &LayoutRequest, inputs: &DesignInputs) -> Self {
        DesignCheckRequest {
            inputs: inputs.clone(),
            pile_overhang: request.overhang,
        }
    }
}

/// Figures returned by the quick design check.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DesignCheck {
    /// Column footprint grown by the overhang on every side (ft²)
    pub gross_area: f64,
    /// Footing top to pile tip (ft)
    pub depth_to_tip: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
struct DesignCheckResponse {
    #[serde(default)]
    results: Option<DesignCheck>,
}

/// Request body of the advanced design endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancedDesignRequest {
    /// Footing width along X (ft)
    #[serde(rename = "bFtg")]
    pub b_ftg: f64,
    /// Footing length along Y (ft)
    #[serde(rename = "LFtg")]
    pub l_ftg: f64,
    /// Footing thickness (ft)
    #[serde(rename = "hFtg")]
    pub h_ftg: f64,
    #[serde(rename = "Pileembed")]
    pub pile_embed: f64,
    pub fc: f64,
    pub fy: f64,
    pub cover: f64,
    pub bar_size_x: f64,
    pub bar_size_y: f64,
    #[serde(rename = "My")]
    pub my: f64,
    #[serde(rename = "Mx")]
    pub mx: f64,
    #[serde(rename = "Vu")]
    pub vu: f64,
    #[serde(rename = "Npiles")]
    pub n_piles: u32,
    pub pile_coords: Vec<PileRecord>,
    #[serde(rename = "wtFtg")]
    pub wt_ftg: f64,
    #[serde(rename = "Py")]
    pub py: f64,
    #[serde(rename = "MyFtg")]
    pub my_ftg: f64,
    #[serde(rename = "MySurcharge")]
    pub my_surcharge: f64,
    #[serde(rename = "MuyPile")]
    pub muy_pile: f64,
    pub gamma_conc: f64,
    pub gamma_soil: f64,
    #[serde(rename = "G_elev")]
    pub g_elev: f64,
    #[serde(rename = "F_elev")]
    pub f_elev: f64,
    #[serde(rename = "W_elev")]
    pub w_elev: f64,
    #[serde(rename = "D_seal")]
    pub d_seal: f64,
    pub col_x_dim: f64,
    pub col_y_dim: f64,
}

impl AdvancedDesignRequest {
    /// Derive the request from the form values and the current pile list.
    /// Pile records carry their position only.
    pub fn build(request: &LayoutRequest, inputs: &DesignInputs, piles: &[PileCoordinate]) -> Self {
        let (b_ftg, l_ftg) = request.footing_plan();
        AdvancedDesignRequest {
            b_ftg,
            l_ftg,
            h_ftg: inputs.footing_thickness / 12.0,
            pile_embed: inputs.pile_embedment,
            fc: inputs.fc,
            fy: inputs.fy,
            cover: inputs.cover,
            bar_size_x: 1.0,
            bar_size_y: 1.0,
            my: 0.0,
            mx: 0.0,
            vu: 0.0,
            n_piles: request.pile_count(),
            pile_coords: piles
                .iter()
                .map(|p| PileRecord::from(PileCoordinate::new(p.id, p.x, p.y)))
                .collect(),
            wt_ftg: 0.0,
            py: 0.0,
            my_ftg: 0.0,
            my_surcharge: 0.0,
            muy_pile: 0.0,
            gamma_conc: GAMMA_CONCRETE,
            gamma_soil: inputs.soil_weight,
            g_elev: inputs.ground_elev,
            f_elev: inputs.footing_top_elev,
            w_elev: inputs.water_elev,
            d_seal: inputs.seal_thickness,
            col_x_dim: inputs.col_x_dim,
            col_y_dim: inputs.col_y_dim,
        }
    }
}

/// Forces are only worth requesting when the reaction store holds load
/// cases, whatever the local saved flag says.
pub fn require_server_reactions(reactions: &[ReactionRow]) -> CapResult<()> {
    if reactions.is_empty() {
        return Err(CapError::empty_result(NO_SERVER_LOAD_CASES));
    }
    Ok(())
}

/// Decide whether a design response is a result or a failure.
///
/// A failure is a non-success status or an `error` field in the body; its
/// message is the `error` text when there is one.
pub fn interpret_design_response(success: bool, body: Value) -> CapResult<Value> {
    let failure = match body.get("error") {
        None | Some(Value::Null) => None,
        Some(Value::String(message)) if message.is_empty() => Some(ADVANCED_FAILED.to_string()),
        Some(Value::String(message)) => Some(message.clone()),
        Some(other) => Some(other.to_string()),
    };
    match (success, failure) {
        (true, None) => Ok(body),
        (_, Some(message)) => Err(CapError::service(message)),
        (false, None) => Err(CapError::service(ADVANCED_FAILED)),
    }
}

/// Client for the pile-cap calculation service
#[derive(Debug, Clone)]
pub struct ServiceClient {
    base_url: String,
    client: reqwest::Client,
}

impl ServiceClient {
    pub fn new(config: &ClientConfig) -> CapResult<Self> {
        #[cfg(not(target_arch = "wasm32"))]
        let builder = reqwest::Client::builder()
            .user_agent(format!("Pilecap/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.request_timeout_secs));
        #[cfg(target_arch = "wasm32")]
        let builder = reqwest::Client::builder();

        let client = builder
            .build()
            .map_err(|e| CapError::Internal {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(ServiceClient {
            base_url: config.service_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Generate pile coordinates for a layout, with pile forces and footing
    /// checks when `with_calculations` is set.
    pub async fn pile_coordinates(&self, spec: &LayoutSpec, with_calculations: bool) -> CapResult<CoordinatesResponse> {
        tracing::debug!(n_x = spec.request.n_x, n_y = spec.request.n_y, with_calculations, "requesting pile coordinates");
        let response = self
            .client
            .get(self.url(COORDINATES_PATH))
            .query(&spec.query_params(with_calculations))
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(CapError::service(error_text));
        }

        let body: CoordinatesResponse = response.json().await?;
        if let Some(error) = &body.error {
            tracing::warn!(%error, "coordinate service reported an error");
        }
        Ok(body)
    }

    pub async fn fetch_reactions(&self) -> CapResult<Vec<ReactionRow>> {
        let response = self.client.get(self.url(REACTIONS_PATH)).send().await?;
        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(CapError::service(error_text));
        }
        let payload: ReactionsPayload = response.json().await?;
        Ok(payload.reactions)
    }

    /// Save reactions and read back what the store now holds.
    pub async fn save_reactions(&self, rows: &[ReactionRow]) -> CapResult<Vec<ReactionRow>> {
        let payload = ReactionsPayload {
            reactions: rows.to_vec(),
        };
        let response = self.client.post(self.url(REACTIONS_PATH)).json(&payload).send().await?;
        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(CapError::service(error_text));
        }
        let saved: SaveResponse = response.json().await?;
        tracing::info!(rows = rows.len(), reply = %saved.message, "reactions saved");

        self.fetch_reactions().await
    }

    /// Reactions must exist on the server before forces are requested for
    /// the layout.
    pub async fn compute_forces(&self, spec: &LayoutSpec) -> CapResult<CoordinatesResponse> {
        let reactions = self.fetch_reactions().await?;
        require_server_reactions(&reactions)?;
        tracing::debug!(load_cases = reactions.len(), "reaction store ready");
        self.pile_coordinates(spec, true).await
    }

    /// Quick check of the design inputs, independent of any layout.
    pub async fn calculate(&self, request: &DesignCheckRequest) -> CapResult<DesignCheck> {
        let response = self.client.post(self.url(CALCULATE_PATH)).json(request).send().await?;
        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(CapError::service(error_text));
        }
        let body: DesignCheckResponse = response.json().await?;
        body.results.ok_or_else(|| CapError::empty_result(CHECK_EMPTY))
    }

    pub async fn advanced_design(&self, request: &AdvancedDesignRequest) -> CapResult<Value> {
        let response = self.client.post(self.url(DESIGN_PATH)).json(request).send().await?;
        let success = response.status().is_success();
        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(e) if !success => {
                tracing::warn!(error = %e, "design service returned an unreadable error body");
                Value::Null
            }
            Err(e) => return Err(e.into()),
        };
        interpret_design_response(success, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coordinates_response_defaults() {
        let body: CoordinatesResponse = serde_json::from_str(r#"{"coordinates": [], "error": "boom"}"#).unwrap();
        assert!(body.coordinates.is_empty());
        assert_eq!(body.error.as_deref(), Some("boom"));

        let body: CoordinatesResponse = serde_json::from_str("{}").unwrap();
        assert!(body.footing_calculations.is_none());
    }

    #[test]
    fn test_coordinates_with_forces() {
        let body: CoordinatesResponse = serde_json::from_value(json!({
            "coordinates": [
                {"No.": 1, "x (ft)": -1.875, "y (ft)": 0.0, "Pmax (k)": 110.2, "Pmin (k)": 20.0},
                {"No.": 2, "x (ft)": 1.875, "y (ft)": 0.0}
            ],
            "footing_calculations": {"footing_length": 24.0},
            "shear_check": null
        }))
        .unwrap();
        assert_eq!(body.coordinates.len(), 2);
        assert_eq!(body.coordinates[0].pmax(), Some(110.2));
        assert!(body.coordinates[1].forces.is_none());
        assert!(body.footing_calculations.is_some());
        assert!(body.shear_check.is_none());
    }

    #[test]
    fn test_design_check_request_is_flat() {
        let request = LayoutRequest {
            overhang: 2.0,
            ..LayoutRequest::default()
        };
        let body = serde_json::to_value(DesignCheckRequest::build(&request, &DesignInputs::default())).unwrap();
        assert_eq!(body["pile_overhang"], json!(2.0));
        assert_eq!(body["col_x_dim"], json!(9.0));
        assert_eq!(body["boring"], json!("P41-1"));
        assert!(body.get("inputs").is_none());
    }

    #[test]
    fn test_design_check_response() {
        let body: DesignCheckResponse = serde_json::from_value(json!({
            "inputs": {"fc": 5.5},
            "results": {"gross_area": 157.5, "depth_to_tip": 9.0},
            "pile_coordinates": []
        }))
        .unwrap();
        assert_eq!(
            body.results,
            Some(DesignCheck {
                gross_area: 157.5,
                depth_to_tip: 9.0
            })
        );

        let body: DesignCheckResponse = serde_json::from_value(json!({})).unwrap();
        assert!(body.results.is_none());
    }

    #[test]
    fn test_reactions_payload_shape() {
        let payload = ReactionsPayload {
            reactions: vec![ReactionRow::blank()],
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["reactions"][0]["dc_factor"], json!(1.0));
        assert_eq!(value["reactions"][0]["load_case"], json!(""));
    }

    #[test]
    fn test_advanced_request_fields() {
        let piles = vec![
            PileCoordinate::new(1, -1.875, -2.075),
            PileCoordinate::new(2, 1.875, 2.075).with_forces(Default::default()),
        ];
        let request = AdvancedDesignRequest::build(&LayoutRequest::default(), &DesignInputs::default(), &piles);
        let value = serde_json::to_value(&request).unwrap();

        assert!((value["bFtg"].as_f64().unwrap() - 29.5).abs() < 1e-9);
        assert!((value["LFtg"].as_f64().unwrap() - 24.0).abs() < 1e-9);
        assert_eq!(value["hFtg"], json!(0.75));
        assert_eq!(value["Npiles"], json!(48));
        assert_eq!(value["gamma_conc"], json!(0.15));
        assert_eq!(value["gamma_soil"], json!(0.115));
        assert_eq!(value["D_seal"], json!(0.0));
        assert_eq!(value["G_elev"], json!(73.4));
        assert_eq!(value["bar_size_x"], json!(1.0));
        assert_eq!(value["MuyPile"], json!(0.0));
        assert_eq!(value["pile_coords"][1], json!({"No.": 2, "x (ft)": 1.875, "y (ft)": 2.075}));
    }

    #[test]
    fn test_design_response_interpretation() {
        let ok = interpret_design_response(true, json!({"compliance": true})).unwrap();
        assert_eq!(ok["compliance"], json!(true));

        let err = interpret_design_response(true, json!({"error": "Npiles mismatch"})).unwrap_err();
        assert_eq!(err.user_message(), "Npiles mismatch");

        let err = interpret_design_response(false, json!({"detail": "bad"})).unwrap_err();
        assert_eq!(err.user_message(), ADVANCED_FAILED);

        let err = interpret_design_response(false, Value::Null).unwrap_err();
        assert_eq!(err.user_message(), ADVANCED_FAILED);

        assert!(interpret_design_response(true, json!({"error": null, "x": 1})).is_ok());
    }

    #[test]
    fn test_client_trims_base_url() {
        let config = ClientConfig {
            service_url: "http://localhost:8002/".to_string(),
            ..ClientConfig::default()
        };
        let client = ServiceClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8002");
        assert_eq!(client.url(REACTIONS_PATH), "http://localhost:8002/api/reactions");
    }
}
