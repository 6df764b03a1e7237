//! # Result Tables
//!
//! Tabulation of design results for display: the pile force table, the
//! per-load-case breakdown, the drawing summary, and labelled views of the
//! opaque footing, shear and advanced-design results.
//!
//! Tables stop at [`TABLE_ROW_LIMIT`] piles and say so; the drawing itself
//! always shows every pile.

use serde_json::Value;

use crate::layout::ColumnGeometry;
use crate::pile::{footing_extent, pile_spacing, ForceComponents, PileCoordinate};
use crate::service::DesignCheck;
use crate::viewport::Viewport;

pub const TABLE_ROW_LIMIT: usize = 200;
pub const ROWS_TRUNCATED: &str = "Showing first 200 rows only (data truncated for performance)";
pub const PILES_TRUNCATED: &str = "Showing first 200 piles only (data truncated for performance)";

pub const FORCE_TABLE_HEADINGS: [&str; 9] = [
    "Pile #",
    "X (ft)",
    "Y (ft)",
    "Pmax (k)",
    "Max Load Case",
    "Pmax Components",
    "Pmin (k)",
    "Min Load Case",
    "Pmin Components",
];

pub const BREAKDOWN_HEADINGS: [&str; 5] = ["Load Case", "P Value (k)", "Axial", "Mx", "My"];

/// Rows of a table capped at [`TABLE_ROW_LIMIT`].
#[derive(Debug, Clone, PartialEq)]
pub struct Tabulated<T> {
    pub rows: Vec<T>,
    /// Number of source items before truncation
    pub total: usize,
    pub notice: Option<&'static str>,
}

impl<T> Tabulated<T> {
    fn capped(items: impl Iterator<Item = T>, total: usize, notice: &'static str) -> Self {
        Tabulated {
            rows: items.take(TABLE_ROW_LIMIT).collect(),
            total,
            notice: (total > TABLE_ROW_LIMIT).then_some(notice),
        }
    }

    pub fn is_truncated(&self) -> bool {
        self.notice.is_some()
    }
}

/// One line of the pile force table, already formatted.
#[derive(Debug, Clone, PartialEq)]
pub struct ForceRow {
    pub cells: [String; 9],
    /// Pmax above the high-compression threshold
    pub high: bool,
    /// Pmin in tension
    pub tension: bool,
}

/// `"Axial: 80, Mx: -15, My: 30"`
pub fn components_text(c: &ForceComponents) -> String {
    format!("Axial: {}, Mx: {}, My: {}", c.axial, c.moment_x, c.moment_y)
}

pub fn force_table(piles: &[PileCoordinate]) -> Tabulated<ForceRow> {
    let rows = piles.iter().map(|pile| {
        let f = pile.forces.as_ref();
        let text = |v: Option<String>| v.unwrap_or_default();
        ForceRow {
            cells: [
                pile.id.to_string(),
                pile.x.to_string(),
                pile.y.to_string(),
                text(f.map(|f| f.pmax.to_string())),
                text(f.map(|f| f.max_load_case.clone())),
                text(f.and_then(|f| f.pmax_components.as_ref()).map(components_text)),
                text(f.map(|f| f.pmin.to_string())),
                text(f.map(|f| f.min_load_case.clone())),
                text(f.and_then(|f| f.pmin_components.as_ref()).map(components_text)),
            ],
            high: f.is_some_and(|f| f.pmax > crate::scene::HIGH_COMPRESSION_KIPS),
            tension: f.is_some_and(|f| f.pmin < 0.0),
        }
    });
    Tabulated::capped(rows, piles.len(), ROWS_TRUNCATED)
}

/// Per-load-case P values of one pile.
#[derive(Debug, Clone, PartialEq)]
pub struct PileBreakdown {
    pub title: String,
    pub rows: Vec<[String; 5]>,
}

pub fn pile_breakdowns(piles: &[PileCoordinate]) -> Tabulated<PileBreakdown> {
    let items = piles.iter().map(|pile| {
        let rows = pile
            .forces
            .iter()
            .flat_map(|f| f.p_values.iter())
            .map(|pv| {
                let part = |pick: fn(&ForceComponents) -> f64| {
                    pv.components.as_ref().map(|c| format!("{:.2}", pick(c))).unwrap_or_default()
                };
                [
                    pv.load_case.clone(),
                    format!("{:.2}", pv.value),
                    part(|c| c.axial),
                    part(|c| c.moment_x),
                    part(|c| c.moment_y),
                ]
            })
            .collect();
        PileBreakdown {
            title: format!("Pile #{} (X: {}, Y: {})", pile.id, pile.x, pile.y),
            rows,
        }
    });
    Tabulated::capped(items, piles.len(), PILES_TRUNCATED)
}

/// Summary printed beside the drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingDetails {
    pub column: ColumnGeometry,
    /// Footing plan size, when there are piles
    pub pile_cap: Option<(f64, f64)>,
    pub overhang: f64,
    pub spacing: Option<(f64, f64)>,
    /// Pixels per foot at the current zoom
    pub scale: f64,
}

impl DrawingDetails {
    pub fn new(piles: &[PileCoordinate], column: ColumnGeometry, overhang: f64, viewport: &Viewport) -> Self {
        let pile_cap = footing_extent(piles, overhang).map(|e| (e.width(), e.length()));
        let spacing = (!piles.is_empty()).then(|| pile_spacing(piles));
        DrawingDetails {
            column,
            pile_cap,
            overhang,
            spacing,
            scale: viewport.effective_scale(),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![format!("Column: {}' x {}'", self.column.width, self.column.depth)];
        if let Some((x, y)) = self.pile_cap {
            lines.push(format!("Pile Cap: {:.2}' x {:.2}'", x, y));
        }
        lines.push(format!("Pile Overhang: {}'", self.overhang));
        if let Some((x, y)) = self.spacing {
            lines.push(format!("Pile Spacing: {:.2}' (X), {:.2}' (Y)", x, y));
        }
        lines.push(format!("Drawing Scale: 1 unit = {:.2} px/ft", self.scale));
        lines
    }
}

/// Labelled value pulled out of an opaque result.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub label: &'static str,
    pub value: String,
    pub formula: Option<String>,
}

const NOT_AVAILABLE: &str = "N/A";

/// Look up a dotted path such as `"reinforcement_spacing_limits.max_spacing_in"`.
fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |v, key| v.get(key)).filter(|v| !v.is_null())
}

fn raw(value: &Value, path: &str, unit: &str) -> String {
    match lookup(value, path) {
        Some(Value::String(s)) => with_unit(s.clone(), unit),
        Some(v) => with_unit(v.to_string(), unit),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn fixed(value: &Value, path: &str, unit: &str) -> String {
    match lookup(value, path).and_then(Value::as_f64) {
        Some(v) => with_unit(format!("{:.2}", v), unit),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn yes_no(value: &Value, path: &str) -> String {
    let yes = lookup(value, path).and_then(Value::as_bool).unwrap_or(false);
    if yes { "Yes" } else { "No" }.to_string()
}

fn with_unit(value: String, unit: &str) -> String {
    if unit.is_empty() {
        value
    } else {
        format!("{} {}", value, unit)
    }
}

fn row(label: &'static str, value: String) -> SummaryRow {
    SummaryRow {
        label,
        value,
        formula: None,
    }
}

/// Footing and weight calculations returned with the pile forces.
pub fn footing_summary(calc: &Value) -> Vec<SummaryRow> {
    const FIELDS: [(&str, &str, &str); 14] = [
        ("Footing Length", "footing_length", "ft"),
        ("Footing Width", "footing_width", "ft"),
        ("Effective Depth (d)", "footing_effective_depth", "ft"),
        ("Shear Depth (dv)", "footing_shear_depth", "ft"),
        ("Column Area", "column_gross_area", "ft²"),
        ("Seal Weight", "footing_seal_weight", "kips"),
        ("Soil Weight", "soil_weight_kips", "kips"),
        ("Water Weight", "water_weight", "kips"),
        ("Footing Thickness (D)", "D", "in"),
        ("Seal Thickness", "seal_thickness", "in"),
        ("Soil Unit Weight (γ)", "gamma_soil", "kcf"),
        ("Bar Cover", "bar_cover", "in"),
        ("Bottom Bar Size (Long)", "bottom_bar_size_long", "in"),
        ("Bottom Bar Size (Trans)", "bottom_bar_size_trans", "in"),
    ];
    FIELDS
        .iter()
        .map(|&(label, key, unit)| row(label, raw(calc, key, unit)))
        .collect()
}

/// Quick check of the design inputs.
pub fn design_check_summary(check: &DesignCheck) -> Vec<SummaryRow> {
    vec![
        row("Gross Area", format!("{:.2} ft²", check.gross_area)),
        row("Depth to Pile Tip", format!("{:.2} ft", check.depth_to_tip)),
    ]
}

pub fn shear_summary(check: &Value) -> Vec<SummaryRow> {
    let status = lookup(check, "status").and_then(Value::as_str).unwrap_or_default();
    let verdict = if status == "< GOOD" { "OK" } else { "Check design" };
    vec![
        SummaryRow {
            label: "Shear Capacity Formula",
            value: "Vc = 0.0316 β √f'c b dv".to_string(),
            formula: lookup(check, "aashto_ref").and_then(Value::as_str).map(str::to_string),
        },
        row("Nominal Shear Capacity, ϕVc", raw(check, "nominal_shear_capacity_phi_vc", "k")),
        row("Shear Capacity/Demand", raw(check, "shear_capacity_demand", "")),
        row("Status", format!("{} ({})", status, verdict)),
    ]
}

/// Advanced pile-cap design result, with the formula the service reports
/// for each step.
pub fn advanced_summary(design: &Value) -> Vec<SummaryRow> {
    enum Kind {
        Fixed(&'static str),
        Flag,
    }
    const STEPS: [(&str, &str, Kind, Option<&str>); 14] = [
        ("Effective Depth (d)", "effective_depth_in", Kind::Fixed("in"), Some("effective_depth")),
        ("Shear Depth (dv)", "shear_depth_in", Kind::Fixed("in"), Some("shear_depth")),
        ("Required Area of Steel (As)", "required_As_in2", Kind::Fixed("in²"), Some("required_As")),
        ("Moment Capacity (Mn)", "moment_capacity_kipft", Kind::Fixed("kip-ft"), Some("moment_capacity")),
        ("One-Way Shear Capacity (ϕVn)", "shear_capacity_kip", Kind::Fixed("k"), Some("one_way_shear")),
        ("Shear Safe?", "shear_safe", Kind::Flag, None),
        ("Strength I Moment (My Strength)", "My_Strength_I", Kind::Fixed(""), Some("strength_service_moments")),
        ("Service I Moment (My Service)", "My_Service_I", Kind::Fixed(""), None),
        ("Soil Weight", "soil_weight", Kind::Fixed("kips"), Some("soil_weight")),
        ("Water Weight", "water_weight", Kind::Fixed("kips"), Some("water_weight")),
        ("Min Bar Spacing", "reinforcement_spacing_limits.min_spacing_in", Kind::Fixed("in"), Some("crack_control_spacing")),
        ("Max Bar Spacing", "reinforcement_spacing_limits.max_spacing_in", Kind::Fixed("in"), None),
        ("Punching Shear Capacity (ϕVpunch)", "punching_shear_capacity_kip", Kind::Fixed("k"), Some("punching_shear")),
        ("Punching Shear Safe?", "punching_safe", Kind::Flag, None),
    ];

    let mut rows: Vec<SummaryRow> = STEPS
        .iter()
        .map(|&(label, path, ref kind, formula)| SummaryRow {
            label,
            value: match kind {
                Kind::Fixed(unit) => fixed(design, path, unit),
                Kind::Flag => yes_no(design, path),
            },
            formula: formula
                .and_then(|key| lookup(design, &format!("formulas.{}", key)))
                .and_then(Value::as_str)
                .map(str::to_string),
        })
        .collect();
    rows.push(row("Compliant?", yes_no(design, "compliance")));
    rows
}
