//! # Reactions
//!
//! Column reactions per load case, and the editable table the user fills
//! before saving them to the reaction store.
//!
//! The table tracks whether the server has confirmed a usable reaction set.
//! Only [`ReactionTable::confirm_saved`], fed with the rows read back after a
//! save, can set that flag; local edits never do.

use serde::{Deserialize, Serialize};

use crate::errors::{CapError, CapResult};
use crate::ingest::{apply_paste, parse_number, PasteAnchor};

/// Reaction at the top of the footing at the column centroid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionRow {
    pub load_case: String,
    #[serde(default = "default_dc_factor")]
    pub dc_factor: f64,
    #[serde(default)]
    pub fx: f64,
    #[serde(default)]
    pub fy: f64,
    #[serde(default)]
    pub fz: f64,
    #[serde(default)]
    pub mx: f64,
    #[serde(default)]
    pub my: f64,
}

fn default_dc_factor() -> f64 {
    1.0
}

impl Default for ReactionRow {
    fn default() -> Self {
        ReactionRow::blank()
    }
}

impl ReactionRow {
    pub fn blank() -> Self {
        ReactionRow {
            load_case: String::new(),
            dc_factor: 1.0,
            fx: 0.0,
            fy: 0.0,
            fz: 0.0,
            mx: 0.0,
            my: 0.0,
        }
    }

    /// A row counts once it names its load case.
    pub fn is_valid(&self) -> bool {
        !self.load_case.trim().is_empty()
    }

    /// Numeric value of `field`; `None` for the load case.
    pub fn number(&self, field: ReactionField) -> Option<f64> {
        match field {
            ReactionField::LoadCase => None,
            ReactionField::DcFactor => Some(self.dc_factor),
            ReactionField::Fx => Some(self.fx),
            ReactionField::Fy => Some(self.fy),
            ReactionField::Fz => Some(self.fz),
            ReactionField::Mx => Some(self.mx),
            ReactionField::My => Some(self.my),
        }
    }

    /// Write a cell from its text: the load case is trimmed, numbers fall
    /// back to 0.
    pub fn set_from_text(&mut self, field: ReactionField, text: &str) {
        let value = parse_number(text);
        match field {
            ReactionField::LoadCase => self.load_case = text.trim().to_string(),
            ReactionField::DcFactor => self.dc_factor = value,
            ReactionField::Fx => self.fx = value,
            ReactionField::Fy => self.fy = value,
            ReactionField::Fz => self.fz = value,
            ReactionField::Mx => self.mx = value,
            ReactionField::My => self.my = value,
        }
    }
}

/// Table columns, in paste order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReactionField {
    LoadCase,
    DcFactor,
    Fx,
    Fy,
    Fz,
    Mx,
    My,
}

impl ReactionField {
    pub const ALL: [ReactionField; 7] = [
        ReactionField::LoadCase,
        ReactionField::DcFactor,
        ReactionField::Fx,
        ReactionField::Fy,
        ReactionField::Fz,
        ReactionField::Mx,
        ReactionField::My,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ReactionField::LoadCase => "load_case",
            ReactionField::DcFactor => "dc_factor",
            ReactionField::Fx => "fx",
            ReactionField::Fy => "fy",
            ReactionField::Fz => "fz",
            ReactionField::Mx => "mx",
            ReactionField::My => "my",
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            ReactionField::LoadCase => "Load Case",
            ReactionField::DcFactor => "DC Factor",
            ReactionField::Fx => "Fx (k)",
            ReactionField::Fy => "Fy (k)",
            ReactionField::Fz => "Fz (k)",
            ReactionField::Mx => "Mx (k-ft)",
            ReactionField::My => "My (k-ft)",
        }
    }

    pub fn from_name(name: &str) -> CapResult<Self> {
        ReactionField::ALL
            .into_iter()
            .find(|f| f.name() == name)
            .ok_or_else(|| CapError::validation("field", name, "Unknown reaction column"))
    }

    pub fn index(self) -> usize {
        ReactionField::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }
}

/// Editable reaction rows plus the server-confirmed flag.
#[derive(Debug, Clone, PartialEq)]
pub struct ReactionTable {
    rows: Vec<ReactionRow>,
    /// Raw text of numeric cells being typed, keyed by (row, field)
    drafts: Vec<((usize, ReactionField), String)>,
    pub editing: bool,
    pub focused: Option<(usize, ReactionField)>,
    saved: bool,
}

impl Default for ReactionTable {
    fn default() -> Self {
        ReactionTable {
            rows: vec![ReactionRow::blank()],
            drafts: Vec::new(),
            editing: true,
            focused: None,
            saved: false,
        }
    }
}

impl ReactionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[ReactionRow] {
        &self.rows
    }

    /// Whether the reaction store holds at least one valid row, as last
    /// confirmed by the server.
    pub fn is_saved(&self) -> bool {
        self.saved
    }

    pub fn has_valid_rows(&self) -> bool {
        self.rows.iter().any(ReactionRow::is_valid)
    }

    pub fn add_row(&mut self) {
        self.rows.push(ReactionRow::blank());
    }

    /// Back to a single blank row.
    pub fn clear(&mut self) {
        self.rows = vec![ReactionRow::blank()];
        self.drafts.clear();
        self.focused = None;
    }

    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;
    }

    pub fn focus(&mut self, row: usize, field: ReactionField) {
        self.focused = Some((row, field));
    }

    /// Text shown in a cell: a pending draft, or the stored value.
    pub fn cell_text(&self, row: usize, field: ReactionField) -> String {
        if let Some((_, text)) = self.drafts.iter().find(|(key, _)| *key == (row, field)) {
            return text.clone();
        }
        match self.rows.get(row) {
            Some(r) => match r.number(field) {
                Some(v) => v.to_string(),
                None => r.load_case.clone(),
            },
            None => String::new(),
        }
    }

    /// Edit one cell. Load cases are stored as typed; numeric cells keep the
    /// typed text until the next paste, clear or save.
    pub fn set_cell(&mut self, row: usize, field: ReactionField, text: &str) {
        let Some(target) = self.rows.get_mut(row) else {
            return;
        };
        self.focused = Some((row, field));
        if field == ReactionField::LoadCase {
            target.load_case = text.to_string();
            return;
        }
        target.set_from_text(field, text);
        self.drafts.retain(|(key, _)| *key != (row, field));
        self.drafts.push(((row, field), text.to_string()));
    }

    /// Paste clipboard text at the focused cell. Without a focused cell the
    /// paste is ignored.
    pub fn paste(&mut self, text: &str) -> CapResult<()> {
        let Some((row, field)) = self.focused else {
            return Ok(());
        };
        self.paste_at(text, PasteAnchor::new(row, field))
    }

    pub fn paste_at(&mut self, text: &str, anchor: PasteAnchor) -> CapResult<()> {
        self.rows = apply_paste(text, &anchor, &self.rows)?;
        self.drafts.clear();
        Ok(())
    }

    /// Rows to send to the reaction store.
    pub fn payload(&self) -> CapResult<Vec<ReactionRow>> {
        if !self.has_valid_rows() {
            return Err(CapError::validation(
                "load_case",
                "",
                "Please provide at least one load case name before saving.",
            ));
        }
        Ok(self.rows.clone())
    }

    /// Replace the table with the rows read back from the store after a save.
    /// Returns the recomputed saved flag.
    pub fn confirm_saved(&mut self, server_rows: Vec<ReactionRow>) -> bool {
        self.saved = server_rows.iter().any(ReactionRow::is_valid);
        self.rows = if server_rows.is_empty() {
            vec![ReactionRow::blank()]
        } else {
            server_rows
        };
        self.drafts.clear();
        self.editing = false;
        self.saved
    }

    /// Load rows fetched at startup without touching the saved flag.
    pub fn load(&mut self, server_rows: Vec<ReactionRow>) {
        if !server_rows.is_empty() {
            self.rows = server_rows;
            self.drafts.clear();
        }
    }
}
