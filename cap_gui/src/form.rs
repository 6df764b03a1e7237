//! Design input form state
//!
//! Every field is held as the text the user typed. Values are parsed only
//! when a workflow step needs them, so a half-typed number never disturbs
//! the current layout.

use cap_core::errors::{CapError, CapResult};
use cap_core::ingest::parse_number;
use cap_core::layout::{ColumnGeometry, DesignInputs, LayoutRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormSection {
    FootingData,
    PileData,
    PileLayout,
}

impl FormSection {
    pub const ALL: [FormSection; 3] = [FormSection::FootingData, FormSection::PileData, FormSection::PileLayout];

    pub fn title(self) -> &'static str {
        match self {
            FormSection::FootingData => "Footing Data",
            FormSection::PileData => "Pile Data",
            FormSection::PileLayout => "Pile Layout Design",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Fc,
    Fy,
    Cover,
    ColXDim,
    ColYDim,
    EccX,
    EccY,
    FootingThickness,
    PileEmbedment,
    Overhang,
    GroundElev,
    FootingTopElev,
    WaterElev,
    SoilWeight,
    SealThickness,
    NX,
    NY,
    PileSize,
    MaxPileDrivingResistance,
    Boring,
    PileTipElevation,
    NominalPileBearingCapacity,
    SoilUltimateSideFriction,
    CompReductionFactor,
    UpliftReductionFactor,
    SX,
    SY,
}

impl FormField {
    pub const ALL: [FormField; 27] = [
        FormField::Fc,
        FormField::Fy,
        FormField::Cover,
        FormField::ColXDim,
        FormField::ColYDim,
        FormField::EccX,
        FormField::EccY,
        FormField::FootingThickness,
        FormField::PileEmbedment,
        FormField::Overhang,
        FormField::GroundElev,
        FormField::FootingTopElev,
        FormField::WaterElev,
        FormField::SoilWeight,
        FormField::SealThickness,
        FormField::NX,
        FormField::NY,
        FormField::PileSize,
        FormField::MaxPileDrivingResistance,
        FormField::Boring,
        FormField::PileTipElevation,
        FormField::NominalPileBearingCapacity,
        FormField::SoilUltimateSideFriction,
        FormField::CompReductionFactor,
        FormField::UpliftReductionFactor,
        FormField::SX,
        FormField::SY,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn section(self) -> FormSection {
        use FormField::*;
        match self {
            Fc | Fy | Cover | ColXDim | ColYDim | EccX | EccY | FootingThickness | PileEmbedment | Overhang
            | GroundElev | FootingTopElev | WaterElev | SoilWeight | SealThickness => FormSection::FootingData,
            NX | NY | PileSize | MaxPileDrivingResistance | Boring | PileTipElevation | NominalPileBearingCapacity
            | SoilUltimateSideFriction | CompReductionFactor | UpliftReductionFactor => FormSection::PileData,
            SX | SY => FormSection::PileLayout,
        }
    }

    /// Label, unit
    pub fn label(self) -> (&'static str, &'static str) {
        use FormField::*;
        match self {
            Fc => ("Concrete f'c", "ksi"),
            Fy => ("Reinforcing Steel fy", "ksi"),
            Cover => ("Reinforcing Cover", "in"),
            ColXDim => ("Column x-dim. or Diameter", "ft"),
            ColYDim => ("Column y-dim.", "ft"),
            EccX => ("Column eccentric x-dir.", "ft"),
            EccY => ("Column eccentric y-dir.", "ft"),
            FootingThickness => ("Footing thickness", "in"),
            PileEmbedment => ("Pile Embedment", "ft"),
            Overhang => ("Pile Overhang", "ft"),
            GroundElev => ("Ground Elevation", "ft"),
            FootingTopElev => ("Footing Top Elevation", "ft"),
            WaterElev => ("Water Elevation", "ft"),
            SoilWeight => ("Soil Weight", "kcf"),
            SealThickness => ("Seal Thickness", "in"),
            NX => ("Number of Piles in X", ""),
            NY => ("Number of Piles in Y", ""),
            PileSize => ("Pile Size", "in"),
            MaxPileDrivingResistance => ("Max. Pile Driving Resistance", "kips"),
            Boring => ("Boring", ""),
            PileTipElevation => ("Pile Tip Elevation", "ft"),
            NominalPileBearingCapacity => ("Nominal Pile Bearing Capacity", "kips"),
            SoilUltimateSideFriction => ("Soil Ultimate Side Friction", "psf"),
            CompReductionFactor => ("Comp. Reduction Factor, f", ""),
            UpliftReductionFactor => ("Uplift Reduction Factor, f", ""),
            SX => ("Spacing in X direction (s_x)", "ft"),
            SY => ("Spacing in Y direction (s_y)", "ft"),
        }
    }

    /// Wire name, used in validation messages
    pub fn key(self) -> &'static str {
        use FormField::*;
        match self {
            Fc => "fc",
            Fy => "fy",
            Cover => "cover",
            ColXDim => "col_x_dim",
            ColYDim => "col_y_dim",
            EccX => "ecc_x",
            EccY => "ecc_y",
            FootingThickness => "footing_thickness",
            PileEmbedment => "pile_embedment",
            Overhang => "pile_overhang",
            GroundElev => "ground_elev",
            FootingTopElev => "footing_top_elev",
            WaterElev => "water_elev",
            SoilWeight => "soil_weight",
            SealThickness => "seal_thickness",
            NX => "n_x",
            NY => "n_y",
            PileSize => "pile_size",
            MaxPileDrivingResistance => "max_pile_driving_resistance",
            Boring => "boring",
            PileTipElevation => "pile_tip_elevation",
            NominalPileBearingCapacity => "nominal_pile_bearing_capacity",
            SoilUltimateSideFriction => "soil_ultimate_side_friction",
            CompReductionFactor => "comp_reduction_factor",
            UpliftReductionFactor => "uplift_reduction_factor",
            SX => "s_x",
            SY => "s_y",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DesignForm {
    values: Vec<String>,
}

impl Default for DesignForm {
    fn default() -> Self {
        DesignForm::from_values(&LayoutRequest::default(), &DesignInputs::default())
    }
}

impl DesignForm {
    pub fn from_values(layout: &LayoutRequest, inputs: &DesignInputs) -> Self {
        let values = FormField::ALL
            .iter()
            .map(|field| {
                use FormField::*;
                let number = match field {
                    Fc => inputs.fc,
                    Fy => inputs.fy,
                    Cover => inputs.cover,
                    ColXDim => inputs.col_x_dim,
                    ColYDim => inputs.col_y_dim,
                    EccX => inputs.ecc_x,
                    EccY => inputs.ecc_y,
                    FootingThickness => inputs.footing_thickness,
                    PileEmbedment => inputs.pile_embedment,
                    Overhang => layout.overhang,
                    GroundElev => inputs.ground_elev,
                    FootingTopElev => inputs.footing_top_elev,
                    WaterElev => inputs.water_elev,
                    SoilWeight => inputs.soil_weight,
                    SealThickness => inputs.seal_thickness,
                    NX => return layout.n_x.to_string(),
                    NY => return layout.n_y.to_string(),
                    PileSize => inputs.pile_size,
                    MaxPileDrivingResistance => inputs.max_pile_driving_resistance,
                    Boring => return inputs.boring.clone(),
                    PileTipElevation => inputs.pile_tip_elevation,
                    NominalPileBearingCapacity => inputs.nominal_pile_bearing_capacity,
                    SoilUltimateSideFriction => inputs.soil_ultimate_side_friction,
                    CompReductionFactor => inputs.comp_reduction_factor,
                    UpliftReductionFactor => inputs.uplift_reduction_factor,
                    SX => layout.s_x,
                    SY => layout.s_y,
                };
                number.to_string()
            })
            .collect();
        DesignForm { values }
    }

    pub fn text(&self, field: FormField) -> &str {
        &self.values[field.index()]
    }

    pub fn set(&mut self, field: FormField, value: String) {
        self.values[field.index()] = value;
    }

    /// `n_x × n_y` when both counts parse.
    pub fn total_piles(&self) -> Option<u32> {
        let n_x: u32 = self.text(FormField::NX).trim().parse().ok()?;
        let n_y: u32 = self.text(FormField::NY).trim().parse().ok()?;
        n_x.checked_mul(n_y)
    }

    /// Column size and overhang for the drawing, read leniently so the
    /// plan follows the form while the user types.
    pub fn drawing_geometry(&self) -> (ColumnGeometry, f64) {
        let column = ColumnGeometry {
            width: parse_number(self.text(FormField::ColXDim)),
            depth: parse_number(self.text(FormField::ColYDim)),
        };
        (column, parse_number(self.text(FormField::Overhang)))
    }

    fn number(&self, field: FormField) -> CapResult<f64> {
        let text = self.text(field).trim();
        match text.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(CapError::validation(
                field.key(),
                text,
                format!("{} must be a number.", field.label().0),
            )),
        }
    }

    fn count(&self, field: FormField) -> CapResult<u32> {
        let text = self.text(field).trim();
        text.parse::<u32>().map_err(|_| {
            CapError::validation(field.key(), text, format!("{} must be a whole number.", field.label().0))
        })
    }

    pub fn layout(&self) -> CapResult<LayoutRequest> {
        Ok(LayoutRequest {
            n_x: self.count(FormField::NX)?,
            s_x: self.number(FormField::SX)?,
            n_y: self.count(FormField::NY)?,
            s_y: self.number(FormField::SY)?,
            overhang: self.number(FormField::Overhang)?,
        })
    }

    pub fn inputs(&self) -> CapResult<DesignInputs> {
        use FormField::*;
        Ok(DesignInputs {
            fc: self.number(Fc)?,
            fy: self.number(Fy)?,
            cover: self.number(Cover)?,
            col_x_dim: self.number(ColXDim)?,
            col_y_dim: self.number(ColYDim)?,
            ecc_x: self.number(EccX)?,
            ecc_y: self.number(EccY)?,
            footing_thickness: self.number(FootingThickness)?,
            pile_embedment: self.number(PileEmbedment)?,
            ground_elev: self.number(GroundElev)?,
            footing_top_elev: self.number(FootingTopElev)?,
            water_elev: self.number(WaterElev)?,
            soil_weight: self.number(SoilWeight)?,
            seal_thickness: self.number(SealThickness)?,
            pile_size: self.number(PileSize)?,
            max_pile_driving_resistance: self.number(MaxPileDrivingResistance)?,
            boring: self.text(Boring).trim().to_string(),
            pile_tip_elevation: self.number(PileTipElevation)?,
            nominal_pile_bearing_capacity: self.number(NominalPileBearingCapacity)?,
            soil_ultimate_side_friction: self.number(SoilUltimateSideFriction)?,
            comp_reduction_factor: self.number(CompReductionFactor)?,
            uplift_reduction_factor: self.number(UpliftReductionFactor)?,
        })
    }
}
