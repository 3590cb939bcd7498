use serde::{Deserialize, Serialize};

use super::enums::{ElevationMode, VariableElevationSpec};
use super::fields::{FieldBag, FieldReader};
use super::values::{MeshData, Point3, TimeValue};
use crate::error::ModelError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedElevation {
    pub zbottom: f64,
    pub zsurf: f64,
}

impl Default for FixedElevation {
    fn default() -> Self {
        Self {
            zbottom: 0.0,
            zsurf: 1.0,
        }
    }
}

/// Time-dependent free surface. Only the source named by `spec` is exported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableElevation {
    spec: VariableElevationSpec,
    pub zbottom: f64,
    pub times: Vec<TimeValue>,
    pub file: String,
    pub mesh_data: MeshData,
}

impl VariableElevation {
    pub fn spec(&self) -> VariableElevationSpec {
        self.spec
    }
}

impl Default for VariableElevation {
    fn default() -> Self {
        Self {
            spec: VariableElevationSpec::TimeList,
            zbottom: 0.0,
            times: Vec::new(),
            file: String::new(),
            mesh_data: MeshData::default(),
        }
    }
}

/// Free surface computed by the solver from the fluid column above `point`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AutomaticElevation {
    pub zbottom: f64,
    pub zsurf_min: f64,
    pub point: Point3,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElevationInput {
    Fixed(FixedElevation),
    TimeList { zbottom: f64, times: Vec<TimeValue> },
    File { zbottom: f64, path: String },
    MeshData { zbottom: f64, mesh: MeshData },
    Automatic(AutomaticElevation),
}

impl ElevationInput {
    /// Reads the fields of the variant currently selected in `info`.
    ///
    /// Time list rows are `[time, zsurf]` under `values`.
    pub fn from_fields(info: &ElevationInfo, bag: &FieldBag) -> Result<Self, ModelError> {
        let fields = FieldReader::new(bag);
        let zbottom = fields.number("zbottom")?;
        let input = match info.mode {
            ElevationMode::Fixed => {
                let zsurf = fields.number("zsurf")?;
                if zsurf < zbottom {
                    return Err(ModelError::invalid_field(
                        "zsurf",
                        format!("surface {zsurf} lies below the bottom {zbottom}"),
                    ));
                }
                Self::Fixed(FixedElevation { zbottom, zsurf })
            }
            ElevationMode::Variable => match info.variable.spec {
                VariableElevationSpec::TimeList => {
                    let rows = fields.rows("values", 2)?;
                    if let Some(i) = rows.iter().position(|row| row[0] < 0.0) {
                        return Err(ModelError::invalid_field(
                            format!("values[{i}]"),
                            "time cannot be negative",
                        ));
                    }
                    Self::TimeList {
                        zbottom,
                        times: rows
                            .into_iter()
                            .map(|row| TimeValue::new(row[0], row[1]))
                            .collect(),
                    }
                }
                VariableElevationSpec::File => {
                    let path = fields.text("file")?;
                    if path.trim().is_empty() {
                        return Err(ModelError::invalid_field("file", "a file path is required"));
                    }
                    Self::File { zbottom, path }
                }
                VariableElevationSpec::MeshData => Self::MeshData {
                    zbottom,
                    mesh: fields.mesh_data(&info.variable.mesh_data)?,
                },
            },
            ElevationMode::Automatic => Self::Automatic(AutomaticElevation {
                zbottom,
                zsurf_min: fields.number("zsurf_min")?,
                point: fields.point3("point")?,
            }),
        };
        Ok(input)
    }
}

/// Free-surface elevation of a zone.
///
/// Nothing is exported unless `enabled` is set. As with velocity, every
/// variant keeps its own payload across mode switches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElevationInfo {
    enabled: bool,
    mode: ElevationMode,
    remove_above: bool,
    fixed: FixedElevation,
    variable: VariableElevation,
    automatic: AutomaticElevation,
}

impl ElevationInfo {
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn mode(&self) -> ElevationMode {
        self.mode
    }

    /// Whether particles above the free surface are removed.
    pub fn remove_above(&self) -> bool {
        self.remove_above
    }

    pub fn set_remove_above(&mut self, remove: bool) {
        self.remove_above = remove;
    }

    pub fn fixed(&self) -> &FixedElevation {
        &self.fixed
    }

    pub fn variable(&self) -> &VariableElevation {
        &self.variable
    }

    pub fn automatic(&self) -> &AutomaticElevation {
        &self.automatic
    }

    pub fn select_mode(&mut self, mode: ElevationMode) {
        self.mode = mode;
    }

    pub fn select_variable_spec(&mut self, spec: VariableElevationSpec) {
        self.variable.spec = spec;
    }

    pub fn apply(&mut self, input: ElevationInput) {
        match input {
            ElevationInput::Fixed(fixed) => self.fixed = fixed,
            ElevationInput::TimeList { zbottom, times } => {
                self.variable.zbottom = zbottom;
                self.variable.times = times;
            }
            ElevationInput::File { zbottom, path } => {
                self.variable.zbottom = zbottom;
                self.variable.file = path;
            }
            ElevationInput::MeshData { zbottom, mesh } => {
                self.variable.zbottom = zbottom;
                self.variable.mesh_data = mesh;
            }
            ElevationInput::Automatic(automatic) => self.automatic = automatic,
        }
    }

    /// Commits GUI fields into the currently selected variant. The optional
    /// `remove_above` flag applies to every mode.
    pub fn commit(&mut self, bag: &FieldBag) -> Result<(), ModelError> {
        let remove_above = FieldReader::new(bag).opt_boolean("remove_above")?;
        let input = ElevationInput::from_fields(self, bag)?;
        if let Some(remove) = remove_above {
            self.remove_above = remove;
        }
        self.apply(input);
        Ok(())
    }
}
