use serde::{Deserialize, Serialize};

use super::enums::{FixedVelocitySpec, VariableVelocitySpec, VelocityMode, ZoneShape};
use super::fields::{FieldBag, FieldReader};
use super::values::{
    FileSource, JetCircle, LinearFileSource, LinearTimeValue, LinearVelocity, MeshData,
    ParabolicFileSource, ParabolicTimeValue, ParabolicVelocity, TimeValue,
};
use crate::error::ModelError;

/// Payload slots for [`VelocityMode::Fixed`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedVelocity {
    spec: FixedVelocitySpec,
    pub constant: f64,
    pub linear: LinearVelocity,
    pub parabolic: ParabolicVelocity,
    pub jet_circle: JetCircle,
}

impl FixedVelocity {
    pub fn spec(&self) -> FixedVelocitySpec {
        self.spec
    }
}

impl Default for FixedVelocity {
    fn default() -> Self {
        Self {
            spec: FixedVelocitySpec::Constant,
            constant: 0.0,
            linear: LinearVelocity::default(),
            parabolic: ParabolicVelocity::default(),
            jet_circle: JetCircle::default(),
        }
    }
}

/// Payload slots for [`VelocityMode::Variable`]. Series keep the order in
/// which rows were entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableVelocity {
    spec: VariableVelocitySpec,
    pub uniform_series: Vec<TimeValue>,
    pub linear_series: Vec<LinearTimeValue>,
    pub parabolic_series: Vec<ParabolicTimeValue>,
    pub uniform_file: FileSource,
    pub linear_file: LinearFileSource,
    pub parabolic_file: ParabolicFileSource,
}

impl VariableVelocity {
    pub fn spec(&self) -> VariableVelocitySpec {
        self.spec
    }
}

impl Default for VariableVelocity {
    fn default() -> Self {
        Self {
            spec: VariableVelocitySpec::UniformSeries,
            uniform_series: Vec::new(),
            linear_series: Vec::new(),
            parabolic_series: Vec::new(),
            uniform_file: FileSource::default(),
            linear_file: LinearFileSource::default(),
            parabolic_file: ParabolicFileSource::default(),
        }
    }
}

/// Typed payload for one velocity variant.
#[derive(Debug, Clone, PartialEq)]
pub enum VelocityInput {
    Constant(f64),
    Linear(LinearVelocity),
    Parabolic(ParabolicVelocity),
    JetCircle(JetCircle),
    UniformSeries(Vec<TimeValue>),
    LinearSeries(Vec<LinearTimeValue>),
    ParabolicSeries(Vec<ParabolicTimeValue>),
    UniformFile(FileSource),
    LinearFile(LinearFileSource),
    ParabolicFile(ParabolicFileSource),
    Interpolated(MeshData),
}

impl VelocityInput {
    /// Reads the fields of the variant currently selected in `info`.
    ///
    /// Returns `None` for [`VelocityMode::Extrapolated`], which has no fields.
    ///
    /// Series rows are `[time, v]`, `[time, v1, v2, z1, z2]` and
    /// `[time, v1, v2, v3, z1, z2, z3]` under the `values` key.
    pub fn from_fields(info: &VelocityInfo, bag: &FieldBag) -> Result<Option<Self>, ModelError> {
        let fields = FieldReader::new(bag);
        let input = match info.mode {
            VelocityMode::Extrapolated => return Ok(None),
            VelocityMode::Interpolated => Self::Interpolated(fields.mesh_data(&info.interpolated)?),
            VelocityMode::Fixed => match info.fixed.spec {
                FixedVelocitySpec::Constant => Self::Constant(fields.number("v")?),
                FixedVelocitySpec::Linear => Self::Linear(LinearVelocity {
                    v1: fields.number("v1")?,
                    v2: fields.number("v2")?,
                    z1: fields.number("z1")?,
                    z2: fields.number("z2")?,
                }),
                FixedVelocitySpec::Parabolic => Self::Parabolic(ParabolicVelocity {
                    v1: fields.number("v1")?,
                    v2: fields.number("v2")?,
                    v3: fields.number("v3")?,
                    z1: fields.number("z1")?,
                    z2: fields.number("z2")?,
                    z3: fields.number("z3")?,
                }),
                FixedVelocitySpec::JetCircle => {
                    let distance = fields.number("distance")?;
                    if distance < 0.0 {
                        return Err(ModelError::invalid_field("distance", "cannot be negative"));
                    }
                    Self::JetCircle(JetCircle {
                        velocity: fields.number("v")?,
                        distance,
                    })
                }
            },
            VelocityMode::Variable => match info.variable.spec {
                VariableVelocitySpec::UniformSeries => Self::UniformSeries(
                    series(&fields, 2)?
                        .into_iter()
                        .map(|row| TimeValue::new(row[0], row[1]))
                        .collect(),
                ),
                VariableVelocitySpec::LinearSeries => Self::LinearSeries(
                    series(&fields, 5)?
                        .into_iter()
                        .map(|row| LinearTimeValue {
                            time: row[0],
                            profile: LinearVelocity {
                                v1: row[1],
                                v2: row[2],
                                z1: row[3],
                                z2: row[4],
                            },
                        })
                        .collect(),
                ),
                VariableVelocitySpec::ParabolicSeries => Self::ParabolicSeries(
                    series(&fields, 7)?
                        .into_iter()
                        .map(|row| ParabolicTimeValue {
                            time: row[0],
                            profile: ParabolicVelocity {
                                v1: row[1],
                                v2: row[2],
                                v3: row[3],
                                z1: row[4],
                                z2: row[5],
                                z3: row[6],
                            },
                        })
                        .collect(),
                ),
                VariableVelocitySpec::UniformFile => Self::UniformFile(FileSource {
                    path: file_path(&fields)?,
                }),
                VariableVelocitySpec::LinearFile => Self::LinearFile(LinearFileSource {
                    path: file_path(&fields)?,
                    z1: fields.number("z1")?,
                    z2: fields.number("z2")?,
                }),
                VariableVelocitySpec::ParabolicFile => Self::ParabolicFile(ParabolicFileSource {
                    path: file_path(&fields)?,
                    z1: fields.number("z1")?,
                    z2: fields.number("z2")?,
                    z3: fields.number("z3")?,
                }),
            },
        };
        Ok(Some(input))
    }
}

/// Rows under `values` with non-negative times, in the order entered.
fn series(fields: &FieldReader<'_>, width: usize) -> Result<Vec<Vec<f64>>, ModelError> {
    let rows = fields.rows("values", width)?;
    if let Some(i) = rows.iter().position(|row| row[0] < 0.0) {
        return Err(ModelError::invalid_field(
            format!("values[{i}]"),
            "time cannot be negative",
        ));
    }
    Ok(rows)
}

fn file_path(fields: &FieldReader<'_>) -> Result<String, ModelError> {
    let path = fields.text("file")?;
    if path.trim().is_empty() {
        return Err(ModelError::invalid_field("file", "a file path is required"));
    }
    Ok(path)
}

/// Velocity imposed on a zone.
///
/// Every variant keeps its own payload. Switching the mode or spec never
/// clears the others, so flipping between GUI tabs loses nothing; only the
/// current selection is exported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VelocityInfo {
    mode: VelocityMode,
    fixed: FixedVelocity,
    variable: VariableVelocity,
    interpolated: MeshData,
}

impl VelocityInfo {
    pub fn mode(&self) -> VelocityMode {
        self.mode
    }

    pub fn fixed(&self) -> &FixedVelocity {
        &self.fixed
    }

    pub fn variable(&self) -> &VariableVelocity {
        &self.variable
    }

    pub fn interpolated(&self) -> &MeshData {
        &self.interpolated
    }

    pub fn select_mode(&mut self, mode: VelocityMode) {
        self.mode = mode;
    }

    /// Selects the fixed profile. `JetCircle` needs a circle zone.
    pub fn select_fixed_spec(
        &mut self,
        spec: FixedVelocitySpec,
        shape: ZoneShape,
    ) -> Result<(), ModelError> {
        if spec == FixedVelocitySpec::JetCircle && shape != ZoneShape::Circle {
            return Err(ModelError::IncompatibleVariant(format!(
                "jet_circle velocity requires a circle zone, this zone is {shape}"
            )));
        }
        self.fixed.spec = spec;
        Ok(())
    }

    pub fn select_variable_spec(&mut self, spec: VariableVelocitySpec) {
        self.variable.spec = spec;
    }

    /// Falls back to a constant profile when the zone stops being a circle.
    pub(crate) fn release_jet_circle(&mut self, shape: ZoneShape) {
        if shape != ZoneShape::Circle && self.fixed.spec == FixedVelocitySpec::JetCircle {
            self.fixed.spec = FixedVelocitySpec::Constant;
        }
    }

    /// Writes `input` into its own variant slot, whether or not that variant
    /// is selected.
    pub fn apply(&mut self, input: VelocityInput) {
        match input {
            VelocityInput::Constant(v) => self.fixed.constant = v,
            VelocityInput::Linear(profile) => self.fixed.linear = profile,
            VelocityInput::Parabolic(profile) => self.fixed.parabolic = profile,
            VelocityInput::JetCircle(jet) => self.fixed.jet_circle = jet,
            VelocityInput::UniformSeries(rows) => self.variable.uniform_series = rows,
            VelocityInput::LinearSeries(rows) => self.variable.linear_series = rows,
            VelocityInput::ParabolicSeries(rows) => self.variable.parabolic_series = rows,
            VelocityInput::UniformFile(file) => self.variable.uniform_file = file,
            VelocityInput::LinearFile(file) => self.variable.linear_file = file,
            VelocityInput::ParabolicFile(file) => self.variable.parabolic_file = file,
            VelocityInput::Interpolated(mesh) => self.interpolated = mesh,
        }
    }

    /// Commits GUI fields into the currently selected variant.
    pub fn commit(&mut self, bag: &FieldBag) -> Result<(), ModelError> {
        if let Some(input) = VelocityInput::from_fields(self, bag)? {
            self.apply(input);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bag(value: serde_json::Value) -> FieldBag {
        value.as_object().cloned().expect("object")
    }

    #[test]
    fn jet_circle_needs_circle_zone() {
        let mut velocity = VelocityInfo::default();
        let err = velocity
            .select_fixed_spec(FixedVelocitySpec::JetCircle, ZoneShape::Box)
            .unwrap_err();
        assert!(matches!(err, ModelError::IncompatibleVariant(_)));
        assert_eq!(velocity.fixed().spec(), FixedVelocitySpec::Constant);

        velocity
            .select_fixed_spec(FixedVelocitySpec::JetCircle, ZoneShape::Circle)
            .unwrap();
        assert_eq!(velocity.fixed().spec(), FixedVelocitySpec::JetCircle);
    }

    #[test]
    fn switching_spec_keeps_other_payloads() {
        let mut velocity = VelocityInfo::default();
        velocity.commit(&bag(json!({ "v": 1.5 }))).unwrap();

        velocity
            .select_fixed_spec(FixedVelocitySpec::Linear, ZoneShape::Box)
            .unwrap();
        velocity
            .commit(&bag(json!({ "v1": 1, "v2": 2, "z1": 0, "z2": 1 })))
            .unwrap();

        velocity
            .select_fixed_spec(FixedVelocitySpec::Constant, ZoneShape::Box)
            .unwrap();
        assert_eq!(velocity.fixed().constant, 1.5);
        assert_eq!(velocity.fixed().linear.v2, 2.0);
    }

    #[test]
    fn series_keep_entry_order() {
        let mut velocity = VelocityInfo::default();
        velocity.select_mode(VelocityMode::Variable);
        velocity
            .commit(&bag(json!({ "values": [[0.0, 1.0], [5.0, 2.0], [2.0, 1.5]] })))
            .unwrap();

        let times: Vec<f64> = velocity
            .variable()
            .uniform_series
            .iter()
            .map(|row| row.time)
            .collect();
        assert_eq!(times, vec![0.0, 5.0, 2.0]);
    }

    #[test]
    fn negative_series_time_is_rejected() {
        let mut velocity = VelocityInfo::default();
        velocity.select_mode(VelocityMode::Variable);
        let err = velocity
            .commit(&bag(json!({ "values": [[0.0, 1.0], [-1.0, 2.0]] })))
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidField { ref field, .. } if field == "values[1]"));
    }

    #[test]
    fn extrapolated_commit_is_a_no_op() {
        let mut velocity = VelocityInfo::default();
        velocity.select_mode(VelocityMode::Extrapolated);
        velocity.commit(&bag(json!({ "v": "not a number" }))).unwrap();
        assert_eq!(velocity.fixed().constant, 0.0);
    }

    #[test]
    fn leaving_circle_releases_jet_circle() {
        let mut velocity = VelocityInfo::default();
        velocity
            .select_fixed_spec(FixedVelocitySpec::JetCircle, ZoneShape::Circle)
            .unwrap();
        velocity.release_jet_circle(ZoneShape::Box);
        assert_eq!(velocity.fixed().spec(), FixedVelocitySpec::Constant);
    }
}
