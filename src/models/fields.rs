//! Field bags at the GUI boundary.
//!
//! The designer GUI sends edits as loosely typed key/value maps. Values are
//! converted and validated here, once, before anything reaches the model.
//! Numbers may arrive as JSON numbers or as numeric strings typed into line
//! edits; every conversion error names the offending field.

use serde_json::Value;

use super::enums::Tag;
use super::values::{MeshData, Point2, Point3};
use crate::error::ModelError;

/// A named set of field values sent by the GUI for one commit.
pub type FieldBag = serde_json::Map<String, Value>;

/// Typed accessors over a [`FieldBag`].
#[derive(Debug, Clone, Copy)]
pub struct FieldReader<'a> {
    bag: &'a FieldBag,
}

impl<'a> FieldReader<'a> {
    pub fn new(bag: &'a FieldBag) -> Self {
        Self { bag }
    }

    /// Whether `name` is present with a non-null value.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Whether the bag carries anything besides the given keys.
    pub fn has_fields_besides(&self, keys: &[&str]) -> bool {
        self.bag
            .iter()
            .any(|(key, value)| !value.is_null() && !keys.contains(&key.as_str()))
    }

    fn get(&self, name: &str) -> Option<&'a Value> {
        self.bag.get(name).filter(|value| !value.is_null())
    }

    fn require(&self, name: &str) -> Result<&'a Value, ModelError> {
        self.get(name)
            .ok_or_else(|| ModelError::MissingField(name.to_string()))
    }

    pub fn number(&self, name: &str) -> Result<f64, ModelError> {
        to_number(name, self.require(name)?)
    }

    pub fn opt_number(&self, name: &str) -> Result<Option<f64>, ModelError> {
        self.get(name).map(|value| to_number(name, value)).transpose()
    }

    /// A non-negative integer such as an MK or a layer count.
    pub fn count(&self, name: &str) -> Result<u32, ModelError> {
        to_count(name, self.require(name)?)
    }

    pub fn opt_count(&self, name: &str) -> Result<Option<u32>, ModelError> {
        self.get(name).map(|value| to_count(name, value)).transpose()
    }

    pub fn boolean(&self, name: &str) -> Result<bool, ModelError> {
        to_bool(name, self.require(name)?)
    }

    pub fn opt_boolean(&self, name: &str) -> Result<Option<bool>, ModelError> {
        self.get(name).map(|value| to_bool(name, value)).transpose()
    }

    pub fn text(&self, name: &str) -> Result<String, ModelError> {
        match self.require(name)? {
            Value::String(s) => Ok(s.clone()),
            other => Err(ModelError::invalid_field(
                name,
                format!("expected text, got {}", describe(other)),
            )),
        }
    }

    pub fn tag<T: Tag>(&self, name: &str) -> Result<T, ModelError> {
        to_tag(name, self.require(name)?)
    }

    pub fn opt_tag<T: Tag>(&self, name: &str) -> Result<Option<T>, ModelError> {
        self.get(name).map(|value| to_tag(name, value)).transpose()
    }

    /// A 2-D point given as `[x, z]` or `{"x": .., "z": ..}`.
    pub fn point2(&self, name: &str) -> Result<Point2, ModelError> {
        let value = self.require(name)?;
        let coords = coordinates(name, value, &["x", "z"])?;
        Ok(Point2::new(coords[0], coords[1]))
    }

    /// A 3-D point given as `[x, y, z]` or `{"x": .., "y": .., "z": ..}`.
    pub fn point3(&self, name: &str) -> Result<Point3, ModelError> {
        let value = self.require(name)?;
        let coords = coordinates(name, value, &["x", "y", "z"])?;
        Ok(Point3::new(coords[0], coords[1], coords[2]))
    }

    pub fn opt_point3(&self, name: &str) -> Result<Option<Point3>, ModelError> {
        if self.contains(name) {
            self.point3(name).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Mesh data fields. Only `file` is required; anything else the bag
    /// leaves out keeps its value from `current`.
    pub fn mesh_data(&self, current: &MeshData) -> Result<MeshData, ModelError> {
        let file = self.text("file")?;
        if file.trim().is_empty() {
            return Err(ModelError::invalid_field("file", "a mesh data file is required"));
        }

        let mut mesh = current.clone();
        mesh.file = file;
        if let Some(initial_time) = self.opt_number("initial_time")? {
            mesh.initial_time = initial_time;
        }
        if let Some(set_pos) = self.opt_point3("set_pos")? {
            mesh.set_pos = set_pos;
        }
        if let Some(set_vel_mul) = self.opt_point3("set_vel_mul")? {
            mesh.set_vel_mul = set_vel_mul;
        }
        if let Some(set_vel_add) = self.opt_point3("set_vel_add")? {
            mesh.set_vel_add = set_vel_add;
        }
        if let Some(reverse) = self.opt_boolean("reverse")? {
            mesh.reverse = reverse;
        }
        Ok(mesh)
    }

    /// Table rows of exactly `width` numbers each, in the order entered.
    ///
    /// Row errors are reported as `name[i]`.
    pub fn rows(&self, name: &str, width: usize) -> Result<Vec<Vec<f64>>, ModelError> {
        let Value::Array(rows) = self.require(name)? else {
            return Err(ModelError::invalid_field(name, "expected a list of rows"));
        };

        rows.iter()
            .enumerate()
            .map(|(i, row)| {
                let field = format!("{name}[{i}]");
                let Value::Array(cells) = row else {
                    return Err(ModelError::invalid_field(&field, "expected a row of numbers"));
                };
                if cells.len() != width {
                    return Err(ModelError::invalid_field(
                        &field,
                        format!("expected {} columns, got {}", width, cells.len()),
                    ));
                }
                cells
                    .iter()
                    .map(|cell| to_number(&field, cell))
                    .collect::<Result<Vec<f64>, _>>()
            })
            .collect()
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {b}"),
        Value::Number(n) => format!("number {n}"),
        Value::String(s) => format!("text {s:?}"),
        Value::Array(_) => "a list".to_string(),
        Value::Object(_) => "an object".to_string(),
    }
}

fn to_number(field: &str, value: &Value) -> Result<f64, ModelError> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match number {
        Some(n) if n.is_finite() => Ok(n),
        _ => Err(ModelError::invalid_field(
            field,
            format!("expected a finite number, got {}", describe(value)),
        )),
    }
}

fn to_count(field: &str, value: &Value) -> Result<u32, ModelError> {
    let number = to_number(field, value)?;
    if number < 0.0 || number.fract() != 0.0 || number > f64::from(u32::MAX) {
        return Err(ModelError::invalid_field(
            field,
            format!("expected a non-negative integer, got {number}"),
        ));
    }
    Ok(number as u32)
}

fn to_bool(field: &str, value: &Value) -> Result<bool, ModelError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(true),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(false),
        other => Err(ModelError::invalid_field(
            field,
            format!("expected a boolean, got {}", describe(other)),
        )),
    }
}

fn to_tag<T: Tag>(field: &str, value: &Value) -> Result<T, ModelError> {
    let Value::String(s) = value else {
        return Err(ModelError::invalid_field(
            field,
            format!("expected a {} name, got {}", T::KIND, describe(value)),
        ));
    };

    T::from_str(s.trim()).ok_or_else(|| {
        let known: Vec<&str> = T::all().iter().map(|tag| tag.as_str()).collect();
        ModelError::invalid_field(
            field,
            format!("unknown {} {:?} (expected one of: {})", T::KIND, s, known.join(", ")),
        )
    })
}

fn coordinates(field: &str, value: &Value, axes: &[&str]) -> Result<Vec<f64>, ModelError> {
    match value {
        Value::Array(items) if items.len() == axes.len() => items
            .iter()
            .enumerate()
            .map(|(i, item)| to_number(&format!("{field}[{i}]"), item))
            .collect(),
        Value::Object(map) => axes
            .iter()
            .map(|axis| {
                let name = format!("{field}.{axis}");
                match map.get(*axis) {
                    Some(item) => to_number(&name, item),
                    None => Err(ModelError::MissingField(name)),
                }
            })
            .collect(),
        other => Err(ModelError::invalid_field(
            field,
            format!("expected {} coordinates, got {}", axes.len(), describe(other)),
        )),
    }
}
