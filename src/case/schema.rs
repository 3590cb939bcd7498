//! Versioned migration of persisted case documents.
//!
//! Each step is a total function on the raw JSON document. Steps run in order
//! for every version above the document's own, so a document from any older
//! release loads with all fields the current model expects.

use anyhow::{bail, Result};
use serde_json::{json, Map, Value};

use crate::models::{
    ExtrapolationMode, InputTreatment, RefillingMode, DEFAULT_DETERM_LIMIT, DEFAULT_LAYERS,
    DEFAULT_REFILLING_RATE,
};

struct Migration {
    version: u32,
    name: &'static str,
    apply: fn(&mut Map<String, Value>),
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "initial",
        apply: initial,
    },
    Migration {
        version: 2,
        name: "moordynplus_rename",
        apply: moordynplus_rename,
    },
    Migration {
        version: 3,
        name: "inout_global_tuning",
        apply: inout_global_tuning,
    },
    Migration {
        version: 4,
        name: "zone_input_treatment",
        apply: zone_input_treatment,
    },
];

/// Version written by this release.
pub const CURRENT_VERSION: u32 = 4;

/// Brings `doc` up to [`CURRENT_VERSION`] in place and returns the number of
/// steps applied.
pub fn run_migrations(doc: &mut Value) -> Result<usize> {
    let Some(obj) = doc.as_object_mut() else {
        bail!("Case document must be a JSON object");
    };

    let version = match obj.get("version") {
        None | Some(Value::Null) => {
            tracing::info!("Detected unversioned case document, migrating from baseline");
            0
        }
        Some(value) => match value.as_u64().and_then(|v| u32::try_from(v).ok()) {
            Some(version) => version,
            None => bail!("Case document has an invalid version: {}", value),
        },
    };

    if version > CURRENT_VERSION {
        bail!(
            "Case document version {} is newer than the supported version {}",
            version,
            CURRENT_VERSION
        );
    }

    let mut applied = 0;
    for migration in MIGRATIONS.iter().filter(|m| m.version > version) {
        tracing::info!(
            "Applying migration {:03}: {}",
            migration.version,
            migration.name
        );
        (migration.apply)(obj);
        obj.insert("version".to_string(), json!(migration.version));
        applied += 1;
    }

    if applied > 0 {
        tracing::info!("Case document migrated to version {}", CURRENT_VERSION);
    }
    Ok(applied)
}

fn object_entry<'a>(
    obj: &'a mut Map<String, Value>,
    key: &str,
) -> Option<&'a mut Map<String, Value>> {
    let entry = obj.entry(key).or_insert_with(|| json!({}));
    if !entry.is_object() {
        *entry = json!({});
    }
    entry.as_object_mut()
}

fn backfill(obj: &mut Map<String, Value>, key: &str, value: Value) {
    match obj.get(key) {
        None | Some(Value::Null) => {
            obj.insert(key.to_string(), value);
        }
        Some(_) => {}
    }
}

fn initial(doc: &mut Map<String, Value>) {
    backfill(doc, "name", json!(""));
    if let Some(inout) = object_entry(doc, "inout") {
        backfill(inout, "zones", json!([]));
    }
}

fn moordynplus_rename(doc: &mut Map<String, Value>) {
    if let Some(legacy) = doc.remove("moordyn_xml") {
        backfill(doc, "moordynplus_xml", legacy);
    }
}

/// Legacy `[x, y, z]` points become `{x, y, z}` objects.
fn point_object(value: Value) -> Value {
    match value {
        Value::Array(items) if items.len() == 3 => {
            json!({ "x": items[0], "y": items[1], "z": items[2] })
        }
        other => other,
    }
}

fn inout_global_tuning(doc: &mut Map<String, Value>) {
    let Some(inout) = object_entry(doc, "inout") else {
        return;
    };

    let legacy_enabled = inout.remove("useboxlimit").and_then(|v| v.as_bool());
    let legacy_center = inout
        .remove("freecentre")
        .filter(|v| !v.is_null())
        .map(point_object);
    backfill(
        inout,
        "box_limit",
        json!({
            "enabled": legacy_enabled.unwrap_or(true),
            "free_center": legacy_center,
        }),
    );

    let legacy_mode = inout
        .remove("extrapolatemode")
        .and_then(|v| v.as_u64())
        .map(|code| match code {
            2 => ExtrapolationMode::Single,
            3 => ExtrapolationMode::Double,
            _ => ExtrapolationMode::FastSingle,
        })
        .unwrap_or_default();
    backfill(inout, "extrapolation_mode", json!(legacy_mode.as_str()));

    backfill(inout, "determ_limit", json!(DEFAULT_DETERM_LIMIT));
    backfill(inout, "refilling_rate", json!(DEFAULT_REFILLING_RATE));
    backfill(inout, "memory_resize", json!({ "size0": 2.0, "size": 4.0 }));
}

fn zone_input_treatment(doc: &mut Map<String, Value>) {
    let zones = object_entry(doc, "inout").and_then(|inout| inout.get_mut("zones"));
    let Some(Value::Array(zones)) = zones else {
        return;
    };

    for zone in zones.iter_mut().filter_map(Value::as_object_mut) {
        if let Some(convert) = zone.remove("convertfluid").and_then(|v| v.as_bool()) {
            let treatment = if convert {
                InputTreatment::ConvertFluid
            } else {
                InputTreatment::NoChanges
            };
            backfill(zone, "input_treatment", json!(treatment.as_str()));
        }
        backfill(zone, "input_treatment", json!(InputTreatment::NoChanges.as_str()));
        backfill(zone, "refilling", json!(RefillingMode::SimpleFull.as_str()));
        backfill(zone, "layers", json!(DEFAULT_LAYERS));
        backfill(zone, "proxy", Value::Null);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unversioned_document_runs_every_step() {
        let mut doc = json!({ "name": "dam" });
        assert_eq!(run_migrations(&mut doc).unwrap(), MIGRATIONS.len());
        assert_eq!(doc["version"], json!(CURRENT_VERSION));
        assert_eq!(doc["inout"]["zones"], json!([]));
        assert_eq!(doc["inout"]["box_limit"]["enabled"], json!(true));
    }

    #[test]
    fn migrations_are_idempotent() {
        let mut doc = json!({ "name": "dam" });
        run_migrations(&mut doc).unwrap();
        let once = doc.clone();
        assert_eq!(run_migrations(&mut doc).unwrap(), 0);
        assert_eq!(doc, once);
    }

    #[test]
    fn moordyn_field_is_renamed() {
        let mut doc = json!({ "version": 1, "moordyn_xml": "<moordyn/>", "inout": { "zones": [] } });
        run_migrations(&mut doc).unwrap();
        assert_eq!(doc["moordynplus_xml"], json!("<moordyn/>"));
        assert!(doc.get("moordyn_xml").is_none());
    }

    #[test]
    fn newer_field_wins_over_legacy_one() {
        let mut doc = json!({
            "version": 1,
            "moordyn_xml": "<old/>",
            "moordynplus_xml": "<new/>",
            "inout": { "zones": [] },
        });
        run_migrations(&mut doc).unwrap();
        assert_eq!(doc["moordynplus_xml"], json!("<new/>"));
        assert!(doc.get("moordyn_xml").is_none());
    }

    #[test]
    fn legacy_globals_are_restructured() {
        let mut doc = json!({
            "version": 2,
            "inout": {
                "zones": [],
                "useboxlimit": false,
                "freecentre": [1.0, 2.0, 3.0],
                "extrapolatemode": 3,
            },
        });
        run_migrations(&mut doc).unwrap();
        let inout = &doc["inout"];
        assert_eq!(
            inout["box_limit"],
            json!({ "enabled": false, "free_center": { "x": 1.0, "y": 2.0, "z": 3.0 } })
        );
        assert_eq!(inout["extrapolation_mode"], json!("double"));
        assert_eq!(inout["determ_limit"], json!(1000.0));
        assert!(inout.get("useboxlimit").is_none());
    }

    #[test]
    fn convertfluid_becomes_input_treatment() {
        let mut doc = json!({
            "version": 3,
            "inout": { "zones": [{ "convertfluid": true }, {}] },
        });
        run_migrations(&mut doc).unwrap();
        let zones = &doc["inout"]["zones"];
        assert_eq!(zones[0]["input_treatment"], json!("convert_fluid"));
        assert_eq!(zones[1]["input_treatment"], json!("no_changes"));
        assert_eq!(zones[1]["layers"], json!(4));
        assert!(zones[0].get("convertfluid").is_none());
    }

    #[test]
    fn future_versions_are_rejected() {
        let mut doc = json!({ "version": CURRENT_VERSION + 1 });
        assert!(run_migrations(&mut doc).is_err());
    }
}
