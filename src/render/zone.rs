use super::elevation::render_elevation;
use super::shape::render_generator;
use super::velocity::render_velocity;
use super::xml::{num, XmlNode};
use crate::error::{RenderAxis, RenderError};
use crate::models::{DensityInfo, DensityMode, InletOutletZone, InputTreatment, RefillingMode};

fn refilling_code(mode: RefillingMode) -> u8 {
    match mode {
        RefillingMode::SimpleFull => 0,
        RefillingMode::SimpleBelowZsurf => 1,
        RefillingMode::Advanced => 2,
    }
}

fn input_treatment_code(treatment: InputTreatment) -> u8 {
    match treatment {
        InputTreatment::NoChanges => 0,
        InputTreatment::ConvertFluid => 1,
        InputTreatment::RemoveFluid => 2,
    }
}

fn render_density(density: &DensityInfo) -> XmlNode {
    let (code, value) = match density.mode() {
        DensityMode::Fixed => (0, Some(density.value())),
        DensityMode::Hydrostatic => (1, None),
        DensityMode::Extrapolated => (2, None),
    };
    let elem = XmlNode::new("imposerhop").attr("mode", code);
    match value {
        Some(value) => elem.child(XmlNode::value("rhop", num(value))),
        None => elem,
    }
}

/// One `inoutzone` element.
pub fn render_zone(zone: &InletOutletZone) -> Result<XmlNode, RenderError> {
    zone.zone_info()
        .check()
        .map_err(|err| RenderError::Inconsistent {
            zone_id: zone.id,
            axis: RenderAxis::Shape,
            detail: err.to_string(),
        })?;
    let velocity =
        render_velocity(zone.velocity(), zone.shape()).map_err(|detail| {
            RenderError::Inconsistent {
                zone_id: zone.id,
                axis: RenderAxis::Velocity,
                detail,
            }
        })?;

    let mut elem = XmlNode::new("inoutzone")
        .child(XmlNode::value("refilling", refilling_code(zone.refilling)))
        .child(XmlNode::value(
            "inputtreatment",
            input_treatment_code(zone.input_treatment),
        ))
        .child(XmlNode::value("layers", zone.layers()))
        .child(render_generator(zone.zone_info().generator()))
        .child(velocity)
        .child(render_density(zone.density()));
    if let Some(elevation) = render_elevation(zone.elevation()) {
        elem.push(elevation);
    }
    Ok(elem)
}
