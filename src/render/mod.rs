//! XML export of the Inlet/Outlet configuration for GenCase.
//!
//! Rendering builds an [`XmlNode`] tree from an immutable borrow of the
//! configuration and serializes it. It never changes the model, so rendering
//! the same configuration twice yields identical text.
//!
//! Example output for a single default box zone:
//! ```text
//! <inout>
//!     <memoryresize size0="2" size="4"/>
//!     <useboxlimit value="true"/>
//!     <determlimit value="1000"/>
//!     <extrapolatemode value="1"/>
//!     <refillingrate value="1"/>
//!     <inoutzone>
//!         <refilling value="0"/>
//!         <inputtreatment value="0"/>
//!         <layers value="4"/>
//!         <zone3d>
//!             <boxfluid mkfluid="0" direction="left">
//!                 <point x="0" y="0" z="0"/>
//!                 <size x="1" y="1" z="1"/>
//!             </boxfluid>
//!         </zone3d>
//!         <imposevelocity mode="0">
//!             <velocity v="0"/>
//!         </imposevelocity>
//!         <imposerhop mode="0">
//!             <rhop value="1000"/>
//!         </imposerhop>
//!     </inoutzone>
//! </inout>
//! ```

mod elevation;
mod shape;
mod velocity;
pub mod xml;
mod zone;

pub use xml::XmlNode;

use crate::error::{RenderAxis, RenderError};
use crate::models::{ExtrapolationMode, InletOutletConfig};
use xml::num;

fn extrapolation_code(mode: ExtrapolationMode) -> u8 {
    match mode {
        ExtrapolationMode::FastSingle => 1,
        ExtrapolationMode::Single => 2,
        ExtrapolationMode::Double => 3,
    }
}

/// Builds the `inout` element tree.
pub fn render_tree(config: &InletOutletConfig) -> Result<XmlNode, RenderError> {
    let box_limit = match config.box_limit.free_center {
        Some(center) => XmlNode::value("useboxlimit", config.box_limit.enabled)
            .child(shape::point3("freecentre", &center)),
        None => XmlNode::value("useboxlimit", config.box_limit.enabled),
    };

    let mut root = XmlNode::new("inout")
        .child(
            XmlNode::new("memoryresize")
                .attr("size0", num(config.memory_resize.size0))
                .attr("size", num(config.memory_resize.size)),
        )
        .child(box_limit)
        .child(XmlNode::value("determlimit", num(config.determ_limit)))
        .child(XmlNode::value(
            "extrapolatemode",
            extrapolation_code(config.extrapolation_mode),
        ))
        .child(XmlNode::value("refillingrate", config.refilling_rate));

    let dimension = config.dimension();
    for zone in config.zones() {
        let zone_dimension = zone.shape().dimension();
        if Some(zone_dimension) != dimension {
            return Err(RenderError::Inconsistent {
                zone_id: zone.id,
                axis: RenderAxis::Shape,
                detail: format!(
                    "{} zone in a case whose first zone is {}",
                    zone_dimension,
                    dimension.map(|d| d.as_str()).unwrap_or("absent")
                ),
            });
        }
        tracing::debug!(zone_id = %zone.id, shape = %zone.shape(), "Rendering inout zone");
        root.push(zone::render_zone(zone)?);
    }

    Ok(root)
}

/// Renders the configuration as the `inout` section of a GenCase XML file.
pub fn render(config: &InletOutletConfig) -> Result<String, RenderError> {
    let root = render_tree(config)?;
    Ok(xml::to_string(&root)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ZoneShape;

    #[test]
    fn empty_config_renders_globals_only() {
        let xml = render(&InletOutletConfig::default()).unwrap();
        assert_eq!(
            xml,
            "<inout>\n    <memoryresize size0=\"2\" size=\"4\"/>\n    <useboxlimit value=\"true\"/>\n    <determlimit value=\"1000\"/>\n    <extrapolatemode value=\"1\"/>\n    <refillingrate value=\"1\"/>\n</inout>"
        );
    }

    #[test]
    fn free_centre_nests_in_box_limit() {
        let mut config = InletOutletConfig::default();
        config.box_limit.free_center = Some(crate::models::Point3::new(0.5, 0.0, 1.0));
        let root = render_tree(&config).unwrap();
        let box_limit = &root.children[1];
        assert_eq!(box_limit.children[0].name, "freecentre");
        assert_eq!(box_limit.children[0].get_attr("x"), Some("0.5"));
    }

    #[test]
    fn rendering_is_idempotent() {
        let mut config = InletOutletConfig::default();
        config.add_zone(ZoneShape::Circle).unwrap();
        config.add_zone(ZoneShape::Box).unwrap();
        assert_eq!(render(&config).unwrap(), render(&config).unwrap());
    }
}
