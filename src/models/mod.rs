//! Inlet/Outlet configuration model.
//!
//! # Structure
//!
//! - [`InletOutletConfig`]: global tuning plus an ordered list of zones. The
//!   order of zones is the export order.
//! - [`InletOutletZone`]: one zone, made of four independent axes:
//!   - [`ZoneInfo`]: the particle generator ([`ZoneGenerator`]) and its
//!     direction and rotation
//!   - [`VelocityInfo`]: imposed velocity, a two-level tag
//!   - [`DensityInfo`]: imposed density
//!   - [`ElevationInfo`]: optional free-surface elevation
//!
//! # Editing
//!
//! The GUI sends edits as [`FieldBag`]s. Each `save_*` operation converts its
//! bag into a typed input for the variant currently selected and writes it
//! there, or rejects the whole edit with a [`ModelError`](crate::error::ModelError).
//! Switching a tag never clears the payloads of the other variants.

mod config;
mod density;
mod elevation;
mod enums;
mod fields;
mod values;
mod velocity;
mod zone;
mod zone_info;

pub use config::*;
pub use density::*;
pub use elevation::*;
pub use enums::*;
pub use fields::*;
pub use values::*;
pub use velocity::*;
pub use zone::*;
pub use zone_info::*;
