//! Which solvation-box fields a form exposes for each shape, and how the
//! filled-in form resolves to a concrete boundary.
//!
//! [`field_states`] is the whole rule table. A front-end renders the returned
//! [`BoxFieldStates`] and never encodes the rules itself.

use super::config::SolvationConfig;
use super::error::ValidationError;
use crate::core::library::SolvationExtent;
use crate::core::models::geometry::BoxGeometry;
use crate::core::models::solvent::BoxShape;
use nalgebra::Vector3;

pub const MIN_BOX_VALUE: f64 = 0.1;

const AXES: [char; 3] = ['a', 'b', 'c'];
const ANGLES: [char; 3] = ['α', 'β', 'γ'];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldState {
    /// The user types the value; `default` is what the field starts with.
    Editable { default: Option<f64> },
    /// Shown but locked to a value dictated by the shape.
    Fixed(f64),
    /// Not used by the shape.
    Disabled,
}

impl FieldState {
    pub fn is_editable(&self) -> bool {
        matches!(self, FieldState::Editable { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxFieldStates {
    pub shape: BoxShape,
    pub center: [FieldState; 3],
    pub lengths: [FieldState; 3],
    pub angles: [FieldState; 3],
    /// Whether the user may switch padding on or off.
    pub padding_toggle_enabled: bool,
    /// Padding is off regardless of what the form held.
    pub padding_forced_off: bool,
    pub padding_entry_editable: bool,
}

/// Field states for `shape` given the current padding switch.
pub fn field_states(shape: BoxShape, use_padding: bool) -> BoxFieldStates {
    let center = [FieldState::Editable { default: Some(0.0) }; 3];
    let empty = FieldState::Editable { default: None };

    match shape {
        BoxShape::Triclinic => BoxFieldStates {
            shape,
            center,
            lengths: [empty; 3],
            angles: [empty; 3],
            padding_toggle_enabled: false,
            padding_forced_off: true,
            padding_entry_editable: false,
        },
        BoxShape::Sphere => BoxFieldStates {
            shape,
            center,
            lengths: [FieldState::Disabled; 3],
            angles: [FieldState::Disabled; 3],
            padding_toggle_enabled: true,
            padding_forced_off: false,
            padding_entry_editable: use_padding,
        },
        _ => {
            let lengths = if use_padding {
                [FieldState::Disabled; 3]
            } else {
                [empty; 3]
            };
            let angles = shape
                .fixed_angles()
                .map(|a| a.map(FieldState::Fixed))
                .unwrap_or([FieldState::Disabled; 3]);
            BoxFieldStates {
                shape,
                center,
                lengths,
                angles,
                padding_toggle_enabled: true,
                padding_forced_off: false,
                padding_entry_editable: use_padding,
            }
        }
    }
}

impl BoxFieldStates {
    /// Writes the policy into the form: fixed angles are set, disabled fields
    /// cleared and padding switched off where the shape forbids it. Editable
    /// fields keep whatever the user typed.
    pub fn apply(&self, form: &mut SolvationConfig) {
        form.shape = self.shape;
        if self.padding_forced_off {
            form.use_padding = false;
        }
        for (value, state) in form.lengths.iter_mut().zip(self.lengths) {
            apply_field(value, state);
        }
        for (value, state) in form.angles.iter_mut().zip(self.angles) {
            apply_field(value, state);
        }
    }
}

fn apply_field(value: &mut Option<f64>, state: FieldState) {
    match state {
        FieldState::Fixed(v) => *value = Some(v),
        FieldState::Disabled => *value = None,
        FieldState::Editable { .. } => {}
    }
}

/// Switches the form to `shape` and applies its policy.
pub fn select_shape(form: &mut SolvationConfig, shape: BoxShape) {
    if shape == BoxShape::Triclinic {
        form.use_padding = false;
        form.lengths = [None; 3];
        form.angles = [None; 3];
    }
    field_states(shape, form.use_padding).apply(form);
}

fn explicit_lengths(form: &SolvationConfig) -> Result<[f64; 3], ValidationError> {
    let mut lengths = [0.0; 3];
    for (i, value) in form.lengths.iter().enumerate() {
        let value = value.ok_or(ValidationError::MissingBoxLength(AXES[i]))?;
        if value < MIN_BOX_VALUE {
            return Err(ValidationError::OutOfRange {
                field: "box length",
                value,
                min: MIN_BOX_VALUE,
            });
        }
        lengths[i] = value;
    }
    Ok(lengths)
}

fn cell_angles(form: &SolvationConfig) -> Result<[f64; 3], ValidationError> {
    if let Some(fixed) = form.shape.fixed_angles() {
        return Ok(fixed);
    }
    let mut angles = [0.0; 3];
    for (i, value) in form.angles.iter().enumerate() {
        let value = value.ok_or(ValidationError::MissingBoxAngle(ANGLES[i]))?;
        if value < MIN_BOX_VALUE {
            return Err(ValidationError::OutOfRange {
                field: "box angle",
                value,
                min: MIN_BOX_VALUE,
            });
        }
        angles[i] = value;
    }
    Ok(angles)
}

/// The extent handed to a solvation routine: the padding when it is in
/// effect, otherwise the explicit edge lengths.
pub fn solvation_extent(form: &SolvationConfig) -> Result<SolvationExtent, ValidationError> {
    if form.padding_in_effect() {
        Ok(SolvationExtent::Padding(form.padding))
    } else {
        explicit_lengths(form).map(SolvationExtent::Lengths)
    }
}

/// The boundary described by the form, as far as it can be known before
/// solvating. Padded cells depend on the solute and cannot be resolved.
pub fn resolve_geometry(form: &SolvationConfig) -> Result<BoxGeometry, ValidationError> {
    let center = Vector3::from(form.center);

    if form.shape == BoxShape::Sphere {
        if !form.use_padding {
            return Err(ValidationError::SpherePaddingRequired);
        }
        return Ok(BoxGeometry::Sphere {
            center,
            radius: form.padding,
        });
    }

    if form.padding_in_effect() {
        return Err(ValidationError::UnresolvedBox);
    }

    let geometry = BoxGeometry::Cell {
        center,
        lengths: explicit_lengths(form)?,
        angles: cell_angles(form)?,
    };
    geometry
        .cell_vectors()
        .map(|_| geometry.clone())
        .ok_or(ValidationError::DegenerateBox)
}
