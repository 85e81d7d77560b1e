use super::{Choice, impl_choice_traits};
use serde::{Deserialize, Serialize};

/// The tetrahedral angle used by every truncated-octahedron cell, in degrees.
pub const TRUNCATED_OCTAHEDRON_ANGLE: f64 = 109.4712190;

/// Boundary used when packing solvent around the solute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoxShape {
    #[default]
    Cuboid,
    TruncatedOctahedron,
    HexagonalPrism,
    RhombicDodecahedron,
    Triclinic,
    Sphere,
}

impl BoxShape {
    /// Cell angles (α, β, γ) the shape imposes, or `None` when they are free
    /// (triclinic) or meaningless (sphere).
    pub fn fixed_angles(&self) -> Option<[f64; 3]> {
        match self {
            BoxShape::Cuboid => Some([90.0, 90.0, 90.0]),
            BoxShape::TruncatedOctahedron => Some([TRUNCATED_OCTAHEDRON_ANGLE; 3]),
            BoxShape::HexagonalPrism => Some([60.0, 90.0, 90.0]),
            BoxShape::RhombicDodecahedron => Some([60.0, 60.0, 90.0]),
            BoxShape::Triclinic | BoxShape::Sphere => None,
        }
    }
}

impl Choice for BoxShape {
    const KIND: &'static str = "box shape";
    const ALL: &'static [Self] = &[
        BoxShape::Cuboid,
        BoxShape::TruncatedOctahedron,
        BoxShape::HexagonalPrism,
        BoxShape::RhombicDodecahedron,
        BoxShape::Triclinic,
        BoxShape::Sphere,
    ];

    fn label(&self) -> &'static str {
        match self {
            BoxShape::Cuboid => "cuboid",
            BoxShape::TruncatedOctahedron => "truncated octahedron",
            BoxShape::HexagonalPrism => "hexagonal prism",
            BoxShape::RhombicDodecahedron => "rhombic dodecahedron",
            BoxShape::Triclinic => "general triclinic",
            BoxShape::Sphere => "sphere",
        }
    }

    fn id(&self) -> &'static str {
        match self {
            BoxShape::Cuboid => "cuboid",
            BoxShape::TruncatedOctahedron => "truncated-octahedron",
            BoxShape::HexagonalPrism => "hexagonal-prism",
            BoxShape::RhombicDodecahedron => "rhombic-dodecahedron",
            BoxShape::Triclinic => "triclinic",
            BoxShape::Sphere => "sphere",
        }
    }
}

impl_choice_traits!(BoxShape);

/// Explicit water model used to fill the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SolventModel {
    #[default]
    Tip3p,
    Tip3pCharmm,
    Tip4p,
    Tip5p,
    SpcE,
}

impl Choice for SolventModel {
    const KIND: &'static str = "solvent model";
    const ALL: &'static [Self] = &[
        SolventModel::Tip3p,
        SolventModel::Tip3pCharmm,
        SolventModel::Tip4p,
        SolventModel::Tip5p,
        SolventModel::SpcE,
    ];

    fn label(&self) -> &'static str {
        match self {
            SolventModel::Tip3p => "TIP3P",
            SolventModel::Tip3pCharmm => "TIP3P-CHARMM",
            SolventModel::Tip4p => "TIP4P",
            SolventModel::Tip5p => "TIP5P",
            SolventModel::SpcE => "SPC/E",
        }
    }

    fn id(&self) -> &'static str {
        match self {
            SolventModel::Tip3p => "tip3p",
            SolventModel::Tip3pCharmm => "tip3p-charmm",
            SolventModel::Tip4p => "tip4p",
            SolventModel::Tip5p => "tip5p",
            SolventModel::SpcE => "spc-e",
        }
    }
}

impl_choice_traits!(SolventModel);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn periodic_shapes_fix_their_angles() {
        assert_eq!(BoxShape::Cuboid.fixed_angles(), Some([90.0; 3]));
        assert_eq!(
            BoxShape::TruncatedOctahedron.fixed_angles(),
            Some([109.4712190; 3])
        );
        assert_eq!(
            BoxShape::HexagonalPrism.fixed_angles(),
            Some([60.0, 90.0, 90.0])
        );
        assert_eq!(
            BoxShape::RhombicDodecahedron.fixed_angles(),
            Some([60.0, 60.0, 90.0])
        );
    }

    #[test]
    fn triclinic_and_sphere_have_no_fixed_angles() {
        assert!(BoxShape::Triclinic.fixed_angles().is_none());
        assert!(BoxShape::Sphere.fixed_angles().is_none());
    }

    #[test]
    fn shapes_parse_from_labels() {
        assert_eq!(
            "general triclinic".parse::<BoxShape>().unwrap(),
            BoxShape::Triclinic
        );
        assert_eq!(
            "rhombic-dodecahedron".parse::<BoxShape>().unwrap(),
            BoxShape::RhombicDodecahedron
        );
        assert!("cube".parse::<BoxShape>().is_err());
    }

    #[test]
    fn solvent_labels_round_trip_through_display() {
        for model in SolventModel::ALL {
            assert_eq!(model.to_string().parse::<SolventModel>().unwrap(), *model);
        }
        assert_eq!("SPC/E".parse::<SolventModel>().unwrap(), SolventModel::SpcE);
    }
}
