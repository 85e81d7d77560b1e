use super::{Choice, impl_choice_traits};
use phf::{Map, phf_map};
use serde::{Deserialize, Serialize};

/// Display name of an ion species to the residue code the setup library expects.
static ION_RESIDUE_CODES: Map<&'static str, &'static str> = phf_map! {
    "Na+" => "SOD",
    "K+" => "POT",
    "Mg2+" => "MG",
    "Ca2+" => "CAL",
    "Zn2+" => "ZN2",
    "Cl-" => "CLA",
};

/// Looks up the residue code for an ion display name such as `"Na+"`.
pub fn residue_code(display_name: &str) -> Option<&'static str> {
    ION_RESIDUE_CODES.get(display_name.trim()).copied()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cation {
    #[default]
    Na,
    K,
    Mg,
    Ca,
    Zn,
}

impl Cation {
    pub fn residue_code(&self) -> &'static str {
        ion_code(self.label())
    }
}

impl Choice for Cation {
    const KIND: &'static str = "cation";
    const ALL: &'static [Self] = &[Cation::Na, Cation::K, Cation::Mg, Cation::Ca, Cation::Zn];

    fn label(&self) -> &'static str {
        match self {
            Cation::Na => "Na+",
            Cation::K => "K+",
            Cation::Mg => "Mg2+",
            Cation::Ca => "Ca2+",
            Cation::Zn => "Zn2+",
        }
    }

    fn id(&self) -> &'static str {
        match self {
            Cation::Na => "na",
            Cation::K => "k",
            Cation::Mg => "mg",
            Cation::Ca => "ca",
            Cation::Zn => "zn",
        }
    }
}

impl_choice_traits!(Cation);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anion {
    #[default]
    Cl,
}

impl Anion {
    pub fn residue_code(&self) -> &'static str {
        ion_code(self.label())
    }
}

impl Choice for Anion {
    const KIND: &'static str = "anion";
    const ALL: &'static [Self] = &[Anion::Cl];

    fn label(&self) -> &'static str {
        match self {
            Anion::Cl => "Cl-",
        }
    }

    fn id(&self) -> &'static str {
        match self {
            Anion::Cl => "cl",
        }
    }
}

impl_choice_traits!(Anion);

// Every variant label is a key of the table; the tests pin that down.
fn ion_code(label: &'static str) -> &'static str {
    residue_code(label).unwrap_or(label)
}

/// Strategy the setup library uses to position ions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IonPlacement {
    #[default]
    Random,
    ElectrostaticPotential,
    Manual,
}

impl Choice for IonPlacement {
    const KIND: &'static str = "ion placement method";
    const ALL: &'static [Self] = &[
        IonPlacement::Random,
        IonPlacement::ElectrostaticPotential,
        IonPlacement::Manual,
    ];

    fn label(&self) -> &'static str {
        match self {
            IonPlacement::Random => "randomly",
            IonPlacement::ElectrostaticPotential => "by electrostatic potential",
            IonPlacement::Manual => "manually",
        }
    }

    fn id(&self) -> &'static str {
        match self {
            IonPlacement::Random => "random",
            IonPlacement::ElectrostaticPotential => "electrostatic-potential",
            IonPlacement::Manual => "manual",
        }
    }
}

impl_choice_traits!(IonPlacement);
