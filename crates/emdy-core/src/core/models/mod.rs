//! Closed vocabularies for every choice a user can make when setting up a run.
//!
//! Each enum carries the display label shown by front-ends, a stable kebab-case
//! identifier used in configuration files, and a total mapping to whatever the
//! setup library needs (file extensions, residue codes, fixed angles).

use thiserror::Error;

/// Returned when a label or identifier does not name any variant of a choice.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown {kind} '{value}'. Expected one of: {expected}")]
pub struct ParseChoiceError {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

/// Implemented by the closed choice enums so lookups by label or id share one rule.
pub trait Choice: Copy + Sized + 'static {
    const KIND: &'static str;
    const ALL: &'static [Self];

    fn label(&self) -> &'static str;
    fn id(&self) -> &'static str;

    /// Matches either the display label or the identifier, ignoring ASCII case.
    fn parse_choice(value: &str) -> Result<Self, ParseChoiceError> {
        let needle = value.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.label().eq_ignore_ascii_case(needle) || c.id().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ParseChoiceError {
                kind: Self::KIND,
                value: value.to_string(),
                expected: Self::ALL
                    .iter()
                    .map(|c| c.id())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

macro_rules! impl_choice_traits {
    ($ty:ty) => {
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }

        impl std::str::FromStr for $ty {
            type Err = $crate::core::models::ParseChoiceError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty as $crate::core::models::Choice>::parse_choice(s)
            }
        }
    };
}

pub(crate) use impl_choice_traits;

pub mod formats;
pub mod geometry;
pub mod ions;
pub mod preparation;
pub mod solvent;
