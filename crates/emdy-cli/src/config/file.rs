use crate::error::{CliError, Result};
use emdy_setup::core::models::formats::{CoordinateFormat, TopologyFormat};
use emdy_setup::core::models::ions::{Anion, Cation, IonPlacement};
use emdy_setup::core::models::preparation::{DisulfideBonds, RenameRules};
use emdy_setup::core::models::solvent::{BoxShape, SolventModel};
use emdy_setup::engine::config::SetupConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileIoConfig {
    pub structure: Option<PathBuf>,
    pub forcefield: Option<PathBuf>,
    pub parameters: Option<PathBuf>,
    pub topology_output: Option<PathBuf>,
    pub coordinate_output: Option<PathBuf>,
    pub topology_format: Option<TopologyFormat>,
    pub coordinate_format: Option<CoordinateFormat>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileIgnoreConfig {
    pub hydrogens: Option<bool>,
    pub ligands: Option<bool>,
    pub water: Option<bool>,
    pub ions: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FilePreparationConfig {
    pub rename_rules: Option<RenameRules>,
    pub ignore: Option<FileIgnoreConfig>,
    pub disulfide: Option<DisulfideBonds>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileSolvationConfig {
    pub solvent: Option<SolventModel>,
    pub segment: Option<String>,
    pub shape: Option<BoxShape>,
    pub use_padding: Option<bool>,
    pub padding: Option<f64>,
    pub center: Option<[f64; 3]>,
    pub lengths: Option<[f64; 3]>,
    pub angles: Option<[f64; 3]>,
    pub cutoff: Option<f64>,
    pub minimize_solvent: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileIonizationConfig {
    pub cation: Option<Cation>,
    pub anion: Option<Anion>,
    pub cation_count: Option<u32>,
    pub anion_count: Option<u32>,
    pub neutralize: Option<bool>,
    pub salt_concentration: Option<f64>,
    pub ion_ion_cutoff: Option<f64>,
    pub ion_solvent_cutoff: Option<f64>,
    pub segment: Option<String>,
    pub placement: Option<IonPlacement>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FilePipelineConfig {
    pub solvate: Option<bool>,
    pub ionize: Option<bool>,
    pub write_output: Option<bool>,
}

/// A config file as written by the user: every key is optional.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub io: Option<FileIoConfig>,
    pub preparation: Option<FilePreparationConfig>,
    pub solvation: Option<FileSolvationConfig>,
    pub ionization: Option<FileIonizationConfig>,
    pub pipeline: Option<FilePipelineConfig>,
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| CliError::Config(format!("Invalid value for {}: '{}' ({})", key, value, e)))
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Applies `KEY=VALUE` overrides on top of the file contents.
    pub fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };
            let key = key.trim();
            let (section, field) = key.split_once('.').unwrap_or((key, ""));

            match section {
                "io" => self.set_io(key, field, value)?,
                "preparation" => self.set_preparation(key, field, value)?,
                "solvation" => self.set_solvation(key, field, value)?,
                "ionization" => self.set_ionization(key, field, value)?,
                "pipeline" => self.set_pipeline(key, field, value)?,
                _ => return Err(unsupported(key)),
            }
        }
        Ok(())
    }

    fn set_io(&mut self, key: &str, field: &str, value: &str) -> Result<()> {
        let io = self.io.get_or_insert_with(Default::default);
        match field {
            "structure" => io.structure = Some(PathBuf::from(value)),
            "forcefield" => io.forcefield = Some(PathBuf::from(value)),
            "parameters" => io.parameters = Some(PathBuf::from(value)),
            "topology-output" => io.topology_output = Some(PathBuf::from(value)),
            "coordinate-output" => io.coordinate_output = Some(PathBuf::from(value)),
            "topology-format" => io.topology_format = Some(parse_value(key, value)?),
            "coordinate-format" => io.coordinate_format = Some(parse_value(key, value)?),
            _ => return Err(unsupported(key)),
        }
        Ok(())
    }

    fn set_preparation(&mut self, key: &str, field: &str, value: &str) -> Result<()> {
        let prep = self.preparation.get_or_insert_with(Default::default);
        match field {
            "rename-rules" => {
                prep.rename_rules = Some(match value.trim() {
                    "default" => RenameRules::Default,
                    "none" => RenameRules::None,
                    path => RenameRules::Custom(PathBuf::from(path)),
                })
            }
            "disulfide-cutoff" => {
                prep.disulfide = Some(DisulfideBonds::Detect {
                    cutoff: parse_value(key, value)?,
                })
            }
            "disulfide-file" => prep.disulfide = Some(DisulfideBonds::FromFile(PathBuf::from(value))),
            _ => {
                let ignore = prep.ignore.get_or_insert_with(Default::default);
                let flag = match field {
                    "ignore.hydrogens" => &mut ignore.hydrogens,
                    "ignore.ligands" => &mut ignore.ligands,
                    "ignore.water" => &mut ignore.water,
                    "ignore.ions" => &mut ignore.ions,
                    _ => return Err(unsupported(key)),
                };
                *flag = Some(parse_value(key, value)?);
            }
        }
        Ok(())
    }

    fn set_solvation(&mut self, key: &str, field: &str, value: &str) -> Result<()> {
        let sol = self.solvation.get_or_insert_with(Default::default);
        match field {
            "solvent" => sol.solvent = Some(parse_value(key, value)?),
            "segment" => sol.segment = Some(value.trim().to_string()),
            "shape" => sol.shape = Some(parse_value(key, value)?),
            "use-padding" => sol.use_padding = Some(parse_value(key, value)?),
            "padding" => sol.padding = Some(parse_value(key, value)?),
            "cutoff" => sol.cutoff = Some(parse_value(key, value)?),
            "minimize-solvent" => sol.minimize_solvent = Some(parse_value(key, value)?),
            "center" => sol.center = Some(parse_triple(key, value)?),
            "lengths" => sol.lengths = Some(parse_triple(key, value)?),
            "angles" => sol.angles = Some(parse_triple(key, value)?),
            _ => return Err(unsupported(key)),
        }
        Ok(())
    }

    fn set_ionization(&mut self, key: &str, field: &str, value: &str) -> Result<()> {
        let ion = self.ionization.get_or_insert_with(Default::default);
        match field {
            "cation" => ion.cation = Some(parse_value(key, value)?),
            "anion" => ion.anion = Some(parse_value(key, value)?),
            "cation-count" => ion.cation_count = Some(parse_value(key, value)?),
            "anion-count" => ion.anion_count = Some(parse_value(key, value)?),
            "neutralize" => ion.neutralize = Some(parse_value(key, value)?),
            "salt-concentration" => ion.salt_concentration = Some(parse_value(key, value)?),
            "ion-ion-cutoff" => ion.ion_ion_cutoff = Some(parse_value(key, value)?),
            "ion-solvent-cutoff" => ion.ion_solvent_cutoff = Some(parse_value(key, value)?),
            "segment" => ion.segment = Some(value.trim().to_string()),
            "placement" => ion.placement = Some(parse_value(key, value)?),
            _ => return Err(unsupported(key)),
        }
        Ok(())
    }

    fn set_pipeline(&mut self, key: &str, field: &str, value: &str) -> Result<()> {
        let pipeline = self.pipeline.get_or_insert_with(Default::default);
        let flag = match field {
            "solvate" => &mut pipeline.solvate,
            "ionize" => &mut pipeline.ionize,
            "write-output" => &mut pipeline.write_output,
            _ => return Err(unsupported(key)),
        };
        *flag = Some(parse_value(key, value)?);
        Ok(())
    }

    /// Overlays every value present in the file onto `config`.
    pub fn apply_to(self, config: &mut SetupConfig) {
        if let Some(io) = self.io {
            let target = &mut config.io;
            overlay(&mut target.structure, io.structure.map(Some));
            overlay(&mut target.forcefield, io.forcefield.map(Some));
            overlay(&mut target.parameters, io.parameters.map(Some));
            overlay(&mut target.topology_output, io.topology_output.map(Some));
            overlay(&mut target.coordinate_output, io.coordinate_output.map(Some));
            overlay(&mut target.topology_format, io.topology_format);
            overlay(&mut target.coordinate_format, io.coordinate_format);
        }
        if let Some(prep) = self.preparation {
            let target = &mut config.preparation;
            overlay(&mut target.rename_rules, prep.rename_rules);
            overlay(&mut target.disulfide, prep.disulfide);
            if let Some(ignore) = prep.ignore {
                overlay(&mut target.ignore.hydrogens, ignore.hydrogens);
                overlay(&mut target.ignore.ligands, ignore.ligands);
                overlay(&mut target.ignore.water, ignore.water);
                overlay(&mut target.ignore.ions, ignore.ions);
            }
        }
        if let Some(sol) = self.solvation {
            let target = &mut config.solvation;
            overlay(&mut target.solvent, sol.solvent);
            overlay(&mut target.segment, sol.segment);
            overlay(&mut target.shape, sol.shape);
            overlay(&mut target.use_padding, sol.use_padding);
            overlay(&mut target.padding, sol.padding);
            overlay(&mut target.center, sol.center);
            overlay(&mut target.lengths, sol.lengths.map(|l| l.map(Some)));
            overlay(&mut target.angles, sol.angles.map(|a| a.map(Some)));
            overlay(&mut target.cutoff, sol.cutoff);
            overlay(&mut target.minimize_solvent, sol.minimize_solvent);
        }
        if let Some(ion) = self.ionization {
            let target = &mut config.ionization;
            overlay(&mut target.cation, ion.cation);
            overlay(&mut target.anion, ion.anion);
            overlay(&mut target.cation_count, ion.cation_count);
            overlay(&mut target.anion_count, ion.anion_count);
            overlay(&mut target.neutralize, ion.neutralize);
            overlay(&mut target.salt_concentration, ion.salt_concentration);
            overlay(&mut target.ion_ion_cutoff, ion.ion_ion_cutoff);
            overlay(&mut target.ion_solvent_cutoff, ion.ion_solvent_cutoff);
            overlay(&mut target.segment, ion.segment);
            overlay(&mut target.placement, ion.placement);
        }
        if let Some(pipeline) = self.pipeline {
            let target = &mut config.pipeline;
            overlay(&mut target.solvate, pipeline.solvate);
            overlay(&mut target.ionize, pipeline.ionize);
            overlay(&mut target.write_output, pipeline.write_output);
        }
    }
}

pub(super) fn overlay<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

fn parse_triple(key: &str, value: &str) -> Result<[f64; 3]> {
    let parts = value
        .split(',')
        .map(|part| parse_value::<f64>(key, part))
        .collect::<Result<Vec<_>>>()?;
    <[f64; 3]>::try_from(parts).map_err(|_| {
        CliError::Config(format!("{} expects three comma-separated numbers", key))
    })
}

fn unsupported(key: &str) -> CliError {
    CliError::Config(format!("Unsupported configuration key for --set: '{}'", key))
}
