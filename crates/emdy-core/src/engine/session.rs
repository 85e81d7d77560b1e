//! The stage dispatcher behind every front-end.
//!
//! A [`Session`] owns the form, the loaded inputs and the current model. Each
//! stage validates the form, loads the inputs if nothing is held yet, calls
//! the library and replaces the model only when the call succeeds. Results are
//! shown in the viewer under one fixed object name per stage.

use super::box_policy;
use super::config::{SetupConfig, non_blank};
use super::error::{SessionError, ValidationError};
use super::progress::{Progress, ProgressReporter};
use super::stage::{SavedFiles, Stage, StageOutcome};
use super::validation::{Action, validate};
use crate::core::library::{
    ForcefieldInfo, IonizationRequest, PrmtopFlavor, SetupLibrary, SolvationExtent,
    SolvationRequest,
};
use crate::core::models::formats::{CoordinateFormat, TopologyFormat};
use crate::core::models::geometry::BoxGeometry;
use crate::core::models::ions::IonPlacement;
use crate::core::models::solvent::BoxShape;
use crate::core::viewer::{Viewer, objects};
use nalgebra::Vector3;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

type Routine<L, R> = fn(
    &L,
    &<L as SetupLibrary>::Model,
    &R,
) -> Result<<L as SetupLibrary>::Model, <L as SetupLibrary>::Error>;

struct LoadedInputs<L: SetupLibrary> {
    model: L::Model,
    topology: L::Topology,
    parameters: L::Parameters,
}

pub struct Session<'a, L: SetupLibrary, V: Viewer> {
    library: &'a L,
    viewer: V,
    config: SetupConfig,
    reporter: ProgressReporter<'a>,
    inputs: Option<LoadedInputs<L>>,
    /// Model objects currently shown, replaced after every stage.
    displayed: Vec<String>,
    /// Volume of the last explicitly sized solvent box.
    solvent_volume: Option<f64>,
    axes_shown: bool,
    boundary_shown: Option<&'static str>,
}

impl<'a, L: SetupLibrary, V: Viewer> Session<'a, L, V> {
    pub fn new(library: &'a L, viewer: V, config: SetupConfig) -> Self {
        Self {
            library,
            viewer,
            config,
            reporter: ProgressReporter::new(),
            inputs: None,
            displayed: Vec::new(),
            solvent_volume: None,
            axes_shown: false,
            boundary_shown: None,
        }
    }

    pub fn with_reporter(mut self, reporter: ProgressReporter<'a>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn config(&self) -> &SetupConfig {
        &self.config
    }

    /// Edits take effect on the next stage. Input paths changed here are only
    /// read again by an explicit [`Session::load`].
    pub fn config_mut(&mut self) -> &mut SetupConfig {
        &mut self.config
    }

    pub fn viewer(&self) -> &V {
        &self.viewer
    }

    pub fn is_loaded(&self) -> bool {
        self.inputs.is_some()
    }

    pub fn model(&self) -> Option<&L::Model> {
        self.inputs.as_ref().map(|inputs| &inputs.model)
    }

    /// Reads the structure, force field and parameters, discarding any model
    /// built so far.
    pub fn load(&mut self) -> Result<(), SessionError> {
        validate(&self.config, Action::Load)?;
        let io = &self.config.io;
        let (Some(structure), Some(forcefield), Some(parameters)) = (
            non_blank(io.structure.as_ref()),
            non_blank(io.forcefield.as_ref()),
            non_blank(io.parameters.as_ref()),
        ) else {
            return Err(ValidationError::MissingStructure.into());
        };

        info!(structure = %structure.display(), "Loading inputs.");
        let model = self
            .library
            .read_structure(structure)
            .map_err(SessionError::library("read_structure"))?;
        let topology = self
            .library
            .read_topology(forcefield)
            .map_err(SessionError::library("read_topology"))?;
        let parameters = self
            .library
            .read_parameters(parameters)
            .map_err(SessionError::library("read_parameters"))?;

        self.inputs = Some(LoadedInputs {
            model,
            topology,
            parameters,
        });
        self.solvent_volume = None;
        self.reporter.message("Inputs loaded");
        Ok(())
    }

    fn ensure_loaded(&mut self) -> Result<(), SessionError> {
        if self.inputs.is_none() {
            self.load()?;
        }
        Ok(())
    }

    fn loaded(&self) -> Result<&LoadedInputs<L>, SessionError> {
        self.inputs.as_ref().ok_or(SessionError::NothingLoaded)
    }

    pub fn execute(&mut self, stage: Stage) -> Result<StageOutcome, SessionError> {
        self.reporter.report(Progress::PhaseStart {
            name: stage.label(),
        });
        let result = match stage {
            Stage::Io => self.load_for_io(),
            Stage::Preparation => self.prepare(),
            Stage::Solvation => self.solvate(),
            Stage::Ionization => self.ionize(),
        };
        let outcome = self.reported(result)?;

        match &outcome {
            StageOutcome::Skipped { reason } => {
                warn!(stage = %stage, "Stage skipped: {reason}");
                self.reporter.report(Progress::PhaseSkipped {
                    reason: reason.clone(),
                });
            }
            _ => {
                info!(stage = %stage, "Stage completed.");
                self.reporter.report(Progress::PhaseFinish);
            }
        }
        Ok(outcome)
    }

    fn load_for_io(&mut self) -> Result<StageOutcome, SessionError> {
        validate(&self.config, Action::Execute(Stage::Io))?;
        self.ensure_loaded()?;
        Ok(StageOutcome::Loaded)
    }

    fn reported<T>(&self, result: Result<T, SessionError>) -> Result<T, SessionError> {
        if let Err(e) = &result {
            self.reporter.report(Progress::PhaseFailed {
                reason: e.to_string(),
            });
        }
        result
    }

    fn prepare(&mut self) -> Result<StageOutcome, SessionError> {
        validate(&self.config, Action::Execute(Stage::Preparation))?;
        self.ensure_loaded()?;

        let options = self.config.preparation.options();
        let inputs = self.loaded()?;
        let built = self
            .library
            .build_topology(&inputs.model, &inputs.topology, &options)
            .map_err(SessionError::library("build_topology"))?;
        let completed = self
            .library
            .complete_coordinates(&built, &inputs.parameters)
            .map_err(SessionError::library("complete_coordinates"))?;
        self.finish_stage(Stage::Preparation, completed)
    }

    fn solvate(&mut self) -> Result<StageOutcome, SessionError> {
        validate(&self.config, Action::Execute(Stage::Solvation))?;
        let form = &self.config.solvation;
        let (operation, routine) = solvation_routine::<L>(form.shape)?;
        let request = SolvationRequest {
            solvent: form.solvent,
            segment: form.segment.clone(),
            extent: box_policy::solvation_extent(form)?,
            cutoff: form.cutoff,
            center: Vector3::from(form.center),
            minimize_solvent: form.minimize_solvent,
        };
        let volume = match request.extent {
            SolvationExtent::Lengths(lengths) => BoxGeometry::Cell {
                center: request.center,
                lengths,
                angles: form.shape.fixed_angles().unwrap_or([90.0; 3]),
            }
            .volume(),
            SolvationExtent::Padding(_) => None,
        };
        self.ensure_loaded()?;

        debug!(operation, extent = ?request.extent, "Solvating.");
        let solvated = routine(self.library, &self.loaded()?.model, &request)
            .map_err(SessionError::library(operation))?;
        self.solvent_volume = volume;
        self.finish_stage(Stage::Solvation, solvated)
    }

    fn ionize(&mut self) -> Result<StageOutcome, SessionError> {
        match validate(&self.config, Action::Execute(Stage::Ionization)) {
            Err(ValidationError::NoIonsRequested) => {
                self.ensure_loaded()?;
                return Ok(StageOutcome::Skipped {
                    reason: ValidationError::NoIonsRequested.to_string(),
                });
            }
            other => other?,
        }
        let form = &self.config.ionization;
        let (operation, routine) = ionization_routine::<L>(form.placement)?;
        let (cation_count, anion_count) = form.effective_counts();
        let request = IonizationRequest {
            cation: form.cation.residue_code(),
            cation_count,
            anion: form.anion.residue_code(),
            anion_count,
            salt_concentration: form.salt_concentration,
            ion_solvent_cutoff: form.ion_solvent_cutoff,
            ion_ion_cutoff: form.ion_ion_cutoff,
            volume: self.solvent_volume,
            segment: form.segment.clone(),
        };
        self.ensure_loaded()?;

        debug!(operation, cation_count, anion_count, "Ionizing.");
        let ionized = routine(self.library, &self.loaded()?.model, &request)
            .map_err(SessionError::library(operation))?;
        let outcome = self.finish_stage(Stage::Ionization, ionized)?;
        self.viewer
            .show_segment_as_spheres(objects::IONIZED, &request.segment)
            .map_err(SessionError::viewer("show_segment_as_spheres"))?;
        Ok(outcome)
    }

    /// Replaces the model and shows it under the stage's object name.
    fn finish_stage(&mut self, stage: Stage, model: L::Model) -> Result<StageOutcome, SessionError> {
        let Some(inputs) = self.inputs.as_mut() else {
            return Err(SessionError::NothingLoaded);
        };
        inputs.model = model;
        let Some(object) = stage.object_name() else {
            return Ok(StageOutcome::Loaded);
        };

        let pdb = self
            .library
            .render_pdb(&inputs.model)
            .map_err(SessionError::library("render_pdb"))?;
        self.clear_displayed()?;
        self.viewer
            .load_pdb_text(object, &pdb)
            .map_err(SessionError::viewer("load_pdb_text"))?;
        self.displayed.push(object.to_string());
        Ok(StageOutcome::Completed { object })
    }

    fn clear_displayed(&mut self) -> Result<(), SessionError> {
        for name in std::mem::take(&mut self.displayed) {
            self.viewer
                .delete(&name)
                .map_err(SessionError::viewer("delete"))?;
        }
        Ok(())
    }

    /// Writes the topology and coordinate files for the current model.
    pub fn save(&mut self) -> Result<SavedFiles, SessionError> {
        validate(&self.config, Action::Save)?;
        let io = &self.config.io;
        if io.topology_format == TopologyFormat::GromacsTop {
            return Err(SessionError::unsupported(format!(
                "{} output",
                io.topology_format
            )));
        }
        let (Some(topology_path), Some(coordinate_path)) = (
            non_blank(io.topology_output.as_ref()).map(Path::to_path_buf),
            non_blank(io.coordinate_output.as_ref()).map(Path::to_path_buf),
        ) else {
            return Err(ValidationError::MissingTopologyOutput.into());
        };
        let (topology_format, coordinate_format) = (io.topology_format, io.coordinate_format);
        self.ensure_loaded()?;

        let library = self.library;
        let inputs = self.loaded()?;
        let flavor = match topology_format {
            TopologyFormat::ChamberPrmtop => {
                let titles = library.topology_titles(&inputs.topology);
                Some(PrmtopFlavor::Chamber(ForcefieldInfo::from_titles(&titles)?))
            }
            TopologyFormat::AmberPrmtop => Some(PrmtopFlavor::Amber),
            _ => None,
        };

        self.reporter.report(Progress::FilesStart { total: 2 });
        let written = match flavor {
            Some(flavor) => library.write_prmtop(
                &inputs.model,
                &inputs.parameters,
                &flavor,
                &topology_path,
            ),
            None => library.write_psf(&inputs.model, &topology_path),
        };
        self.reported(written.map_err(SessionError::library("write_topology")))?;
        self.reporter.report(Progress::FileWritten {
            path: topology_path.clone(),
        });

        let model = &inputs.model;
        let written = match coordinate_format {
            CoordinateFormat::AmberInpcrd => library.write_amber_inpcrd(model, &coordinate_path),
            CoordinateFormat::GromacsG96 => library.write_g96(model, &coordinate_path),
            CoordinateFormat::GromacsGro => library.write_gro(model, &coordinate_path),
            CoordinateFormat::NamdBin => library.write_namd_bin(model, &coordinate_path),
            CoordinateFormat::Pdb => library.write_pdb(model, &coordinate_path),
        };
        self.reported(written.map_err(SessionError::library("write_coordinates")))?;
        self.reporter.report(Progress::FileWritten {
            path: coordinate_path.clone(),
        });
        self.reporter.report(Progress::FilesFinish);

        info!(
            topology = %topology_path.display(),
            coordinates = %coordinate_path.display(),
            "2 files were generated."
        );
        Ok(SavedFiles {
            topology: topology_path,
            coordinates: coordinate_path,
        })
    }

    /// Net charge of the current model in elementary charges.
    pub fn total_charge(&self) -> Result<f64, SessionError> {
        Ok(self.library.total_charge(&self.loaded()?.model))
    }

    /// Points the form at a new structure and shows it as `original` when the
    /// file exists. A different path discards the loaded inputs.
    pub fn set_structure_path(&mut self, path: impl Into<PathBuf>) -> Result<bool, SessionError> {
        let path = path.into();
        if self.config.io.structure.as_ref() != Some(&path) {
            self.inputs = None;
        }
        self.config.io.structure = Some(path.clone());

        if !path.is_file() {
            return Ok(false);
        }
        self.viewer
            .load_file(objects::ORIGINAL, &path)
            .map_err(SessionError::viewer("load_file"))?;
        if !self.displayed.iter().any(|o| o == objects::ORIGINAL) {
            self.displayed.push(objects::ORIGINAL.to_string());
        }
        Ok(true)
    }

    /// Fetches a PDB entry into `directory` and makes it the structure input.
    pub fn download_structure(&mut self, code: &str, directory: &Path) -> Result<PathBuf, SessionError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(ValidationError::MissingPdbCode.into());
        }
        let path = self
            .library
            .download_structure(code, directory)
            .map_err(SessionError::library("download_structure"))?;
        info!(code, path = %path.display(), "Structure downloaded.");
        self.set_structure_path(path.clone())?;
        Ok(path)
    }

    /// Shows or hides the coordinate axes. Returns whether they are now shown.
    pub fn toggle_axes(&mut self) -> Result<bool, SessionError> {
        if self.axes_shown {
            self.viewer
                .delete(objects::AXES)
                .map_err(SessionError::viewer("delete"))?;
        } else {
            self.viewer
                .draw_axes(objects::AXES)
                .map_err(SessionError::viewer("draw_axes"))?;
        }
        self.axes_shown = !self.axes_shown;
        Ok(self.axes_shown)
    }

    /// Shows or hides the solvation boundary described by the form. Returns
    /// whether it is now shown.
    pub fn toggle_box(&mut self) -> Result<bool, SessionError> {
        if let Some(name) = self.boundary_shown.take() {
            self.viewer
                .delete(name)
                .map_err(SessionError::viewer("delete"))?;
            return Ok(false);
        }

        let geometry = box_policy::resolve_geometry(&self.config.solvation)?;
        let name = match &geometry {
            BoxGeometry::Sphere { center, radius } => {
                self.viewer
                    .draw_sphere(objects::SPHERE, center, *radius)
                    .map_err(SessionError::viewer("draw_sphere"))?;
                objects::SPHERE
            }
            BoxGeometry::Cell { .. } => {
                let corners = geometry.corners().ok_or(ValidationError::DegenerateBox)?;
                self.viewer
                    .draw_box(objects::BOX, &corners)
                    .map_err(SessionError::viewer("draw_box"))?;
                objects::BOX
            }
        };
        self.boundary_shown = Some(name);
        Ok(true)
    }

    /// Drops the model and removes every object this session put in the viewer.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        self.inputs = None;
        self.solvent_volume = None;
        self.clear_displayed()?;
        if self.axes_shown {
            self.toggle_axes()?;
        }
        if self.boundary_shown.is_some() {
            self.toggle_box()?;
        }
        Ok(())
    }
}

fn solvation_routine<L: SetupLibrary>(
    shape: BoxShape,
) -> Result<(&'static str, Routine<L, SolvationRequest>), SessionError> {
    let routine: (&'static str, Routine<L, SolvationRequest>) = match shape {
        BoxShape::Cuboid => ("solvate_cuboid", L::solvate_cuboid),
        BoxShape::TruncatedOctahedron => (
            "solvate_truncated_octahedron",
            L::solvate_truncated_octahedron,
        ),
        BoxShape::HexagonalPrism => ("solvate_hexagonal_prism", L::solvate_hexagonal_prism),
        BoxShape::RhombicDodecahedron => (
            "solvate_rhombic_dodecahedron",
            L::solvate_rhombic_dodecahedron,
        ),
        BoxShape::Triclinic | BoxShape::Sphere => {
            return Err(SessionError::unsupported(format!("{shape} solvation")));
        }
    };
    Ok(routine)
}

fn ionization_routine<L: SetupLibrary>(
    placement: IonPlacement,
) -> Result<(&'static str, Routine<L, IonizationRequest>), SessionError> {
    let routine: (&'static str, Routine<L, IonizationRequest>) = match placement {
        IonPlacement::Random => ("ionize_randomly", L::ionize_randomly),
        IonPlacement::ElectrostaticPotential => ("ionize_by_potential", L::ionize_by_potential),
        IonPlacement::Manual => {
            return Err(SessionError::unsupported(format!("Placing ions {placement}")));
        }
    };
    Ok(routine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dry_run::{DryRunLibrary, LibraryCall, RecordingViewer, ViewerCall};
    use crate::core::models::Choice;
    use crate::core::models::ions::Cation;
    use crate::core::models::preparation::DisulfideBonds;
    use crate::core::models::solvent::SolventModel;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tempfile::{NamedTempFile, TempDir};

    fn form() -> SetupConfig {
        let mut config = SetupConfig::default();
        config.io.structure = Some(PathBuf::from("x.pdb"));
        config.io.forcefield = Some(PathBuf::from("x.top"));
        config.io.parameters = Some(PathBuf::from("x.prm"));
        config
    }

    fn unchecked() -> DryRunLibrary {
        DryRunLibrary::new().without_input_checks()
    }

    fn count(library: &DryRunLibrary, pred: impl Fn(&LibraryCall) -> bool) -> usize {
        library.calls().iter().filter(|c| pred(c)).count()
    }

    #[test]
    fn cuboid_run_solvates_with_form_values_and_shows_solvated() {
        let library = unchecked();
        let mut session = Session::new(&library, RecordingViewer::new(), form());

        session.load().unwrap();
        assert_eq!(
            session.execute(Stage::Preparation).unwrap(),
            StageOutcome::Completed {
                object: objects::MODIFIED
            }
        );
        assert_eq!(
            session.execute(Stage::Solvation).unwrap(),
            StageOutcome::Completed {
                object: objects::SOLVATED
            }
        );

        let calls = library.calls();
        let Some(LibraryCall::Solvate { shape, request }) = calls
            .iter()
            .find(|c| matches!(c, LibraryCall::Solvate { .. }))
        else {
            panic!("no solvation call in {calls:?}");
        };
        assert_eq!(*shape, BoxShape::Cuboid);
        assert_eq!(request.extent, SolvationExtent::Padding(10.0));
        assert_eq!(request.cutoff, 2.4);
        assert_eq!(request.solvent, SolventModel::Tip3p);
        assert_eq!(request.segment, "WAT");

        assert_eq!(session.viewer().objects(), ["solvated"]);
        assert!(session
            .viewer()
            .calls
            .contains(&ViewerCall::Delete("modified".into())));
        assert_eq!(
            session.model().unwrap().history,
            [
                "build_topology",
                "complete_coordinates",
                "solvate_cuboid"
            ]
        );
    }

    #[test]
    fn stages_load_inputs_implicitly_once() {
        let library = unchecked();
        let mut session = Session::new(&library, RecordingViewer::new(), form());
        assert!(!session.is_loaded());

        session.execute(Stage::Preparation).unwrap();
        session.execute(Stage::Solvation).unwrap();

        assert_eq!(
            count(&library, |c| matches!(c, LibraryCall::ReadStructure(_))),
            1
        );
        assert!(session.is_loaded());
    }

    #[test]
    fn io_stage_only_loads() {
        let library = unchecked();
        let mut session = Session::new(&library, RecordingViewer::new(), form());
        assert_eq!(session.execute(Stage::Io).unwrap(), StageOutcome::Loaded);
        assert_eq!(library.calls().len(), 3);
        assert!(session.viewer().calls.is_empty());
    }

    #[test]
    fn missing_input_stops_before_the_library() {
        let library = unchecked();
        let mut config = form();
        config.io.forcefield = None;
        let mut session = Session::new(&library, RecordingViewer::new(), config);

        let err = session.execute(Stage::Preparation).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Validation(ValidationError::MissingForcefield)
        ));
        assert!(library.calls().is_empty());
    }

    #[test]
    fn unreadable_input_names_the_operation() {
        let dir = TempDir::new().unwrap();
        let mut config = form();
        config.io.structure = Some(dir.path().join("absent.pdb"));
        let library = DryRunLibrary::new();
        let mut session = Session::new(&library, RecordingViewer::new(), config);

        let err = session.load().unwrap_err();
        assert!(matches!(
            err,
            SessionError::Library {
                operation: "read_structure",
                ..
            }
        ));
        assert!(!session.is_loaded());
    }

    #[test]
    fn preparation_options_reach_the_library() {
        let library = unchecked();
        let mut config = form();
        config.preparation.ignore.water = true;
        config.preparation.disulfide = DisulfideBonds::Detect { cutoff: 2.5 };
        let expected = config.preparation.options();
        let mut session = Session::new(&library, RecordingViewer::new(), config);

        session.execute(Stage::Preparation).unwrap();
        assert!(library
            .calls()
            .contains(&LibraryCall::BuildTopology(expected)));
    }

    #[test]
    fn neutralization_sends_zero_counts() {
        let library = unchecked();
        let mut config = form();
        config.ionization.cation = Cation::K;
        config.ionization.cation_count = 20;
        config.ionization.anion_count = 15;
        let mut session = Session::new(&library, RecordingViewer::new(), config);

        session.execute(Stage::Ionization).unwrap();
        let calls = library.calls();
        let Some(LibraryCall::IonizeRandomly(request)) = calls
            .iter()
            .find(|c| matches!(c, LibraryCall::IonizeRandomly(_)))
        else {
            panic!("no ionization call in {calls:?}");
        };
        assert_eq!((request.cation_count, request.anion_count), (0, 0));
        assert_eq!(request.cation, "POT");
        assert_eq!(request.anion, "CLA");
        assert_eq!(request.segment, "ION");
        assert_eq!(request.volume, None);
    }

    #[test]
    fn ionization_without_ions_is_skipped_without_a_library_call() {
        let library = unchecked();
        let mut config = form();
        config.ionization.neutralize = false;
        let mut session = Session::new(&library, RecordingViewer::new(), config);
        session.load().unwrap();
        let before = library.calls().len();

        let outcome = session.execute(Stage::Ionization).unwrap();
        assert!(matches!(outcome, StageOutcome::Skipped { .. }));
        assert_eq!(library.calls().len(), before);
        assert!(session.model().unwrap().history.is_empty());
        assert!(session.viewer().calls.is_empty());
    }

    #[test]
    fn ionized_model_shows_ion_segment_as_spheres() {
        let library = unchecked();
        let mut config = form();
        config.ionization.segment = "IONS".into();
        let mut session = Session::new(&library, RecordingViewer::new(), config);

        session.execute(Stage::Ionization).unwrap();
        assert_eq!(
            session.viewer().calls.last(),
            Some(&ViewerCall::ShowSpheres {
                object: "ionized".into(),
                segment: "IONS".into()
            })
        );
    }

    #[test]
    fn explicit_box_volume_is_passed_to_ionization() {
        let library = unchecked();
        let mut config = form();
        config.solvation.use_padding = false;
        config.solvation.lengths = [Some(10.0), Some(20.0), Some(30.0)];
        config.ionization.placement = IonPlacement::ElectrostaticPotential;
        let mut session = Session::new(&library, RecordingViewer::new(), config);

        session.execute(Stage::Solvation).unwrap();
        session.execute(Stage::Ionization).unwrap();

        let calls = library.calls();
        let Some(LibraryCall::IonizeByPotential(request)) = calls
            .iter()
            .find(|c| matches!(c, LibraryCall::IonizeByPotential(_)))
        else {
            panic!("no ionization call in {calls:?}");
        };
        let volume = request.volume.unwrap();
        assert!((volume - 6000.0).abs() < 1e-6);
    }

    #[test]
    fn each_shape_reaches_its_own_solvation_routine() {
        for &shape in BoxShape::ALL {
            let library = unchecked();
            let mut config = form();
            box_policy::select_shape(&mut config.solvation, shape);
            if shape == BoxShape::Triclinic {
                config.solvation.lengths = [Some(40.0); 3];
                config.solvation.angles = [Some(90.0); 3];
            }
            let mut session = Session::new(&library, RecordingViewer::new(), config);

            let result = session.execute(Stage::Solvation);
            let solvated: Vec<BoxShape> = library
                .calls()
                .into_iter()
                .filter_map(|c| match c {
                    LibraryCall::Solvate { shape, .. } => Some(shape),
                    _ => None,
                })
                .collect();
            match shape {
                BoxShape::Triclinic | BoxShape::Sphere => {
                    assert!(
                        matches!(result, Err(SessionError::Unsupported { .. })),
                        "{shape}"
                    );
                    assert!(solvated.is_empty(), "{shape}");
                }
                _ => {
                    result.unwrap();
                    assert_eq!(solvated, [shape]);
                }
            }
        }
    }

    #[test]
    fn unimplemented_variants_are_rejected_before_any_call() {
        for shape in [BoxShape::Triclinic, BoxShape::Sphere] {
            let library = unchecked();
            let mut config = form();
            config.solvation.shape = shape;
            config.solvation.use_padding = shape == BoxShape::Sphere;
            config.solvation.lengths = [Some(30.0); 3];
            config.solvation.angles = [Some(90.0); 3];
            let mut session = Session::new(&library, RecordingViewer::new(), config);

            let err = session.execute(Stage::Solvation).unwrap_err();
            assert!(matches!(err, SessionError::Unsupported { .. }), "{shape}");
            assert!(library.calls().is_empty());
        }

        let library = unchecked();
        let mut config = form();
        config.ionization.placement = IonPlacement::Manual;
        let mut session = Session::new(&library, RecordingViewer::new(), config);
        let err = session.execute(Stage::Ionization).unwrap_err();
        assert_eq!(err.to_string(), "Placing ions manually is not supported");
        assert!(library.calls().is_empty());
    }

    #[test]
    fn failed_stage_keeps_the_previous_model() {
        let library = unchecked().failing_on("solvate_cuboid");
        let mut session = Session::new(&library, RecordingViewer::new(), form());
        session.execute(Stage::Preparation).unwrap();
        let before = session.model().cloned();

        let err = session.execute(Stage::Solvation).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Library {
                operation: "solvate_cuboid",
                ..
            }
        ));
        assert_eq!(session.model().cloned(), before);
        assert_eq!(session.viewer().objects(), ["modified"]);
    }

    #[test]
    fn failed_stage_reports_a_failure_instead_of_a_finish() {
        let library = unchecked().failing_on("build_topology");
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let reporter = ProgressReporter::with_callback(Box::new(move |event| {
            sink.lock().unwrap().push(event);
        }));
        let mut session =
            Session::new(&library, RecordingViewer::new(), form()).with_reporter(reporter);

        session.execute(Stage::Preparation).unwrap_err();
        let events = events.lock().unwrap();
        assert!(matches!(events.first(), Some(Progress::PhaseStart { name: "Preparation" })));
        assert!(matches!(
            events.last(),
            Some(Progress::PhaseFailed { reason }) if reason.contains("build_topology")
        ));
        assert!(!events.iter().any(|e| matches!(e, Progress::PhaseFinish)));
    }

    fn output_form(dir: &TempDir) -> SetupConfig {
        let mut config = form();
        config.io.topology_output = Some(dir.path().join("out.psf"));
        config.io.coordinate_output = Some(dir.path().join("out.gro"));
        config.io.topology_format = TopologyFormat::NamdPsf;
        config.io.coordinate_format = CoordinateFormat::GromacsGro;
        config
    }

    #[test]
    fn save_writes_topology_then_coordinates() {
        let dir = TempDir::new().unwrap();
        let library = unchecked();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let reporter = ProgressReporter::with_callback(Box::new(move |event| {
            if let Progress::FileWritten { path } = event {
                sink.lock().unwrap().push(path);
            }
        }));
        let mut session =
            Session::new(&library, RecordingViewer::new(), output_form(&dir)).with_reporter(reporter);

        let saved = session.save().unwrap();
        assert_eq!(saved.topology, dir.path().join("out.psf"));

        let writes: Vec<_> = library
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                LibraryCall::Write { format, .. } => Some(format),
                _ => None,
            })
            .collect();
        assert_eq!(writes, ["write_psf", "write_gro"]);
        assert_eq!(
            *events.lock().unwrap(),
            [dir.path().join("out.psf"), dir.path().join("out.gro")]
        );
    }

    fn written_formats(library: &DryRunLibrary) -> Vec<&'static str> {
        library
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                LibraryCall::Write { format, .. } => Some(format),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn each_coordinate_format_reaches_its_own_writer() {
        let dir = TempDir::new().unwrap();
        for &format in CoordinateFormat::ALL {
            let expected = match format {
                CoordinateFormat::AmberInpcrd => "write_amber_inpcrd",
                CoordinateFormat::GromacsG96 => "write_g96",
                CoordinateFormat::GromacsGro => "write_gro",
                CoordinateFormat::NamdBin => "write_namd_bin",
                CoordinateFormat::Pdb => "write_pdb",
            };
            let library = unchecked();
            let mut config = output_form(&dir);
            config.io.coordinate_format = format;
            let mut session = Session::new(&library, RecordingViewer::new(), config);

            session.save().unwrap();
            assert_eq!(written_formats(&library), ["write_psf", expected], "{format}");
        }
    }

    #[test]
    fn each_plain_topology_format_reaches_its_own_writer() {
        let dir = TempDir::new().unwrap();
        for (format, expected) in [
            (TopologyFormat::AmberPrmtop, "write_amber_prmtop"),
            (TopologyFormat::NamdPsf, "write_psf"),
        ] {
            let library = unchecked();
            let mut config = output_form(&dir);
            config.io.topology_format = format;
            let mut session = Session::new(&library, RecordingViewer::new(), config);

            session.save().unwrap();
            assert_eq!(written_formats(&library), [expected, "write_gro"], "{format}");
        }
    }

    #[test]
    fn gromacs_topology_output_is_rejected_before_writing() {
        let dir = TempDir::new().unwrap();
        let library = unchecked();
        let mut config = output_form(&dir);
        config.io.topology_format = TopologyFormat::GromacsTop;
        let mut session = Session::new(&library, RecordingViewer::new(), config);

        let err = session.save().unwrap_err();
        assert!(matches!(err, SessionError::Unsupported { .. }));
        assert!(library.calls().is_empty());
    }

    #[test]
    fn chamber_output_reads_forcefield_info_from_topology_titles() {
        let dir = TempDir::new().unwrap();
        let mut topology = NamedTempFile::new().unwrap();
        writeln!(topology, "* Top_all36_prot.rtf\n* 36 1\n*\n").unwrap();
        let structure = NamedTempFile::new().unwrap();
        let parameters = NamedTempFile::new().unwrap();

        let mut config = output_form(&dir);
        config.io.structure = Some(structure.path().to_path_buf());
        config.io.forcefield = Some(topology.path().to_path_buf());
        config.io.parameters = Some(parameters.path().to_path_buf());
        config.io.topology_format = TopologyFormat::ChamberPrmtop;
        let library = DryRunLibrary::new();
        let mut session = Session::new(&library, RecordingViewer::new(), config);

        session.save().unwrap();
        assert!(library.calls().contains(&LibraryCall::Write {
            format: "write_chamber_prmtop",
            path: dir.path().join("out.psf"),
        }));
    }

    #[test]
    fn chamber_output_without_titles_fails_before_writing() {
        let dir = TempDir::new().unwrap();
        let library = unchecked();
        let mut config = output_form(&dir);
        config.io.topology_format = TopologyFormat::ChamberPrmtop;
        let mut session = Session::new(&library, RecordingViewer::new(), config);

        let err = session.save().unwrap_err();
        assert!(matches!(err, SessionError::ForcefieldInfo(_)));
        assert_eq!(
            count(&library, |c| matches!(c, LibraryCall::Write { .. })),
            0
        );
    }

    #[test]
    fn total_charge_needs_a_model() {
        let library = unchecked().with_initial_charge(-3.0);
        let mut session = Session::new(&library, RecordingViewer::new(), form());
        assert!(matches!(
            session.total_charge(),
            Err(SessionError::NothingLoaded)
        ));
        session.load().unwrap();
        assert_eq!(session.total_charge().unwrap(), -3.0);
        session.execute(Stage::Ionization).unwrap();
        assert_eq!(session.total_charge().unwrap(), 0.0);
    }

    #[test]
    fn existing_structure_is_shown_as_original() {
        let library = unchecked();
        let mut session = Session::new(&library, RecordingViewer::new(), form());
        session.load().unwrap();

        let pdb = NamedTempFile::new().unwrap();
        assert!(session.set_structure_path(pdb.path()).unwrap());
        assert!(!session.is_loaded());
        assert_eq!(session.viewer().objects(), ["original"]);

        session.execute(Stage::Preparation).unwrap();
        assert_eq!(session.viewer().objects(), ["modified"]);

        assert!(!session.set_structure_path("missing.pdb").unwrap());
    }

    #[test]
    fn download_sets_the_structure_path() {
        let dir = TempDir::new().unwrap();
        let library = unchecked();
        let mut session = Session::new(&library, RecordingViewer::new(), form());

        let path = session.download_structure("1abc", dir.path()).unwrap();
        assert_eq!(path, dir.path().join("1ABC.pdb"));
        assert_eq!(session.config().io.structure.as_ref(), Some(&path));

        assert!(matches!(
            session.download_structure("  ", dir.path()),
            Err(SessionError::Validation(ValidationError::MissingPdbCode))
        ));
    }

    #[test]
    fn overlays_toggle_and_reset_clears_everything() {
        let library = unchecked();
        let mut config = form();
        config.solvation.use_padding = false;
        config.solvation.lengths = [Some(30.0); 3];
        let mut session = Session::new(&library, RecordingViewer::new(), config);

        assert!(session.toggle_axes().unwrap());
        assert!(session.toggle_box().unwrap());
        session.execute(Stage::Preparation).unwrap();
        assert_eq!(session.viewer().objects(), ["axes", "box", "modified"]);

        assert!(!session.toggle_box().unwrap());
        session.config_mut().solvation.shape = BoxShape::Sphere;
        session.config_mut().solvation.use_padding = true;
        assert!(session.toggle_box().unwrap());
        assert_eq!(session.viewer().objects(), ["axes", "modified", "sphere"]);

        session.reset().unwrap();
        assert!(session.viewer().objects().is_empty());
        assert!(session.model().is_none());
    }

    #[test]
    fn padded_cuboid_box_cannot_be_drawn() {
        let library = unchecked();
        let mut session = Session::new(&library, RecordingViewer::new(), form());
        assert!(matches!(
            session.toggle_box(),
            Err(SessionError::Validation(ValidationError::UnresolvedBox))
        ));
        assert!(session.viewer().calls.is_empty());
    }
}
