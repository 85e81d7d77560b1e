//! Collaborators that record what would happen instead of modeling anything.
//!
//! [`DryRunLibrary`] checks that input files exist, reads the title block of
//! CHARMM topology files and otherwise only records each call, which is enough
//! to drive the whole pipeline from the command line or from tests.
//! [`RecordingViewer`] keeps the list of displayed objects.

use super::library::{IonizationRequest, PrmtopFlavor, SetupLibrary, SolvationRequest};
use super::models::preparation::PreparationOptions;
use super::models::solvent::BoxShape;
use super::viewer::Viewer;
use nalgebra::Vector3;
use std::cell::RefCell;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum DryRunError {
    #[error("Cannot read '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("'{0}' is not a valid PDB code")]
    InvalidCode(String),
    #[error("Simulated failure in '{0}'")]
    Injected(&'static str),
}

/// A library call as recorded by [`DryRunLibrary`].
#[derive(Debug, Clone, PartialEq)]
pub enum LibraryCall {
    ReadStructure(PathBuf),
    ReadTopology(PathBuf),
    ReadParameters(PathBuf),
    Download { code: String, directory: PathBuf },
    BuildTopology(PreparationOptions),
    CompleteCoordinates,
    Solvate {
        shape: BoxShape,
        request: SolvationRequest,
    },
    IonizeRandomly(IonizationRequest),
    IonizeByPotential(IonizationRequest),
    RenderPdb,
    Write { format: &'static str, path: PathBuf },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DryRunModel {
    pub source: PathBuf,
    /// Names of the transformations applied so far, oldest first.
    pub history: Vec<String>,
    pub net_charge: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DryRunTopology {
    pub path: PathBuf,
    pub titles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DryRunParameters {
    pub path: PathBuf,
}

#[derive(Debug)]
pub struct DryRunLibrary {
    calls: RefCell<Vec<LibraryCall>>,
    initial_charge: f64,
    fail_on: Option<&'static str>,
    verify_inputs: bool,
}

impl Default for DryRunLibrary {
    fn default() -> Self {
        Self {
            calls: RefCell::default(),
            initial_charge: 0.0,
            fail_on: None,
            verify_inputs: true,
        }
    }
}

impl DryRunLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Net charge reported for freshly read structures.
    pub fn with_initial_charge(mut self, charge: f64) -> Self {
        self.initial_charge = charge;
        self
    }

    /// Makes the named operation (e.g. `"solvate_cuboid"`) fail every time.
    pub fn failing_on(mut self, operation: &'static str) -> Self {
        self.fail_on = Some(operation);
        self
    }

    /// Skips the existence check on input paths.
    pub fn without_input_checks(mut self) -> Self {
        self.verify_inputs = false;
        self
    }

    pub fn calls(&self) -> Vec<LibraryCall> {
        self.calls.borrow().clone()
    }

    fn record(&self, operation: &'static str, call: LibraryCall) -> Result<(), DryRunError> {
        debug!(operation, "dry-run library call");
        self.calls.borrow_mut().push(call);
        if self.fail_on == Some(operation) {
            return Err(DryRunError::Injected(operation));
        }
        Ok(())
    }

    fn check_readable(&self, path: &Path) -> Result<(), DryRunError> {
        if !self.verify_inputs {
            return Ok(());
        }
        fs::File::open(path).map(drop).map_err(|source| DryRunError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    fn transformed(&self, model: &DryRunModel, step: &str) -> DryRunModel {
        let mut next = model.clone();
        next.history.push(step.to_string());
        next
    }

    fn solvated(
        &self,
        operation: &'static str,
        shape: BoxShape,
        model: &DryRunModel,
        request: &SolvationRequest,
    ) -> Result<DryRunModel, DryRunError> {
        self.record(
            operation,
            LibraryCall::Solvate {
                shape,
                request: request.clone(),
            },
        )?;
        Ok(self.transformed(model, operation))
    }

    fn ionized(
        &self,
        operation: &'static str,
        call: LibraryCall,
        model: &DryRunModel,
        request: &IonizationRequest,
    ) -> Result<DryRunModel, DryRunError> {
        self.record(operation, call)?;
        let mut next = self.transformed(model, operation);
        if request.cation_count == 0 && request.anion_count == 0 {
            next.net_charge = 0.0;
        }
        Ok(next)
    }

    fn written(&self, operation: &'static str, path: &Path) -> Result<(), DryRunError> {
        self.record(
            operation,
            LibraryCall::Write {
                format: operation,
                path: path.to_path_buf(),
            },
        )
    }
}

/// Reads the leading `*` title block of a CHARMM topology or parameter file.
///
/// Topology files put the version line (`36  1`) after the closing `*`; when
/// present it is appended as the last title.
fn read_charmm_titles(path: &Path) -> Result<Vec<String>, DryRunError> {
    let io_err = |source: std::io::Error| DryRunError::Io {
        path: path.to_path_buf(),
        source,
    };
    let reader = BufReader::new(fs::File::open(path).map_err(io_err)?);
    let mut titles = Vec::new();
    let mut block_closed = false;
    for line in reader.lines() {
        let line = line.map_err(io_err)?;
        let trimmed = line.trim();
        if trimmed.starts_with('!') || (trimmed.is_empty() && (titles.is_empty() || block_closed)) {
            continue;
        }
        if block_closed {
            if is_version_line(trimmed) {
                titles.push(trimmed.to_string());
            }
            break;
        }
        let Some(rest) = trimmed.strip_prefix('*') else {
            break;
        };
        let text = rest.trim();
        if text.is_empty() {
            block_closed = true;
            continue;
        }
        titles.push(text.to_string());
    }
    Ok(titles)
}

fn is_version_line(line: &str) -> bool {
    line.split_whitespace()
        .next()
        .is_some_and(|token| token.parse::<u32>().is_ok())
}

impl SetupLibrary for DryRunLibrary {
    type Model = DryRunModel;
    type Topology = DryRunTopology;
    type Parameters = DryRunParameters;
    type Error = DryRunError;

    fn read_structure(&self, path: &Path) -> Result<DryRunModel, DryRunError> {
        self.record("read_structure", LibraryCall::ReadStructure(path.to_path_buf()))?;
        self.check_readable(path)?;
        Ok(DryRunModel {
            source: path.to_path_buf(),
            history: Vec::new(),
            net_charge: self.initial_charge,
        })
    }

    fn read_topology(&self, path: &Path) -> Result<DryRunTopology, DryRunError> {
        self.record("read_topology", LibraryCall::ReadTopology(path.to_path_buf()))?;
        let titles = if self.verify_inputs {
            read_charmm_titles(path)?
        } else {
            Vec::new()
        };
        Ok(DryRunTopology {
            path: path.to_path_buf(),
            titles,
        })
    }

    fn read_parameters(&self, path: &Path) -> Result<DryRunParameters, DryRunError> {
        self.record("read_parameters", LibraryCall::ReadParameters(path.to_path_buf()))?;
        self.check_readable(path)?;
        Ok(DryRunParameters {
            path: path.to_path_buf(),
        })
    }

    fn download_structure(&self, code: &str, directory: &Path) -> Result<PathBuf, DryRunError> {
        self.record(
            "download_structure",
            LibraryCall::Download {
                code: code.to_string(),
                directory: directory.to_path_buf(),
            },
        )?;
        if code.len() != 4 || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DryRunError::InvalidCode(code.to_string()));
        }
        Ok(directory.join(format!("{}.pdb", code.to_uppercase())))
    }

    fn build_topology(
        &self,
        model: &DryRunModel,
        _topology: &DryRunTopology,
        options: &PreparationOptions,
    ) -> Result<DryRunModel, DryRunError> {
        self.record("build_topology", LibraryCall::BuildTopology(options.clone()))?;
        Ok(self.transformed(model, "build_topology"))
    }

    fn complete_coordinates(
        &self,
        model: &DryRunModel,
        _parameters: &DryRunParameters,
    ) -> Result<DryRunModel, DryRunError> {
        self.record("complete_coordinates", LibraryCall::CompleteCoordinates)?;
        Ok(self.transformed(model, "complete_coordinates"))
    }

    fn solvate_cuboid(
        &self,
        model: &DryRunModel,
        request: &SolvationRequest,
    ) -> Result<DryRunModel, DryRunError> {
        self.solvated("solvate_cuboid", BoxShape::Cuboid, model, request)
    }

    fn solvate_truncated_octahedron(
        &self,
        model: &DryRunModel,
        request: &SolvationRequest,
    ) -> Result<DryRunModel, DryRunError> {
        self.solvated(
            "solvate_truncated_octahedron",
            BoxShape::TruncatedOctahedron,
            model,
            request,
        )
    }

    fn solvate_hexagonal_prism(
        &self,
        model: &DryRunModel,
        request: &SolvationRequest,
    ) -> Result<DryRunModel, DryRunError> {
        self.solvated(
            "solvate_hexagonal_prism",
            BoxShape::HexagonalPrism,
            model,
            request,
        )
    }

    fn solvate_rhombic_dodecahedron(
        &self,
        model: &DryRunModel,
        request: &SolvationRequest,
    ) -> Result<DryRunModel, DryRunError> {
        self.solvated(
            "solvate_rhombic_dodecahedron",
            BoxShape::RhombicDodecahedron,
            model,
            request,
        )
    }

    fn ionize_randomly(
        &self,
        model: &DryRunModel,
        request: &IonizationRequest,
    ) -> Result<DryRunModel, DryRunError> {
        self.ionized(
            "ionize_randomly",
            LibraryCall::IonizeRandomly(request.clone()),
            model,
            request,
        )
    }

    fn ionize_by_potential(
        &self,
        model: &DryRunModel,
        request: &IonizationRequest,
    ) -> Result<DryRunModel, DryRunError> {
        self.ionized(
            "ionize_by_potential",
            LibraryCall::IonizeByPotential(request.clone()),
            model,
            request,
        )
    }

    fn total_charge(&self, model: &DryRunModel) -> f64 {
        model.net_charge
    }

    fn topology_titles(&self, topology: &DryRunTopology) -> Vec<String> {
        topology.titles.clone()
    }

    fn render_pdb(&self, model: &DryRunModel) -> Result<String, DryRunError> {
        self.record("render_pdb", LibraryCall::RenderPdb)?;
        let mut pdb = format!("REMARK   1 SOURCE {}\n", model.source.display());
        for step in &model.history {
            pdb.push_str(&format!("REMARK   1 APPLIED {step}\n"));
        }
        pdb.push_str("END\n");
        Ok(pdb)
    }

    fn write_psf(&self, _model: &DryRunModel, path: &Path) -> Result<(), DryRunError> {
        self.written("write_psf", path)
    }

    fn write_prmtop(
        &self,
        _model: &DryRunModel,
        _parameters: &DryRunParameters,
        flavor: &PrmtopFlavor,
        path: &Path,
    ) -> Result<(), DryRunError> {
        match flavor {
            PrmtopFlavor::Amber => self.written("write_amber_prmtop", path),
            PrmtopFlavor::Chamber(_) => self.written("write_chamber_prmtop", path),
        }
    }

    fn write_pdb(&self, _model: &DryRunModel, path: &Path) -> Result<(), DryRunError> {
        self.written("write_pdb", path)
    }

    fn write_namd_bin(&self, _model: &DryRunModel, path: &Path) -> Result<(), DryRunError> {
        self.written("write_namd_bin", path)
    }

    fn write_amber_inpcrd(&self, _model: &DryRunModel, path: &Path) -> Result<(), DryRunError> {
        self.written("write_amber_inpcrd", path)
    }

    fn write_g96(&self, _model: &DryRunModel, path: &Path) -> Result<(), DryRunError> {
        self.written("write_g96", path)
    }

    fn write_gro(&self, _model: &DryRunModel, path: &Path) -> Result<(), DryRunError> {
        self.written("write_gro", path)
    }
}

/// A viewer call as recorded by [`RecordingViewer`].
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerCall {
    LoadPdbText { name: String, pdb: String },
    LoadFile { name: String, path: PathBuf },
    ShowSpheres { object: String, segment: String },
    Delete(String),
    DrawAxes(String),
    DrawBox(String),
    DrawSphere { name: String, radius: f64 },
}

#[derive(Debug, Default)]
pub struct RecordingViewer {
    pub calls: Vec<ViewerCall>,
    objects: Vec<String>,
}

impl RecordingViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names currently present in the viewer, in load order.
    pub fn objects(&self) -> &[String] {
        &self.objects
    }

    fn add(&mut self, name: &str) {
        self.objects.retain(|o| o != name);
        self.objects.push(name.to_string());
    }
}

#[derive(Debug, Error)]
#[error("Viewer has no object named '{0}'")]
pub struct UnknownObject(pub String);

impl Viewer for RecordingViewer {
    type Error = UnknownObject;

    fn load_pdb_text(&mut self, name: &str, pdb: &str) -> Result<(), UnknownObject> {
        self.calls.push(ViewerCall::LoadPdbText {
            name: name.to_string(),
            pdb: pdb.to_string(),
        });
        self.add(name);
        Ok(())
    }

    fn load_file(&mut self, name: &str, path: &Path) -> Result<(), UnknownObject> {
        self.calls.push(ViewerCall::LoadFile {
            name: name.to_string(),
            path: path.to_path_buf(),
        });
        self.add(name);
        Ok(())
    }

    fn show_segment_as_spheres(&mut self, object: &str, segment: &str) -> Result<(), UnknownObject> {
        if !self.objects.iter().any(|o| o == object) {
            return Err(UnknownObject(object.to_string()));
        }
        self.calls.push(ViewerCall::ShowSpheres {
            object: object.to_string(),
            segment: segment.to_string(),
        });
        Ok(())
    }

    fn delete(&mut self, name: &str) -> Result<(), UnknownObject> {
        self.calls.push(ViewerCall::Delete(name.to_string()));
        self.objects.retain(|o| o != name);
        Ok(())
    }

    fn draw_axes(&mut self, name: &str) -> Result<(), UnknownObject> {
        self.calls.push(ViewerCall::DrawAxes(name.to_string()));
        self.add(name);
        Ok(())
    }

    fn draw_box(&mut self, name: &str, _corners: &[Vector3<f64>; 8]) -> Result<(), UnknownObject> {
        self.calls.push(ViewerCall::DrawBox(name.to_string()));
        self.add(name);
        Ok(())
    }

    fn draw_sphere(
        &mut self,
        name: &str,
        _center: &Vector3<f64>,
        radius: f64,
    ) -> Result<(), UnknownObject> {
        self.calls.push(ViewerCall::DrawSphere {
            name: name.to_string(),
            radius,
        });
        self.add(name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::library::ForcefieldInfo;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn topology_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn charmm_title_block_is_read_until_the_blank_star_line() {
        let file = topology_file(
            "* Topology for proteins\n* modified by hand\n*\nMASS 1 H 1.008\n* not a title\n",
        );
        let titles = read_charmm_titles(file.path()).unwrap();
        assert_eq!(titles, vec!["Topology for proteins", "modified by hand"]);
    }

    #[test]
    fn version_line_after_the_title_block_is_kept_as_last_title() {
        let file = topology_file(concat!(
            "*>>>>>>>>CHARMM36 All-Hydrogen Topology File for Proteins <<<<<<\n",
            "*>>>>> Includes phi, psi cross term map (CMAP) correction <<<<<<\n",
            "*\n",
            "\n",
            "! version line follows\n",
            "36  1\n",
            "\n",
            "MASS  -1  H          1.00800\n",
        ));
        let lib = DryRunLibrary::new();
        let topology = lib.read_topology(file.path()).unwrap();
        let titles = lib.topology_titles(&topology);
        assert_eq!(titles.last().map(String::as_str), Some("36  1"));

        let info = ForcefieldInfo::from_titles(&titles).unwrap();
        assert_eq!(info.version, 36);
        assert_eq!(
            info.title,
            ">>>>>>>>CHARMM36 All-Hydrogen Topology File for Proteins <<<<<<"
        );
    }

    #[test]
    fn comments_before_the_title_block_are_skipped() {
        let file = topology_file("! comment\n\n* title\n* 36 2\n*\n");
        let titles = read_charmm_titles(file.path()).unwrap();
        assert_eq!(titles, vec!["title", "36 2"]);
    }

    #[test]
    fn missing_structure_is_an_io_error() {
        let lib = DryRunLibrary::new();
        let err = lib
            .read_structure(Path::new("/definitely/not/here.pdb"))
            .unwrap_err();
        assert!(matches!(err, DryRunError::Io { .. }));
        assert_eq!(
            lib.calls(),
            vec![LibraryCall::ReadStructure(PathBuf::from(
                "/definitely/not/here.pdb"
            ))]
        );
    }

    #[test]
    fn injected_failure_is_reported_for_the_named_operation_only() {
        let lib = DryRunLibrary::new()
            .without_input_checks()
            .failing_on("complete_coordinates");
        let model = lib.read_structure(Path::new("x.pdb")).unwrap();
        let params = lib.read_parameters(Path::new("x.prm")).unwrap();
        let err = lib.complete_coordinates(&model, &params).unwrap_err();
        assert!(matches!(err, DryRunError::Injected("complete_coordinates")));
    }

    #[test]
    fn download_builds_an_uppercase_path_and_validates_the_code() {
        let lib = DryRunLibrary::new();
        let path = lib.download_structure("1abc", Path::new("/tmp")).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/1ABC.pdb"));
        assert!(matches!(
            lib.download_structure("x", Path::new("/tmp")),
            Err(DryRunError::InvalidCode(_))
        ));
    }

    #[test]
    fn rendered_pdb_lists_the_applied_steps() {
        let lib = DryRunLibrary::new().without_input_checks();
        let model = lib.read_structure(Path::new("in.pdb")).unwrap();
        let model = lib.transformed(&model, "build_topology");
        let pdb = lib.render_pdb(&model).unwrap();
        assert!(pdb.contains("SOURCE in.pdb"));
        assert!(pdb.contains("APPLIED build_topology"));
        assert!(pdb.ends_with("END\n"));
    }

    #[test]
    fn recording_viewer_tracks_objects() {
        let mut viewer = RecordingViewer::new();
        viewer.load_pdb_text("modified", "END\n").unwrap();
        viewer.draw_axes("axes").unwrap();
        assert_eq!(viewer.objects(), ["modified", "axes"]);
        viewer.delete("modified").unwrap();
        assert_eq!(viewer.objects(), ["axes"]);
        assert!(viewer.show_segment_as_spheres("modified", "ION").is_err());
    }
}
