use nalgebra::Vector3;
use std::error::Error;
use std::path::Path;

/// Object names used in the host viewer.
pub mod objects {
    pub const ORIGINAL: &str = "original";
    pub const MODIFIED: &str = "modified";
    pub const SOLVATED: &str = "solvated";
    pub const IONIZED: &str = "ionized";
    pub const AXES: &str = "axes";
    pub const BOX: &str = "box";
    pub const SPHERE: &str = "sphere";
}

/// The host application's display surface.
pub trait Viewer {
    type Error: Error + Send + Sync + 'static;

    /// Loads PDB text as a new object called `name`.
    fn load_pdb_text(&mut self, name: &str, pdb: &str) -> Result<(), Self::Error>;
    fn load_file(&mut self, name: &str, path: &Path) -> Result<(), Self::Error>;
    /// Shows the atoms of `segment` within `object` as spheres.
    fn show_segment_as_spheres(&mut self, object: &str, segment: &str) -> Result<(), Self::Error>;
    fn delete(&mut self, name: &str) -> Result<(), Self::Error>;

    fn draw_axes(&mut self, name: &str) -> Result<(), Self::Error>;
    fn draw_box(&mut self, name: &str, corners: &[Vector3<f64>; 8]) -> Result<(), Self::Error>;
    fn draw_sphere(
        &mut self,
        name: &str,
        center: &Vector3<f64>,
        radius: f64,
    ) -> Result<(), Self::Error>;
}
