use emdy_setup::core::viewer::Viewer;
use nalgebra::Vector3;
use std::convert::Infallible;
use std::path::Path;
use tracing::info;

/// Stands in for a molecular viewer on the command line: every display
/// request is logged and the object names are kept for the final summary.
#[derive(Debug, Default)]
pub struct LogViewer {
    objects: Vec<String>,
}

impl LogViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn objects(&self) -> &[String] {
        &self.objects
    }

    fn show(&mut self, name: &str) {
        self.objects.retain(|o| o != name);
        self.objects.push(name.to_string());
    }
}

impl Viewer for LogViewer {
    type Error = Infallible;

    fn load_pdb_text(&mut self, name: &str, pdb: &str) -> Result<(), Infallible> {
        info!(object = name, lines = pdb.lines().count(), "Loaded model into viewer.");
        self.show(name);
        Ok(())
    }

    fn load_file(&mut self, name: &str, path: &Path) -> Result<(), Infallible> {
        info!(object = name, path = %path.display(), "Loaded file into viewer.");
        self.show(name);
        Ok(())
    }

    fn show_segment_as_spheres(&mut self, object: &str, segment: &str) -> Result<(), Infallible> {
        info!(object, segment, "Showing segment as spheres.");
        Ok(())
    }

    fn delete(&mut self, name: &str) -> Result<(), Infallible> {
        self.objects.retain(|o| o != name);
        Ok(())
    }

    fn draw_axes(&mut self, name: &str) -> Result<(), Infallible> {
        self.show(name);
        Ok(())
    }

    fn draw_box(&mut self, name: &str, corners: &[Vector3<f64>; 8]) -> Result<(), Infallible> {
        for (i, corner) in corners.iter().enumerate() {
            info!(
                "{} corner {}: ({:.3}, {:.3}, {:.3})",
                name, i, corner.x, corner.y, corner.z
            );
        }
        self.show(name);
        Ok(())
    }

    fn draw_sphere(
        &mut self,
        name: &str,
        center: &Vector3<f64>,
        radius: f64,
    ) -> Result<(), Infallible> {
        info!(
            "{} at ({:.3}, {:.3}, {:.3}) with radius {:.3}",
            name, center.x, center.y, center.z, radius
        );
        self.show(name);
        Ok(())
    }
}
