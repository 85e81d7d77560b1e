use nalgebra::Vector3;
use std::f64::consts::PI;

/// A fully specified solvation boundary, as used for drawing and volume estimates.
#[derive(Debug, Clone, PartialEq)]
pub enum BoxGeometry {
    /// Periodic cell given by edge lengths (Å) and angles α, β, γ (degrees).
    Cell {
        center: Vector3<f64>,
        lengths: [f64; 3],
        angles: [f64; 3],
    },
    Sphere { center: Vector3<f64>, radius: f64 },
}

impl BoxGeometry {
    pub fn center(&self) -> Vector3<f64> {
        match self {
            BoxGeometry::Cell { center, .. } | BoxGeometry::Sphere { center, .. } => *center,
        }
    }

    /// Lattice vectors of a periodic cell in the usual orientation: `a` along x,
    /// `b` in the xy plane.
    ///
    /// Returns `None` for spheres and for angle triples that do not close a cell.
    pub fn cell_vectors(&self) -> Option<[Vector3<f64>; 3]> {
        let BoxGeometry::Cell {
            lengths: [a, b, c],
            angles: [alpha, beta, gamma],
            ..
        } = *self
        else {
            return None;
        };

        let (cos_a, cos_b) = (alpha.to_radians().cos(), beta.to_radians().cos());
        let (sin_g, cos_g) = gamma.to_radians().sin_cos();
        if sin_g.abs() < f64::EPSILON {
            return None;
        }

        let cx = c * cos_b;
        let cy = c * (cos_a - cos_b * cos_g) / sin_g;
        let cz_sq = c * c - cx * cx - cy * cy;
        if cz_sq <= 0.0 {
            return None;
        }

        Some([
            Vector3::new(a, 0.0, 0.0),
            Vector3::new(b * cos_g, b * sin_g, 0.0),
            Vector3::new(cx, cy, cz_sq.sqrt()),
        ])
    }

    /// Enclosed volume in Å³, or `None` for a degenerate cell.
    pub fn volume(&self) -> Option<f64> {
        match self {
            BoxGeometry::Sphere { radius, .. } => Some(4.0 / 3.0 * PI * radius.powi(3)),
            BoxGeometry::Cell { .. } => {
                let [a, b, c] = self.cell_vectors()?;
                Some(a.dot(&b.cross(&c)).abs())
            }
        }
    }

    /// The eight corners of a periodic cell centred on its `center`, ordered by
    /// the bit pattern (a, b, c) of the index.
    pub fn corners(&self) -> Option<[Vector3<f64>; 8]> {
        let [a, b, c] = self.cell_vectors()?;
        let origin = self.center() - (a + b + c) / 2.0;
        Some(std::array::from_fn(|i| {
            let mut p = origin;
            if i & 1 != 0 {
                p += a;
            }
            if i & 2 != 0 {
                p += b;
            }
            if i & 4 != 0 {
                p += c;
            }
            p
        }))
    }
}
