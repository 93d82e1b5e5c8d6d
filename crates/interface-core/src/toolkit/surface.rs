use crate::core::units::{Length, LengthUnit};
use kiddo::{KdTree, SquaredEuclidean};
use nalgebra::Point3;
use std::f64::consts::PI;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub const DEFAULT_PROBE_RADIUS: Length = Length::angstroms(1.4);
pub const DEFAULT_SPHERE_POINTS: usize = 960;

/// Unit vectors spread evenly over a sphere along a golden-angle spiral.
fn golden_spiral_points(n_points: usize) -> Vec<[f64; 3]> {
    if n_points <= 1 {
        return vec![[0.0, 1.0, 0.0]; n_points];
    }
    let golden_angle = PI * (3.0 - 5.0_f64.sqrt());
    (0..n_points)
        .map(|i| {
            let y = 1.0 - (i as f64 / (n_points - 1) as f64) * 2.0;
            let radius = (1.0 - y * y).sqrt();
            let theta = golden_angle * i as f64;
            [theta.cos() * radius, y, theta.sin() * radius]
        })
        .collect()
}

/// Shrake–Rupley numerical surface integration.
///
/// Each atom is inflated by the probe radius and sampled with a fixed set of test points;
/// the accessible area is the fraction of points not inside any neighbouring inflated atom,
/// times the inflated sphere's area.
#[derive(Debug, Clone)]
pub struct ShrakeRupley {
    probe_radius: f64,
    sphere: Vec<[f64; 3]>,
}

impl Default for ShrakeRupley {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_RADIUS, DEFAULT_SPHERE_POINTS)
    }
}

impl ShrakeRupley {
    pub fn new(probe_radius: Length, n_points: usize) -> Self {
        Self {
            probe_radius: probe_radius.value_in(LengthUnit::Angstrom),
            sphere: golden_spiral_points(n_points.max(1)),
        }
    }

    pub fn probe_radius(&self) -> Length {
        Length::angstroms(self.probe_radius)
    }

    pub fn n_points(&self) -> usize {
        self.sphere.len()
    }

    /// Accessible area of every atom in Angstroms squared.
    ///
    /// `coords` and `radii_angstrom` are parallel; every atom in `coords` occludes the others.
    pub fn atom_areas(&self, coords: &[Point3<f64>], radii_angstrom: &[f64]) -> Vec<f64> {
        if coords.is_empty() {
            return Vec::new();
        }

        let extended: Vec<f64> = radii_angstrom
            .iter()
            .map(|r| r + self.probe_radius)
            .collect();
        let max_extended = extended.iter().copied().fold(0.0_f64, f64::max);

        let positions: Vec<[f64; 3]> = coords.iter().map(|p| [p.x, p.y, p.z]).collect();
        let kdtree: KdTree<f64, 3> = (&positions).into();

        let atom_area = |i: usize| -> f64 {
            let center = &coords[i];
            let radius = extended[i];
            let search = radius + max_extended;

            let neighbours: Vec<usize> = kdtree
                .within_unsorted::<SquaredEuclidean>(&positions[i], search * search)
                .into_iter()
                .map(|n| n.item as usize)
                .filter(|&j| {
                    let reach = radius + extended[j];
                    j != i && nalgebra::distance_squared(center, &coords[j]) < reach * reach
                })
                .collect();

            let accessible = self
                .sphere
                .iter()
                .filter(|u| {
                    let point = Point3::new(
                        center.x + u[0] * radius,
                        center.y + u[1] * radius,
                        center.z + u[2] * radius,
                    );
                    neighbours.iter().all(|&j| {
                        nalgebra::distance_squared(&point, &coords[j]) > extended[j] * extended[j]
                    })
                })
                .count();

            accessible as f64 / self.sphere.len() as f64 * 4.0 * PI * radius * radius
        };

        #[cfg(feature = "parallel")]
        let areas = (0..coords.len()).into_par_iter().map(atom_area).collect();

        #[cfg(not(feature = "parallel"))]
        let areas = (0..coords.len()).map(atom_area).collect();

        areas
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f64_approx_equal(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() < tolerance
    }

    #[test]
    fn spiral_points_lie_on_unit_sphere() {
        let points = golden_spiral_points(960);
        assert_eq!(points.len(), 960);
        for p in &points {
            let norm = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
            assert!(f64_approx_equal(norm, 1.0, 1e-9));
        }
        assert_eq!(golden_spiral_points(1).len(), 1);
    }

    #[test]
    fn isolated_atom_exposes_full_inflated_sphere() {
        let sr = ShrakeRupley::default();
        let areas = sr.atom_areas(&[Point3::origin()], &[1.7]);
        let expected = 4.0 * PI * (1.7 + 1.4) * (1.7 + 1.4);
        assert!(f64_approx_equal(areas[0], expected, 1e-9));
    }

    #[test]
    fn overlapping_atoms_bury_part_of_each_other() {
        let sr = ShrakeRupley::default();
        let coords = [Point3::origin(), Point3::new(3.0, 0.0, 0.0)];
        let areas = sr.atom_areas(&coords, &[1.7, 1.7]);
        let free = 4.0 * PI * 3.1 * 3.1;

        assert!(areas[0] < free && areas[0] > 0.5 * free);
        assert!(f64_approx_equal(areas[0], areas[1], free * 0.02));
    }

    #[test]
    fn engulfed_atom_has_no_accessible_area() {
        let sr = ShrakeRupley::default();
        let coords = [Point3::origin(), Point3::new(0.2, 0.0, 0.0)];
        let areas = sr.atom_areas(&coords, &[3.0, 0.5]);
        assert_eq!(areas[1], 0.0);
        assert!(areas[0] > 0.0);
    }

    #[test]
    fn distant_atoms_do_not_interact() {
        let sr = ShrakeRupley::new(Length::nanometers(0.14), 100);
        let coords = [Point3::origin(), Point3::new(50.0, 0.0, 0.0)];
        let areas = sr.atom_areas(&coords, &[1.5, 1.2]);
        assert!(f64_approx_equal(areas[0], 4.0 * PI * 2.9 * 2.9, 1e-6));
        assert!(f64_approx_equal(areas[1], 4.0 * PI * 2.6 * 2.6, 1e-6));
        assert_eq!(sr.n_points(), 100);
    }

    #[test]
    fn empty_input_yields_no_areas() {
        assert!(ShrakeRupley::default().atom_areas(&[], &[]).is_empty());
    }
}
