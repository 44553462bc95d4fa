use deformer::asset::mesh::MeshAsset;
use glam::{DMat4, DVec3};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct MeshReport {
    pub index: usize,
    pub name: Option<String>,
    pub points: Vec<[f64; 3]>,
}

impl MeshReport {
    pub fn new(index: usize, mesh: &MeshAsset, points: &[DVec3]) -> Self {
        Self {
            index,
            name: mesh.name.clone(),
            points: points.iter().map(|point| point.to_array()).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EvaluationReport {
    pub time: f64,
    pub meshes: Vec<MeshReport>,
}

impl EvaluationReport {
    pub fn print(&self) {
        println!("Time {:.3}s", self.time);
        for mesh in &self.meshes {
            println!(
                "  Mesh {} {}",
                mesh.index,
                mesh.name.as_deref().unwrap_or("<unnamed>")
            );
            for (index, point) in mesh.points.iter().enumerate() {
                println!(
                    "    {:>5}  {}",
                    index,
                    format_point(&DVec3::from_array(*point))
                );
            }
        }
    }
}

pub fn format_point(point: &DVec3) -> String {
    format!("({:.4}, {:.4}, {:.4})", point.x, point.y, point.z)
}

/// Rows of the matrix, translation in the last column.
pub fn print_matrix(matrix: &DMat4) {
    for row in 0..4 {
        let row = matrix.row(row);
        println!(
            "    {:>10.4} {:>10.4} {:>10.4} {:>10.4}",
            row.x, row.y, row.z, row.w
        );
    }
}
