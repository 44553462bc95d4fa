//! Deformer CLI
//!
//! Evaluate skinned and blend-shape meshes from the command line.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use deformer::{
    asset::{document::SceneDocument, skin::SkinningType},
    hierarchy::NodeTransforms,
    influence, mesh, rig, EvaluationParams,
};
use deformer_perf_tracker::EvaluationTracker;
use log::{debug, info};

mod report;

use report::{EvaluationReport, MeshReport};

#[derive(Parser)]
#[command(name = "deformer")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Skinning and blend-shape evaluation", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Evaluation parameters (JSON)
    #[arg(short, long, global = true)]
    params: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare linear and dual quaternion skinning on a two-joint rig
    Demo {
        /// Limb rotation about Y in degrees, repeatable
        #[arg(short, long, default_values_t = [30.0, 90.0, 180.0])]
        angle: Vec<f64>,
    },

    /// Deform the meshes of a scene document
    Evaluate {
        /// Scene document (JSON)
        scene: PathBuf,

        /// Time in seconds, repeatable
        #[arg(short, long, default_values_t = [0.0])]
        time: Vec<f64>,

        /// Only evaluate this mesh
        #[arg(short, long)]
        mesh: Option<usize>,

        /// Use the scene's bind pose instead of the animated positions
        #[arg(long)]
        bind_pose: bool,

        /// Write the positions to this file instead of printing them
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the global and local transform of every node
    Transforms {
        /// Scene document (JSON)
        scene: PathBuf,

        /// Time in seconds
        #[arg(short, long, default_value = "0.0")]
        time: f64,
    },

    /// Print the packed joint influences of a skinned mesh
    Influences {
        /// Scene document (JSON)
        scene: PathBuf,

        /// Mesh index
        #[arg(short, long, default_value = "0")]
        mesh: usize,

        /// Time in seconds for the skinning matrices
        #[arg(short, long, default_value = "0.0")]
        time: f64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let params = load_params(cli.params.as_deref())?;
    params.validate().context("Invalid evaluation parameters")?;
    debug!("Evaluation params: {:?}", params);

    match cli.command {
        Commands::Demo { angle } => cmd_demo(&angle, &params),
        Commands::Evaluate {
            scene,
            time,
            mesh,
            bind_pose,
            output,
        } => cmd_evaluate(&scene, &time, mesh, bind_pose, output.as_deref(), &params),
        Commands::Transforms { scene, time } => cmd_transforms(&scene, time),
        Commands::Influences { scene, mesh, time } => {
            cmd_influences(&scene, mesh, time, &params)
        }
    }
}

fn load_params(path: Option<&Path>) -> Result<EvaluationParams> {
    let Some(path) = path else {
        return Ok(EvaluationParams::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn load_document(path: &Path) -> Result<SceneDocument> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let document: SceneDocument = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    info!(
        "Loaded {}: {} nodes, {} meshes, {} animations",
        path.display(),
        document.scene.len(),
        document.meshes.len(),
        document.animations.len()
    );
    Ok(document)
}

fn cmd_demo(angles: &[f64], params: &EvaluationParams) -> Result<()> {
    let mut tracker = EvaluationTracker::new(angles.len() * 2);

    for angle in angles {
        let linear = rig::two_joint_rig(*angle, SkinningType::Linear);
        let dual_quaternion = rig::two_joint_rig(*angle, SkinningType::DualQuaternion);

        let linear = tracker.measure(|| mesh::deform_document(&linear, params, None, 0.0))?;
        let dual_quaternion =
            tracker.measure(|| mesh::deform_document(&dual_quaternion, params, None, 0.0))?;

        println!("Limb rotated by {:.1} degrees", angle);
        println!(
            "  {:>5}  {:>28}  {:>28}  {:>10}",
            "point", "linear", "dual quaternion", "divergence"
        );
        for (index, (linear, dual_quaternion)) in
            linear[0].iter().zip(&dual_quaternion[0]).enumerate()
        {
            println!(
                "  {:>5}  {:>28}  {:>28}  {:>10.4}",
                index,
                report::format_point(linear),
                report::format_point(dual_quaternion),
                linear.distance(*dual_quaternion)
            );
        }
    }

    report_timing(&tracker);
    Ok(())
}

fn cmd_evaluate(
    path: &Path,
    times: &[f64],
    mesh_index: Option<usize>,
    bind_pose: bool,
    output: Option<&Path>,
    params: &EvaluationParams,
) -> Result<()> {
    let document = load_document(path)?;
    if let Some(index) = mesh_index {
        if index >= document.meshes.len() {
            bail!(
                "Mesh {} not found, the scene has {}",
                index,
                document.meshes.len()
            );
        }
    }
    let pose = if bind_pose {
        Some(document.bind_pose().cloned().context("The scene has no bind pose")?)
    } else {
        None
    };
    let selected: Vec<usize> = match mesh_index {
        Some(index) => vec![index],
        None => (0..document.meshes.len()).collect(),
    };

    let mut tracker = EvaluationTracker::new(times.len());
    let mut reports = Vec::with_capacity(times.len());
    for time in times {
        let meshes = tracker
            .measure(|| mesh::deform_document(&document, params, pose.as_ref(), *time))
            .with_context(|| format!("Failed to evaluate at {}s", time))?;
        let meshes = selected
            .iter()
            .map(|index| MeshReport::new(*index, &document.meshes[*index], &meshes[*index]))
            .collect();
        reports.push(EvaluationReport {
            time: *time,
            meshes,
        });
    }

    match output {
        Some(output) => {
            let json = serde_json::to_string_pretty(&reports)?;
            fs::write(output, json)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            info!("Wrote {} evaluations to {}", reports.len(), output.display());
        }
        None => {
            for report in &reports {
                report.print();
            }
        }
    }

    report_timing(&tracker);
    Ok(())
}

fn cmd_transforms(path: &Path, time: f64) -> Result<()> {
    let document = load_document(path)?;
    let scene = deformer::animation::apply_animations(&document.scene, &document.animations, time);
    let transforms = NodeTransforms::from_scene(&scene).context("Invalid node hierarchy")?;

    for (id, global) in transforms.iter() {
        let name = scene
            .node(id)
            .and_then(|node| node.name.as_deref())
            .unwrap_or("<unnamed>");
        println!("Node {} {}", id, name);
        println!("  global:");
        report::print_matrix(global);
        if let Some(local) = transforms.local(id) {
            println!("  local:");
            report::print_matrix(&local);
        }
    }
    Ok(())
}

fn cmd_influences(
    path: &Path,
    mesh_index: usize,
    time: f64,
    params: &EvaluationParams,
) -> Result<()> {
    let document = load_document(path)?;
    let mesh = document
        .meshes
        .get(mesh_index)
        .with_context(|| format!("Mesh {} not found", mesh_index))?;
    let skin = mesh
        .skins
        .first()
        .with_context(|| format!("Mesh {} has no skin", mesh_index))?;

    match influence::find_root_cluster(&document.scene, skin) {
        Some(root) => println!("Root joint: {}", root),
        None => println!("Root joint: none"),
    }

    let scene = deformer::animation::apply_animations(&document.scene, &document.animations, time);
    let transforms = NodeTransforms::from_scene(&scene).context("Invalid node hierarchy")?;
    for (index, cluster) in skin.clusters.iter().enumerate() {
        println!("Joint {} inverse bind matrix:", index);
        report::print_matrix(&influence::inverse_bind_matrix(cluster));
        if let Some(global) = cluster.link.and_then(|link| transforms.global(link)) {
            println!("Joint {} skinning matrix at {:.3}s:", index, time);
            report::print_matrix(&influence::skinning_matrix(cluster, &global));
        }
    }

    let packed = influence::pack_influences(skin, mesh.vertex_count(), params.max_influences);
    println!(
        "Up to {} influences per vertex in {} subsets",
        packed.max_influences(),
        packed.subset_count()
    );
    for vertex in 0..packed.vertex_count() {
        for subset in 0..packed.subset_count() {
            let (joints, weights) = packed.subset(vertex, subset);
            println!(
                "  vertex {:>4} [{}]: joints {:?} weights {:?}",
                vertex, subset, joints, weights
            );
        }
    }
    Ok(())
}

fn report_timing(tracker: &EvaluationTracker) {
    if let (Some(average), Some(last)) = (tracker.avg_time(), tracker.last_time()) {
        info!(
            "{} evaluations, average {:?}, last {:?}",
            tracker.len(),
            average,
            last
        );
    }
    if let Some(rate) = tracker.evaluations_per_second() {
        debug!("{:.1} evaluations per second", rate);
    }
}
