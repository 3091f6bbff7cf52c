use argh::FromArgs;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use facewarp::k3d::io::{landmarks, obj};
use facewarp::tps::{ControlPair, TpsModel, TpsParams};

#[derive(FromArgs)]
/// Warp a mesh with a thin-plate spline through control landmarks
struct Args {
    /// path to the OBJ mesh to warp
    #[argh(option)]
    mesh: PathBuf,

    /// path to the control landmarks on the mesh
    #[argh(option)]
    controls: PathBuf,

    /// path to the positions the control landmarks move to
    #[argh(option)]
    data: PathBuf,

    /// smoothing weight, 0 interpolates the landmarks exactly
    #[argh(option, default = "0.0")]
    lambda: f64,

    /// relative magnitude below which derived coefficients are set to zero
    #[argh(option, default = "1e-6")]
    snap_ratio: f64,

    /// path of the warped OBJ, stdout when omitted
    #[argh(option)]
    output: Option<PathBuf>,

    /// path to write the vertex influence matrix as JSON rows
    #[argh(option)]
    influence: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let controls = landmarks::read_landmarks(&args.controls)?;
    let data = landmarks::read_landmarks(&args.data)?;
    if controls.len() != data.len() {
        return Err(format!(
            "{} control landmarks but {} data landmarks",
            controls.len(),
            data.len()
        )
        .into());
    }

    let pairs = controls
        .into_iter()
        .zip(data)
        .map(ControlPair::from)
        .collect::<Vec<_>>();

    let params = TpsParams {
        lambda: args.lambda,
        snap_ratio: args.snap_ratio,
        ..Default::default()
    };
    let model = TpsModel::build_with_params(&pairs, &params)?;
    log::info!(
        "Built spline from {} control points, bending energy {}",
        model.num_control_points(),
        model.bending_energy()
    );

    let vertices = obj::read_obj_vertices(&args.mesh)?;
    let warped = model.warp_points_par(&vertices.positions);

    if let Some(path) = &args.influence {
        let influence = model.influence_matrix(&vertices.positions);
        let rows = (0..influence.nrows())
            .map(|i| (0..influence.ncols()).map(|j| influence.read(i, j)).collect())
            .collect::<Vec<Vec<f64>>>();
        serde_json::to_writer(BufWriter::new(File::create(path)?), &rows)?;
        log::info!("Wrote {}x{} influence matrix", influence.nrows(), influence.ncols());
    }

    let reader = BufReader::new(File::open(&args.mesh)?);
    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    };
    let num_vertices = obj::rewrite_obj_vertices(reader, writer, |i, p| {
        warped.get(i).copied().unwrap_or(*p)
    })?;
    log::info!("Warped {num_vertices} mesh vertices");

    Ok(())
}
