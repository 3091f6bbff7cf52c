use argh::FromArgs;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use facewarp::k3d::io::{landmarks, obj};
use facewarp::registration::{self, AlignParams};

#[derive(FromArgs)]
/// Align a mesh to a reference through corresponding landmarks
struct Args {
    /// path to the OBJ mesh to move
    #[argh(option)]
    mesh: PathBuf,

    /// path to the landmarks of the mesh, one `x y z` per line
    #[argh(option)]
    landmarks: PathBuf,

    /// path to the reference landmarks, same order as `--landmarks`
    #[argh(option)]
    reference: PathBuf,

    /// estimate a rigid transform only, keeping the mesh scale
    #[argh(switch)]
    no_scale: bool,

    /// path of the aligned OBJ, stdout when omitted
    #[argh(option)]
    output: Option<PathBuf>,

    /// path to write the estimated transform as JSON
    #[argh(option)]
    transform_json: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let source = landmarks::read_landmarks(&args.landmarks)?;
    let target = landmarks::read_landmarks(&args.reference)?;
    log::info!("Read {} source and {} reference landmarks", source.len(), target.len());

    let params = AlignParams {
        estimate_scale: !args.no_scale,
        ..Default::default()
    };
    let transform = registration::align_with_params(&source, &target, &params)?;

    let residual = registration::residual(&source, &target, &transform)?;
    log::info!("Landmark RMSE after alignment: {}", (residual / source.len() as f64).sqrt());
    for row in transform.to_homogeneous() {
        log::info!("{:>12.6} {:>12.6} {:>12.6} {:>12.6}", row[0], row[1], row[2], row[3]);
    }

    if let Some(path) = &args.transform_json {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, &transform)?;
    }

    let reader = BufReader::new(File::open(&args.mesh)?);
    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    };
    let num_vertices = obj::rewrite_obj_vertices(reader, writer, |_, p| transform.apply(p))?;
    log::info!("Aligned {num_vertices} mesh vertices");

    Ok(())
}
