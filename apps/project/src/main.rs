use argh::FromArgs;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use facewarp::k3d::io::obj;
use facewarp::k3d::PointSet;
use facewarp::registration;

#[derive(FromArgs)]
/// Project a mesh onto the nearest vertices of a target mesh
struct Args {
    /// path to the OBJ mesh to project
    #[argh(option)]
    source: PathBuf,

    /// path to the OBJ mesh to project onto
    #[argh(option)]
    target: PathBuf,

    /// blend between the source (0) and its nearest target vertex (1)
    #[argh(option, default = "1.0")]
    weight: f64,

    /// search the nearest vertices on all cores
    #[argh(switch)]
    parallel: bool,

    /// path of the projected OBJ, stdout when omitted
    #[argh(option)]
    output: Option<PathBuf>,

    /// path to write the correspondences as JSON
    #[argh(option)]
    report: Option<PathBuf>,
}

fn log_bounds(name: &str, points: &PointSet) {
    if let (Some(lo), Some(hi)) = (points.min_bound(), points.max_bound()) {
        log::info!("{name}: #{} vertices, bounds {lo:?} - {hi:?}", points.len());
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let source = obj::read_obj_vertices(&args.source)?;
    let target = obj::read_obj_vertices(&args.target)?;

    let source_points = PointSet::new(source.positions);
    let target_points = PointSet::new(target.positions);
    log_bounds("source", &source_points);
    log_bounds("target", &target_points);

    let map = if args.parallel {
        registration::find_correspondences_par(source_points.points(), target_points.points())?
    } else {
        registration::find_correspondences(source_points.points(), target_points.points())?
    };
    if let Some(rmse) = map.rmse() {
        log::info!("Nearest vertex RMSE: {rmse}");
    }

    if let Some(path) = &args.report {
        serde_json::to_writer_pretty(BufWriter::new(File::create(path)?), &map)?;
    }

    let projected = registration::project_onto(
        source_points.points(),
        target_points.points(),
        &map,
        args.weight,
    )?;

    let reader = BufReader::new(File::open(&args.source)?);
    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    };
    let num_vertices = match &target.colors {
        Some(colors) => {
            let colors = registration::transfer_attributes(&map, colors)?;
            obj::rewrite_obj_vertices_colored(reader, writer, |i, p| {
                (
                    projected.get(i).copied().unwrap_or(*p),
                    colors.get(i).copied().unwrap_or([1.0; 3]),
                )
            })?
        }
        None => obj::rewrite_obj_vertices(reader, writer, |i, p| {
            projected.get(i).copied().unwrap_or(*p)
        })?,
    };
    log::info!("Projected {num_vertices} vertices");

    Ok(())
}
