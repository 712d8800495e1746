use std::fs;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info, warn};

use platenest::boolops::GeoBackend;
use platenest::io::ext_repr::{ExtJob, ExtSolution};
use platenest::io::import::shape_to_rings;
use platenest::io::svg::solution_to_svg;
use platenest::io::{Importer, build_solution};
use platenest::nest::Nester;
use platenest::util::NestConfig;

mod cli;
use cli::Cli;

static EPOCH: LazyLock<Instant> = LazyLock::new(Instant::now);

fn main() -> Result<()> {
    let args = Cli::parse();
    init_logger(args.log_level)?;

    let config = match args.config_file {
        None => {
            warn!("[MAIN] no config file provided, using defaults");
            NestConfig::default()
        }
        Some(path) => {
            let reader = BufReader::new(File::open(&path)?);
            serde_json::from_reader(reader).context("incorrect config file format")?
        }
    };
    info!("[MAIN] config: {config:?}");

    let job: ExtJob = {
        let reader = BufReader::new(
            File::open(&args.input_file)
                .with_context(|| format!("could not open {:?}", args.input_file))?,
        );
        serde_json::from_reader(reader).context("incorrect job file format")?
    };
    let plate_seeds = job
        .plates
        .iter()
        .map(|shape| Ok(shape_to_rings(shape)?.0))
        .collect::<Result<Vec<_>>>()?;

    let (parts, plates) = Importer::new(config).import(&job)?;
    let nester = Nester::new(GeoBackend, config, parts, plates);
    let parts = nester.run(|fraction| info!("[MAIN] progress: {:.0}%", fraction * 100.0));

    if !args.solution_folder.exists() {
        fs::create_dir_all(&args.solution_folder)
            .with_context(|| format!("could not create {:?}", args.solution_folder))?;
    }
    let stem = args
        .input_file
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("job");

    let solution = build_solution(&parts);
    write_json(
        &solution,
        &args.solution_folder.join(format!("sol_{stem}.json")),
    )?;

    let svg_path = args.solution_folder.join(format!("sol_{stem}.svg"));
    svg::save(&svg_path, &solution_to_svg(&plate_seeds, &parts))?;
    info!("[MAIN] svg written to {:?}", fs::canonicalize(&svg_path)?);

    Ok(())
}

fn write_json(solution: &ExtSolution, path: &Path) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, solution)?;
    info!("[MAIN] solution written to {:?}", fs::canonicalize(path)?);
    Ok(())
}

fn init_logger(level_filter: LevelFilter) -> Result<()> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            let duration = EPOCH.elapsed();
            let sec = duration.as_secs() % 60;
            let min = (duration.as_secs() / 60) % 60;
            let hours = (duration.as_secs() / 60) / 60;
            let prefix = format!("[{}] [{hours:0>2}:{min:0>2}:{sec:0>2}]", record.level());
            out.finish(format_args!("{prefix:<20}{message}"))
        })
        .level(level_filter)
        .chain(std::io::stdout())
        .apply()?;
    Ok(())
}
