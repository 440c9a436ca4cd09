//! Normalize a photo and write it as an upright, bounded JPEG.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use log::{debug, error, info};

use photonorm::{
    Bounds, ExportOptions, ImageSource, NormalizeError, NormalizeOptions, Normalizer, Rotation,
    export,
};

fn main() {
    let matches = parse_command_line_arguments();

    let default_filter = match matches.get_count("verbose") {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Err(e) = run(&matches) {
        error!("{e}");
        process::exit(1);
    }
}

fn parse_command_line_arguments() -> ArgMatches {
    Command::new("photo-normalize")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Rotate a photo upright from its EXIF orientation and bound its size")
        .arg(
            Arg::new("input")
                .value_name("INPUT")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Photo to normalize"),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .short('o')
                .value_name("DIR")
                .default_value(".")
                .value_parser(value_parser!(PathBuf))
                .help("Directory for the normalized JPEG"),
        )
        .arg(
            Arg::new("max-long")
                .long("max-long")
                .value_name("PX")
                .default_value("1920")
                .value_parser(value_parser!(u32).range(1..))
                .help("Maximum long side"),
        )
        .arg(
            Arg::new("max-short")
                .long("max-short")
                .value_name("PX")
                .default_value("1080")
                .value_parser(value_parser!(u32).range(1..))
                .help("Maximum short side"),
        )
        .arg(
            Arg::new("no-subsample")
                .long("no-subsample")
                .action(ArgAction::SetTrue)
                .help("Skip the coarse integer subsampling after decode"),
        )
        .arg(
            Arg::new("device-rotation")
                .long("device-rotation")
                .value_name("DEGREES")
                .value_parser(value_parser!(u32).range(..360))
                .help("Sensor angle the photo was taken at; orients photos without an orientation tag"),
        )
        .arg(
            Arg::new("quality")
                .long("quality")
                .short('q')
                .value_name("Q")
                .default_value("100")
                .value_parser(value_parser!(u8).range(1..=100))
                .help("JPEG quality"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::Count)
                .help("Increase logging verbosity"),
        )
        .get_matches()
}

fn run(matches: &ArgMatches) -> Result<(), NormalizeError> {
    let input = required::<PathBuf>(matches, "input");
    let output_dir = required::<PathBuf>(matches, "output-dir");

    let bounds = Bounds::new(
        *required::<u32>(matches, "max-long"),
        *required::<u32>(matches, "max-short"),
    );
    let mut options = NormalizeOptions::default()
        .bounds(bounds)
        .coarse_subsampling(!matches.get_flag("no-subsample"));
    if let Some(&degrees) = matches.get_one::<u32>("device-rotation") {
        let rotation = Rotation::from_device_degrees(degrees);
        debug!("device at {degrees}°, untagged photos rotate {}°", rotation.degrees());
        options = options.fallback_orientation(rotation);
    }
    let export_options = ExportOptions::default().jpeg_quality(*required::<u8>(matches, "quality"));

    let photo = Normalizer::new(options).normalize(&ImageSource::path(input))?;
    let path = export::write_jpeg(&photo, output_dir, &output_name(input), &export_options)?;

    info!(
        "{} {}x{} -> {}x{} ({:?})",
        input.display(),
        photo.source.width,
        photo.source.height,
        photo.dimensions.width,
        photo.dimensions.height,
        photo.orientation
    );
    println!("{}", path.display());
    Ok(())
}

/// Arguments with a default or `required(true)` are always present.
fn required<'a, T: Clone + Send + Sync + 'static>(matches: &'a ArgMatches, id: &str) -> &'a T {
    match matches.get_one::<T>(id) {
        Some(value) => value,
        None => unreachable!("argument `{id}` has a default"),
    }
}

fn output_name(input: &Path) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "photo".to_string());
    format!("{stem}_normalized{}", export::EXTENSION_JPEG)
}
