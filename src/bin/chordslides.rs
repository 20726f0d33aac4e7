//! Command-line entry point: render a song file into projection slides.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, LevelFilter};

use chordslides::{convert, load_song, song_to_json, RawSettings, Settings};

#[derive(Parser)]
#[command(name = "chordslides")]
#[command(about = "Render chord-annotated song files into projection slides")]
struct Args {
    /// Song file to render
    input: Option<PathBuf>,

    /// TOML settings file; flags given here override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Song display name and output folder name (defaults to the file name)
    #[arg(long)]
    name: Option<String>,

    /// TTF/OTF font used for measuring and drawing
    #[arg(long)]
    font: Option<PathBuf>,

    /// Text color, #RRGGBB or #RGB
    #[arg(long)]
    font_color: Option<String>,

    /// Background color, #RRGGBB or #RGB
    #[arg(long)]
    background_color: Option<String>,

    /// Convert chords to Nashville numbers ("true" or "false")
    #[arg(long)]
    nashville: Option<String>,

    /// Reduce key distances modulo 12 in Nashville mode ("true" or "false")
    #[arg(long)]
    nashville_wrap: Option<String>,

    /// Slide delimiter passed through to the output settings
    #[arg(long)]
    slide_delimiter: Option<String>,

    /// Slide height in pixels
    #[arg(long)]
    height: Option<String>,

    /// Slide width in pixels
    #[arg(long)]
    width: Option<String>,

    /// Directory the song's slide folder is created in
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Print the parsed song as JSON instead of rendering
    #[arg(long)]
    dump_json: bool,

    /// More log output (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn overrides(&self) -> RawSettings {
        let path_text = |p: &Option<PathBuf>| p.as_ref().map(|p| p.to_string_lossy().into_owned());
        RawSettings {
            name: self.name.clone(),
            input: path_text(&self.input),
            font: path_text(&self.font),
            font_color: self.font_color.clone(),
            background_color: self.background_color.clone(),
            nashville: self.nashville.clone(),
            nashville_wrap: self.nashville_wrap.clone(),
            slide_delimiter: self.slide_delimiter.clone(),
            height: self.height.clone(),
            width: self.width.clone(),
            output_dir: path_text(&self.output_dir),
        }
    }
}

fn run(args: &Args) -> chordslides::Result<()> {
    let base = match &args.config {
        Some(path) => RawSettings::load(path)?,
        None => RawSettings::default(),
    };
    let settings = Settings::resolve(base.merge(args.overrides()))?;

    if args.dump_json {
        println!("{}", song_to_json(&load_song(&settings)?)?);
        return Ok(());
    }

    for path in convert(&settings)? {
        println!("{}", path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let _ = env_logger::builder().filter_level(level).parse_default_env().try_init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
