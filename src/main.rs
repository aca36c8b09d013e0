use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use std::time::SystemTime;

use clap::Parser;
use log::error;
use log::info;

use wfc_tilemap::presets;
use wfc_tilemap::Dimensions;
use wfc_tilemap::Progress;
use wfc_tilemap::RuleTable;
use wfc_tilemap::Wave;
use wfc_tilemap::WaveConfig;
use wfc_tilemap::WfcError;

/// Generate a tile map and print its sprite indices.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Grid width, in tiles
    #[arg(long, default_value_t = 20)]
    width: usize,

    /// Grid height, in tiles
    #[arg(long, default_value_t = 20)]
    height: usize,

    /// PRNG seed; the current time when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Tree density of the built-in terrain: positive for more trees, negative for more grass
    #[arg(long, default_value_t = -5, allow_hyphen_values = true)]
    density: i32,

    /// JSON rule table to use instead of the built-in terrain
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Width of the sprite sheet, in sprites
    #[arg(long, default_value_t = presets::TERRAIN_SHEET.width)]
    sheet_width: usize,

    /// Offset of the first tile to collapse
    #[arg(long)]
    start: Option<usize>,

    /// Collapse one tile per step instead of running to completion in one call
    #[arg(long)]
    manual: bool,

    /// Pause between collapses, in milliseconds
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,

    /// Print the final tiles as JSON
    #[arg(long)]
    json: bool,
}

fn load_rules(args: &Args) -> Result<RuleTable, WfcError> {
    match &args.rules {
        Some(path) => {
            let json = fs::read_to_string(path)?;
            RuleTable::from_json(&json)
        }
        None => {
            let mut rules = presets::terrain_rules();
            presets::apply_density(&mut rules, args.density)?;
            Ok(rules)
        }
    }
}

fn run(args: &Args) -> Result<Wave, WfcError> {
    let rules = load_rules(args)?;

    let mut config = WaveConfig::new(
        "map",
        Dimensions::new(args.width, args.height),
        Dimensions::new(args.sheet_width, presets::TERRAIN_SHEET.height),
    )
    .with_rules(rules)
    .with_step_delay(Duration::from_millis(args.delay_ms));

    config.seed = args.seed;
    config.starting_index = args.start;
    config.auto_run = !args.manual;

    let mut wave = Wave::new(config);
    info!("seeded with {}", wave.seed());

    wave.initialize()?;

    let mut progress = wave.generate()?;
    while let Progress::Collapsed(tile) = progress {
        info!("tile {} -> {:?}", tile.position, tile.sprite);
        progress = wave.step()?;
    }

    Ok(wave)
}

fn print_grid(wave: &Wave) {
    let grid = wave.grid();

    for row in grid.tiles().rows() {
        let line: Vec<String> = row
            .iter()
            .map(|tile| match tile.sprite {
                Some(sprite) => format!("{:>3}", sprite.0),
                None => "  .".to_string(),
            })
            .collect();

        println!("{}", line.join(""));
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();

    let t0 = SystemTime::now();
    let wave = match run(&args) {
        Ok(wave) => wave,
        Err(e) => {
            error!("generation failed: {e}");
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let elapsed = t0.elapsed().unwrap_or_default();

    if args.json {
        match serde_json::to_string_pretty(&wave.grid().to_vec()) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        print_grid(&wave);
    }

    info!("collapsed in {:?}", elapsed);

    ExitCode::SUCCESS
}
