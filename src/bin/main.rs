use std::path::{
    Path,
    PathBuf,
};

use clap::{
    Parser,
    Subcommand,
    ValueEnum,
};
use rkcfg::{
    AutoScan,
    ItemFilter,
    RkCfgFile,
    SaveMode,
};

#[derive(Parser)]
#[command(name = "rkcfg")]
#[command(about = "Rockchip config.cfg reader, converter and editor", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the header and partitions of a configuration
    Dump {
        /// Input file path
        input: PathBuf,

        /// Input format (detected from the extension by default)
        #[arg(short, long)]
        format: Option<InputFormat>,
    },
    /// Convert between binary, JSON and parameter files
    Convert {
        /// Input file path
        input: PathBuf,

        /// Output file path
        output: PathBuf,

        /// Input format (detected from the extension by default)
        #[arg(long)]
        from: Option<InputFormat>,

        /// Output format: binary or json (detected from the extension by default)
        #[arg(long)]
        to: Option<SaveMode>,

        /// Assign image files found next to a parameter file to its partitions
        #[arg(long)]
        auto_scan: bool,

        /// Prefix for image paths assigned by --auto-scan
        #[arg(long, default_value = "")]
        prefix: String,
    },
    /// Modify a binary or JSON configuration in place
    Edit {
        /// Input file path
        input: PathBuf,

        /// Write the result here instead of overwriting the input
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Remove the partition with this name
        #[arg(long, value_name = "NAME")]
        remove: Vec<String>,

        /// Remove every partition that is not selected
        #[arg(long)]
        remove_unselected: bool,

        /// Select the partition with this name
        #[arg(long, value_name = "NAME")]
        select: Vec<String>,

        /// Deselect the partition with this name
        #[arg(long, value_name = "NAME")]
        deselect: Vec<String>,

        /// Assign an image file to a partition
        #[arg(long, value_name = "NAME=PATH", value_parser = parse_assignment)]
        image: Vec<(String, String)>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    Binary,
    Json,
    Parameter,
}

impl InputFormat {
    fn detect(path: &Path) -> Self {
        match extension(path).as_deref() {
            Some("json") => Self::Json,
            Some("txt") => Self::Parameter,
            _ => Self::Binary,
        }
    }
}

fn detect_save_mode(path: &Path) -> SaveMode {
    match extension(path).as_deref() {
        Some("json") => SaveMode::Json,
        _ => SaveMode::Binary,
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
}

fn parse_assignment(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(name, path)| (name.to_string(), path.to_string()))
        .ok_or_else(|| format!("expected NAME=PATH, got '{s}'"))
}

/// Level requested by `-v` flags; `None` keeps `RUST_LOG` or the default.
fn verbosity_level(verbose: u8) -> Option<log::LevelFilter> {
    match verbose {
        0 => None,
        1 => Some(log::LevelFilter::Debug),
        _ => Some(log::LevelFilter::Trace),
    }
}

fn load(
    path: &Path,
    format: InputFormat,
    auto_scan: &AutoScan,
) -> Result<RkCfgFile, Box<dyn std::error::Error>> {
    log::debug!("Loading {} as {:?}", path.display(), format);
    let cfg = match format {
        InputFormat::Binary => RkCfgFile::from_file(path)?,
        InputFormat::Json => RkCfgFile::from_json_file(path)?,
        InputFormat::Parameter => RkCfgFile::from_parameter(path, auto_scan)?,
    };
    Ok(cfg)
}

fn find(cfg: &RkCfgFile, name: &str) -> Result<usize, Box<dyn std::error::Error>> {
    cfg.position(name)
        .ok_or_else(|| format!("no partition named '{name}'").into())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(level) = verbosity_level(cli.verbose) {
        logger.filter_level(level);
    }
    logger.init();

    match cli.command {
        Commands::Dump { input, format } => {
            let format = format.unwrap_or_else(|| InputFormat::detect(&input));
            let cfg = load(&input, format, &AutoScan::default())?;
            print!("{cfg}");
            Ok(())
        }
        Commands::Convert {
            input,
            output,
            from,
            to,
            auto_scan,
            prefix,
        } => {
            let from = from.unwrap_or_else(|| InputFormat::detect(&input));
            let to = to.unwrap_or_else(|| detect_save_mode(&output));
            let auto_scan = AutoScan {
                enabled: auto_scan,
                prefix,
            };

            let cfg = load(&input, from, &auto_scan)?;
            log::info!("Found {} partitions", cfg.len());

            cfg.save(&output, to)?;
            log::info!("Wrote {} configuration: {}", to, output.display());
            Ok(())
        }
        Commands::Edit {
            input,
            output,
            remove,
            remove_unselected,
            select,
            deselect,
            image,
        } => {
            let format = match InputFormat::detect(&input) {
                InputFormat::Json => InputFormat::Json,
                _ => InputFormat::Binary,
            };
            let mut cfg = load(&input, format, &AutoScan::default())?;

            for name in &select {
                let idx = find(&cfg, name)?;
                if let Some(item) = cfg.item_mut(idx) {
                    item.is_selected = true;
                }
            }
            for name in &deselect {
                let idx = find(&cfg, name)?;
                if let Some(item) = cfg.item_mut(idx) {
                    item.is_selected = false;
                }
            }
            for (name, path) in &image {
                let idx = find(&cfg, name)?;
                let item = cfg.items()[idx]
                    .clone()
                    .with_image_path(path)
                    .ok_or_else(|| format!("image path '{path}' is too long"))?;
                cfg.update_item(idx, item)?;
            }

            let mut filters: Vec<ItemFilter> = remove.into_iter().map(ItemFilter::Name).collect();
            if remove_unselected {
                filters.push(ItemFilter::Unselected);
            }
            if !filters.is_empty() {
                let removed = cfg.remove_items(&filters);
                log::info!("Removed {removed} partitions");
            }

            let output = output.unwrap_or(input);
            let mode = detect_save_mode(&output);
            cfg.save(&output, mode)?;
            log::info!("Wrote {} configuration: {}", mode, output.display());
            Ok(())
        }
    }
}
