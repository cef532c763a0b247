//! Conversion of a Rockchip `parameter` boot log into a configuration.

pub mod mtdpart;

use std::fs::{
    self,
    File,
};
use std::io::{
    BufRead,
    BufReader,
};
use std::path::{
    Path,
    PathBuf,
};

pub use mtdpart::MtdPart;

use crate::error::ConvertError;
use crate::item::{
    ImagePath,
    Item,
    MAX_ITEMS,
};
use crate::RkCfgFile;

const CMDLINE_PREFIX: &str = "CMDLINE: ";
const MTDPARTS_PREFIX: &str = "mtdparts=";

const LOADER_NAME: &str = "Loader";
const LOADER_IMAGE: &str = "MiniLoaderAll.bin";
const PARAMETER_NAME: &str = "parameter";

/// Options for matching partitions to image files next to the log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutoScan {
    pub enabled: bool,
    /// Prepended to every image path assigned by the scan.
    pub prefix: String,
}

impl AutoScan {
    /// Enabled auto-scan with the given path prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            enabled: true,
            prefix: prefix.into(),
        }
    }
}

/// Convert the boot log at `path`.
pub(crate) fn parse_parameter_file<P: AsRef<Path>>(
    path: P,
    auto_scan: &AutoScan,
) -> Result<RkCfgFile, ConvertError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ConvertError::FileNotExists(path.to_path_buf()));
    }
    let file = File::open(path).map_err(ConvertError::UnableToOpenFile)?;
    let parts = parse_mtdparts(&find_mtdparts(BufReader::new(file))?)?;

    let base_dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    log::debug!("base_dir: {}", base_dir.display());

    let scan = auto_scan.enabled.then(|| ImageScan {
        prefix: &auto_scan.prefix,
        files: list_files(&base_dir),
    });

    let mut loader = default_item(LOADER_NAME)?;
    if let Some(scan) = &scan {
        if base_dir.join(LOADER_IMAGE).exists() {
            loader.image_path = scan.image_path(LOADER_IMAGE)?;
        }
    }

    let mut parameter = default_item(PARAMETER_NAME)?;
    if let Some(scan) = &scan {
        parameter.image_path = scan.image_path(&path.to_string_lossy())?;
    }

    build(loader, parameter, &parts, scan.as_ref())
}

/// Convert boot log `content` held in memory. Auto-scan is not available
/// here since there is no directory to scan.
pub(crate) fn parse_parameter(content: &str) -> Result<RkCfgFile, ConvertError> {
    let parts = parse_mtdparts(&find_mtdparts(content.as_bytes())?)?;
    build(
        default_item(LOADER_NAME)?,
        default_item(PARAMETER_NAME)?,
        &parts,
        None,
    )
}

fn build(
    loader: Item,
    parameter: Item,
    parts: &[MtdPart],
    scan: Option<&ImageScan>,
) -> Result<RkCfgFile, ConvertError> {
    let count = parts.len() + 2;
    if count > MAX_ITEMS {
        return Err(ConvertError::TooManyItems(count));
    }

    let mut cfg = RkCfgFile::new();
    cfg.add_item(loader);
    cfg.add_item(parameter);

    for part in parts {
        let mut item = Item::new(&part.name, part.address).ok_or_else(|| {
            ConvertError::IllegalMtdPartFormat(format!("partition name '{}' is too long", part.name))
        })?;

        if let Some(scan) = scan {
            if let Some(file_name) = scan.find(&part.name) {
                log::info!("Selected {} as the image file of {}.", file_name, part.name);
                item.image_path = scan.image_path(file_name)?;
            }
        }

        cfg.add_item(item);
    }

    Ok(cfg)
}

/// Return the first line that starts with `mtdparts=`, after removing a
/// leading `CMDLINE: ` from it.
fn find_mtdparts<R: BufRead>(reader: R) -> Result<String, ConvertError> {
    for line in reader.split(b'\n') {
        let line = line.map_err(ConvertError::Io)?;
        let line = String::from_utf8_lossy(&line);
        let line = line.trim_end_matches('\r');
        let line = line.strip_prefix(CMDLINE_PREFIX).unwrap_or(line);
        if line.starts_with(MTDPARTS_PREFIX) {
            log::debug!("mtdparts: {line}");
            return Ok(line.to_string());
        }
    }
    Err(ConvertError::MtdPartsNotFound)
}

/// Parse `mtdparts=<device>:<part>,<part>,...` into its partitions.
fn parse_mtdparts(mtdparts: &str) -> Result<Vec<MtdPart>, ConvertError> {
    let (_, specs) = mtdparts.split_once(':').ok_or_else(|| {
        ConvertError::IllegalMtdPartFormat("missing `:` after the device name".to_string())
    })?;
    let specs = specs.trim_end();
    let specs = specs.strip_suffix(',').unwrap_or(specs);
    if specs.is_empty() {
        return Ok(Vec::new());
    }

    specs
        .split(',')
        .map(|token| {
            log::debug!("mtdpart: {token}");
            token.parse()
        })
        .collect()
}

fn default_item(name: &str) -> Result<Item, ConvertError> {
    Item::new(name, 0).ok_or_else(|| {
        ConvertError::IllegalMtdPartFormat(format!("partition name '{name}' is too long"))
    })
}

/// File names of the log's directory, used to pick partition images.
struct ImageScan<'a> {
    prefix: &'a str,
    files: Vec<String>,
}

impl ImageScan<'_> {
    /// The first file whose name starts with `partition`, falling back to
    /// the name without an A/B slot suffix.
    fn find(&self, partition: &str) -> Option<&str> {
        self.find_prefixed(partition).or_else(|| {
            let base = partition
                .strip_suffix("_a")
                .or_else(|| partition.strip_suffix("_b"))?;
            self.find_prefixed(base)
        })
    }

    fn find_prefixed(&self, prefix: &str) -> Option<&str> {
        self.files
            .iter()
            .find(|name| name.starts_with(prefix))
            .map(String::as_str)
    }

    fn image_path(&self, file: &str) -> Result<ImagePath, ConvertError> {
        let path = format!("{}{}", self.prefix, file);
        ImagePath::encode(&path).ok_or(ConvertError::ImagePathTooLong(path))
    }
}

/// Regular files directly inside `dir`, sorted by name. An unreadable
/// directory yields no candidates.
fn list_files(dir: &Path) -> Vec<String> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::debug!("unable to list {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut files: Vec<String> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_file())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    files.sort();
    files
}
