use clap::{Parser, Subcommand, ValueEnum};
use framed::config::{self, AppConfig, ConfigError};
use framed::imaging::{
    FilterVariant, ImageBackend, OutputFormat, PolaroidPreset, Quality, RustBackend,
};
use framed::library::{DirectoryLibrary, SaveOutcome};
use framed::output::{self, PhotoReport};
use framed::screens::{PhotoStripScreen, PolaroidScreen};
use image::RgbaImage;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "framed")]
#[command(about = "Instant-film and film-strip photo filters")]
#[command(long_about = "\
Instant-film and film-strip photo filters

Two looks, each a fixed chain of filters:

  polaroid    centre square → warm white balance → brighten → vignette
              → noise reduction → soft blur → instant-film colour remix
  strip       centre square → noir → desaturate → vignette → soft blur

Filtered photos can be written to a file and/or saved to the photo library,
a directory of content-addressed images (see [library] in config.toml).

Run 'framed gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Directory containing config.toml
    #[arg(long, default_value = ".", global = true)]
    config: PathBuf,

    /// Photo library directory (overrides library.path)
    #[arg(long, global = true)]
    library: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum PresetArg {
    Standard,
    Soft,
}

impl From<PresetArg> for PolaroidPreset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Standard => PolaroidPreset::Standard,
            PresetArg::Soft => PolaroidPreset::Soft,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Apply the Polaroid look to one photo
    Polaroid {
        photo: PathBuf,
        /// Polaroid preset (default: polaroid.preset from config)
        #[arg(long, value_enum)]
        preset: Option<PresetArg>,
        /// Write the filtered photo here (.png or .jpg)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Save the filtered photo to the photo library
        #[arg(long)]
        save: bool,
    },
    /// Apply the film-strip look to up to four photos
    Strip {
        #[arg(required = true)]
        photos: Vec<PathBuf>,
        /// Write the filtered photos into this directory
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Save the filtered photos to the photo library
        #[arg(long)]
        save: bool,
    },
    /// List photos saved in the photo library
    Library,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Polaroid {
            photo,
            preset,
            out,
            save,
        } => {
            let session = Session::open(&cli.config, cli.library)?;
            run_polaroid(&session, photo, preset, out, save)?;
        }
        Command::Strip {
            photos,
            out_dir,
            save,
        } => {
            let session = Session::open(&cli.config, cli.library)?;
            run_strip(&session, &photos, out_dir, save)?;
        }
        Command::Library => {
            let session = Session::open(&cli.config, cli.library)?;
            output::print_library(session.library.root(), &session.library.assets()?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Everything a photo command needs: resolved config, codec and library.
struct Session {
    config: AppConfig,
    backend: RustBackend,
    library: DirectoryLibrary<RustBackend>,
}

impl Session {
    fn open(config_dir: &Path, library_override: Option<PathBuf>) -> Result<Self, ConfigError> {
        let config = config::load_config(config_dir)?;
        init_thread_pool(&config.processing);
        let root = library_override.unwrap_or_else(|| config.library.path());
        let library = DirectoryLibrary::new(root, RustBackend::new(), config.library.options());
        Ok(Self {
            config,
            backend: RustBackend::new(),
            library,
        })
    }

    fn write_photo(
        &self,
        image: &RgbaImage,
        path: &Path,
        format: OutputFormat,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let quality = Quality::new(self.config.library.quality);
        let bytes = self.backend.encode(image, format, quality)?;
        std::fs::write(path, bytes)?;
        log::info!("wrote {}", path.display());
        Ok(())
    }
}

fn run_polaroid(
    session: &Session,
    photo: PathBuf,
    preset: Option<PresetArg>,
    out: Option<PathBuf>,
    save: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let preset = preset
        .map(PolaroidPreset::from)
        .unwrap_or(session.config.polaroid.preset);
    let out_format = out.as_deref().map(format_for_path).transpose()?;

    let mut screen = PolaroidScreen::new(preset);
    let mut reports = Vec::new();
    if let Some(item) = screen.on_pick(&session.backend, &[photo]) {
        let image = screen.selected_photo.as_ref().ok_or("no photo shown")?;
        let dimensions = image.dimensions();
        if let (Some(path), Some(format)) = (&out, out_format) {
            session.write_photo(image, path, format)?;
        }
        let save = if save {
            screen.on_save(&session.library)
        } else {
            None
        };
        reports.push(PhotoReport {
            name: item.file_name(),
            dimensions,
            output: out,
            save,
        });
    }
    output::print_photos(FilterVariant::Polaroid(preset), &reports);
    Ok(())
}

fn run_strip(
    session: &Session,
    photos: &[PathBuf],
    out_dir: Option<PathBuf>,
    save: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut screen = PhotoStripScreen::new(session.config.picker.max_selection);
    let items = screen.on_pick(&session.backend, photos);

    let mut saves: Vec<Option<SaveOutcome>> = if save {
        screen
            .on_save_all(&session.library)
            .into_iter()
            .map(Some)
            .collect()
    } else {
        Vec::new()
    };
    saves.resize(items.len(), None);

    if let Some(dir) = &out_dir {
        std::fs::create_dir_all(dir)?;
    }
    let format = session.config.library.format;
    let mut reports = Vec::new();
    for (i, ((item, image), save)) in items.iter().zip(&screen.photos).zip(saves).enumerate() {
        let name = item.file_name();
        let output = match &out_dir {
            Some(dir) => {
                let path = dir.join(output::strip_output_name(i + 1, &name, format.extension()));
                session.write_photo(image, &path, format)?;
                Some(path)
            }
            None => None,
        };
        reports.push(PhotoReport {
            name,
            dimensions: image.dimensions(),
            output,
            save,
        });
    }
    output::print_photos(FilterVariant::FilmStrip, &reports);
    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the config can only lower it.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

fn format_for_path(path: &Path) -> Result<OutputFormat, String> {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(OutputFormat::from_extension)
        .ok_or_else(|| format!("{}: output must end in .png, .jpg or .jpeg", path.display()))
}
