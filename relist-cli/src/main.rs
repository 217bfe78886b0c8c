use std::fmt::Write as FmtWrite;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Report, Result, WrapErr, eyre};
use serde_json::{Value, json};

use relist::domain::{Category, ListingStatus, Platform};
use relist::form::{Draft, DraftPhoto, MAX_PHOTOS, PhotoFile, WizardStep, readiness_all, validate_step};
use relist::io::{
    DocumentFormat, OutputDestination, OutputOptions, emit, emit_serialize, parse_document_str,
    read_typed,
};
use relist::service::{
    CatalogSnapshot, InMemoryListingService, ListingFilter, ListingService, PayloadIssue,
    PayloadValidator, ServiceOptions,
};

const DEFAULT_CATALOG: &str = "relist-catalog.json";

#[derive(Debug, Parser)]
#[command(
    name = "relist",
    version,
    about = "Draft, check and track secondhand listings across marketplaces"
)]
struct Cli {
    /// Catalog file holding every listing (created on first write)
    #[arg(
        long = "catalog",
        env = "RELIST_CATALOG",
        value_name = "PATH",
        default_value = DEFAULT_CATALOG
    )]
    catalog: PathBuf,

    /// Output format; defaults to the output file extension, then JSON
    #[arg(long = "format", value_name = "FORMAT")]
    format: Option<DocumentFormat>,

    /// Write the result to a file instead of stdout
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    output: Option<PathBuf>,

    /// Emit compact JSON/TOML rather than pretty formatting
    #[arg(long = "no-pretty")]
    no_pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate a draft step by step and report per-marketplace readiness
    Check {
        /// Draft spec: file path, inline payload, or "-" for stdin
        draft: String,
        /// Photo files to attach before checking
        #[arg(long = "photo", value_name = "PATH")]
        photos: Vec<PathBuf>,
    },
    /// Create a listing from a payload document
    Create {
        /// Payload spec: file path, inline payload, or "-" for stdin
        payload: String,
        /// Photo files to upload after creation
        #[arg(long = "photo", value_name = "PATH")]
        photos: Vec<PathBuf>,
        /// Publish on every selected marketplace right away
        #[arg(long = "publish")]
        publish: bool,
    },
    /// List listing summaries, most recently updated first
    List {
        #[arg(long = "status", value_name = "STATUS")]
        status: Option<ListingStatus>,
        #[arg(long = "category", value_name = "CATEGORY")]
        category: Option<Category>,
        /// Case-insensitive title search
        #[arg(long = "search", value_name = "TERM")]
        search: Option<String>,
    },
    /// Print one listing with photos, publications and activity
    Show { id: String },
    /// Publish a listing everywhere, or on a single marketplace
    Publish {
        id: String,
        #[arg(long = "platform", value_name = "PLATFORM")]
        platform: Option<Platform>,
    },
    /// Add a marketplace to a listing as a draft publication
    AddPlatform {
        id: String,
        #[arg(long = "platform", value_name = "PLATFORM")]
        platform: Platform,
    },
    /// Withdraw a listing from one marketplace
    Unpublish {
        id: String,
        #[arg(long = "platform", value_name = "PLATFORM")]
        platform: Platform,
    },
    /// Mark a listing as sold
    Sold {
        id: String,
        /// Marketplace the item sold on
        #[arg(long = "platform", value_name = "PLATFORM")]
        platform: Option<Platform>,
    },
    /// Move a listing back to draft
    Revert { id: String },
    /// Copy a listing into a new draft without photos or publications
    Duplicate { id: String },
    /// Delete a listing
    Delete { id: String },
    /// Print the JSON Schema accepted by `create`
    Schema,
}

impl Command {
    fn mutates_catalog(&self) -> bool {
        !matches!(
            self,
            Command::Check { .. } | Command::List { .. } | Command::Show { .. } | Command::Schema
        )
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let output = output_options(&cli);

    match &cli.command {
        Command::Schema => {
            let schema = PayloadValidator::schema().map_err(library_error)?;
            emit(&schema, &output).map_err(library_error)
        }
        Command::Check { draft, photos } => check_draft(draft, photos, &output),
        command => {
            let catalog = Catalog::open(&cli.catalog)?;
            let outcome = run(command, &catalog.service, &output).await;
            if command.mutates_catalog() {
                catalog.save_if_changed().await?;
            }
            outcome
        }
    }
}

async fn run(
    command: &Command,
    service: &InMemoryListingService,
    output: &OutputOptions,
) -> Result<()> {
    match command {
        Command::Create {
            payload,
            photos,
            publish,
        } => {
            let raw = load_value(payload, "payload")?;
            let validator = PayloadValidator::new().map_err(library_error)?;
            let payload = validator.validate(&raw).map_err(payload_report)?;
            let files = photos
                .iter()
                .map(|path| read_photo(path))
                .collect::<Result<Vec<_>>>()?;

            let created = service.create(payload).await?;
            if !files.is_empty() {
                service.upload_photos(&created.id, files).await?;
            }
            let listing = if *publish {
                service.publish(&created.id).await?
            } else {
                service.get(&created.id).await?
            };
            print(&listing, output)
        }
        Command::List {
            status,
            category,
            search,
        } => {
            let mut filter = ListingFilter::default();
            if let Some(status) = status {
                filter = filter.with_status(*status);
            }
            if let Some(category) = category {
                filter = filter.with_category(*category);
            }
            if let Some(search) = search {
                filter = filter.with_search(search.clone());
            }
            print(&service.list(filter).await?, output)
        }
        Command::Show { id } => print(&service.get(id).await?, output),
        Command::Publish { id, platform } => match platform {
            Some(platform) => print(&service.publish_platform(id, *platform).await?, output),
            None => print(&service.publish(id).await?, output),
        },
        Command::AddPlatform { id, platform } => {
            print(&service.add_platform(id, *platform).await?, output)
        }
        Command::Unpublish { id, platform } => {
            service.remove_platform(id, *platform).await?;
            print(&service.get(id).await?, output)
        }
        Command::Sold { id, platform } => print(&service.mark_sold(id, *platform).await?, output),
        Command::Revert { id } => print(&service.revert_to_draft(id).await?, output),
        Command::Duplicate { id } => print(&service.duplicate(id).await?, output),
        Command::Delete { id } => {
            service.remove(id).await?;
            print(&json!({ "deleted": id }), output)
        }
        Command::Check { .. } | Command::Schema => Ok(()),
    }
}

/// Listings persisted between runs as one JSON snapshot.
struct Catalog {
    path: PathBuf,
    loaded: CatalogSnapshot,
    service: InMemoryListingService,
}

impl Catalog {
    fn open(path: &Path) -> Result<Self> {
        let snapshot = if path.exists() {
            read_typed::<CatalogSnapshot>(path).map_err(library_error)?
        } else {
            log::debug!("catalog {} does not exist yet", path.display());
            CatalogSnapshot::default()
        };
        log::debug!(
            "loaded {} listing(s) from {}",
            snapshot.listings.len(),
            path.display()
        );
        Ok(Self {
            path: path.to_path_buf(),
            loaded: snapshot.clone(),
            service: InMemoryListingService::from_snapshot(snapshot, ServiceOptions::from_env()),
        })
    }

    /// Writes the catalog back when a command left it different. Partial
    /// progress of a failed command is kept.
    async fn save_if_changed(&self) -> Result<()> {
        let snapshot = self.service.snapshot().await;
        if snapshot == self.loaded {
            return Ok(());
        }
        let options = OutputOptions::new(DocumentFormat::Json)
            .with_destinations(vec![OutputDestination::file(&self.path)]);
        emit_serialize(&snapshot, &options)
            .map_err(library_error)
            .wrap_err_with(|| format!("failed to save catalog {}", self.path.display()))
    }
}

fn check_draft(spec: &str, photos: &[PathBuf], output: &OutputOptions) -> Result<()> {
    let value = load_value(spec, "draft")?;
    let mut draft: Draft =
        serde_json::from_value(value).wrap_err("draft does not have the listing draft shape")?;
    for path in photos {
        let file = read_photo(path)?;
        if !draft.push_photo(DraftPhoto::pending(file), MAX_PHOTOS) {
            log::warn!(
                "skipping {}: a listing holds at most {MAX_PHOTOS} photos",
                path.display()
            );
        }
    }

    let mut steps = Vec::new();
    let mut invalid = 0usize;
    for step in WizardStep::ALL {
        let validation = validate_step(&draft, step);
        if !validation.is_valid {
            invalid += 1;
        }
        steps.push(json!({
            "step": step.number(),
            "title": step.title(),
            "isValid": validation.is_valid,
            "errors": serde_json::to_value(&validation.errors)?,
        }));
    }
    let report = json!({
        "ready": invalid == 0,
        "steps": steps,
        "platforms": serde_json::to_value(readiness_all(&draft))?,
    });
    emit(&report, output).map_err(library_error)?;

    if invalid > 0 {
        return Err(eyre!(
            "{invalid} of {} steps need attention",
            WizardStep::ALL.len()
        ));
    }
    Ok(())
}

fn output_options(cli: &Cli) -> OutputOptions {
    let format = cli
        .format
        .or_else(|| cli.output.as_deref().and_then(DocumentFormat::from_extension))
        .unwrap_or_default();
    let destination = match &cli.output {
        Some(path) => OutputDestination::file(path),
        None => OutputDestination::Stdout,
    };
    OutputOptions::new(format)
        .with_pretty(!cli.no_pretty)
        .with_destinations(vec![destination])
}

fn print<T: serde::Serialize>(record: &T, output: &OutputOptions) -> Result<()> {
    emit_serialize(record, output).map_err(library_error)
}

fn library_error(err: impl std::fmt::Display) -> Report {
    eyre!("{err:#}")
}

fn load_value(spec: &str, label: &str) -> Result<Value> {
    if spec == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .wrap_err("failed to read from stdin")?;
        return parse_contents(&buffer, DocumentFormat::default(), label);
    }

    let path = Path::new(spec);
    if !path.exists() {
        return parse_contents(spec, DocumentFormat::default(), &format!("inline {label}"));
    }
    let contents = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to load {label} from {}", path.display()))?;
    let format = DocumentFormat::from_extension(path).unwrap_or_default();
    parse_contents(&contents, format, label)
}

fn parse_contents(contents: &str, format: DocumentFormat, label: &str) -> Result<Value> {
    match parse_document_str(contents, format) {
        Ok(value) => Ok(value),
        Err(primary) => {
            for candidate in DocumentFormat::available_formats() {
                if candidate == format {
                    continue;
                }
                if let Ok(value) = parse_document_str(contents, candidate) {
                    return Ok(value);
                }
            }
            Err(eyre!(
                "failed to parse {label}: tried {} (first error: {primary})",
                format_list()
            ))
        }
    }
}

fn format_list() -> String {
    let items: Vec<String> = DocumentFormat::available_formats()
        .into_iter()
        .map(|fmt| fmt.to_string())
        .collect();
    items.join(", ")
}

fn read_photo(path: &Path) -> Result<PhotoFile> {
    let bytes =
        fs::read(path).wrap_err_with(|| format!("failed to read photo {}", path.display()))?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "photo.jpg".to_string());
    Ok(PhotoFile::new(name, content_type_for(path), bytes))
}

fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

fn payload_report(issues: Vec<PayloadIssue>) -> Report {
    let mut body = String::from("payload rejected:\n");
    for (idx, issue) in issues.iter().enumerate() {
        let _ = writeln!(body, "  {}. input (payload): {issue}", idx + 1);
    }
    eyre!(body)
}
