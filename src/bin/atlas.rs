use africa_atlas::directory::country_directory;
use africa_atlas::search::{SearchOutcome, search};
use africa_atlas::snapshot::{SnapshotOptions, render_snapshot};
use africa_atlas::{BoundaryLayers, Client, Config, Sidebar, storage};
use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "atlas",
    version,
    about = "Browse African country boundaries and profiles served by the atlas API"
)]
struct Cli {
    /// API base URL (e.g., http://localhost:8000/api/v1). Overrides config and ATLAS_API_URL.
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List countries with boundaries, sorted by name (optionally export them).
    Countries(CountriesArgs),
    /// Find the first loaded country whose name contains QUERY.
    Search(SearchArgs),
    /// Fetch and render one country's profile.
    Profile(ProfileArgs),
    /// Fetch one country's boundary and print its extent (optionally save it).
    Boundary(BoundaryArgs),
    /// Draw the boundaries to an SVG or PNG file.
    Snapshot(SnapshotArgs),
    /// Check that the backend is up.
    Health,
    /// List capitals grouped by region.
    Capitals,
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct CountriesArgs {
    /// Save the list to file (format inferred by --format or extension).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Part of a country name, case-insensitive.
    #[arg(default_value = "")]
    query: String,
}

#[derive(Args, Debug)]
struct ProfileArgs {
    /// ISO 3166-1 alpha-2 code (e.g., KE).
    code: String,
    /// Print the sidebar HTML fragment instead of text.
    #[arg(long, default_value_t = false)]
    html: bool,
    /// Print the compact popup HTML fragment instead of text.
    #[arg(long, default_value_t = false, conflicts_with = "html")]
    popup: bool,
    /// Save the raw profile as JSON.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct BoundaryArgs {
    /// ISO 3166-1 alpha-2 code (e.g., KE).
    code: String,
    /// Save the boundary as GeoJSON.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SnapshotArgs {
    /// Output path (.svg or .png).
    #[arg(long)]
    out: PathBuf,
    /// Country to draw in the selection style.
    #[arg(long)]
    highlight: Option<String>,
    /// Width of the image (default 1000).
    #[arg(long, default_value_t = 1000)]
    width: u32,
    /// Height of the image (default 1000).
    #[arg(long, default_value_t = 1000)]
    height: u32,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut cfg = Config::load()?;
    if let Some(url) = cli.api_url {
        cfg.api_base_url = url.trim_end_matches('/').to_string();
    }
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cfg.log_level))
        .init();

    let client = Client::new(&cfg)?;
    match cli.cmd {
        Command::Countries(args) => cmd_countries(&client, args),
        Command::Search(args) => cmd_search(&client, args),
        Command::Profile(args) => cmd_profile(&client, args),
        Command::Boundary(args) => cmd_boundary(&client, args),
        Command::Snapshot(args) => cmd_snapshot(&client, args),
        Command::Health => cmd_health(&client),
        Command::Capitals => cmd_capitals(&client),
    }
}

fn load_layers(client: &Client) -> Result<BoundaryLayers> {
    Ok(BoundaryLayers::from_feature_collection(
        &client.fetch_map_data()?,
    ))
}

fn cmd_countries(client: &Client, args: CountriesArgs) -> Result<()> {
    let entries = country_directory(&load_layers(client)?);

    if let Some(path) = args.out.as_ref() {
        let fmt = match args.format {
            Some(OutFormat::Csv) => "csv",
            Some(OutFormat::Json) => "json",
            None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
        }
        .to_ascii_lowercase();
        match fmt.as_str() {
            "csv" => storage::save_directory_csv(&entries, path)?,
            "json" => storage::save_directory_json(&entries, path)?,
            other => anyhow::bail!("unsupported format: {}", other),
        }
        eprintln!("Saved {} countries to {}", entries.len(), path.display());
        return Ok(());
    }

    for e in &entries {
        println!("{}  {}", e.code, e.name);
    }
    Ok(())
}

fn cmd_search(client: &Client, args: SearchArgs) -> Result<()> {
    // No fetch for an empty query.
    if args.query.trim().is_empty() {
        println!("{}", SearchOutcome::EmptyQuery.message());
        return Ok(());
    }
    match search(&load_layers(client)?, &args.query) {
        SearchOutcome::Found { code, name } => println!("{}  {}", code, name),
        other => println!("{}", other.message()),
    }
    Ok(())
}

fn cmd_profile(client: &Client, args: ProfileArgs) -> Result<()> {
    let profile = client.fetch_country_profile(&args.code)?;
    if let Some(path) = args.out.as_ref() {
        storage::save_profile_json(&profile, path)?;
        eprintln!("Saved profile to {}", path.display());
    }
    if args.popup {
        println!("{}", africa_atlas::render::popup_html(&profile));
        return Ok(());
    }
    let sidebar = Sidebar::from_profile(Some(&profile));
    if args.html {
        println!("{}", sidebar.to_html());
    } else {
        print!("{}", sidebar.to_text());
    }
    Ok(())
}

fn cmd_boundary(client: &Client, args: BoundaryArgs) -> Result<()> {
    let Some(fc) = client.fetch_country_map_data(&args.code)? else {
        println!("No boundary data for {}", args.code.trim().to_ascii_uppercase());
        return Ok(());
    };
    if let Some(path) = args.out.as_ref() {
        storage::save_geojson(&fc, path)?;
        eprintln!("Saved boundary to {}", path.display());
    }
    let layers = BoundaryLayers::from_feature_collection(&fc);
    for l in layers.iter() {
        println!("{}  {}  ({} polygons)", l.code, l.name, l.polygons.len());
    }
    match layers.bounds() {
        Some(b) => println!(
            "extent: SW ({:.2}, {:.2})  NE ({:.2}, {:.2})",
            b.south_west.lat, b.south_west.lng, b.north_east.lat, b.north_east.lng
        ),
        None => println!("extent: none"),
    }
    Ok(())
}

fn cmd_snapshot(client: &Client, args: SnapshotArgs) -> Result<()> {
    let layers = load_layers(client)?;
    let opts = SnapshotOptions {
        width: args.width,
        height: args.height,
        highlight: args.highlight,
        ..Default::default()
    };
    render_snapshot(&layers, &args.out, &opts)?;
    eprintln!("Wrote snapshot to {}", args.out.display());
    Ok(())
}

fn cmd_health(client: &Client) -> Result<()> {
    let health = client.health()?;
    println!("{} ({})", health.status, health.time.to_rfc3339());
    Ok(())
}

fn cmd_capitals(client: &Client) -> Result<()> {
    for region in client.fetch_capitals()? {
        println!("{}", region.region);
        for c in &region.countries {
            println!("  {} - {}", c.country, c.capital);
        }
    }
    Ok(())
}
