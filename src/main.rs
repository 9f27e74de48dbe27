use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use geodelivery::api::ApiClient;
use geodelivery::config::ClientConfig;
use geodelivery::{batch, fake, wkt, Coordinate};
use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[clap(
  name = "geodelivery",
  about = "Geometry and API tools for the delivery backend",
  version
)]
struct Cli {
  /// Client configuration file (JSON)
  #[clap(long, global = true, value_parser)]
  config: Option<PathBuf>,

  #[clap(subcommand)]
  command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GeometryKind {
  Point,
  Multipoint,
  Polygon,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FixtureKind {
  Student,
  Career,
  Department,
  Faculty,
  CareerWithRelations,
}

#[derive(Debug, Subcommand)]
enum Commands {
  #[clap(name = "encode", about = "Encode lng,lat pairs as WKT")]
  Encode {
    #[clap(value_enum)]
    kind: GeometryKind,

    /// Coordinates as lng,lat
    #[clap(value_parser, allow_hyphen_values = true)]
    coordinates: Vec<String>,
  },
  #[clap(name = "decode", about = "Decode a WKT string and print it as JSON")]
  Decode {
    #[clap(value_parser)]
    wkt: String,
  },
  #[clap(
    name = "batch",
    about = "Decode a file with one WKT geometry per line into JSON lines"
  )]
  Batch {
    /// Input
    #[clap(value_parser)]
    input: PathBuf,

    /// Output
    #[clap(value_parser)]
    output: PathBuf,

    /// Worker threads (defaults to the number of CPUs minus two)
    #[clap(long, value_parser)]
    workers: Option<usize>,
  },
  #[clap(name = "fake", about = "Print random demo fixtures")]
  Fake {
    #[clap(value_enum)]
    kind: FixtureKind,

    #[clap(long, default_value_t = 1, value_parser)]
    count: usize,

    /// Seed for reproducible output
    #[clap(long, value_parser)]
    seed: Option<u64>,

    /// Nest departments in faculties and careers in departments
    #[clap(long)]
    nested: bool,
  },
  #[clap(
    name = "nearest",
    about = "List the delivery points closest to a company"
  )]
  Nearest {
    #[clap(value_parser)]
    company_id: i64,
  },
  #[clap(name = "orders", about = "List orders")]
  Orders {
    #[clap(long, value_parser, conflicts_with = "company")]
    dealer: Option<i64>,

    #[clap(long, value_parser)]
    company: Option<i64>,
  },
  #[clap(
    name = "active-order",
    about = "Show the active order of the authenticated dealer"
  )]
  ActiveOrder,
}

fn setup_logging() {
  use env_logger::{Builder, Env};
  Builder::from_env(Env::default().default_filter_or("info")).init();
}

fn parse_coordinate(arg: &str) -> Result<Coordinate> {
  let (lng, lat) = arg
    .split_once(',')
    .with_context(|| format!("expected lng,lat, got {:?}", arg))?;
  let lng = lng
    .trim()
    .parse::<f64>()
    .with_context(|| format!("bad longitude in {:?}", arg))?;
  let lat = lat
    .trim()
    .parse::<f64>()
    .with_context(|| format!("bad latitude in {:?}", arg))?;
  Ok((lng, lat).into())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}

fn api(config: &Option<PathBuf>) -> Result<ApiClient> {
  let api = ApiClient::new(ClientConfig::load(config.as_deref())?)?;
  info!("Using backend at {}", api.config().api_base);
  Ok(api)
}

fn run(cli: Cli) -> Result<()> {
  match cli.command {
    Commands::Encode { kind, coordinates } => {
      let coordinates = coordinates
        .iter()
        .map(|arg| parse_coordinate(arg))
        .collect::<Result<Vec<_>>>()?;
      let text = match kind {
        GeometryKind::Point => match coordinates.as_slice() {
          [c] => wkt::encode_point(*c),
          _ => bail!("a point takes exactly one coordinate"),
        },
        GeometryKind::Multipoint => wkt::encode_multi_point(&coordinates),
        GeometryKind::Polygon => wkt::encode_polygon(&coordinates)?,
      };
      println!("{}", text);
    }
    Commands::Decode { wkt: text } => match wkt::decode_geometry(&text)? {
      Some(geometry) => {
        info!(
          "Decoded {} with {} coordinates",
          geometry.kind(),
          geometry.coordinates().len()
        );
        print_json(&geometry)?
      }
      None => bail!("not a POINT, MULTIPOINT or POLYGON: {:?}", text),
    },
    Commands::Batch {
      input,
      output,
      workers,
    } => {
      if !input.exists() {
        bail!("Input file {} does not exist", input.display());
      }
      let workers = workers.unwrap_or_else(batch::default_workers);
      let summary = batch::convert(input, output, workers)?;
      println!(
        "{} converted, {} rejected",
        summary.converted, summary.rejected
      );
    }
    Commands::Fake {
      kind,
      count,
      seed,
      nested,
    } => {
      let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
      };
      for _ in 0..count {
        match kind {
          FixtureKind::Student => print_json(&fake::fake_student(&mut rng))?,
          FixtureKind::Career => print_json(&fake::fake_career(&mut rng, None))?,
          FixtureKind::Department => print_json(&fake::fake_department(&mut rng, None, nested))?,
          FixtureKind::Faculty => print_json(&fake::fake_faculty(&mut rng, nested))?,
          FixtureKind::CareerWithRelations => {
            print_json(&fake::fake_career_with_relations(&mut rng))?
          }
        }
      }
    }
    Commands::Nearest { company_id } => {
      let points = api(&cli.config)?.get_nearest_delivery_points(company_id)?;
      for point in &points {
        let location = match point.coordinate()? {
          Some(c) => c.to_string(),
          None => "-".to_string(),
        };
        println!(
          "{}\t{}\t{}\t{}",
          point.id.map(|id| id.to_string()).unwrap_or_default(),
          point.name.as_deref().unwrap_or(""),
          location,
          point.distance.map(|d| format!("{:.1}", d)).unwrap_or_default(),
        );
      }
    }
    Commands::Orders { dealer, company } => {
      let api = api(&cli.config)?;
      let orders = match (dealer, company) {
        (Some(dealer), _) => api.get_orders_by_dealer_id(dealer)?,
        (None, Some(company)) => api.get_orders_by_company_id(company)?,
        (None, None) => api.get_all_orders()?,
      };
      print_json(&orders)?;
    }
    Commands::ActiveOrder => match api(&cli.config)?.get_active_order_by_dealer()? {
      Some(order) => print_json(&order)?,
      None => println!("No active order."),
    },
  }
  Ok(())
}

fn main() {
  setup_logging();
  if let Err(e) = run(Cli::parse()) {
    error!("{:#}", e);
    std::process::exit(1);
  }
}
