//! Field log: record weather reports and fauna sightings in the document
//! store, or summarise what has been recorded so far.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use landcover_core::observation::{
    now_local, Behaviour, FaunaSighting, Location, RainStatus, SpeciesKind, WeatherObservation,
};
use landcover_core::store::{
    map_points, DocumentStore, JsonLinesStore, FAUNA_COLLECTION, WEATHER_COLLECTION,
};

#[derive(Parser, Debug)]
#[command(name = "observe", about = "Record and review manual field observations")]
struct Args {
    /// Directory holding one JSON-lines file per collection.
    #[arg(short, long, default_value = "data/store")]
    store: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record current weather conditions.
    Weather {
        /// "lat,lon" or "lat lon".
        #[arg(short, long)]
        location: Location,

        /// no, drizzle, light-rain, or heavy-rain.
        #[arg(short, long, default_value = "no")]
        rain: RainStatus,

        /// Rain intensity, 1-10.
        #[arg(short, long, default_value_t = 1)]
        intensity: u8,

        /// Air temperature in °C, -10 to 50.
        #[arg(short, long, default_value_t = 20.0, allow_negative_numbers = true)]
        temperature: f64,

        #[arg(short, long, default_value = "")]
        notes: String,

        /// Observation date (YYYY-MM-DD); today if omitted.
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Observation time (HH:MM:SS); now if omitted.
        #[arg(long)]
        time: Option<NaiveTime>,
    },

    /// Record a fauna sighting.
    Fauna {
        #[arg(short, long)]
        location: Location,

        /// bird, mammal, reptile, amphibian, fish, insect, or other.
        #[arg(short, long, default_value = "other")]
        kind: SpeciesKind,

        /// Species name, if known.
        #[arg(short, long, default_value = "")]
        species: String,

        #[arg(short, long, default_value_t = 1)]
        count: u32,

        /// Observed behaviour; repeat for several.
        #[arg(short, long = "behaviour")]
        behaviours: Vec<Behaviour>,

        #[arg(short, long, default_value = "")]
        description: String,

        /// Weather during the sighting.
        #[arg(long, default_value = "")]
        conditions: String,

        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(long)]
        time: Option<NaiveTime>,
    },

    /// Print record counts and every mappable record.
    Summary,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut store = JsonLinesStore::open(&args.store)
        .with_context(|| format!("opening store at {}", args.store.display()))?;
    let now = now_local();

    match args.command {
        Command::Weather { location, rain, intensity, temperature, notes, date, time } => {
            let record = WeatherObservation {
                date: date.unwrap_or_else(|| now.date_naive()),
                time: time.unwrap_or_else(|| now.time()),
                location,
                rain,
                intensity,
                temperature_c: temperature,
                notes,
                timestamp: now,
            };
            let doc = record.to_document()?;
            store.insert(WEATHER_COLLECTION, doc.clone())?;
            log::info!("weather record saved to {}", WEATHER_COLLECTION);
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        Command::Fauna { location, kind, species, count, behaviours, description, conditions, date, time } => {
            let record = FaunaSighting {
                date: date.unwrap_or_else(|| now.date_naive()),
                time: time.unwrap_or_else(|| now.time()),
                location,
                kind,
                species,
                count,
                behaviours,
                description,
                conditions,
                timestamp: now,
            };
            let doc = record.to_document()?;
            store.insert(FAUNA_COLLECTION, doc.clone())?;
            log::info!("sighting saved to {}", FAUNA_COLLECTION);
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        Command::Summary => {
            println!("fauna records:   {}", store.count(FAUNA_COLLECTION)?);
            println!("weather records: {}", store.count(WEATHER_COLLECTION)?);
            let points = map_points(&store)?;
            println!("mappable records: {}", points.len());
            for p in &points {
                println!("  {:>10.5} {:>11.5}  {}", p.lat, p.lon, p.label);
            }
        }
    }

    Ok(())
}
