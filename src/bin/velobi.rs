use std::env;
use std::error::Error;
use std::path::PathBuf;

use anyhow::bail;
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tracing::{debug, info};

use velobi::file::ReadJsonFile;
use velobi::intake::RaceCard;
use velobi::predict::Predictor;
use velobi::print::{tabulate_line_bonuses, tabulate_ranking, tabulate_ticket};
use velobi::race::Race;
use velobi::timed::Timed;
use velobi::tunables::Tunables;
use velobi::venue::Venues;

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// file to source the race card from
    #[clap(short = 'f', long)]
    file: PathBuf,

    /// file to source the tunables from; the built-in defaults apply if omitted
    #[clap(short = 't', long)]
    tunables: Option<PathBuf>,

    /// file to source additional venue presets from
    #[clap(short = 'v', long)]
    venues: Option<PathBuf>,

    /// print the prediction as JSON instead of tables
    #[clap(long)]
    json: bool,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        if !self.file.is_file() {
            bail!("race card {} does not exist", self.file.display());
        }
        for (name, path) in [("tunables", &self.tunables), ("venues", &self.venues)] {
            if let Some(path) = path {
                if !path.is_file() {
                    bail!("{name} file {} does not exist", path.display());
                }
            }
        }
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    if env::var("RUST_BACKTRACE").is_err() {
        env::set_var("RUST_BACKTRACE", "full")
    }
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info")
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    args.validate()?;
    debug!("args: {args:?}");

    let tunables = match &args.tunables {
        None => Tunables::default(),
        Some(path) => Tunables::read_json_file(path)?,
    };
    let predictor = Predictor::try_from(tunables)?;
    let mut venues = Venues::default();
    if let Some(path) = &args.venues {
        let local = Venues::read_json_file(path)?;
        local.validate()?;
        debug!("loaded {} venue preset(s)", local.len());
        venues.extend(local);
    }

    let race = Timed::result(|| -> anyhow::Result<Race> {
        let card = RaceCard::read_json_file(&args.file)?;
        Ok(card.into_race(&venues)?)
    })?;
    debug!("race read in {:?}", race.elapsed);
    let prediction = predictor.predict(&race.value);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&prediction)?);
        return Ok(());
    }

    let console = Console::default();
    info!("\n{}", console.render(&tabulate_ranking(&prediction.ranking)));
    info!("\n{}", console.render(&tabulate_line_bonuses(&prediction.line_bonuses)));
    info!(
        "\n{}",
        console.render(&tabulate_ticket(&prediction.ticket, prediction.all_advisories()))
    );
    Ok(())
}
