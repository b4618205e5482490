// League manager entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Open database
// 4. Dispatch the requested command

use anyhow::{anyhow, bail, Context};
use chrono::Local;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use gridiron::cache::LeagueCache;
use gridiron::cards::{issuance, PerformancePool};
use gridiron::config;
use gridiron::db::{CardSettings, LeagueDoc, Store};
use gridiron::schedule;
use gridiron::scoring::{team_week_score, ScoringRules};

fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (log to file, not terminal)
    init_tracing()?;
    info!("League manager starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: league={}, {} teams, season {}",
        config.league.name, config.league.num_teams, config.league.season
    );

    // 3. Open database
    let store = Store::open(&config.db_path).context("failed to open database")?;
    info!("Database opened at {}", config.db_path);

    // First run: persist the league document from the config and the
    // default scoring tables. Later runs read the stored settings, so
    // commissioner edits to the document survive config changes.
    if store.load_league().context("failed to load league document")?.is_none() {
        store
            .save_league(&LeagueDoc {
                name: config.league.name.clone(),
                total_teams: config.league.num_teams,
                roster_settings: config.league.roster.clone(),
                scoring_settings: ScoringRules::league_defaults(),
                card_settings: CardSettings {
                    mechanic: config.mechanic,
                    modifiers: config.league.modifiers,
                },
            })
            .context("failed to save league document")?;
        info!("League document initialized");
    }

    // 4. Dispatch the requested command
    let args: Vec<String> = std::env::args().skip(1).collect();
    let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();

    match arg_refs.as_slice() {
        ["week"] => cmd_week(&config),
        ["issue", week] => cmd_issue(&config, &store, week.parse().context("invalid week")?),
        ["activate", card_id, slot_id, week] => cmd_activate(
            &config,
            &store,
            card_id,
            slot_id,
            week.parse().context("invalid week")?,
        ),
        ["deactivate", card_id] => cmd_deactivate(&config, &store, card_id),
        ["reveal", card_id] => cmd_reveal(&config, &store, card_id),
        ["score", team_id, week] => {
            cmd_score(&store, team_id, week.parse().context("invalid week")?)
        }
        _ => {
            eprintln!("usage: gridiron <command>");
            eprintln!("  week                                 current regular-season week");
            eprintln!("  issue <week>                         distribute card packs");
            eprintln!("  activate <card_id> <slot_id> <week>  play a card onto a slot");
            eprintln!("  deactivate <card_id>                 return a pending card");
            eprintln!("  reveal <card_id>                     reveal a pending card");
            eprintln!("  score <team_id> <week>               weekly score breakdown");
            Ok(())
        }
    }
}

fn cutoff_for(config: &config::Config, week: u32) -> anyhow::Result<chrono::DateTime<Local>> {
    schedule::reveal_cutoff(config.league.season, week, config.league.cutoff_hour)
        .ok_or_else(|| anyhow!("no cutoff for season {} week {week}", config.league.season))
}

fn cmd_week(config: &config::Config) -> anyhow::Result<()> {
    let week = schedule::week_for_date(Local::now().date_naive(), config.league.season);
    println!("week {week}");
    Ok(())
}

fn cmd_issue(config: &config::Config, store: &Store, week: u32) -> anyhow::Result<()> {
    if let Some(last) = store.last_issuance_week()? {
        if last >= week {
            bail!("packs for week {week} already issued (last issuance: week {last})");
        }
    }

    // Packs are earned on the week's scoreboard, not the season record.
    let rules = store.scoring_rules()?;
    let standings = store.weekly_standings(week, &rules)?;
    if standings.is_empty() {
        bail!("no teams registered");
    }

    let mut rng = StdRng::from_entropy();
    let cards = issuance::run_distribution(config.mechanic, &standings, chrono::Utc::now(), &mut rng);
    store.record_issuance(&cards)?;
    store.set_last_issuance_week(week)?;

    info!(week, mechanic = %config.mechanic, count = cards.len(), "packs issued");
    for card in &cards {
        println!("{}  {}  {} {}", card.team_id, card.id, card.tier, card.position);
    }
    println!("{} cards issued via {}", cards.len(), config.mechanic);
    Ok(())
}

fn cmd_activate(
    config: &config::Config,
    store: &Store,
    card_id: &str,
    slot_id: &str,
    week: u32,
) -> anyhow::Result<()> {
    let card = store
        .load_card(card_id)?
        .ok_or_else(|| anyhow!("card not found: {card_id}"))?;
    let team = store
        .load_team(&card.team_id)?
        .ok_or_else(|| anyhow!("team not found: {}", card.team_id))?;

    let cutoff = cutoff_for(config, week)?;
    let card = store.activate_card(card_id, &team.roster, slot_id, week, Local::now(), cutoff)?;

    info!(card_id, slot_id, week, "card activated");
    println!("{} pending on {} for week {}", card.id, slot_id, week);
    Ok(())
}

fn cmd_deactivate(config: &config::Config, store: &Store, card_id: &str) -> anyhow::Result<()> {
    let card = store
        .load_card(card_id)?
        .ok_or_else(|| anyhow!("card not found: {card_id}"))?;
    let week = card
        .pending_week
        .ok_or_else(|| anyhow!("card {card_id} is not pending"))?;

    let cutoff = cutoff_for(config, week)?;
    let card = store.deactivate_card(card_id, Local::now(), cutoff)?;

    info!(card_id, "card deactivated");
    println!("{} returned to unplayed", card.id);
    Ok(())
}

fn cmd_reveal(config: &config::Config, store: &Store, card_id: &str) -> anyhow::Result<()> {
    let card = store
        .load_card(card_id)?
        .ok_or_else(|| anyhow!("card not found: {card_id}"))?;
    let week = card
        .pending_week
        .ok_or_else(|| anyhow!("card {card_id} is not pending"))?;

    let cutoff = cutoff_for(config, week)?;
    let pool = PerformancePool::builtin();
    let mut rng = StdRng::from_entropy();
    let card = store.reveal_card(card_id, &pool, Local::now(), cutoff, &mut rng)?;

    info!(card_id, player = %card.player_name, "card revealed");
    println!(
        "{}: {} {} scored {:.2}",
        card.id,
        card.player_name,
        card.position,
        card.historical_points.unwrap_or(0.0)
    );
    Ok(())
}

fn cmd_score(store: &Store, team_id: &str, week: u32) -> anyhow::Result<()> {
    let mut cache = LeagueCache::new();
    let team = cache
        .team(store, team_id)?
        .ok_or_else(|| anyhow!("team not found: {team_id}"))?
        .clone();
    let cards = store.load_team_cards(team_id)?;

    let rules = store.scoring_rules()?;
    let score = team_week_score(&team.roster, &cards, week, &rules);

    for slot in &score.slots {
        match &slot.card_id {
            Some(card_id) => println!("{:>6}  {:6.2}  (card {card_id})", slot.slot_id, slot.points),
            None => println!("{:>6}  {:6.2}", slot.slot_id, slot.points),
        }
    }
    println!("total   {:6.2}", score.total);
    Ok(())
}

/// Initialize tracing to log to a file so command output stays clean.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("gridiron.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("gridiron=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
