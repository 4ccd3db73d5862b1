use clap::Parser;
use console::style;
use time::OffsetDateTime;
use tracing_subscriber::EnvFilter;

use rss_graph::config::Config;
use rss_graph::dates;
use rss_graph::error::{Result, RssGraphError};
use rss_graph::filters::{overfetch_limit, without_common_domains};
use rss_graph::graph::{GraphStore, RisingMention, RisingStatus};
use rss_graph::ingest::{ingest_batch, parse_feeds_json, IngestOptions};

#[derive(Parser, Debug)]
#[command(name = "rss-graph")]
#[command(about = "Discover RSS feed relationships")]
#[command(version)]
struct Cli {
    /// JSON config file
    #[arg(long, global = true, env = "RSS_GRAPH_CONFIG")]
    config: Option<String>,

    /// SQLite database path (overrides the config file)
    #[arg(long, global = true, env = "RSS_GRAPH_DB")]
    db: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Add a feed to the graph
    Add {
        url: String,

        #[arg(long, default_value = "")]
        title: String,
    },
    /// Record links and mentions from already-parsed feeds (JSON)
    Ingest {
        path: String,

        /// Take a snapshot after ingesting
        #[arg(long, default_value_t = false)]
        snapshot: bool,
    },
    /// Show feeds ranked by inbound links
    Rank {
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Filter out common domains (github, twitter, ...)
        #[arg(long, default_value_t = false)]
        filter: bool,

        /// Show recently added feeds instead
        #[arg(long, default_value_t = false)]
        new: bool,

        /// Days to consider new (with --new)
        #[arg(long)]
        days: Option<u32>,
    },
    /// Show links to and from a feed
    Links { url: String },
    /// Show most-mentioned people or organizations
    Mentions {
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        #[arg(long = "type")]
        entity_type: Option<String>,

        /// Sort by growth between the two latest snapshots
        #[arg(long, default_value_t = false)]
        rising: bool,
    },
    /// Take, list or prune mention snapshots
    Snapshot {
        #[arg(long, default_value_t = false)]
        list: bool,

        #[arg(long, default_value_t = false)]
        prune: bool,

        /// Snapshot date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,rss_graph=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let config = match cli.config.as_deref() {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let db_path = cli.db.clone().unwrap_or_else(|| config.db_path());
    let store = GraphStore::new(&db_path).await?;

    match cli.command {
        Commands::Add { url, title } => cmd_add(&store, &url, &title).await,
        Commands::Ingest { path, snapshot } => cmd_ingest(&store, &config, &path, snapshot).await,
        Commands::Rank {
            limit,
            filter,
            new,
            days,
        } => {
            let limit = limit.unwrap_or_else(|| config.rank_limit());
            if new {
                let days = days.unwrap_or_else(|| config.new_feed_days());
                cmd_rank_new(&store, days, limit).await
            } else {
                cmd_rank(&store, &config, limit, filter).await
            }
        }
        Commands::Links { url } => cmd_links(&store, &url).await,
        Commands::Mentions {
            limit,
            entity_type,
            rising,
        } => {
            let limit = limit.unwrap_or_else(|| config.mentions_limit());
            let entity_type = entity_type.unwrap_or_else(|| config.entity_type());
            cmd_mentions(&store, &entity_type, limit, rising).await
        }
        Commands::Snapshot { list, prune, date } => {
            cmd_snapshot(&store, &config, list, prune, date.as_deref()).await
        }
    }
}

async fn cmd_add(store: &GraphStore, url: &str, title: &str) -> Result<()> {
    let id = store.add_feed(url, title).await?;
    println!("Added feed {} (id: {})", url, id);
    Ok(())
}

async fn cmd_ingest(store: &GraphStore, config: &Config, path: &str, snapshot: bool) -> Result<()> {
    let content = std::fs::read_to_string(path).map_err(|e| RssGraphError::Config(e.to_string()))?;
    let feeds = parse_feeds_json(&content)?;
    let options = IngestOptions::from_config(config);

    println!("Ingesting {} feeds...", feeds.len());
    let report = ingest_batch(store, &feeds, &options).await;
    println!(
        "Total: {} feeds, {} items, {} outbound links, {} people mentions",
        report.feeds, report.items, report.links, report.mentions
    );
    if report.failures > 0 {
        println!(
            "{} {} facts could not be stored (see log)",
            style("Warning:").yellow().bold(),
            report.failures
        );
    }

    if snapshot {
        let today = dates::today()?;
        match store.take_snapshot(&today).await {
            Ok(n) => println!("Snapshot saved: {} ({} entries)", today, n),
            Err(err) => println!("{} failed to take snapshot: {}", style("Warning:").yellow().bold(), err),
        }
    }
    Ok(())
}

async fn cmd_rank(store: &GraphStore, config: &Config, limit: usize, filter: bool) -> Result<()> {
    let fetch_limit = if filter {
        overfetch_limit(limit)
    } else {
        limit
    };
    let mut ranked = store.get_most_linked(fetch_limit).await?;
    if filter {
        ranked = without_common_domains(ranked, &config.common_domains(), limit);
    }

    if ranked.is_empty() {
        println!("No feeds with inbound links yet.");
        return Ok(());
    }

    println!("{}", style("Feeds ranked by inbound links:").bold());
    for (i, r) in ranked.iter().enumerate() {
        println!(
            "{:2}. [{} links] {}\n    {}",
            i + 1,
            r.inbound_count,
            r.feed.display_title(),
            r.feed.url
        );
    }
    Ok(())
}

async fn cmd_rank_new(store: &GraphStore, days: u32, limit: usize) -> Result<()> {
    let feeds = store.get_new_feeds(days, limit).await?;
    if feeds.is_empty() {
        println!("No feeds added in the last {} days.", days);
        return Ok(());
    }

    let now = dates::now_ts();
    println!("{}\n", style(format!("Recently added feeds (last {} days):", days)).bold());
    for (i, r) in feeds.iter().enumerate() {
        println!(
            "{:2}. [{} links] {}\n    {}\n    Added: {} days ago\n",
            i + 1,
            r.inbound_count,
            r.feed.display_title(),
            r.feed.url,
            dates::days_since(r.feed.created_at, now)
        );
    }
    Ok(())
}

async fn cmd_links(store: &GraphStore, url: &str) -> Result<()> {
    let feed = store
        .get_feed_by_url(url)
        .await?
        .ok_or_else(|| RssGraphError::Runtime(format!("feed not found: {}", url)))?;

    let inbound = store.get_inbound_links(feed.id).await?;
    let outbound = store.get_outbound_links(feed.id).await?;

    println!("Feed: {}", feed.url);
    println!("Inbound links: {}", inbound.len());
    println!("Outbound links: {}", outbound.len());
    Ok(())
}

async fn cmd_mentions(store: &GraphStore, entity_type: &str, limit: usize, rising: bool) -> Result<()> {
    if rising {
        let snapshot_dates = store.get_snapshot_dates().await?;
        if let [current, previous, ..] = snapshot_dates.as_slice() {
            let mentions = store
                .get_rising_mentions(entity_type, current, previous, limit)
                .await?;
            print_rising(entity_type, current, previous, &mentions);
            return Ok(());
        }
        println!("Need at least 2 snapshots for velocity calculation.");
        println!("Run 'rss-graph snapshot' after each ingest to build history.");
        println!("\nFalling back to standard ranking...");
    }

    let mentions = store.get_most_mentioned(entity_type, limit).await?;
    if mentions.is_empty() {
        println!("No mentions found. Run 'ingest' first to record mentions.");
        return Ok(());
    }

    println!(
        "{}",
        style(format!("Most mentioned {}s:", entity_type.to_lowercase())).bold()
    );
    for (i, m) in mentions.iter().enumerate() {
        println!("{:2}. [{} mentions] {}", i + 1, m.mention_count, m.name);
    }
    Ok(())
}

fn print_rising(entity_type: &str, current: &str, previous: &str, mentions: &[RisingMention]) {
    if mentions.is_empty() {
        println!("No rising mentions found.");
        return;
    }

    println!(
        "{}",
        style(format!(
            "Rising stars ({}s gaining momentum):",
            entity_type.to_lowercase()
        ))
        .bold()
    );
    println!("Comparing {} vs {}\n", current, previous);

    for (status, heading) in [
        (RisingStatus::Hot, style("HOT").red().bold()),
        (RisingStatus::Rising, style("RISING").yellow().bold()),
    ] {
        let entries = with_status(mentions, status);
        if entries.is_empty() {
            continue;
        }
        println!("{}", heading);
        for (i, m) in entries.iter().enumerate() {
            println!(
                "{:2}. [+{:.0}%] {} ({} -> {} mentions)",
                i + 1,
                m.velocity * 100.0,
                m.name,
                m.previous_count,
                m.current_count
            );
        }
        println!();
    }

    let fresh = with_status(mentions, RisingStatus::New);
    if !fresh.is_empty() {
        println!("{}", style("NEW (first seen this period)").green().bold());
        for (i, m) in fresh.iter().enumerate() {
            println!("{:2}. {} ({} mentions)", i + 1, m.name, m.current_count);
        }
    }
}

fn with_status(mentions: &[RisingMention], status: RisingStatus) -> Vec<&RisingMention> {
    mentions.iter().filter(|m| m.status == status).collect()
}

async fn cmd_snapshot(
    store: &GraphStore,
    config: &Config,
    list: bool,
    prune: bool,
    date: Option<&str>,
) -> Result<()> {
    if list {
        let snapshot_dates = store.get_snapshot_dates().await?;
        if snapshot_dates.is_empty() {
            println!("No snapshots yet. Run 'rss-graph snapshot' to create one.");
            return Ok(());
        }
        println!("Available snapshots:");
        for d in snapshot_dates {
            println!("  {}", d);
        }
        return Ok(());
    }

    if prune {
        let retention = config.retention_days();
        let cutoff = dates::days_before(OffsetDateTime::now_utc().date(), retention)?;
        let n = store.prune_snapshots(&cutoff).await?;
        println!("Removed {} old snapshot entries (before {})", n, cutoff);
        return Ok(());
    }

    let date = match date {
        Some(value) => dates::format_date(dates::parse_date(value)?)?,
        None => dates::today()?,
    };
    let n = store.take_snapshot(&date).await?;
    println!("Snapshot saved: {} ({} entries)", date, n);
    Ok(())
}
