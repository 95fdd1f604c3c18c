//! donut-archive - article archive for the Donut Bucho site.

mod archive;
mod cli;
mod config;
mod content;
mod logger;
mod serve;

use anyhow::{Context, Result, bail};
use archive::{ArchiveFilter, PriorityTable, Selection};
use clap::Parser;
use cli::{Cli, Commands};
use config::SiteConfig;
use content::{ContentQuery, ContentStore, HttpStore};
use serve::serve_archive;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = SiteConfig::load(&cli)?;

    let store = HttpStore::new(&config.store).context("Failed to create content store client")?;
    log!("store"; "{}", store.endpoint());
    let query = ContentQuery::new(store);

    match &cli.command {
        Commands::Serve { .. } => serve_archive(&config, &query),
        Commands::Archive { category } => {
            print_archive(&config, &query, Selection::from_param(category.as_deref()));
            Ok(())
        }
        Commands::Post { slug } => print_post(&query, slug),
        Commands::Slugs => {
            for slug in query.list_post_slugs() {
                out!("{slug}");
            }
            Ok(())
        }
    }
}

/// Chip row, then one line per displayed post.
fn print_archive<S: ContentStore>(config: &SiteConfig, query: &ContentQuery<S>, selection: Selection) {
    let priority = PriorityTable::new(&config.archive.priority);
    let mut filter = ArchiveFilter::new(query.load_archive(), &priority);
    filter.select(selection);
    let view = filter.view(config.archive.summary_chars);

    log!(
        "archive";
        "{} records, {} categories, showing `{}`",
        view.total_records,
        view.category_count,
        view.selected_title.as_deref().unwrap_or(&view.selected)
    );
    for chip in &view.chips {
        let marker = if chip.active { "*" } else { " " };
        out!("{marker} {} ({}) [{}]", chip.title, chip.count, chip.slug);
    }

    if view.empty {
        log!("archive"; "no records; run without --category to show all records");
        return;
    }
    for post in &view.posts {
        out!(
            "{} {} [{}]",
            post.published_label.as_deref().unwrap_or("----.--.--"),
            post.title,
            post.slug.as_deref().unwrap_or("-")
        );
    }
}

fn print_post<S: ContentStore>(query: &ContentQuery<S>, slug: &str) -> Result<()> {
    let Some(post) = query.get_post(slug) else {
        bail!("Post not found: {slug}");
    };

    let json = serde_json::to_string_pretty(&post).context("Failed to encode post")?;
    out!("{json}");
    Ok(())
}
