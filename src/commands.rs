use std::path::Path;

use caosdb::config;
use caosdb::importer::{self, ImportOutcome, ImportPaths};
use caosdb::storage::BotStore;
use caosdb::ui::{self, Icons, TableBuilder};

pub fn run_import(paths: &ImportPaths) -> anyhow::Result<()> {
    if paths.missing_input().is_none() {
        config::ensure_db_dir(&paths.database)?;
    }

    let outcome = importer::run(paths)?;
    match &outcome {
        ImportOutcome::MissingInput(_) => ui::warn(&outcome.message()),
        ImportOutcome::Completed(report) => {
            ui::header(&outcome.message());
            ui::info(Icons::DATABASE, "Database", &paths.database.display().to_string());
            ui::print_table(&ui::stats_table(&report.rows()));
            ui::success("Import complete");
        }
    }
    Ok(())
}

fn open_existing(database: &Path) -> anyhow::Result<Option<BotStore>> {
    if !database.exists() {
        ui::warn(&format!("{} is not found, run the import first", database.display()));
        return Ok(None);
    }
    Ok(Some(BotStore::open(database)?))
}

pub fn run_stats(database: &Path, json: bool) -> anyhow::Result<()> {
    let Some(store) = open_existing(database)? else {
        return Ok(());
    };
    let stats = store.stats()?;
    let reviewers = store.reviewer_stats()?;
    store.close()?;

    if json {
        let data = serde_json::json!({
            "database": database.display().to_string(),
            "stats": stats,
            "reviewers": reviewers,
        });
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    ui::info(Icons::STATS, "Statistics", &database.display().to_string());
    ui::print_table(&ui::stats_table(&stats.rows()));

    if !reviewers.is_empty() {
        ui::section("Reviews per reviewer");
        let mut table = TableBuilder::new();
        for entry in &reviewers {
            let label = match &entry.name {
                Some(name) => format!("{} ({})", name, entry.reviewer),
                None => format!("<unknown> ({})", entry.reviewer),
            };
            table.add_row(&label, &entry.submissions.to_string());
        }
        ui::print_table(&table.build());
    }
    Ok(())
}

pub fn run_reviews(database: &Path, reviewer: i64, json: bool) -> anyhow::Result<()> {
    let Some(store) = open_existing(database)? else {
        return Ok(());
    };
    let user = store.get_user(reviewer)?;
    let submissions = store.submissions_by_reviewer(reviewer)?;
    store.close()?;

    if json {
        let data = serde_json::json!({
            "reviewer": reviewer,
            "user": user,
            "submissions": submissions,
        });
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    let name = user
        .map(|u| u.name)
        .unwrap_or_else(|| "<unknown>".to_string());
    ui::info(Icons::PERSON, "Reviewer", &format!("{} ({})", name, reviewer));
    if submissions.is_empty() {
        ui::warn("No reviewed submissions");
    } else if !ui::is_quiet() {
        for id in &submissions {
            println!("  {}", id);
        }
        println!("  {} total", submissions.len());
    }
    Ok(())
}
