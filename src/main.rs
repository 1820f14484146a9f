use std::process;

use sentiero::{
    application::{
        catalog::CatalogService,
        error::AppError,
        export::StaticDataExporter,
        loader::{ContentLoader, SkippedUnit},
        search,
    },
    config,
    infra::telemetry,
};
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

fn main() {
    if let Err(error) = run() {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Build(config::BuildArgs::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Build(_) => run_build(settings),
        config::Command::Stats(_) => run_stats(settings),
        config::Command::Validate(_) => run_validate(settings),
    }
}

fn catalog_service(settings: &config::Settings) -> CatalogService {
    let loader = ContentLoader::new(
        settings.content.directory.clone(),
        settings.content.words_per_minute,
    );
    CatalogService::new(loader)
}

fn run_build(settings: config::Settings) -> Result<(), AppError> {
    info!(
        target = "sentiero::build",
        content_dir = %settings.content.directory.display(),
        out_dir = %settings.export.directory.display(),
        "Starting build"
    );

    let snapshot = catalog_service(&settings).snapshot();
    let search_index = search::build_index(&snapshot.posts);

    let exporter = StaticDataExporter::new(settings.export.directory.clone());
    let summary = exporter.export(&snapshot, &search_index)?;

    info!(
        target = "sentiero::build",
        posts = snapshot.stats.total_posts,
        learning_paths = snapshot.stats.total_series,
        files = summary.written.len(),
        "Build completed"
    );
    Ok(())
}

fn run_stats(settings: config::Settings) -> Result<(), AppError> {
    let snapshot = catalog_service(&settings).snapshot();

    let encoded = serde_json::to_string_pretty(&snapshot.stats)
        .map_err(|err| AppError::unexpected(format!("failed to encode stats: {err}")))?;
    println!("{encoded}");
    Ok(())
}

fn run_validate(settings: config::Settings) -> Result<(), AppError> {
    let (snapshot, skipped) = catalog_service(&settings).snapshot_with_report();

    report_skipped(&skipped);

    info!(
        target = "sentiero::validate",
        posts = snapshot.stats.total_posts,
        learning_paths = snapshot.stats.total_series,
        independent_posts = snapshot.stats.total_independent_posts,
        skipped = skipped.len(),
        "Validation completed"
    );

    if skipped.is_empty() {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "{} content unit(s) could not be loaded",
            skipped.len()
        )))
    }
}

fn report_skipped(skipped: &[SkippedUnit]) {
    for unit in skipped {
        warn!(
            target = "sentiero::validate",
            slug = %unit.slug,
            reason = %unit.reason,
            "skipped content unit"
        );
    }
}
