use bluesky_daily_bot::utils::{logger, validation::Validate};
use bluesky_daily_bot::{
    Archiver, BlueskyClient, BlueskyPublisher, BotConfig, FileSelector, FilenameValidator,
    ImageNormalizer, PostingWorkflow, Scheduler,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            logger::init_logger(Default::default());
            tracing::error!("❌ Failed to load configuration: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    logger::init_logger(config.log_format);
    tracing::info!("Starting bluesky-daily-bot");
    tracing::debug!("Config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let client = BlueskyClient::new(&config.service, config.request_timeout)?;
    let publisher = BlueskyPublisher::connect(client, config.credentials.clone()).await;

    let workflow = PostingWorkflow::new(
        FileSelector::new(&config.source_dir, config.max_attempts, FilenameValidator::new()),
        ImageNormalizer::new(config.size_threshold_bytes, config.jpeg_quality),
        publisher,
        Archiver::new(&config.source_dir, &config.destination_dir),
    );

    let scheduler = Scheduler::new(config.schedule).run_on_start(config.run_on_start);
    tracing::info!("🦋 Bot started, publishing {}", config.schedule);

    let workflow = &workflow;
    let runs = scheduler
        .run(
            move || async move {
                let outcome = workflow.run_once().await;
                tracing::debug!("Run finished: {:?}", outcome);
            },
            shutdown_signal(),
        )
        .await;

    tracing::info!("Bot stopped after {} run(s)", runs);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
