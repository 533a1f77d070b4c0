use exam_backend::{
    config::{get_config, init_config, LogFormat},
    database::pool::{create_pool, run_migrations},
    AppState,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_config()?;
    let config = get_config()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    let pool = create_pool(config).await?;
    run_migrations(&pool).await?;
    info!("Database schema is up to date");

    let state = AppState::new(pool.clone(), config.duplicate_answer_policy);
    let tests = state
        .question_service
        .list_tests(&Default::default())
        .await?;
    info!(
        tests = tests.len(),
        duplicate_answer_policy = ?config.duplicate_answer_policy,
        "Grading backend ready"
    );

    pool.close().await;
    Ok(())
}
