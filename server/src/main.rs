#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();
    let config = taskhub_server::config::Config::from_env()?;
    taskhub_server::web::start_web_server(config).await
}
