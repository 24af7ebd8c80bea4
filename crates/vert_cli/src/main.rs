mod browse;

use clap::Parser;
use std::sync::Arc;
use tracing::info;
use vert_chat::create_provider;
use vert_core::{HeadlinesProvider, PageQuery, Result};
use vert_news::NewsApiClient;
use vert_web::AppState;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// News category to browse
    #[arg(long, default_value = "general")]
    category: String,
    /// Two-letter country code for headlines
    #[arg(long, default_value = "us")]
    country: String,
    /// Articles fetched per page
    #[arg(long, default_value_t = 10)]
    page_size: u32,
    #[arg(
        long,
        default_value = "sonar",
        help = "Provider to use for answers. Available providers: sonar (default), canned"
    )]
    answers: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        #[arg(long, default_value_t = 3000)]
        port: u16,
    },
    /// Browse the feed in the terminal
    Browse,
}

fn env_key(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|k| !k.is_empty())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let headlines: Arc<dyn HeadlinesProvider> =
        Arc::new(NewsApiClient::new(env_key("NEWS_API_KEY")));
    info!(
        "📰 Headlines provider initialized successfully (using {})",
        headlines.name()
    );

    let answers = create_provider(&cli.answers, env_key("PERPLEXITY_API_KEY"))?;
    info!(
        "🧠 Answer provider initialized successfully (using {})",
        answers.name()
    );

    let query = PageQuery {
        category: cli.category,
        country: cli.country,
        page: 1,
        page_size: cli.page_size,
    };

    match cli.command {
        Commands::Serve { port } => {
            let app = vert_web::create_app(AppState { headlines, answers }).await;
            let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
            info!("🌐 Listening on http://0.0.0.0:{}", port);
            axum::serve(listener, app).await?;
        }
        Commands::Browse => {
            browse::run(headlines, answers, query).await?;
        }
    }

    Ok(())
}
