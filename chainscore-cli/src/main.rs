use anyhow::{anyhow, Result};
use chainscore_api::{OpenSessionResponse, PageModel, ViewBody};
use chainscore_types::ActiveView;
use clap::{Parser, Subcommand};
use reqwest::Client;
use serde_json::json;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "ChainScore CLI — query on-chain credit scores from a ChainScore node"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, default_value = "http://localhost:3000")]
    node_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a new scoring session, optionally prefilled with an address
    Open {
        #[arg(long)]
        address: Option<String>,
    },
    /// Submit a wallet address for scoring
    Score {
        #[arg(long)]
        session: u64,
        #[arg(long)]
        address: String,
    },
    /// Show the current page for a session
    Page {
        #[arg(long)]
        session: u64,
        #[arg(long)]
        asset: Option<String>,
    },
    /// Switch the result view (base, anomaly, combined)
    View {
        #[arg(long)]
        session: u64,
        #[arg(long)]
        view: String,
    },
    /// Reset a session back to idle
    Reset {
        #[arg(long)]
        session: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = Client::new();

    match &cli.command {
        Commands::Open { address } => {
            let res = client
                .post(format!("{}/session", cli.node_url))
                .json(&json!({ "address": address }))
                .send()
                .await?;
            let opened: OpenSessionResponse = parse(res).await?;
            println!("Session: {}", opened.session_id);
            render_page(&opened.page);
        }
        Commands::Score { session, address } => {
            let res = client
                .post(format!("{}/session/{}/submit", cli.node_url, session))
                .json(&json!({ "address": address }))
                .send()
                .await?;
            render_page(&parse(res).await?);
        }
        Commands::Page { session, asset } => {
            let mut url = format!("{}/session/{}/page", cli.node_url, session);
            if let Some(asset) = asset {
                url.push_str(&format!("?asset={asset}"));
            }
            let res = client.get(url).send().await?;
            render_page(&parse(res).await?);
        }
        Commands::View { session, view } => {
            let view: ActiveView = view.parse().map_err(|e: String| anyhow!(e))?;
            let res = client
                .post(format!("{}/session/{}/view", cli.node_url, session))
                .json(&json!({ "view": view }))
                .send()
                .await?;
            render_page(&parse(res).await?);
        }
        Commands::Reset { session } => {
            let res = client
                .post(format!("{}/session/{}/reset", cli.node_url, session))
                .send()
                .await?;
            render_page(&parse(res).await?);
        }
    }

    Ok(())
}

async fn parse<T: serde::de::DeserializeOwned>(res: reqwest::Response) -> Result<T> {
    if res.status().is_success() {
        Ok(res.json().await?)
    } else {
        let status = res.status();
        let body: serde_json::Value = res.json().await.unwrap_or_default();
        let message = body
            .get("error")
            .and_then(|e| e.as_str())
            .unwrap_or("unknown error")
            .to_string();
        Err(anyhow!("{status}: {message}"))
    }
}

fn render_page(page: &PageModel) {
    match page {
        PageModel::Idle => println!("No query yet. Submit a wallet address to get scored."),
        PageModel::Computing { address } => println!("Computing score for {address}..."),
        PageModel::Failed { message, retryable } => {
            println!("Error: {message}");
            if *retryable {
                println!("(re-submit to retry)");
            }
        }
        PageModel::Ready {
            short_address,
            body,
            ..
        } => {
            println!("Wallet: {short_address}");
            match body {
                ViewBody::BaseScore(base) => {
                    println!("Score:  {} / 100  ({})", base.score, base.tier);
                    println!();
                    println!("Scoring factors:");
                    for row in &base.weighted_factors {
                        println!(
                            "  {:<22} {} {:>3}%  (weight {:.2}, +{:.1} pts)",
                            row.name,
                            bar(row.score),
                            row.score,
                            row.weight,
                            row.contribution
                        );
                    }
                    if !base.auxiliary_factors.is_empty() {
                        println!();
                        println!("Additional indicators:");
                        for row in &base.auxiliary_factors {
                            println!("  {:<22} {} {:>3}%", row.name, bar(row.percent), row.percent);
                        }
                    }
                    println!();
                    println!("{}", base.recommendation);
                }
                ViewBody::AnomalyCheck(report) => {
                    println!("Wash-trade check:");
                    println!("  Suspicious pairs: {}", report.suspicious_pairs);
                    println!("  Wash likelihood:  {}%", report.wash_likelihood);
                    println!("  Adjusted score:   {}", report.adjusted_score);
                }
                ViewBody::Combined(report) => {
                    println!("Combined score ({}): {} / 100", report.asset, report.combined);
                    for source in &report.sources {
                        println!(
                            "  {:<14} {} {:>3}  (weight {:.1})",
                            source.source,
                            bar(source.score),
                            source.score,
                            source.weight
                        );
                    }
                }
                ViewBody::AnalysisFailed { message } => {
                    println!("Analysis failed: {message}");
                }
            }
        }
    }
}

fn bar(percent: u8) -> String {
    let filled = usize::from(percent.min(100)) / 5;
    format!("{}{}", "█".repeat(filled), "░".repeat(20 - filled))
}
