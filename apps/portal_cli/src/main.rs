use std::{io::BufRead, sync::Arc};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use portal_client::{
    load_settings,
    view::{
        CheckInList, CollectionList, FootprintList, FormSlot, ListPage, ListResource, ListState,
        ListSurface, LoginBadge, StoryList,
    },
    Navigator, Notifier, PortalClient,
};
use shared::{domain::CollectionId, protocol::OrderRequest};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Cli {
    /// Overrides the configured backend base URL.
    #[arg(long)]
    base_url: Option<String>,
    #[arg(long, requires = "password")]
    username: Option<String>,
    #[arg(long, requires = "username")]
    password: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Stories,
    CheckIns,
    Collections,
    Daily {
        kind: String,
    },
    Whoami,
    Footprints,
    Orders,
    Buy {
        collection_id: i64,
        #[arg(long, default_value_t = 1)]
        quantity: i64,
    },
}

struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn alert(&self, message: &str) {
        println!("! {message}");
    }

    fn inform(&self, message: &str) {
        println!("{message}");
    }

    fn confirm(&self, question: &str) -> bool {
        println!("{question} [y/N]");
        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        answer.trim().eq_ignore_ascii_case("y")
    }
}

struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn navigate(&self, target: &str) {
        info!(destination = target, "navigation requested");
    }
}

struct ConsoleSurface;

impl ListSurface for ConsoleSurface {
    fn render(&self, state: ListState) {
        match state {
            ListState::Loading => {}
            ListState::Rows(rows) => {
                for row in rows {
                    println!("#{:<5} {:<30} {}", row.id, row.title, row.detail);
                }
            }
            ListState::Empty(message) | ListState::Error(message) => println!("{message}"),
        }
    }
}

async fn show<R: ListResource>(client: &Arc<PortalClient>, resource: R) {
    let page = ListPage::new(
        Arc::clone(client),
        resource,
        Arc::new(ConsoleSurface),
        Arc::new(FormSlot::new()),
    );
    page.enter().await;
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings();
    if let Some(base_url) = cli.base_url {
        settings.base_url = base_url;
    }
    let client = PortalClient::new_with_dependencies(
        settings,
        Arc::new(ConsoleNotifier),
        Arc::new(ConsoleNavigator),
    )?;

    if let (Some(username), Some(password)) = (&cli.username, &cli.password) {
        if !client.session().login(username, password).await {
            bail!("login failed");
        }
    } else {
        client.session().refresh().await;
    }

    match cli.command {
        Command::Stories => show(&client, StoryList).await,
        Command::CheckIns => show(&client, CheckInList).await,
        Command::Collections => show(&client, CollectionList).await,
        Command::Footprints => show(&client, FootprintList).await,
        Command::Daily { kind } => {
            let Some(stories) = client.daily_recommendations(&kind).await else {
                bail!("no recommendations for '{kind}'");
            };
            for story in stories {
                println!("#{:<5} {}", story.id, story.title);
            }
        }
        Command::Whoami => {
            match LoginBadge::from_session(
                &client.session().current(),
                &client.settings().login_page,
            ) {
                LoginBadge::SignedIn {
                    display_name,
                    avatar_url,
                } => println!("{display_name} ({avatar_url})"),
                LoginBadge::SignedOut { login_href } => {
                    println!("not signed in, log in at {login_href}")
                }
            }
        }
        Command::Orders => {
            if let Some(orders) = client.my_orders().await {
                for order in orders {
                    println!(
                        "order #{} collection={} quantity={} total={}",
                        order.id,
                        order.collection_id,
                        order.quantity,
                        order
                            .total_price
                            .map(|price| format!("{price:.2}"))
                            .unwrap_or_else(|| "-".into())
                    );
                }
            }
        }
        Command::Buy {
            collection_id,
            quantity,
        } => {
            let request = OrderRequest {
                collection_id: CollectionId(collection_id),
                quantity,
            };
            if let Some(order) = client.buy_collection(&request).await {
                println!("order placed: {}", serde_json::to_string(&order)?);
            }
        }
    }

    Ok(())
}
