use std::{path::PathBuf, sync::Arc};

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use client_core::{
    load_settings, HttpListTransport, ListController, ListOptions, Resource, Settings,
    DEFAULT_LOAD_FALLBACK, DEFAULT_MUTATE_FALLBACK,
};
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    domain::{Application, ItemId, Report, SupportMessage},
    protocol::{FilterPatch, ItemOperation, TimePeriod},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "hub-cli", about = "Browse and moderate SkillSwap Hub admin lists")]
struct Cli {
    /// TOML settings file; defaults to ./hub.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    base_url: Option<String>,
    /// Raw `Cookie` header carrying the admin session.
    #[arg(long)]
    cookie: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct EndpointArgs {
    /// help-support, reports or applications
    resource: Resource,
    #[arg(long)]
    path: Option<String>,
    #[arg(long)]
    items_field: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a filtered list, following infinite scroll for up to `--pages` pages.
    List {
        #[command(flatten)]
        endpoint: EndpointArgs,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value = "overall")]
        period: TimePeriod,
        /// YYYY-MM-DD; only sent with a non-overall period.
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Apply an admin action to one item, then print the reloaded first page.
    Mutate {
        #[command(flatten)]
        endpoint: EndpointArgs,
        id: String,
        #[command(subcommand)]
        action: Action,
    },
}

#[derive(Subcommand, Debug)]
enum Action {
    Reply { text: String },
    Resolve,
    Status { status: String },
    Approve,
    Reject { reason: String },
    Delete,
}

impl From<Action> for ItemOperation {
    fn from(action: Action) -> Self {
        match action {
            Action::Reply { text } => ItemOperation::Reply { reply: text },
            Action::Resolve => ItemOperation::Resolve,
            Action::Status { status } => ItemOperation::SetStatus { status },
            Action::Approve => ItemOperation::Approve,
            Action::Reject { reason } => ItemOperation::Reject {
                rejection_reason: reason,
            },
            Action::Delete => ItemOperation::Delete,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        settings.base_url = base_url;
    }
    if let Some(cookie) = cli.cookie {
        settings.session_cookie = Some(cookie);
    }

    let resource = match &cli.command {
        Command::List { endpoint, .. } | Command::Mutate { endpoint, .. } => endpoint.resource,
    };
    match resource {
        Resource::HelpSupport => run::<SupportMessage>(&settings, cli.command).await,
        Resource::Reports => run::<Report>(&settings, cli.command).await,
        Resource::Applications => run::<Application>(&settings, cli.command).await,
    }
}

async fn run<T>(settings: &Settings, command: Command) -> Result<()>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    match command {
        Command::List {
            endpoint,
            status,
            search,
            period,
            date,
            pages,
        } => {
            let list = build_list::<T>(settings, &endpoint)?;
            let mut patch = FilterPatch::default().period(period).date(date);
            if let Some(status) = status {
                patch = patch.status(status.as_str());
            }
            if let Some(search) = search {
                patch = patch.search(search);
            }

            list.set_filter(patch)
                .await
                .map_err(|err| anyhow!(err.user_message(DEFAULT_LOAD_FALLBACK)))?;
            let mut loaded = 1;
            while loaded < pages {
                let issued = list
                    .on_scroll_near_bottom()
                    .await
                    .map_err(|err| anyhow!(err.user_message(DEFAULT_LOAD_FALLBACK)))?;
                if !issued {
                    break;
                }
                loaded += 1;
            }
            print_items(&list).await
        }
        Command::Mutate {
            endpoint,
            id,
            action,
        } => {
            let list = build_list::<T>(settings, &endpoint)?;
            let operation = ItemOperation::from(action);
            list.mutate_item(&ItemId::new(id), &operation)
                .await
                .map_err(|err| anyhow!(err.user_message(DEFAULT_MUTATE_FALLBACK)))?;
            info!(resource = %endpoint.resource, "item updated");
            print_items(&list).await
        }
    }
}

fn build_list<T>(settings: &Settings, endpoint: &EndpointArgs) -> Result<Arc<ListController<T>>>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    let path = endpoint
        .path
        .as_deref()
        .unwrap_or_else(|| endpoint.resource.path());
    let items_field = endpoint
        .items_field
        .clone()
        .unwrap_or_else(|| endpoint.resource.items_field().to_string());

    let transport = HttpListTransport::from_settings(settings, path)?;
    info!(
        url = %transport.collection_url(),
        resource = %endpoint.resource,
        "using list endpoint"
    );
    Ok(ListController::new(
        Arc::new(transport),
        ListOptions::from_settings(items_field, settings),
    ))
}

async fn print_items<T>(list: &ListController<T>) -> Result<()>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    let snapshot = list.snapshot().await;
    if let Some(error) = &snapshot.error {
        return Err(anyhow!(error.clone()));
    }
    for item in &snapshot.items {
        println!("{}", serde_json::to_string(item)?);
    }
    info!(
        items = snapshot.items.len(),
        page = snapshot.current_page,
        total_pages = snapshot.total_pages,
        "list loaded"
    );
    Ok(())
}
