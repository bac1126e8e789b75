//! # account-admin
//!
//! Command-line entry point for inspecting and editing stored accounts.

use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use tutor_core::AccountService;
use tutor_core::domain::{Account, Post};
use tutor_infra::{SqlQueryer, SqlUniter, connect};

mod config;
mod telemetry;

use config::AppConfig;
use telemetry::TelemetryConfig;

#[derive(Parser)]
#[command(name = "account-admin")]
#[command(about = "Inspect and edit stored accounts and their posts")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print one account with its posts.
    Show { id: Uuid },
    /// Print every account.
    List,
    /// Print the number of stored accounts.
    Count,
    Create {
        #[arg(long)]
        given_name: String,
        #[arg(long)]
        surname: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        id: Option<Uuid>,
    },
    Delete { id: Uuid },
    AddPost {
        account: Uuid,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        draft: bool,
    },
    RemovePost { account: Uuid, post: Uuid },
    PublishPost { account: Uuid, post: Uuid },
}

type Service = AccountService<SqlUniter<Account>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    telemetry::init_telemetry(&TelemetryConfig::from_env());
    let config = AppConfig::from_env()?;

    let db = connect(&config.database)
        .await
        .context("Failed to connect to database")?;
    let service = AccountService::new(
        SqlUniter::accounts(db.clone(), config.unit.clone()),
        Arc::new(SqlQueryer::new(db)),
    );

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, abandoning pending changes");
            on_signal.cancel();
        }
    });

    run(cli.command, &service, &cancel).await
}

async fn run(
    command: Command,
    service: &Service,
    cancel: &CancellationToken,
) -> anyhow::Result<()> {
    match command {
        Command::Show { id } => print_account(&service.get(id).await?),
        Command::List => {
            for account in service.list().await? {
                print_account(&account);
            }
        }
        Command::Count => println!("{}", service.count().await?),
        Command::Create {
            given_name,
            surname,
            username,
            id,
        } => {
            let mut parameters = Account::register(given_name, surname, username).to_parameters();
            if let Some(id) = id {
                parameters.id = id;
            }
            let account = Account::new(parameters)?;
            let id = account.id();
            service.create(account, cancel).await?;
            println!("{id}");
        }
        Command::Delete { id } => {
            let account = service.get(id).await?;
            service.delete(&account, cancel).await?;
        }
        Command::AddPost {
            account,
            title,
            content,
            draft,
        } => {
            let mut account = service.get(account).await?;
            let mut post = Post::draft(title, content);
            post.set_draft(draft);
            let post_id = post.id();
            account.add_post(post);
            service.put(account, cancel).await?;
            println!("{post_id}");
        }
        Command::RemovePost { account, post } => {
            let mut account = service.get(account).await?;
            if account.remove_post(post).is_none() {
                bail!("account {} has no post {post}", account.id());
            }
            service.put(account, cancel).await?;
        }
        Command::PublishPost { account, post } => {
            let mut account = service.get(account).await?;
            let account_id = account.id();
            let Some(target) = account.post_mut(post) else {
                bail!("account {account_id} has no post {post}");
            };
            target.publish()?;
            service.put(account, cancel).await?;
        }
    }
    Ok(())
}

fn print_account(account: &Account) {
    println!(
        "{}  {} {} <{}>  created {}",
        account.id(),
        account.given_name(),
        account.surname(),
        account.username(),
        account.created_at().to_rfc3339(),
    );
    for post in account.posts() {
        let status = if post.is_draft() { "draft" } else { "published" };
        println!(
            "    {}  [{status}] {}  likes={}",
            post.id(),
            post.title(),
            post.likes()
        );
    }
}
