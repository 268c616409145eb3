//! `faraway-admin`: manage Faraway content from a terminal.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use faraway_admin::entities::{Blogs, Tags, Yachts};
use faraway_admin::form::{CreateForm, FormController};
use faraway_admin::{
    AdminConfig, AdminDashboard, AdminSlice, DashboardError, Entity, ListDisplay, Operation,
    PublishStatus, media, notify,
};
use std::io::{BufRead, Write};
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "faraway-admin", version, about = "Manage blogs, tags and yachts on the Faraway content API")]
struct Cli {
    /// Records per list page (overrides FARAWAY_PAGE_SIZE)
    #[arg(long, global = true)]
    page_size: Option<NonZeroU32>,

    #[command(subcommand)]
    resource: Resource,
}

#[derive(Subcommand, Debug)]
enum Resource {
    /// Blog posts
    Blogs {
        #[command(subcommand)]
        command: BlogCommand,
    },
    /// Tags
    Tags {
        #[command(subcommand)]
        command: TagCommand,
    },
    /// Yacht listings
    Yachts {
        #[command(subcommand)]
        command: Common,
    },
}

#[derive(Subcommand, Debug)]
enum Common {
    /// List one page, optionally filtered by title
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one record as JSON
    Show { id: String },
    /// Delete a record after confirmation
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
enum BlogCommand {
    #[command(flatten)]
    Common(Common),
    /// Change a post's publication status
    Publish { id: String, status: StatusArg },
    /// Create a post
    Create(BlogArgs),
}

#[derive(Subcommand, Debug)]
enum TagCommand {
    #[command(flatten)]
    Common(Common),
    /// Create a tag
    Create(TagArgs),
}

#[derive(Args, Debug)]
struct BlogArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    slug: String,
    #[arg(long)]
    short_description: String,
    /// Body text, HTML allowed
    #[arg(long)]
    detail_description: String,
    /// Cover image file
    #[arg(long)]
    image: PathBuf,
}

#[derive(Args, Debug)]
struct TagArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    slug: String,
    #[arg(long)]
    description: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StatusArg {
    Draft,
    Published,
}

impl From<StatusArg> for PublishStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::Draft => Self::Draft,
            StatusArg::Published => Self::Published,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,faraway_admin=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    faraway_admin_runtime::metrics::describe_store_metrics();

    let cli = Cli::parse();
    let mut config = AdminConfig::from_env().context("reading configuration")?;
    if let Some(page_size) = cli.page_size {
        config.page_size = page_size;
    }
    let dashboard = AdminDashboard::from_config(&config)?;

    let result = match cli.resource {
        Resource::Blogs { command } => match command {
            BlogCommand::Common(common) => run_common::<Blogs>(&dashboard, common).await,
            BlogCommand::Publish { id, status } => {
                let result = dashboard.publish::<Blogs>(id, status.into()).await;
                report::<Blogs, _>(Operation::Publish, result).map(drop)
            },
            BlogCommand::Create(args) => create_blog(&dashboard, args).await,
        },
        Resource::Tags { command } => match command {
            TagCommand::Common(common) => run_common::<Tags>(&dashboard, common).await,
            TagCommand::Create(args) => create_tag(&dashboard, args).await,
        },
        Resource::Yachts { command } => run_common::<Yachts>(&dashboard, command).await,
    };

    dashboard.shutdown(Duration::from_secs(5)).await?;
    result
}

/// Print the toast for `result` and pass it on
fn report<E: Entity, T>(operation: Operation, result: Result<T, DashboardError>) -> Result<T> {
    if let Some(toast) = notify::outcome::<E, _>(operation, &result) {
        if toast.is_error() {
            eprintln!("{toast}");
        } else {
            println!("{toast}");
        }
    }
    Ok(result?)
}

async fn run_common<E: AdminSlice>(dashboard: &AdminDashboard, command: Common) -> Result<()> {
    match command {
        Common::List { page, search } => list::<E>(dashboard, page, search).await,
        Common::Show { id } => {
            let record = report::<E, _>(Operation::GetOne, dashboard.get::<E>(id).await)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        },
        Common::Delete { id, yes } => delete::<E>(dashboard, id, yes).await,
    }
}

async fn list<E: AdminSlice>(dashboard: &AdminDashboard, page: u32, search: Option<String>) -> Result<()> {
    let mut view = dashboard.list_view::<E>();
    report::<E, _>(Operation::GetList, dashboard.load_page(&view).await)?;

    let loaded = dashboard.slice::<E>().await;
    if view.goto_page(page, &loaded.list) {
        report::<E, _>(Operation::GetList, dashboard.load_page(&view).await)?;
    }
    if let Some(search) = search {
        view.set_search(search);
    }

    let state = dashboard.slice::<E>().await;
    match view.display(&state) {
        ListDisplay::Loading => println!("Loading {}...", E::PLURAL),
        ListDisplay::NoMatches => println!("No {} match \"{}\".", E::PLURAL, view.search()),
        ListDisplay::Empty(text) => println!("{text}"),
        ListDisplay::Items(records) => {
            for record in records {
                println!("{:<26} {}", E::id(record), E::display_title(record));
            }
        },
    }
    println!(
        "Page {} of {} ({} total)",
        state.list.current_page,
        state.list.total_pages.max(1),
        state.list.total
    );
    Ok(())
}

async fn delete<E: AdminSlice>(dashboard: &AdminDashboard, id: String, yes: bool) -> Result<()> {
    let mut view = dashboard.list_view::<E>();
    view.request_delete(id);

    if !yes && !confirm(&format!("Delete {} {}?", E::NAME, view.pending_delete().unwrap_or_default()))? {
        view.cancel_delete();
        println!("Cancelled");
        return Ok(());
    }

    report::<E, _>(Operation::Delete, dashboard.confirm_delete(&mut view).await).map(drop)
}

fn confirm(question: &str) -> Result<bool> {
    print!("{question} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

async fn create_blog(dashboard: &AdminDashboard, args: BlogArgs) -> Result<()> {
    let image = media::load_file(&args.image)
        .await
        .with_context(|| format!("reading {}", args.image.display()))?;

    let mut form = Blogs::create_form();
    form.set_value("title", args.title);
    form.set_value("slug", args.slug);
    form.set_value("shortDescription", args.short_description);
    form.set_value("detailDescription", args.detail_description);
    form.set_value("image", image);

    submit::<Blogs>(dashboard, &mut form).await
}

async fn create_tag(dashboard: &AdminDashboard, args: TagArgs) -> Result<()> {
    let mut form = Tags::create_form();
    form.set_value("name", args.name);
    form.set_value("slug", args.slug);
    if let Some(description) = args.description {
        form.set_value("description", description);
    }

    submit::<Tags>(dashboard, &mut form).await
}

async fn submit<E: CreateForm>(dashboard: &AdminDashboard, form: &mut FormController) -> Result<()> {
    let result = dashboard.submit_create::<E>(form).await;
    if let Err(DashboardError::Invalid(fields)) = &result {
        for field in fields {
            eprintln!("  {field}: {}", form.visible_error(field).unwrap_or("invalid"));
        }
    }
    report::<E, _>(Operation::Add, result).map(drop)
}
