//! Command-line front end
//!
//! Every command resolves the resource name to its [`Resource`] type once and
//! then runs the same generic flow used by the pages and dialogs.

use crate::auth::Credentials;
use crate::config::{validate_api_url, Settings};
use crate::dialog::FormDialog;
use crate::error::{config_error, unsupported, AdminError, AdminResult};
use crate::models::*;
use crate::page::{RowAction, Table};
use crate::resource::{Resource, ResourceKind};
use crate::state::AdminContext;
use clap::{Parser, Subcommand, ValueEnum};
use dialoguer::Confirm;
use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "cms-admin")]
#[command(about = "Manage the content of the CMS from the command line", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Base URL of the CMS API (overrides CMS_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Bearer token (overrides CMS_API_TOKEN)
    #[arg(long, global = true, value_name = "TOKEN")]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the managed resources and what they support
    Resources,

    /// Sign in and print the access token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Show the admin list of a resource
    List {
        resource: ResourceName,
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Page size (overrides CMS_PAGE_SIZE)
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Show one record, or the record of a singleton resource
    Show {
        resource: ResourceName,
        id: Option<Uuid>,
    },

    /// Create a record
    ///
    /// Values are parsed as JSON when possible, so quote numeric text:
    /// --set title='"2024"'.
    Create {
        resource: ResourceName,
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        set: Vec<String>,
        #[arg(long = "file", value_name = "FIELD=PATH")]
        file: Vec<String>,
    },

    /// Update the given fields of a record
    Update {
        resource: ResourceName,
        /// Record id; optional for singleton resources
        id: Option<Uuid>,
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        set: Vec<String>,
        #[arg(long = "file", value_name = "FIELD=PATH")]
        file: Vec<String>,
    },

    /// Flip the active flag of a record
    Toggle { resource: ResourceName, id: Uuid },

    /// Delete a record
    Delete {
        resource: ResourceName,
        id: Uuid,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Set the display order; ids are listed first to last
    Reorder {
        resource: ResourceName,
        #[arg(required = true, num_args = 1..)]
        ids: Vec<Uuid>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceName {
    Banners,
    Hero,
    About,
    Announcements,
    Footer,
    Services,
    Users,
    Testimonials,
    Faqs,
    Brochures,
}

impl ResourceName {
    pub const ALL: [ResourceName; 10] = [
        ResourceName::Banners,
        ResourceName::Hero,
        ResourceName::About,
        ResourceName::Announcements,
        ResourceName::Footer,
        ResourceName::Services,
        ResourceName::Users,
        ResourceName::Testimonials,
        ResourceName::Faqs,
        ResourceName::Brochures,
    ];
}

/// Run `$body` with `$r` bound to the resource type named by `$name`.
macro_rules! with_resource {
    ($name:expr, $r:ident => $body:expr) => {
        match $name {
            ResourceName::Banners => {
                type $r = BannerResource;
                $body
            }
            ResourceName::Hero => {
                type $r = HeroResource;
                $body
            }
            ResourceName::About => {
                type $r = AboutResource;
                $body
            }
            ResourceName::Announcements => {
                type $r = AnnouncementResource;
                $body
            }
            ResourceName::Footer => {
                type $r = FooterResource;
                $body
            }
            ResourceName::Services => {
                type $r = ServiceResource;
                $body
            }
            ResourceName::Users => {
                type $r = UserResource;
                $body
            }
            ResourceName::Testimonials => {
                type $r = TestimonialResource;
                $body
            }
            ResourceName::Faqs => {
                type $r = FaqResource;
                $body
            }
            ResourceName::Brochures => {
                type $r = BrochureResource;
                $body
            }
        }
    };
}

/// Apply command-line overrides on top of the loaded settings.
pub fn apply_overrides(cli: &Cli, settings: &mut Settings) -> AdminResult<()> {
    if let Some(url) = &cli.api_url {
        validate_api_url(url).map_err(|e| config_error(e.to_string()))?;
        settings.api.base_url = url.clone();
    }
    if let Some(token) = &cli.token {
        settings.api.token = Some(token.clone());
    }
    Ok(())
}

pub async fn run(cli: Cli, ctx: &AdminContext) -> AdminResult<()> {
    debug!(command = ?cli.command, "Running command");
    match cli.command {
        Command::Resources => {
            let rows: Vec<Vec<String>> = ResourceName::ALL
                .iter()
                .map(|name| with_resource!(*name, R => describe::<R>()))
                .collect();
            let table = Table {
                headers: vec!["Name", "Label", "Kind", "Capabilities", "Files"],
                rows,
            };
            println!("{}", table.to_text());
            Ok(())
        }
        Command::Login { email, password } => {
            let claims = ctx.session().login(&Credentials { email, password }).await?;
            println!("Signed in as {} ({})", claims.email, claims.role);
            if let Some(token) = ctx.api.token() {
                println!("export CMS_API_TOKEN={}", token);
            }
            Ok(())
        }
        Command::List {
            resource,
            page,
            limit,
        } => with_resource!(resource, R => list::<R>(ctx, page, limit).await),
        Command::Show { resource, id } => with_resource!(resource, R => show::<R>(ctx, id).await),
        Command::Create {
            resource,
            set,
            file,
        } => with_resource!(resource, R => create::<R>(ctx, &set, &file).await),
        Command::Update {
            resource,
            id,
            set,
            file,
        } => with_resource!(resource, R => update::<R>(ctx, id, &set, &file).await),
        Command::Toggle { resource, id } => with_resource!(resource, R => toggle::<R>(ctx, id).await),
        Command::Delete { resource, id, yes } => {
            with_resource!(resource, R => delete::<R>(ctx, id, yes).await)
        }
        Command::Reorder { resource, ids } => with_resource!(resource, R => {
            ctx.module::<R>().reorder(&ids).await?;
            println!("{} order updated", R::LABEL);
            Ok(())
        }),
    }
}

fn describe<R: Resource>() -> Vec<String> {
    let caps = R::CAPABILITIES;
    let flags: Vec<&str> = [
        (caps.toggle, "toggle"),
        (caps.delete, "delete"),
        (caps.reorder, "reorder"),
        (caps.paginated, "paginated"),
    ]
    .iter()
    .filter(|(on, _)| *on)
    .map(|(_, name)| *name)
    .collect();

    vec![
        R::NAME.to_string(),
        R::LABEL.to_string(),
        match R::KIND {
            ResourceKind::Collection => "collection".to_string(),
            ResourceKind::Singleton => "singleton".to_string(),
        },
        flags.join(", "),
        R::FILE_FIELDS.join(", "),
    ]
}

fn print_record<R: Resource>(record: &R::Record) {
    println!("{:<12}{}", "Id", R::id(record));
    for column in R::columns() {
        println!("{:<12}{}", column.header, column.render(record));
    }
}

async fn list<R: Resource>(ctx: &AdminContext, page: u32, limit: Option<u32>) -> AdminResult<()> {
    if R::KIND == ResourceKind::Singleton {
        return show::<R>(ctx, None).await;
    }

    let mut screen = match limit {
        Some(limit) => crate::page::ResourcePage::new(ctx.module::<R>(), limit),
        None => ctx.resource_page::<R>(),
    };
    if page > 1 && R::CAPABILITIES.paginated {
        screen.go_to_page(page).await?;
    } else {
        screen.load().await?;
    }

    let mut table = screen.table();
    table.headers.insert(0, "Id");
    for (row, record) in table.rows.iter_mut().zip(screen.rows()) {
        row.insert(0, R::id(&record).to_string());
    }
    println!("{}", table.to_text());

    if let Some(p) = screen.pagination() {
        println!("\nPage {} of {} ({} total)", p.page, p.total_pages.max(1), p.total);
    }
    Ok(())
}

async fn show<R: Resource>(ctx: &AdminContext, id: Option<Uuid>) -> AdminResult<()> {
    let record = match (id, R::KIND) {
        (Some(id), _) => ctx.module::<R>().fetch_detail(id).await?,
        (None, ResourceKind::Singleton) => {
            let mut screen = ctx.singleton_page::<R>();
            match screen.load().await? {
                Some(record) => record.clone(),
                None => {
                    println!("No {} has been created yet", R::LABEL);
                    return Ok(());
                }
            }
        }
        (None, ResourceKind::Collection) => {
            return Err(unsupported(format!("An id is required to show a {}", R::LABEL)))
        }
    };
    print_record::<R>(&record);
    Ok(())
}

/// Parse `field=value` pairs into the resource's update schema.
pub fn parse_draft<R: Resource>(pairs: &[String]) -> AdminResult<R::Update> {
    let mut map = Map::new();
    for pair in pairs {
        let (field, raw) = split_pair(pair)?;
        let value = match serde_json::from_str::<Value>(raw) {
            Ok(v) if !v.is_object() && !v.is_array() => v,
            _ => Value::String(raw.to_string()),
        };
        map.insert(field.to_string(), value);
    }
    serde_json::from_value(Value::Object(map))
        .map_err(|e| AdminError::Decode(format!("Invalid field value: {}", e)))
}

fn split_pair(pair: &str) -> AdminResult<(&str, &str)> {
    pair.split_once('=')
        .filter(|(field, _)| !field.trim().is_empty())
        .map(|(field, value)| (field.trim(), value))
        .ok_or_else(|| unsupported(format!("Expected FIELD=VALUE, got '{}'", pair)))
}

async fn attach_files<R: Resource>(dialog: &mut FormDialog<R>, files: &[String]) -> AdminResult<()> {
    for pair in files {
        let (field, path) = split_pair(pair)?;
        let upload = Upload::from_path(path).await?;
        dialog.select_file(field, upload)?;
    }
    Ok(())
}

async fn create<R: Resource>(ctx: &AdminContext, set: &[String], files: &[String]) -> AdminResult<()> {
    let module = ctx.module::<R>();
    let mut dialog = FormDialog::<R>::new();
    dialog.open_create();
    *dialog.draft_mut() = parse_draft::<R>(set)?;
    attach_files(&mut dialog, files).await?;

    let record = dialog.submit(&module).await?;
    println!("Created {} {}", R::LABEL, R::id(&record));
    print_record::<R>(&record);
    Ok(())
}

async fn update<R: Resource>(
    ctx: &AdminContext,
    id: Option<Uuid>,
    set: &[String],
    files: &[String],
) -> AdminResult<()> {
    let module = ctx.module::<R>();
    let current = match (id, R::KIND) {
        (Some(id), _) => module.fetch_detail(id).await?,
        (None, ResourceKind::Singleton) => module.fetch_current().await?.ok_or_else(|| {
            unsupported(format!("There is no {} yet; use create first", R::LABEL))
        })?,
        (None, ResourceKind::Collection) => {
            return Err(unsupported(format!("An id is required to update a {}", R::LABEL)))
        }
    };

    let mut dialog = FormDialog::<R>::new();
    dialog.open_edit(current);
    // Only the given fields are sent.
    *dialog.draft_mut() = parse_draft::<R>(set)?;
    attach_files(&mut dialog, files).await?;

    let record = dialog.submit(&module).await?;
    println!("Updated {} {}", R::LABEL, R::id(&record));
    print_record::<R>(&record);
    Ok(())
}

async fn toggle<R: Resource>(ctx: &AdminContext, id: Uuid) -> AdminResult<()> {
    let record = ctx.module::<R>().toggle(id).await?;
    match R::is_active(&record) {
        Some(true) => println!("{} is now active", R::display_name(&record)),
        Some(false) => println!("{} is now inactive", R::display_name(&record)),
        None => println!("{} toggled", R::display_name(&record)),
    }
    Ok(())
}

async fn delete<R: Resource>(ctx: &AdminContext, id: Uuid, yes: bool) -> AdminResult<()> {
    let mut screen = ctx.resource_page::<R>();
    screen.load().await?;
    screen.trigger(RowAction::Delete, id).await?;

    if !yes {
        let message = screen
            .confirm
            .message()
            .unwrap_or_else(|| format!("Delete {} {}?", R::LABEL, id));
        if !ask(message).await? {
            screen.cancel_delete();
            println!("Cancelled");
            return Ok(());
        }
    }

    screen.confirm_delete().await?;
    println!("Deleted {} {}", R::LABEL, id);
    Ok(())
}

/// Yes/no prompt on the terminal; defaults to no.
async fn ask(message: String) -> AdminResult<bool> {
    tokio::task::spawn_blocking(move || {
        Confirm::new()
            .with_prompt(message)
            .default(false)
            .interact()
    })
    .await
    .map_err(|err| AdminError::Io(err.to_string()))?
    .map_err(AdminError::from)
}
