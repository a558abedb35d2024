use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    error::{
        MSG_DELETE_CATEGORY_FAILED, MSG_DELETE_ITEM_FAILED, MSG_LOAD_ITEM_FAILED,
        MSG_SAVE_CATEGORY_FAILED, MSG_SAVE_ITEM_FAILED, MSG_TOGGLE_STATUS_FAILED,
    },
    view, AdminGalleryPage, CategoryAdminPage, CategoryStore, ClientError, GalleryApi,
    GalleryPage, HttpGalleryApi, ImageUpload, ImageUrls, ItemEditor, QueryState,
};
use shared::domain::{GalleryCategoryId, GalleryItemId, GalleryStatus};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use config::{load_settings, Overrides};

#[derive(Parser, Debug)]
#[command(name = "ansang", about = "Galeri Desa Ansang")]
struct Cli {
    /// Base URL of the gallery API.
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Base URL uploaded images are served from.
    #[arg(long, global = true)]
    image_base_url: Option<String>,
    /// Bearer token for admin routes.
    #[arg(long, global = true)]
    token: Option<String>,
    /// Settings file (defaults to ./ansang.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Public gallery listing.
    Gallery {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Show the detail of an item on the listed page.
        #[arg(long)]
        open: Option<i64>,
    },
    /// Detail of a single item.
    Show { id: i64 },
    #[command(subcommand)]
    Admin(AdminCommand),
    #[command(subcommand)]
    Categories(CategoryCommand),
}

#[derive(Subcommand, Debug)]
enum AdminCommand {
    List {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long)]
        status: Option<GalleryStatus>,
    },
    Create(ItemArgs),
    Update {
        id: i64,
        #[command(flatten)]
        item: ItemArgs,
        /// Drop the current image (a new one must then be given).
        #[arg(long)]
        remove_image: bool,
    },
    Delete { id: i64 },
    /// Flip an item between active and inactive.
    Toggle { id: i64 },
}

#[derive(Args, Debug)]
struct ItemArgs {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    status: Option<GalleryStatus>,
    /// Local image file to upload.
    #[arg(long)]
    image_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum CategoryCommand {
    List,
    Create(CategoryArgs),
    Update {
        id: i64,
        #[command(flatten)]
        category: CategoryArgs,
    },
    Delete { id: i64 },
}

#[derive(Args, Debug)]
struct CategoryArgs {
    #[arg(long)]
    label: Option<String>,
    /// Slug; derived from the label by the server when left out.
    #[arg(long)]
    value: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    sort_order: Option<String>,
}

/// Logs the underlying error and turns it into the message a user sees.
fn user_error(err: ClientError, fallback: &str) -> anyhow::Error {
    warn!(error = %err, "request failed");
    anyhow!(err.user_message(fallback))
}

async fn read_image(path: &Path) -> Result<ImageUpload> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read image '{}'", path.display()))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    Ok(ImageUpload::new(filename, bytes))
}

async fn apply_item_args(editor: &mut ItemEditor, args: ItemArgs) -> Result<()> {
    if let Some(title) = args.title {
        editor.form.title = title;
    }
    if let Some(description) = args.description {
        editor.form.description = description;
    }
    if let Some(category) = args.category {
        editor.form.category = category;
    }
    if let Some(status) = args.status {
        editor.form.status = status;
    }
    if let Some(path) = args.image_file {
        editor.form.select_image(read_image(&path).await?);
    }
    Ok(())
}

async fn run_gallery(
    api: Arc<dyn GalleryApi>,
    images: &ImageUrls,
    query: QueryState,
    open: Option<i64>,
) -> Result<()> {
    let mut page = GalleryPage::mount_with_query(api, query).await;
    println!(
        "{}",
        render::gallery(page.view(), &page.cards(images), page.pager().as_ref())
    );

    if let Some(id) = open {
        if !page.open_detail(GalleryItemId(id)) {
            bail!("item #{id} is not on this page");
        }
        if let Some(card) = page.selected_card(images) {
            println!("\n{}", render::detail(&card));
        }
    }
    Ok(())
}

async fn run_admin(api: Arc<dyn GalleryApi>, images: &ImageUrls, command: AdminCommand) -> Result<()> {
    match command {
        AdminCommand::List {
            search,
            category,
            status,
        } => {
            let query = QueryState::default()
                .with_search(search)
                .with_category(category)
                .with_status(status);
            let page = AdminGalleryPage::mount_with_query(api, query).await;
            if let Some(error) = page.last_error() {
                bail!("{error}");
            }
            println!("{}", render::admin_rows(&page.rows(images)));
        }
        AdminCommand::Create(args) => {
            let mut editor = ItemEditor::open_create(api).await;
            apply_item_args(&mut editor, args).await?;
            let id = editor
                .submit()
                .await
                .map_err(|err| user_error(err, MSG_SAVE_ITEM_FAILED))?;
            println!("created item #{id}");
        }
        AdminCommand::Update {
            id,
            item,
            remove_image,
        } => {
            let mut editor = ItemEditor::open_edit(api, GalleryItemId(id))
                .await
                .map_err(|err| user_error(err, MSG_LOAD_ITEM_FAILED))?;
            if remove_image {
                editor.form.remove_image();
            }
            apply_item_args(&mut editor, item).await?;
            editor
                .submit()
                .await
                .map_err(|err| user_error(err, MSG_SAVE_ITEM_FAILED))?;
            println!("updated item #{id}");
        }
        AdminCommand::Delete { id } => {
            let mut page = AdminGalleryPage::mount(api).await;
            page.delete(GalleryItemId(id))
                .await
                .map_err(|err| user_error(err, MSG_DELETE_ITEM_FAILED))?;
            println!("deleted item #{id}");
            println!("{}", render::admin_rows(&page.rows(images)));
        }
        AdminCommand::Toggle { id } => {
            let mut page = AdminGalleryPage::mount(api).await;
            page.toggle_status(GalleryItemId(id))
                .await
                .map_err(|err| user_error(err, MSG_TOGGLE_STATUS_FAILED))?;
            let status = page
                .items()
                .iter()
                .find(|item| item.id == GalleryItemId(id))
                .map(|item| view::status_label(item.status))
                .unwrap_or("-");
            println!("item #{id} is now {status}");
        }
    }
    Ok(())
}

fn apply_category_args(page: &mut CategoryAdminPage, args: CategoryArgs) {
    if let Some(label) = args.label {
        page.form.label = label;
    }
    if let Some(value) = args.value {
        page.form.value = value;
    }
    if let Some(description) = args.description {
        page.form.description = description;
    }
    if let Some(sort_order) = args.sort_order {
        page.form.set_sort_order_input(&sort_order);
    }
}

async fn run_categories(api: Arc<dyn GalleryApi>, command: CategoryCommand) -> Result<()> {
    let mut page = CategoryAdminPage::mount(api).await;
    if let Some(error) = page.last_error() {
        bail!("{error}");
    }
    match command {
        CategoryCommand::List => {}
        CategoryCommand::Create(args) => {
            apply_category_args(&mut page, args);
            page.submit()
                .await
                .map_err(|err| user_error(err, MSG_SAVE_CATEGORY_FAILED))?;
        }
        CategoryCommand::Update { id, category } => {
            if !page.edit(GalleryCategoryId(id)) {
                bail!("Kategori #{id} tidak ditemukan");
            }
            apply_category_args(&mut page, category);
            page.submit()
                .await
                .map_err(|err| user_error(err, MSG_SAVE_CATEGORY_FAILED))?;
        }
        CategoryCommand::Delete { id } => {
            page.delete(GalleryCategoryId(id))
                .await
                .map_err(|err| user_error(err, MSG_DELETE_CATEGORY_FAILED))?;
        }
    }
    println!("{}", render::categories(page.categories()));
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = load_settings(
        cli.config.as_deref(),
        &Overrides {
            api_url: cli.api_url,
            image_base_url: cli.image_base_url,
            api_token: cli.token,
        },
    )?;
    debug!(api_url = %settings.api_url, "ansang: settings loaded");

    let images = settings.image_urls()?;
    let api: Arc<dyn GalleryApi> = Arc::new(HttpGalleryApi::new(settings.client_config()?)?);

    match cli.command {
        Command::Gallery {
            search,
            category,
            page,
            open,
        } => {
            let query = QueryState::default()
                .with_search(search)
                .with_category(category)
                .with_page(page);
            run_gallery(api, &images, query, open).await?;
        }
        Command::Show { id } => {
            let (categories, item) = tokio::join!(
                CategoryStore::load_or_empty(api.as_ref()),
                api.get_item(GalleryItemId(id))
            );
            let item = item.map_err(|err| user_error(err, MSG_LOAD_ITEM_FAILED))?;
            println!("{}", render::detail(&view::card(&item, &categories, &images)));
        }
        Command::Admin(command) => run_admin(api, &images, command).await?,
        Command::Categories(command) => run_categories(api, command).await?,
    }

    Ok(())
}
