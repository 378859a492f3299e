use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

use folio_core::domain::{PostDraft, TagsInput};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
    #[command(flatten)]
    pub client: ClientOptions,
}

/// Where the API and the local fallback store live.
#[derive(ClapArgs, Debug, Clone)]
pub struct ClientOptions {
    /// Base URL of the API server.
    #[arg(long, env = "API_BASE_URL", default_value = "http://127.0.0.1:8080", global = true)]
    pub api_url: String,
    /// Seconds to wait for the API before using local storage.
    #[arg(long, env = "API_TIMEOUT_SECS", default_value_t = 5, global = true)]
    pub timeout_secs: u64,
    /// Directory of the local fallback store.
    #[arg(long, env = "LOCAL_STORAGE_DIR", default_value = ".folio", global = true)]
    pub storage_dir: PathBuf,
    /// `GH_PAGES` means the API is not deployed.
    #[arg(long, env = "DEPLOY_TARGET", global = true)]
    pub deploy_target: Option<String>,
    /// `static` means the API is not deployed.
    #[arg(long, env = "BUILD_MODE", global = true)]
    pub build_mode: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(name = "list", about = "List posts, newest first.")]
    List(ListArgs),
    #[command(name = "show", about = "Show one post and count a view.")]
    Show(IdArgs),
    #[command(name = "create", about = "Create a post.")]
    Create(PostFields),
    #[command(name = "update", about = "Change some fields of a post.")]
    Update(UpdateArgs),
    #[command(name = "delete", about = "Delete a post.")]
    Delete(IdArgs),
    #[command(
        name = "seed",
        about = "Replace the central database's posts with the sample set."
    )]
    Seed(SeedArgs),
}

#[derive(ClapArgs, Debug)]
pub struct ListArgs {
    /// Exact category name; `all` lists every category.
    #[arg(long)]
    pub category: Option<String>,
    /// Case-insensitive text matched against title, excerpt, content and tags.
    #[arg(long)]
    pub search: Option<String>,
    /// Only featured posts.
    #[arg(long, action)]
    pub featured: bool,
}

#[derive(ClapArgs, Debug)]
pub struct IdArgs {
    pub id: String,
}

#[derive(ClapArgs, Debug)]
pub struct UpdateArgs {
    pub id: String,
    #[command(flatten)]
    pub fields: PostFields,
}

#[derive(ClapArgs, Debug, Default)]
pub struct PostFields {
    /// JSON file holding post fields; flags override its values.
    #[arg(long, value_name = "FILE")]
    pub from_json: Option<PathBuf>,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub excerpt: Option<String>,
    #[arg(long)]
    pub content: Option<String>,
    #[arg(long)]
    pub author: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    /// Comma-separated tags.
    #[arg(long)]
    pub tags: Option<String>,
    #[arg(long)]
    pub image: Option<String>,
    #[arg(long)]
    pub external_link: Option<String>,
    #[arg(long)]
    pub read_time: Option<String>,
    #[arg(long)]
    pub featured: Option<bool>,
}

impl PostFields {
    /// The fields given as flags.
    pub fn flags(&self) -> PostDraft {
        PostDraft {
            title: self.title.clone(),
            excerpt: self.excerpt.clone(),
            content: self.content.clone(),
            author: self.author.clone(),
            category: self.category.clone(),
            tags: self.tags.as_deref().map(TagsInput::from),
            image: self.image.clone(),
            external_link: self.external_link.clone(),
            read_time: self.read_time.clone(),
            featured: self.featured,
        }
    }
}

#[derive(ClapArgs, Debug)]
pub struct SeedArgs {
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,
}
