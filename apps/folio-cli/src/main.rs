//! # folio
//!
//! Command-line client for the blog post API. Calls the API first and falls
//! back to the local store when it is unavailable.

mod args;
mod seed;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use args::{Args, ClientOptions, Commands, PostFields};
use folio_core::domain::{PostDraft, PostFilter};
use folio_core::ports::PostRepository;
use folio_infra::{
    DeploymentMode, FileLocalStorage, HttpPostRepository, LocalPostRepository, PostGateway,
    RemoteConfig, Served,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = Args::parse();
    match args.command {
        Commands::Seed(seed_args) => seed::run(&seed_args.database_url).await,
        command => {
            let gateway = build_gateway(&args.client)?;
            let served = execute(&gateway, command).await?;
            if served.is_local() {
                eprintln!("{}", local_notice(gateway.mode()));
            }
            println!("{}", serde_json::to_string_pretty(&served.data)?);
            Ok(())
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn local_notice(mode: DeploymentMode) -> &'static str {
    match mode {
        DeploymentMode::ServerBacked => "Using local storage (API unavailable)",
        DeploymentMode::Static => "Using local storage (static deployment)",
    }
}

fn build_gateway(options: &ClientOptions) -> anyhow::Result<PostGateway> {
    let storage = Arc::new(FileLocalStorage::new(&options.storage_dir));
    let local: Arc<dyn PostRepository> = Arc::new(LocalPostRepository::new(storage));

    let mode = DeploymentMode::detect(
        options.deploy_target.as_deref(),
        options.build_mode.as_deref(),
    );
    if mode == DeploymentMode::Static {
        return Ok(PostGateway::local_only(local));
    }

    let timeout = Duration::from_secs(options.timeout_secs);
    let remote = HttpPostRepository::new(RemoteConfig {
        base_url: options.api_url.clone(),
        timeout,
    })?;
    Ok(PostGateway::new(Arc::new(remote), local).with_remote_timeout(timeout))
}

fn draft_from(fields: &PostFields) -> anyhow::Result<PostDraft> {
    let base = match &fields.from_json {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("{} is not a post JSON object", path.display()))?
        }
        None => PostDraft::default(),
    };
    Ok(base.overlay(fields.flags()))
}

/// Run one post command through the gateway.
async fn execute(gateway: &PostGateway, command: Commands) -> anyhow::Result<Served<Value>> {
    fn to_json<T: serde::Serialize>(served: Served<T>) -> anyhow::Result<Served<Value>> {
        Ok(Served {
            data: serde_json::to_value(served.data)?,
            source: served.source,
        })
    }

    match command {
        Commands::List(list) => {
            let mut filter = PostFilter::new().featured_only(list.featured);
            if let Some(category) = list.category {
                filter = filter.with_category(category);
            }
            if let Some(search) = list.search {
                filter = filter.with_search(search);
            }
            to_json(gateway.list(&filter).await?)
        }
        Commands::Show(show) => to_json(gateway.read(&show.id).await?),
        Commands::Create(fields) => to_json(gateway.create(draft_from(&fields)?).await?),
        Commands::Update(update) => {
            to_json(gateway.update(&update.id, draft_from(&update.fields)?).await?)
        }
        Commands::Delete(delete) => {
            let served = gateway.delete(&delete.id).await?;
            Ok(Served {
                data: serde_json::json!({"message": "Blog post deleted successfully"}),
                source: served.source,
            })
        }
        Commands::Seed(_) => anyhow::bail!("seed talks to the database directly"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_infra::Source;

    fn static_gateway(dir: &std::path::Path) -> PostGateway {
        build_gateway(&ClientOptions {
            api_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
            storage_dir: dir.to_path_buf(),
            deploy_target: Some("GH_PAGES".to_string()),
            build_mode: None,
        })
        .unwrap()
    }

    fn fields() -> PostFields {
        PostFields {
            title: Some("A".to_string()),
            excerpt: Some("B".to_string()),
            content: Some("C".to_string()),
            author: Some("D".to_string()),
            category: Some("React".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_static_create_then_list_uses_local_store() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = static_gateway(dir.path());

        let created = execute(&gateway, Commands::Create(fields())).await.unwrap();
        assert_eq!(created.source, Source::Local);
        assert_eq!(created.data["views"], 0);

        let listed = execute(
            &gateway,
            Commands::List(args::ListArgs {
                category: Some("React".to_string()),
                search: None,
                featured: false,
            }),
        )
        .await
        .unwrap();
        assert_eq!(listed.data.as_array().unwrap().len(), 1);
        assert!(dir.path().join("blogPosts.json").exists());
    }

    #[tokio::test]
    async fn test_unreachable_api_falls_back() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let dir = tempfile::tempdir().unwrap();
        let gateway = build_gateway(&ClientOptions {
            api_url: format!("http://{}", addr),
            timeout_secs: 2,
            storage_dir: dir.path().to_path_buf(),
            deploy_target: None,
            build_mode: None,
        })
        .unwrap();
        assert_eq!(gateway.mode(), DeploymentMode::ServerBacked);

        let created = execute(&gateway, Commands::Create(fields())).await.unwrap();
        assert!(created.is_local());
        assert_eq!(
            local_notice(gateway.mode()),
            "Using local storage (API unavailable)"
        );
    }

    #[test]
    fn test_flags_override_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("post.json");
        std::fs::write(&path, r#"{"title":"From file","githubLink":"https://github.com/a/b"}"#)
            .unwrap();

        let draft = draft_from(&PostFields {
            from_json: Some(path),
            author: Some("D".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(draft.title.as_deref(), Some("From file"));
        assert_eq!(draft.author.as_deref(), Some("D"));
        assert_eq!(draft.external_link.as_deref(), Some("https://github.com/a/b"));
    }
}
