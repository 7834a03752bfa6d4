use anyhow::{bail, Context};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use story_index::IndexTree;
use story_manager::{
    FetchController, FetchState, FileIndexSource, HttpIndexSource, IndexSource, ManagerConfig,
};
use story_store::IndexStore;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("story-manager")
        .version(story_manager::VERSION)
        .about("Build and inspect story sidebar indexes")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Manager config file (TOML)"),
        )
        .arg(
            Arg::new("show-roots")
                .long("show-roots")
                .global(true)
                .value_parser(value_parser!(bool))
                .help("Render top-level path segments as roots"),
        )
        .arg(
            Arg::new("docs-mode")
                .long("docs-mode")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Keep only docs entries"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log as JSON lines"),
        )
        .subcommand(
            Command::new("tree")
                .about("Print the sidebar tree of an index")
                .arg(
                    Arg::new("file")
                        .long("file")
                        .value_parser(value_parser!(PathBuf))
                        .conflicts_with("url")
                        .help("Read the index from a file"),
                )
                .arg(
                    Arg::new("url")
                        .long("url")
                        .help("Fetch the index from a URL (defaults to the configured one)"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output the tree as JSON"),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Validate an index file")
                .arg(
                    Arg::new("file")
                        .long("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Index file to validate"),
                ),
        )
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<ManagerConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => ManagerConfig::from_toml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ManagerConfig::new(),
    };
    if let Some(show_roots) = matches.get_one::<bool>("show-roots") {
        config = config.with_show_roots(*show_roots);
    }
    if matches.get_flag("docs-mode") {
        config = config.with_docs_mode(true);
    }
    config.validate()?;
    Ok(config)
}

/// Fetch once and return the installed tree
async fn load_tree(config: &ManagerConfig, source: Box<dyn IndexSource>) -> anyhow::Result<IndexTree> {
    let described = source.describe();
    let mut store = IndexStore::new(config.index_config());
    let mut controller = FetchController::new(source);

    match controller.fetch(&mut store).await {
        FetchState::Indexed => {}
        FetchState::Idle => bail!("{described} holds a legacy stories payload, not an index"),
        FetchState::Errored | FetchState::Fetching => match store.index_error() {
            Some(e) => bail!("{described}: {e}"),
            None => bail!("{described}: index could not be loaded"),
        },
    }
    store
        .tree()
        .cloned()
        .with_context(|| format!("{described}: no tree installed"))
}

fn print_tree(tree: &IndexTree) {
    for (id, entry) in tree.iter() {
        println!("{}{} {} ({id})", "  ".repeat(entry.depth()), entry.kind(), entry.name());
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    init_logging(matches.get_flag("log-json"));
    let config = load_config(&matches)?;

    match matches.subcommand() {
        Some(("tree", args)) => {
            let source: Box<dyn IndexSource> = match args.get_one::<PathBuf>("file") {
                Some(path) => Box::new(FileIndexSource::new(path.clone())),
                None => {
                    let url = args
                        .get_one::<String>("url")
                        .cloned()
                        .unwrap_or_else(|| config.index_url.clone());
                    Box::new(HttpIndexSource::new(url, config.fetch_timeout())?)
                }
            };

            let tree = load_tree(&config, source).await?;
            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&tree)?);
            } else {
                print_tree(&tree);
            }
        }
        Some(("check", args)) => {
            let Some(path) = args.get_one::<PathBuf>("file") else {
                bail!("--file is required");
            };
            let tree = load_tree(&config, Box::new(FileIndexSource::new(path.clone()))).await?;
            let leaves = tree.leaf_ids().len();
            println!(
                "{}: OK, {} entries, {} stories and docs",
                path.display(),
                tree.len(),
                leaves
            );
        }
        _ => {}
    }
    Ok(())
}
