mod repl;

use anyhow::Context;
use clap::{Parser, Subcommand};
use shroud_dom::selector::parse;
use shroud_dom::{DomSnapshot, match_count, query_all};
use shroud_engine::candidate::label_guess;
use shroud_engine::config::NavigationConfig;
use shroud_engine::synthesize::{navigation_target, synthesize};

#[derive(Parser)]
#[command(
    name = "shroud",
    version,
    about = "Selector synthesis and element blocking over DOM snapshots"
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Synthesize a selector for a node in a snapshot
    Pick {
        /// Snapshot JSON file
        #[arg(long)]
        snapshot: String,
        /// Node id to pick
        #[arg(long)]
        node: u32,
        /// Menu container selector; enables the submenu-aware strategy
        #[arg(long)]
        menu_root: Option<String>,
        /// Class marking nested submenu containers
        #[arg(long, default_value = "wp-submenu")]
        submenu_class: String,
    },
    /// Count and list the nodes a selector matches
    Query {
        #[arg(long)]
        snapshot: String,
        selector: String,
    },
    /// Interactive picking session against a snapshot
    Repl {
        #[arg(long)]
        snapshot: String,
        #[arg(long)]
        menu_root: Option<String>,
        #[arg(long, default_value = "wp-submenu")]
        submenu_class: String,
        /// Selectors that must never be blockable (repeatable)
        #[arg(long = "exclude")]
        exclusions: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // log to stderr; stdout carries command output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match args.command {
        Command::Pick {
            snapshot,
            node,
            menu_root,
            submenu_class,
        } => {
            let snap = load_snapshot(&snapshot)?;
            let nav = menu_root.map(|menu_root| NavigationConfig {
                menu_root,
                submenu_class,
            });
            let selector = synthesize(&snap, node, nav.as_ref());
            if selector.is_empty() {
                anyhow::bail!("node {node} not found in snapshot");
            }
            let list = parse(&selector).context("synthesized selector failed to parse")?;
            println!("{selector}");
            println!("  label:   {}", label_guess(&snap, node));
            println!("  matches: {}", match_count(&snap, &list));
            if let Some(url) = navigation_target(&snap, node) {
                println!("  target:  {url}");
            }
        }
        Command::Query { snapshot, selector } => {
            let snap = load_snapshot(&snapshot)?;
            let list = parse(&selector).context("invalid selector")?;
            let hits = query_all(&snap, &list);
            println!("{} match(es)", hits.len());
            for id in hits {
                if let Some(node) = snap.get(id) {
                    println!("  [{id}] {}", describe_node(node));
                }
            }
        }
        Command::Repl {
            snapshot,
            menu_root,
            submenu_class,
            exclusions,
        } => {
            let snap = load_snapshot(&snapshot)?;
            let nav = menu_root.map(|menu_root| NavigationConfig {
                menu_root,
                submenu_class,
            });
            repl::run(snap, nav, exclusions).await?;
        }
    }
    Ok(())
}

fn load_snapshot(path: &str) -> anyhow::Result<DomSnapshot> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading snapshot {path}"))?;
    serde_json::from_str(&content).with_context(|| format!("parsing snapshot {path}"))
}

fn describe_node(node: &shroud_dom::Node) -> String {
    let mut out = node.tag.clone();
    if let Some(id) = node.dom_id() {
        out.push('#');
        out.push_str(id);
    }
    for class in node.classes() {
        out.push('.');
        out.push_str(class);
    }
    out
}
