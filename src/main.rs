use clap::{Args, Parser, Subcommand};

mod addr;
mod compose;
mod diagnostics;
mod error;
mod plan;
mod render;
mod service;
mod spec;

use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};

use compose::{ConfigFile, generate_config};
use service::{ProtocolModule, ServiceRegistry};
use spec::{Node, NodeSpec, SessionSpec};

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "quagga-compose")]
#[command(about = "Unified Quagga configuration and boot script generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Args)]
struct NodeArgs {
    /// Node description (node.json).
    #[arg(long)]
    node: String,

    /// Session overrides (session.json).
    #[arg(long)]
    session: Option<String>,

    /// Active services in order; overrides the node's list.
    #[arg(long = "service", value_delimiter = ',')]
    services: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write Quagga.conf, quaggaboot.sh and vtysh.conf into a directory.
    Generate {
        #[command(flatten)]
        args: NodeArgs,

        #[arg(short = 'o', long)]
        out_dir: String,
    },

    /// Print one generated file, by the name zebra lists it under.
    Render {
        #[command(flatten)]
        args: NodeArgs,

        #[arg(long)]
        file: String,
    },

    /// Print the startup plan for the active services as JSON.
    Plan {
        #[command(flatten)]
        args: NodeArgs,
    },

    /// List the available services.
    Services,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    // Built once; everything below only reads it.
    let registry = ServiceRegistry::builtin()?;
    tracing::debug!(services = registry.len(), "service registry ready");

    match cli.cmd {
        Commands::Generate { args, out_dir } => {
            for path in generate(&registry, &args, Path::new(&out_dir))? {
                tracing::info!(path = %path.display(), "wrote config file");
            }
        }
        Commands::Render { args, file } => print!("{}", render(&registry, &args, &file)?),
        Commands::Plan { args } => println!("{}", plan(&registry, &args)?),
        Commands::Services => print!("{}", list_services(&registry)),
    }

    Ok(())
}

/// Write every zebra file for the node into `out_dir`.
fn generate(
    registry: &ServiceRegistry,
    args: &NodeArgs,
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let (node, session) = load_inputs(args)?;
    let active = select(registry, &node, args)?;

    fs::create_dir_all(out_dir).with_context(|| {
        diagnostics::error_message(format!("create {}", out_dir.display()))
    })?;
    let mut written = Vec::with_capacity(ConfigFile::ALL.len());
    for file in ConfigFile::ALL {
        let text = generate_config(&node, file, &active, &session)
            .with_context(|| format!("generate {} for node {}", file.name(), node.name))?;
        let path = out_dir.join(file.file_name());
        fs::write(&path, text)
            .with_context(|| diagnostics::error_message(format!("write {}", path.display())))?;
        written.push(path);
    }
    Ok(written)
}

fn render(registry: &ServiceRegistry, args: &NodeArgs, file: &str) -> Result<String> {
    let target = ConfigFile::from_name(file)?;
    let (node, session) = load_inputs(args)?;
    let active = select(registry, &node, args)?;
    let text = generate_config(&node, target, &active, &session)
        .with_context(|| format!("generate {} for node {}", file, node.name))?;
    Ok(text)
}

fn plan(registry: &ServiceRegistry, args: &NodeArgs) -> Result<String> {
    let (node, _) = load_inputs(args)?;
    let active = select(registry, &node, args)?;
    let document = compose::compose(&node, &active)
        .with_context(|| format!("compose Quagga.conf for node {}", node.name))?;
    plan::StartupPlan::build(&node, &active, &document)?.to_json()
}

/// One line per service; notes go on an indented second line.
fn list_services(registry: &ServiceRegistry) -> String {
    let mut out = String::new();
    for svc in registry.iter() {
        let d = svc.descriptor();
        let families = match (d.ipv4_routing, d.ipv6_routing) {
            (true, true) => "ipv4,ipv6",
            (true, false) => "ipv4",
            (false, true) => "ipv6",
            (false, false) => "-",
        };
        out.push_str(&format!(
            "{:<10} {:<7} {:<10} depends: {}\n",
            d.name,
            d.group,
            families,
            d.depends.join(",")
        ));
        if !d.meta.is_empty() {
            out.push_str(&format!("    {}\n", d.meta));
        }
    }
    out
}

/// Initialize tracing with `RUST_LOG` filtering, defaulting to info.
/// Logs go to stderr so generated files can be piped from stdout.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn load_inputs(args: &NodeArgs) -> Result<(Node, SessionSpec)> {
    let node = NodeSpec::load(&args.node)?
        .validate_and_build()
        .with_context(|| format!("validate node file {}", args.node))?;
    let session = match &args.session {
        Some(path) => SessionSpec::load(path)?,
        None => SessionSpec::default(),
    };
    Ok((node, session))
}

fn select<'a>(
    registry: &'a ServiceRegistry,
    node: &Node,
    args: &NodeArgs,
) -> Result<Vec<&'a dyn ProtocolModule>> {
    let names: &[String] = if args.services.is_empty() {
        &node.services
    } else {
        &args.services
    };
    let active = registry.select(names)?;
    tracing::debug!(
        node = %node.name,
        services = ?active.iter().map(|s| s.name()).collect::<Vec<_>>(),
        "selected services"
    );
    Ok(active)
}
