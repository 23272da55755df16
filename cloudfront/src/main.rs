use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use cloudfront_orp::{
    CloudFrontConnector,
    connector::skeletons,
    op::OpPlanOutput,
};
use cloudfront_orp_core::logging::init_tracing;

/// Manage CloudFront origin request policies from RON definitions.
#[derive(Debug, Parser)]
#[command(name = "cloudfront-orp", author, version, about, long_about = None)]
struct Cli {
    /// Repository root holding `aws/cloudfront/...` definitions and config.
    #[arg(long, env = "CLOUDFRONT_ORP_PREFIX", default_value = ".")]
    prefix: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the addresses of all custom policies.
    List {
        #[arg(default_value = "aws/cloudfront")]
        subpath: PathBuf,
    },
    /// Read a policy and record its ID and ETag.
    Get { addr: PathBuf },
    /// Show the operations needed to reach the desired definition.
    Plan {
        addr:    PathBuf,
        /// Current definition; defaults to the live policy.
        #[arg(long)]
        current: Option<PathBuf>,
        /// Desired definition; defaults to the file at the address.
        #[arg(long)]
        desired: Option<PathBuf>,
    },
    /// Plan, then execute every planned operation.
    Apply { addr: PathBuf },
    /// Execute a single RON-encoded operation.
    Exec { addr: PathBuf, op: String },
    /// Bind an address to an existing policy ID.
    Import { addr: PathBuf, id: String },
    /// Print a template definition.
    Skeleton,
}

fn read_optional(path: &Path) -> anyhow::Result<Option<String>> {
    if path.is_file() {
        Ok(Some(
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?,
        ))
    } else {
        Ok(None)
    }
}

async fn plan(
    connector: &CloudFrontConnector,
    addr: &Path,
    current: Option<&Path>,
    desired: Option<&Path>,
) -> anyhow::Result<Vec<OpPlanOutput>> {
    let current = match current {
        Some(path) => read_optional(path)?,
        None => connector.do_get(addr).await?.map(|got| got.resource_definition),
    };
    let desired = match desired {
        Some(path) => read_optional(path)?,
        None => read_optional(&connector.prefix().join(addr))?,
    };
    connector.do_plan(addr, current, desired).await
}

fn print_plan(plan: &[OpPlanOutput]) {
    if plan.is_empty() {
        println!("No changes.");
    }
    for op in plan {
        match &op.friendly_message {
            Some(message) => println!("{message}"),
            None => println!("{}", op.op_definition),
        }
    }
}

#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
    init_tracing("info");

    let cli = Cli::parse();

    if let Command::Skeleton = cli.command {
        for skeleton in skeletons()? {
            println!("// {}\n{}", skeleton.addr.display(), skeleton.body);
        }
        return Ok(());
    }

    let connector = CloudFrontConnector::init(&cli.prefix).await?;

    match cli.command {
        Command::List { subpath } => {
            for path in connector.do_list(&subpath).await? {
                println!("{}", path.display());
            }
        }
        Command::Get { addr } => match connector.do_get(&addr).await? {
            Some(got) => println!("{}", got.resource_definition),
            None => println!("Policy at {} does not exist.", addr.display()),
        },
        Command::Plan { addr, current, desired } => {
            print_plan(&plan(&connector, &addr, current.as_deref(), desired.as_deref()).await?);
        }
        Command::Apply { addr } => {
            let planned = plan(&connector, &addr, None, None).await?;
            print_plan(&planned);
            for op in planned {
                let output = connector.do_op_exec(&addr, &op.op_definition).await?;
                if let Some(message) = output.friendly_message {
                    println!("{message}");
                }
            }
        }
        Command::Exec { addr, op } => {
            let output = connector.do_op_exec(&addr, &op).await?;
            if let Some(message) = output.friendly_message {
                println!("{message}");
            }
        }
        Command::Import { addr, id } => match connector.do_import(&addr, &id).await? {
            Some(got) => println!("{}", got.resource_definition),
            None => println!("No origin request policy with ID {id}."),
        },
        Command::Skeleton => {}
    }
    Ok(())
}
