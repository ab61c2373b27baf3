//! Operator console for the Strata Cloud services API.
//!
//! Run with: `stratactl <command>`
//!
//! This is a CLI tool for operators, so `println!` and `eprintln!` are
//! intentionally used for user-facing output rather than structured logging.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::env;
use std::process::ExitCode;

use anyhow::{anyhow, bail, Context};
use strata_sdk::{StrataClient, DEFAULT_FRAMEWORK};
use tracing_subscriber::EnvFilter;

const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Frameworks the console accepts. The API itself takes any string; this
/// guard exists to catch typos before a request goes out.
const FRAMEWORKS: [&str; 3] = ["soc2", "iso27001", "gdpr"];

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Instances,
    Clusters,
    Buckets,
    Vpcs,
    ComplianceControls { framework: String },
    CollectEvidence { framework: String },
    Attestation { framework: String, period_start: String, period_end: String },
    Graphql { query: String, variables: Option<String> },
    Help,
}

#[derive(Debug, PartialEq, Eq)]
struct Invocation {
    base_url: Option<String>,
    token: Option<String>,
    command: Command,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args: Vec<String> = env::args().skip(1).collect();
    let invocation = match parse_args(&args) {
        Ok(invocation) => invocation,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!();
            print_help();
            return ExitCode::FAILURE;
        }
    };

    if invocation.command == Command::Help {
        print_help();
        return ExitCode::SUCCESS;
    }

    match run(invocation).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn print_help() {
    println!("stratactl - operator console for the Strata Cloud API");
    println!();
    println!("USAGE:");
    println!("    stratactl [OPTIONS] <COMMAND>");
    println!();
    println!("OPTIONS:");
    println!("    --base-url <URL>    API root (default: {DEFAULT_BASE_URL}, env: STRATA_BASE_URL)");
    println!("    --token <TOKEN>     API token (env: STRATA_TOKEN)");
    println!();
    println!("COMMANDS:");
    println!("    instances            List provisioned service instances");
    println!("    clusters             List managed Kubernetes clusters");
    println!("    buckets              List object storage buckets");
    println!("    vpcs                 List virtual private clouds");
    println!("    compliance-controls  Show control status [--framework <soc2|iso27001|gdpr>]");
    println!("    collect-evidence     Trigger evidence collection [--framework <soc2|iso27001|gdpr>]");
    println!("    attestation          Fetch an attestation report (--period-start, --period-end, [--framework])");
    println!("    graphql              Run a GraphQL document (--query, optional --variables <json>)");
    println!("    help                 Show this help message");
    println!();
    println!("Set RUST_LOG=strata_sdk=debug to trace outgoing requests.");
}

async fn run(invocation: Invocation) -> anyhow::Result<()> {
    let base_url = resolve_base_url(invocation.base_url, env_var("STRATA_BASE_URL"));
    let token = resolve_token(invocation.token, env_var("STRATA_TOKEN"))?;

    let client = StrataClient::builder()
        .user_agent(concat!("stratactl/", env!("CARGO_PKG_VERSION")))
        .build(base_url, token)
        .context("failed to initialize API client")?;

    let body = match invocation.command {
        Command::Instances => client.list_service_instances().await?,
        Command::Clusters => client.list_kubernetes_clusters().await?,
        Command::Buckets => client.list_buckets().await?,
        Command::Vpcs => client.list_vpcs().await?,
        Command::ComplianceControls { framework } => {
            client.compliance_control_status(&framework).await?
        }
        Command::CollectEvidence { framework } => {
            client.collect_compliance_evidence(&framework).await?
        }
        Command::Attestation { framework, period_start, period_end } => {
            client.compliance_attestation(&framework, &period_start, &period_end).await?
        }
        Command::Graphql { query, variables } => {
            let variables = variables
                .map(|raw| {
                    serde_json::from_str(&raw).context("--variables must be a valid JSON document")
                })
                .transpose()?;
            client.graphql(&query, variables).await?
        }
        // Handled in main before a client is ever built.
        Command::Help => return Ok(()),
    };

    print_body(&body);
    Ok(())
}

/// Pretty-print JSON bodies; pass anything else through untouched.
fn print_body(body: &[u8]) {
    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(pretty) => println!("{pretty}"),
            Err(_) => println!("{}", String::from_utf8_lossy(body)),
        },
        Err(_) => println!("{}", String::from_utf8_lossy(body)),
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}

fn resolve_base_url(flag: Option<String>, env: Option<String>) -> String {
    flag.filter(|value| !value.is_empty())
        .or(env)
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

fn resolve_token(flag: Option<String>, env: Option<String>) -> anyhow::Result<String> {
    flag.filter(|value| !value.is_empty())
        .or(env)
        .ok_or_else(|| anyhow!("no API token given; pass --token or set STRATA_TOKEN"))
}

fn parse_args(args: &[String]) -> anyhow::Result<Invocation> {
    let mut iter = args.iter();
    let mut base_url = None;
    let mut token = None;
    let mut command_name: Option<&str> = None;
    let mut framework: Option<String> = None;
    let mut period_start: Option<String> = None;
    let mut period_end: Option<String> = None;
    let mut query: Option<String> = None;
    let mut variables: Option<String> = None;

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--base-url" => base_url = Some(flag_value(&mut iter, "--base-url")?),
            "--token" => token = Some(flag_value(&mut iter, "--token")?),
            "--framework" => framework = Some(flag_value(&mut iter, "--framework")?),
            "--period-start" => period_start = Some(flag_value(&mut iter, "--period-start")?),
            "--period-end" => period_end = Some(flag_value(&mut iter, "--period-end")?),
            "--query" => query = Some(flag_value(&mut iter, "--query")?),
            "--variables" => variables = Some(flag_value(&mut iter, "--variables")?),
            "--help" | "-h" => {
                return Ok(Invocation { base_url, token, command: Command::Help });
            }
            other if other.starts_with('-') => bail!("unknown flag: {other}"),
            other => {
                if let Some(existing) = command_name {
                    bail!("unexpected argument '{other}' after command '{existing}'");
                }
                command_name = Some(other);
            }
        }
    }

    let command = match command_name {
        None | Some("help") => Command::Help,
        Some(name @ ("instances" | "clusters" | "buckets" | "vpcs")) => {
            reject_unused(
                name,
                &[
                    ("--framework", framework.is_some()),
                    ("--period-start", period_start.is_some()),
                    ("--period-end", period_end.is_some()),
                    ("--query", query.is_some()),
                    ("--variables", variables.is_some()),
                ],
            )?;
            match name {
                "instances" => Command::Instances,
                "clusters" => Command::Clusters,
                "buckets" => Command::Buckets,
                _ => Command::Vpcs,
            }
        }
        Some(name @ ("compliance-controls" | "collect-evidence")) => {
            reject_unused(
                name,
                &[
                    ("--period-start", period_start.is_some()),
                    ("--period-end", period_end.is_some()),
                    ("--query", query.is_some()),
                    ("--variables", variables.is_some()),
                ],
            )?;
            let framework = parse_framework(framework.as_deref())?;
            if name == "compliance-controls" {
                Command::ComplianceControls { framework }
            } else {
                Command::CollectEvidence { framework }
            }
        }
        Some("attestation") => {
            reject_unused(
                "attestation",
                &[("--query", query.is_some()), ("--variables", variables.is_some())],
            )?;
            Command::Attestation {
                framework: parse_framework(framework.as_deref())?,
                period_start: period_start.context("attestation requires --period-start")?,
                period_end: period_end.context("attestation requires --period-end")?,
            }
        }
        Some("graphql") => {
            reject_unused(
                "graphql",
                &[
                    ("--framework", framework.is_some()),
                    ("--period-start", period_start.is_some()),
                    ("--period-end", period_end.is_some()),
                ],
            )?;
            Command::Graphql { query: query.context("graphql requires --query")?, variables }
        }
        Some(unknown) => bail!("unknown command: {unknown}"),
    };

    Ok(Invocation { base_url, token, command })
}

fn flag_value<'a, I>(iter: &mut I, flag: &str) -> anyhow::Result<String>
where
    I: Iterator<Item = &'a String>,
{
    iter.next().cloned().ok_or_else(|| anyhow!("{flag} requires a value"))
}

fn parse_framework(value: Option<&str>) -> anyhow::Result<String> {
    let value = value.unwrap_or(DEFAULT_FRAMEWORK);
    if FRAMEWORKS.contains(&value) {
        Ok(value.to_string())
    } else {
        bail!("invalid framework '{value}' (choose from {})", FRAMEWORKS.join(", "));
    }
}

fn reject_unused(command: &str, flags: &[(&str, bool)]) -> anyhow::Result<()> {
    for (flag, provided) in flags {
        if *provided {
            bail!("{command} does not accept {flag}");
        }
    }
    Ok(())
}
