// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Portico CLI - Transparent Content-Rewriting HTTP Proxy
//!
//! Starts the proxy server; everything else is the library's job.

use std::env;
use std::process::ExitCode;

use portico::{ProxyService, Server, ServerConfig};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("portico=info".parse().unwrap()),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    match args[1].as_str() {
        "serve" => serve(&args[2..]).await,
        "--help" | "-h" | "help" => {
            print_usage();
            ExitCode::SUCCESS
        }
        "--version" | "-v" | "version" => {
            println!("portico {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            ExitCode::from(1)
        }
    }
}

async fn serve(args: &[String]) -> ExitCode {
    match run_server(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::from(1)
        }
    }
}

async fn run_server(args: &[String]) -> anyhow::Result<()> {
    use anyhow::{bail, Context};

    let mut config = ServerConfig::default();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--host" => {
                let host = iter.next().context("--host requires a value")?;
                config = config.with_host(host.clone());
            }
            "--port" => {
                let port = iter
                    .next()
                    .context("--port requires a value")?
                    .parse()
                    .context("--port requires a numeric value")?;
                config = config.with_port(port);
            }
            other => bail!("Unknown option: {}", other),
        }
    }

    let service = ProxyService::new().context("failed to build proxy service")?;
    let server = Server::new(config, service).context("failed to configure server")?;

    println!("portico listening on http://{}", server.addr());

    server.run().await.context("server error")?;
    Ok(())
}

fn print_usage() {
    println!(
        r#"Portico - Transparent Content-Rewriting HTTP Proxy

USAGE:
    portico <COMMAND> [OPTIONS]

COMMANDS:
    serve [--host H] [--port N]    Start the proxy server
    help                           Show this help message
    version                        Show version information

EXAMPLES:
    portico serve
    portico serve --host 0.0.0.0 --port 8870

The proxy endpoint is GET|POST /api/proxy?url=<percent-encoded URL>.
Set RUST_LOG for verbose logging, e.g. RUST_LOG=portico=debug.
"#
    );
}
