//! Command-line companion for the gateway.
//!
//! Every command that needs a session logs in first, keeps the cookie in
//! the client's jar for the duration of the command and logs out at the end.

use clap::{Parser, Subcommand};
use reqwest::{Client, Method, Response};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Exercise the Plenti admin gateway from a terminal", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[arg(long, env = "PLENTI_EMAIL")]
    email: Option<String>,

    #[arg(long, env = "PLENTI_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in, show the session state, log out
    Session,
    /// List public categories (no login)
    Categories,
    /// Forward a call to the backend through the authenticated proxy
    Call {
        /// HTTP method (GET, POST, PUT, PATCH, DELETE)
        #[arg(short, long, default_value = "GET")]
        method: String,

        /// Backend-relative path, with optional query (e.g. products?page=2)
        path: String,

        /// JSON body for writes
        #[arg(short, long)]
        data: Option<String>,
    },
    /// Gateway liveness
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = Client::builder().cookie_store(true).build()?;
    let base = cli.url.trim_end_matches('/').to_string();

    match &cli.command {
        Commands::Health => {
            let res = client.get(format!("{}/api/health", base)).send().await?;
            print_response(res).await?;
        }
        Commands::Categories => {
            let res = client.get(format!("{}/api/categories", base)).send().await?;
            print_response(res).await?;
        }
        Commands::Session => {
            login(&client, &base, &cli).await?;
            let res = client.get(format!("{}/api/auth/session", base)).send().await?;
            print_response(res).await?;
            logout(&client, &base).await?;
        }
        Commands::Call { method, path, data } => {
            let method: Method = method.to_uppercase().parse()?;
            let body: Option<Value> = data.as_deref().map(serde_json::from_str::<Value>).transpose()?;

            login(&client, &base, &cli).await?;
            let mut req = client.request(
                method,
                format!("{}/api/proxy/{}", base, path.trim_start_matches('/')),
            );
            if let Some(body) = body {
                req = req.json(&body);
            }
            let res = req.send().await?;
            print_response(res).await?;
            logout(&client, &base).await?;
        }
    }

    Ok(())
}

async fn login(client: &Client, base: &str, cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let (Some(email), Some(password)) = (&cli.email, &cli.password) else {
        return Err("--email and --password (or PLENTI_EMAIL / PLENTI_PASSWORD) are required".into());
    };

    let res = client
        .post(format!("{}/api/auth/login", base))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await?;

    if !res.status().is_success() {
        let status = res.status();
        let body: Value = res.json().await.unwrap_or(Value::Null);
        let message = body["message"].as_str().unwrap_or("login failed");
        return Err(format!("Login rejected ({}): {}", status, message).into());
    }
    Ok(())
}

async fn logout(client: &Client, base: &str) -> Result<(), Box<dyn std::error::Error>> {
    client
        .post(format!("{}/api/auth/logout", base))
        .send()
        .await?
        .error_for_status()?;
    Ok(())
}

async fn print_response(res: Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) if text.is_empty() => println!("({})", status),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
