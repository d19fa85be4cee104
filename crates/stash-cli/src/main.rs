use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reqwest::{Client, Response};
use serde_json::{json, Value};
use stash_common::models::auth::Credentials;
use stash_common::validation::{parse_image_type, validate_credentials};
use std::path::Path;

#[derive(Parser)]
#[command(name = "stash", version, about = "Stash CLI - accounts and image uploads")]
struct Cli {
    /// Server URL
    #[arg(long, env = "STASH_URL", default_value = "http://localhost:8080")]
    server: String,

    /// Bearer token from `stash sign-in`
    #[arg(long, env = "STASH_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    SignUp {
        email: String,
        #[arg(long, env = "STASH_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign in and print a bearer token
    SignIn {
        email: String,
        #[arg(long, env = "STASH_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// List uploaded files
    Files {
        #[arg(long, default_value = "100")]
        limit: i64,
        #[arg(long, default_value = "0")]
        offset: i64,
    },
    /// Upload a JPEG or PNG image
    Upload {
        /// Path to the image
        path: String,
        /// Override the content type guessed from the file extension
        #[arg(long)]
        content_type: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let client = Client::new();

    match cli.command {
        Commands::SignUp { email, password } => {
            cmd_sign_up(&client, &cli.server, Credentials { email, password }).await?;
        }
        Commands::SignIn { email, password } => {
            cmd_sign_in(&client, &cli.server, Credentials { email, password }).await?;
        }
        Commands::Files { limit, offset } => {
            let token = require_token(cli.token.as_deref())?;
            cmd_files(&client, &cli.server, token, limit, offset).await?;
        }
        Commands::Upload { path, content_type } => {
            let token = require_token(cli.token.as_deref())?;
            cmd_upload(&client, &cli.server, token, &path, content_type.as_deref()).await?;
        }
    }

    Ok(())
}

fn require_token(token: Option<&str>) -> Result<&str> {
    token.context("A token is required: pass --token or set STASH_TOKEN")
}

/// Parse a JSON body and turn `{error}` responses into an error
async fn read_json(resp: Response) -> Result<Value> {
    let status = resp.status();
    let body: Value = resp.json().await.context("Failed to parse response")?;

    if !status.is_success() {
        let err = body
            .get("error")
            .and_then(|v| v.as_str())
            .unwrap_or("Unknown error");
        anyhow::bail!("Server returned {}: {}", status, err);
    }
    Ok(body)
}

async fn cmd_sign_up(client: &Client, server: &str, creds: Credentials) -> Result<()> {
    validate_credentials(&creds)?;

    let resp = client
        .post(format!("{}/sign-up", server))
        .json(&json!({"email": creds.email, "password": creds.password}))
        .send()
        .await
        .context("Failed to connect to server")?;
    read_json(resp).await?;

    println!("Account created: {}", creds.email);
    Ok(())
}

async fn cmd_sign_in(client: &Client, server: &str, creds: Credentials) -> Result<()> {
    validate_credentials(&creds)?;

    let resp = client
        .post(format!("{}/sign-in", server))
        .json(&json!({"email": creds.email, "password": creds.password}))
        .send()
        .await
        .context("Failed to connect to server")?;
    let body = read_json(resp).await?;

    let token = body
        .get("token")
        .and_then(|v| v.as_str())
        .context("Response did not contain a token")?;

    println!("{}", token);
    Ok(())
}

async fn cmd_files(
    client: &Client,
    server: &str,
    token: &str,
    limit: i64,
    offset: i64,
) -> Result<()> {
    let resp = client
        .get(format!("{}/files?limit={}&offset={}", server, limit, offset))
        .bearer_auth(token)
        .send()
        .await
        .context("Failed to connect to server")?;
    let body = read_json(resp).await?;

    let files = body.as_array().context("Expected array response")?;

    if files.is_empty() {
        println!("No files found.");
        return Ok(());
    }

    println!("{:50} {:>10} {:12} URL", "FILENAME", "SIZE", "UPLOADED");
    println!("{}", "-".repeat(100));
    for file in files {
        let name = file.get("filename").and_then(|v| v.as_str()).unwrap_or("-");
        let size = file.get("size").and_then(|v| v.as_i64()).unwrap_or(0);
        let uploaded = file.get("uploadDate").and_then(|v| v.as_i64()).unwrap_or(0);
        let url = file.get("url").and_then(|v| v.as_str()).unwrap_or("-");
        println!("{:50} {:>10} {:12} {}", name, size, uploaded, url);
    }

    Ok(())
}

async fn cmd_upload(
    client: &Client,
    server: &str,
    token: &str,
    path: &str,
    content_type: Option<&str>,
) -> Result<()> {
    let path = Path::new(path);
    let content_type = match content_type {
        Some(ct) => ct.to_string(),
        None => guess_content_type(path)
            .with_context(|| format!("Cannot guess image type of {}", path.display()))?
            .to_string(),
    };
    if parse_image_type(&content_type).is_none() {
        anyhow::bail!("Only image/jpeg and image/png can be uploaded, got {}", content_type);
    }

    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let size = bytes.len();

    let mut request = client
        .post(format!("{}/upload", server))
        .bearer_auth(token)
        .header(reqwest::header::CONTENT_TYPE, content_type)
        .body(bytes);
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        request = request.header("X-Filename", name);
    }

    let resp = request.send().await.context("Failed to connect to server")?;
    read_json(resp).await?;

    println!("Uploaded {} ({} bytes)", path.display(), size);
    Ok(())
}

fn guess_content_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_content_type() {
        assert_eq!(guess_content_type(Path::new("cat.JPG")), Some("image/jpeg"));
        assert_eq!(guess_content_type(Path::new("a/b/cat.jpeg")), Some("image/jpeg"));
        assert_eq!(guess_content_type(Path::new("logo.png")), Some("image/png"));
        assert_eq!(guess_content_type(Path::new("notes.txt")), None);
        assert_eq!(guess_content_type(Path::new("noext")), None);
    }

    #[test]
    fn test_cli_parses_upload() {
        let cli = Cli::try_parse_from([
            "stash",
            "--server",
            "http://stash:8080",
            "--token",
            "abc",
            "upload",
            "cat.png",
        ])
        .unwrap();
        assert_eq!(cli.server, "http://stash:8080");
        assert_eq!(cli.token.as_deref(), Some("abc"));
        assert!(matches!(cli.command, Commands::Upload { ref path, .. } if path == "cat.png"));
    }

    #[test]
    fn test_require_token() {
        assert!(require_token(None).is_err());
        assert_eq!(require_token(Some("t")).unwrap(), "t");
    }
}
