//! Handlers for `intake request ...`

use super::request::RequestCommands;
use anyhow::{Context, Result};
use intake_core::client::AccountRequestClient;
use intake_core::models::{
    AccountRequestCreateRequest, AccountRequestData, AccountRequestStatus,
    AccountRequestUpdateRequest,
};

/// Environment variable holding the bearer token for request commands
pub const TOKEN_ENV: &str = "INTAKE_TOKEN";
/// Environment variable holding the server URL for request commands
pub const SERVER_ENV: &str = "INTAKE_SERVER";

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";

pub async fn handle_request_commands(command: RequestCommands) -> Result<()> {
    match command {
        RequestCommands::Create {
            name,
            email,
            institute,
            comments,
            server,
            token,
            json,
        } => {
            let payload = AccountRequestCreateRequest {
                name: Some(name),
                email: Some(email),
                institute: Some(institute),
                comments,
            };
            let created = client(server, token)
                .create(&payload)
                .await
                .context("Failed to create account request")?;
            print_request("Account request created:", &created, json)?;
        }
        RequestCommands::Show {
            id,
            server,
            token,
            json,
        } => {
            let request = client(server, token)
                .get(&id)
                .await
                .context("Failed to get account request")?;
            print_request("Account request:", &request, json)?;
        }
        RequestCommands::Search {
            key,
            server,
            token,
            json,
        } => {
            let requests = client(server, token)
                .search(&key)
                .await
                .context("Failed to search account requests")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&requests)?);
            } else if requests.is_empty() {
                println!("No account requests match '{}'", key);
            } else {
                println!("Account requests matching '{}':", key);
                for request in &requests {
                    println!(
                        "  {} [{}] {} <{}> - {}",
                        request.id, request.status, request.name, request.email, request.institute
                    );
                }
            }
        }
        RequestCommands::Update {
            id,
            name,
            email,
            institute,
            status,
            comments,
            server,
            token,
            json,
        } => {
            let status = parse_status(&status)?;
            let payload = AccountRequestUpdateRequest {
                name: Some(name),
                email: Some(email),
                institute: Some(institute),
                status: Some(status),
                comments,
            };
            let updated = client(server, token)
                .update(&id, &payload)
                .await
                .context("Failed to update account request")?;
            print_request("Account request updated:", &updated, json)?;
        }
        RequestCommands::Reset {
            id,
            server,
            token,
            json,
        } => {
            let reset = client(server, token)
                .reset(&id)
                .await
                .context("Failed to reset account request")?;
            print_request("Account request reset:", &reset, json)?;
        }
        RequestCommands::Delete { id, server, token } => {
            let message = client(server, token)
                .delete(&id)
                .await
                .context("Failed to delete account request")?;
            println!("{}", message);
        }
        RequestCommands::Register {
            key,
            server,
            token,
            json,
        } => {
            let registered = client(server, token)
                .register(&key)
                .await
                .context("Failed to register")?;
            print_request("Registration complete:", &registered, json)?;
        }
    }
    Ok(())
}

fn client(server: String, token: Option<String>) -> AccountRequestClient {
    let server = resolve_server_url(server, std::env::var(SERVER_ENV).ok());
    let token = token.or_else(|| std::env::var(TOKEN_ENV).ok());
    AccountRequestClient::new(server, token)
}

/// `--server` wins, then `INTAKE_SERVER`, then the local default
fn resolve_server_url(server: String, from_env: Option<String>) -> String {
    if !server.is_empty() {
        return server;
    }
    from_env
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
}

fn parse_status(status: &str) -> Result<AccountRequestStatus> {
    status.parse::<AccountRequestStatus>().map_err(|e| anyhow::anyhow!(e))
}

fn print_request(heading: &str, request: &AccountRequestData, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(request)?);
        return Ok(());
    }

    println!("{}", heading);
    println!("  ID: {}", request.id);
    println!("  Name: {}", request.name);
    println!("  Email: {}", request.email);
    println!("  Institute: {}", request.institute);
    println!("  Status: {}", request.status);
    if let Some(comments) = &request.comments {
        println!("  Comments: {}", comments);
    }
    println!("  Created: {}", request.created_at);
    if let Some(registered_at) = request.registered_at {
        println!("  Registered: {}", registered_at);
    }
    Ok(())
}
