use std::fs;
use std::io;
use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use chirp_client::{Author, AuthoredPost, ChirpClient, ChirpClientError, Post, Transport};
use clap::{Parser, Subcommand};
use serde::Serialize;

const TOKEN_FILE: &str = ".chirp_token";
const DEFAULT_HTTP_SERVER: &str = "http://127.0.0.1:8080";
const DEFAULT_GRPC_SERVER: &str = "http://127.0.0.1:50051";

#[derive(Debug, Parser)]
#[command(name = "chirp-cli", version, about = "CLI клиент для chirp-server")]
struct Cli {
    /// Использовать gRPC транспорт (по умолчанию HTTP).
    #[arg(long, global = true)]
    grpc: bool,

    /// Адрес сервера (для HTTP или gRPC, в зависимости от --grpc).
    #[arg(long, global = true)]
    server: Option<String>,

    /// JWT-токен; если не задан, читается из файла .chirp_token.
    #[arg(long, global = true, env = "CHIRP_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Печатать ответ в формате JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Лента: до 100 последних постов.
    Feed,
    /// Посты пользователя.
    UserPosts {
        #[arg(long)]
        user_id: String,
    },
    /// Получение поста по id.
    Get {
        #[arg(long)]
        id: String,
    },
    /// Публикация поста (требует токен).
    Post {
        #[arg(long)]
        content: String,
    },
    /// Профиль пользователя; ведущий `@` допускается.
    Profile {
        #[arg(long)]
        username: String,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Ошибка: {err}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let transport = resolve_transport(cli.grpc, cli.server);
    let mut client = ChirpClient::new(transport).map_err(map_client_error)?;

    let token = match cli.token.as_deref().and_then(parse_token_content) {
        Some(token) => Some(token),
        None => load_token().context("не удалось прочитать .chirp_token")?,
    };
    if let Some(token) = token {
        client.set_token(token);
    }

    let json = cli.json;
    match cli.command {
        Command::Feed => {
            let posts = client.feed().await.map_err(map_client_error)?;
            render(json, &posts, || print_feed("Лента", &posts))?;
        }
        Command::UserPosts { user_id } => {
            let posts = client
                .posts_by_user(&user_id)
                .await
                .map_err(map_client_error)?;
            render(json, &posts, || {
                print_feed(&format!("Посты пользователя {user_id}"), &posts)
            })?;
        }
        Command::Get { id } => {
            let item = client.get_post(&id).await.map_err(map_client_error)?;
            render(json, &item, || print_authored_post(&item))?;
        }
        Command::Post { content } => {
            let post = client
                .create_post(&content)
                .await
                .map_err(map_client_error)?;
            render(json, &post, || print_post("Пост опубликован", &post))?;
        }
        Command::Profile { username } => {
            let author = client
                .get_profile(strip_handle(&username))
                .await
                .map_err(map_client_error)?;
            render(json, &author, || print_author(&author))?;
        }
    }

    Ok(())
}

fn resolve_transport(grpc: bool, server: Option<String>) -> Transport {
    let default = if grpc {
        DEFAULT_GRPC_SERVER
    } else {
        DEFAULT_HTTP_SERVER
    };
    let raw = server.unwrap_or_else(|| default.to_string());
    let normalized = normalize_server(raw);

    if grpc {
        Transport::Grpc(normalized)
    } else {
        Transport::Http(normalized)
    }
}

fn normalize_server(server: String) -> String {
    if server.starts_with("http://") || server.starts_with("https://") {
        return server;
    }

    format!("http://{server}")
}

/// `@alice` и `alice` ведут на один профиль.
fn strip_handle(username: &str) -> &str {
    username.strip_prefix('@').unwrap_or(username)
}

fn parse_token_content(raw: &str) -> Option<String> {
    let token = raw.trim().to_string();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

fn load_token() -> io::Result<Option<String>> {
    if !Path::new(TOKEN_FILE).exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(TOKEN_FILE)?;
    Ok(parse_token_content(&raw))
}

fn map_client_error(err: ChirpClientError) -> anyhow::Error {
    let message = match err {
        ChirpClientError::Unauthorized => {
            "требуется авторизация: задайте CHIRP_TOKEN или положите токен в .chirp_token"
                .to_string()
        }
        ChirpClientError::NotFound => "ресурс не найден".to_string(),
        ChirpClientError::RateLimited(message) => format!("слишком часто: {message}"),
        ChirpClientError::InvalidRequest(message) => format!("некорректный запрос: {message}"),
        ChirpClientError::Http(err) => format!("ошибка HTTP: {err}"),
        ChirpClientError::GrpcStatus(status) => {
            format!(
                "ошибка gRPC: code={:?}, message={}",
                status.code(),
                status.message()
            )
        }
        ChirpClientError::GrpcTransport(err) => format!("ошибка gRPC соединения: {err}"),
    };
    anyhow::anyhow!(message)
}

fn render<T: Serialize>(json: bool, value: &T, text: impl FnOnce()) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        text();
    }
    Ok(())
}

fn print_post(title: &str, post: &Post) {
    println!("{title}");
    println!("id: {}", post.id);
    println!("content: {}", post.content);
    println!("author_id: {}", post.author_id);
    println!("created_at: {}", post.created_at);
}

fn print_author(author: &Author) {
    println!("@{}", author.name);
    println!("id: {}", author.id);
    println!("image: {}", author.image);
}

fn print_authored_post(item: &AuthoredPost) {
    print_post(&format!("Пост @{}", item.author.name), &item.post);
}

fn print_feed(title: &str, posts: &[AuthoredPost]) {
    println!("{title}: {}", posts.len());

    for item in posts {
        println!(
            "- [{}] @{} ({}): {}",
            item.post.id, item.author.name, item.post.created_at, item.post.content
        );
    }
}
