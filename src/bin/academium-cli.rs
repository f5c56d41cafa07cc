use std::{fs, path::PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::{json, Value};
use time::{format_description::well_known::Rfc3339, Duration, OffsetDateTime};

#[derive(Parser)]
#[command(name = "academium-cli")]
#[command(about = "Browse tutors and book sessions on an Academium server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, default_value = "http://localhost:5000")]
    url: String,

    /// Where the login token is kept between runs.
    #[arg(long, default_value = ".academium-token")]
    token_file: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    Register {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
        #[arg(short, long, default_value = "student")]
        role: String,
    },
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
    Logout,
    Me,
    /// Search tutors by name/subject and curriculum
    Tutors {
        #[arg(short, long, default_value = "")]
        query: String,
        #[arg(short, long, default_value = "")]
        curriculum: String,
    },
    Tutor {
        id: String,
    },
    AddTutor {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        subject: String,
        #[arg(short, long)]
        curriculum: String,
        #[arg(short = 'r', long)]
        hourly_rate: f64,
        #[arg(long)]
        online: bool,
        #[arg(long)]
        image: Option<String>,
    },
    /// Book a session; without --date it starts in one hour
    Book {
        #[arg(short, long)]
        tutor: String,
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short = 'm', long, default_value_t = 60)]
        duration: i32,
    },
    Bookings,
}

struct Session {
    client: Client,
    base: String,
    token_file: PathBuf,
}

impl Session {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base.trim_end_matches('/'), path)
    }

    fn token(&self) -> anyhow::Result<String> {
        let token = fs::read_to_string(&self.token_file)
            .with_context(|| format!("not logged in (no token at {})", self.token_file.display()))?;
        Ok(token.trim().to_string())
    }

    fn authed(&self, req: RequestBuilder) -> anyhow::Result<RequestBuilder> {
        Ok(req.bearer_auth(self.token()?))
    }
}

async fn read_json(resp: Response) -> anyhow::Result<Value> {
    let status = resp.status();
    let body: Value = resp.json().await.unwrap_or(Value::Null);
    if !status.is_success() {
        let message = body["message"].as_str().unwrap_or("request failed");
        bail!("{status}: {message}");
    }
    Ok(body)
}

fn print(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let s = Session {
        client: Client::new(),
        base: cli.url,
        token_file: cli.token_file,
    };

    match cli.command {
        Commands::Register {
            name,
            email,
            password,
            role,
        } => {
            let resp = s
                .client
                .post(s.url("/api/auth/register"))
                .json(&json!({ "name": name, "email": email, "password": password, "role": role }))
                .send()
                .await?;
            let body = read_json(resp).await?;
            println!("{}", body["message"].as_str().unwrap_or("registered"));
        }
        Commands::Login { email, password } => {
            let resp = s
                .client
                .post(s.url("/api/auth/login"))
                .json(&json!({ "email": email, "password": password }))
                .send()
                .await?;
            let body = read_json(resp).await?;
            let token = body["token"]
                .as_str()
                .context("login response had no token")?;
            fs::write(&s.token_file, token)
                .with_context(|| format!("write {}", s.token_file.display()))?;
            println!("logged in as {}", body["user"]["email"].as_str().unwrap_or(&email));
        }
        Commands::Logout => {
            if s.token_file.exists() {
                fs::remove_file(&s.token_file)?;
            }
            println!("logged out");
        }
        Commands::Me => {
            let resp = s.authed(s.client.get(s.url("/api/auth/me")))?.send().await?;
            print(&read_json(resp).await?)?;
        }
        Commands::Tutors { query, curriculum } => {
            let resp = s
                .client
                .get(s.url("/api/tutors/search"))
                .query(&[("q", query.as_str()), ("curriculum", curriculum.as_str())])
                .send()
                .await?;
            let body = read_json(resp).await?;
            for t in body.as_array().into_iter().flatten() {
                println!(
                    "{}  {:<20} {:<16} {:<6} rating {:.1}  {} sessions  {}/h{}",
                    t["id"].as_str().unwrap_or("?"),
                    t["name"].as_str().unwrap_or(""),
                    t["subject"].as_str().unwrap_or(""),
                    t["curriculum"].as_str().unwrap_or(""),
                    t["rating"].as_f64().unwrap_or(0.0),
                    t["sessions"].as_i64().unwrap_or(0),
                    t["hourlyRate"].as_f64().unwrap_or(0.0),
                    if t["online"].as_bool().unwrap_or(false) { "  (online)" } else { "" },
                );
            }
        }
        Commands::Tutor { id } => {
            let resp = s.client.get(s.url(&format!("/api/tutors/{id}"))).send().await?;
            print(&read_json(resp).await?)?;
        }
        Commands::AddTutor {
            name,
            subject,
            curriculum,
            hourly_rate,
            online,
            image,
        } => {
            let resp = s
                .authed(s.client.post(s.url("/api/tutors")))?
                .json(&json!({
                    "name": name,
                    "subject": subject,
                    "curriculum": curriculum,
                    "hourlyRate": hourly_rate,
                    "online": online,
                    "image": image,
                }))
                .send()
                .await?;
            print(&read_json(resp).await?)?;
        }
        Commands::Book {
            tutor,
            date,
            duration,
        } => {
            let date = match date {
                Some(d) => d,
                None => (OffsetDateTime::now_utc() + Duration::hours(1)).format(&Rfc3339)?,
            };
            let resp = s
                .authed(s.client.post(s.url("/api/bookings")))?
                .json(&json!({ "tutor": tutor, "date": date, "duration": duration }))
                .send()
                .await?;
            let body = read_json(resp).await?;
            println!("Session booked! ({})", body["id"].as_str().unwrap_or("?"));
        }
        Commands::Bookings => {
            let resp = s.authed(s.client.get(s.url("/api/bookings")))?.send().await?;
            let body = read_json(resp).await?;
            for b in body.as_array().into_iter().flatten() {
                println!(
                    "{}  {}  {} min with {} ({})  {} / {}",
                    b["id"].as_str().unwrap_or("?"),
                    b["date"].as_str().unwrap_or(""),
                    b["duration"].as_i64().unwrap_or(0),
                    b["tutor"]["name"].as_str().unwrap_or("?"),
                    b["tutor"]["subject"].as_str().unwrap_or(""),
                    b["status"].as_str().unwrap_or(""),
                    b["paymentStatus"].as_str().unwrap_or(""),
                );
            }
        }
    }

    Ok(())
}
