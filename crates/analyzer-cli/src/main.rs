// ============================================================================
// gramscope — Instagram follower analyzer CLI
// ============================================================================
// Prompts for a target profile and login credentials, fetches the profile's
// follower/following lists, and writes a timestamped mutual-follow report
// into the output directory.
// ============================================================================

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use dialoguer::{Input, Password};

use analyzer_core::{
    pipeline, AnalyzerError, ClientConfig, CredentialSource, Credentials, FollowList,
    InstagramProvider, ProfileSnapshot, ProgressSink,
};

/// Analyze an Instagram profile's followers, following, and mutual follows
#[derive(Parser)]
#[command(name = "gramscope", version, about)]
struct Cli {
    /// Instagram username to analyze (prompted when omitted)
    #[arg(short, long)]
    target: Option<String>,

    /// Username of the account used to log in (prompted when omitted)
    #[arg(long)]
    login_user: Option<String>,

    /// Directory the report file is written into
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

/// Reads credentials from the terminal; the password prompt is masked and
/// the value never echoed or logged.
struct ConsoleCredentials {
    login_user: Option<String>,
}

impl CredentialSource for ConsoleCredentials {
    fn credentials(&self) -> Result<Credentials, AnalyzerError> {
        let username = match &self.login_user {
            Some(user) => user.clone(),
            None => Input::new()
                .with_prompt("Your Instagram username (for login)")
                .interact_text()
                .map_err(|e| AnalyzerError::Input(e.to_string()))?,
        };
        let password = Password::new()
            .with_prompt("Your Instagram password")
            .interact()
            .map_err(|e| AnalyzerError::Input(e.to_string()))?;

        Ok(Credentials {
            username: username.trim().to_string(),
            password,
        })
    }

    fn two_factor_code(&self) -> Result<String, AnalyzerError> {
        Input::new()
            .with_prompt("Two-factor authentication required. Enter the code")
            .interact_text()
            .map_err(|e| AnalyzerError::Input(e.to_string()))
    }
}

/// Console progress: staging messages on their own lines, list counts as
/// carriage-return updates overwritten in place.
struct ConsoleProgress;

impl ProgressSink for ConsoleProgress {
    fn stage(&self, message: &str) {
        println!("\n{message}");
    }

    fn profile(&self, profile: &ProfileSnapshot) {
        println!(
            "Profile found: {} | Followers: {} | Following: {}",
            profile.full_name, profile.followers, profile.following
        );
        println!("\nNote: Fetching large follower/following lists may take a while due to Instagram rate limits.");
    }

    fn update(&self, list: FollowList, count: usize) {
        print!("  {}: {count}\r", list.label());
        let _ = std::io::stdout().flush();
    }

    fn done(&self, list: FollowList, count: usize) {
        println!("  {} fetched: {count}", list.label());
    }
}

fn banner() {
    println!("{}", "=".repeat(60));
    println!("       Instagram Follower Analyzer");
    println!("{}", "=".repeat(60));
}

async fn run(cli: Cli) -> Result<()> {
    banner();

    let target = match cli.target {
        Some(target) => target,
        None => Input::new()
            .with_prompt("\nEnter the Instagram username to analyze")
            .interact_text()?,
    };

    println!("\nLogin is required to access follower/following data.");
    println!("Your credentials are used only to authenticate with Instagram.");

    let mut provider = InstagramProvider::new(ClientConfig::from_env())?;
    let credentials = ConsoleCredentials {
        login_user: cli.login_user,
    };

    let summary = pipeline::run(
        &mut provider,
        &credentials,
        &ConsoleProgress,
        &target,
        &cli.output_dir,
    )
    .await?;

    println!("\nAnalysis complete!");
    println!("  Following:      {}", summary.following);
    println!("  Followers:      {}", summary.followers);
    println!("  Mutual follows: {}", summary.mutual);
    println!("\nReport saved to: {}", summary.report_path.display());

    Ok(())
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
