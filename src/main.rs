//! pagebase: a multilingual page dispatcher
//!
//! Maps request paths onto view fragments, picks the page language and
//! renders the page through a fixed chain of header and footer fragments.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌───────────────────────────────────────────────────────┐
//!                  │                       PAGEBASE                         │
//!                  │                                                        │
//!  Client Request  │  ┌─────────┐   ┌──────────┐   ┌───────────────────┐   │
//!  ────────────────┼─▶│  http   │──▶│   site   │──▶│ routing (resolve) │   │
//!                  │  │ server  │   │ dispatch │   └─────────┬─────────┘   │
//!                  │  └─────────┘   └──────────┘             ▼             │
//!                  │                               ┌───────────────────┐   │
//!                  │                               │ i18n (negotiate)  │   │
//!                  │                               └─────────┬─────────┘   │
//!                  │                                         ▼             │
//!  Client Response │  ┌─────────┐                  ┌───────────────────┐   │
//!  ◀───────────────┼──│response │◀─────────────────│ render (fragments)│   │
//!                  │  └─────────┘                  └───────────────────┘   │
//!                  │                                                        │
//!                  │  config · extensions · observability · lifecycle       │
//!                  └───────────────────────────────────────────────────────┘
//! ```

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use pagebase::config::{validate_settings, ConfigError, SiteSettings};
use pagebase::extensions::ExtensionRegistry;
use pagebase::lifecycle::{Startup, StartupError};
use pagebase::observability::logging::init_logging;
use pagebase::site::RequestContext;

#[derive(Parser)]
#[command(name = "pagebase")]
#[command(about = "Serve multilingual pages from view fragments", long_about = None)]
struct Cli {
    /// Configuration file (TOML or JSON); defaults apply when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the site over HTTP
    Serve {
        /// Override server.bind_address
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Render one path and print the page to stdout
    Render {
        /// Request path, e.g. /fr/apropos
        path: String,

        /// Accept-Language header value
        #[arg(long)]
        accept_language: Option<String>,

        /// Language query parameter value
        #[arg(long)]
        lang: Option<String>,

        /// Language cookie value
        #[arg(long)]
        cookie: Option<String>,

        /// Host used for absolute URLs
        #[arg(long, default_value = "localhost")]
        host: String,

        /// Treat the request as HTTPS
        #[arg(long)]
        secure: bool,
    },
    /// Load and validate the configuration, then exit
    Check,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let startup = match Startup::load(cli.config.as_deref()) {
        Ok(startup) => startup,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    init_logging(&startup.observability);

    let result = match cli.command {
        Commands::Serve { bind } => {
            tracing::info!(version = env!("CARGO_PKG_VERSION"), "pagebase starting");
            let result = startup.serve(ExtensionRegistry::with_builtins(), bind).await;
            if result.is_ok() {
                tracing::info!("Shutdown complete");
            }
            result
        }
        Commands::Render {
            path,
            accept_language,
            lang,
            cookie,
            host,
            secure,
        } => {
            let mut request = RequestContext::new(path, host).secure(secure);
            if let Some(header) = accept_language {
                request = request.with_accept_language(header);
            }
            if let Some(code) = lang {
                request = request.with_query_language(code);
            }
            if let Some(code) = cookie {
                request = request.with_cookie_language(code);
            }
            render(&startup, &request)
        }
        Commands::Check => check(&startup),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "pagebase failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn render(startup: &Startup, request: &RequestContext) -> Result<(), StartupError> {
    let site = startup.build_site(&ExtensionRegistry::with_builtins())?;
    let page = site
        .dispatch(request)
        .map_err(StartupError::Render)?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(page.body.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn check(startup: &Startup) -> Result<(), StartupError> {
    let settings = SiteSettings::from_store(startup.store())?;
    if let Err(errors) = validate_settings(&settings) {
        for error in &errors {
            println!("  {error}");
        }
        return Err(StartupError::Config(ConfigError::Validation(errors)));
    }

    // loads the extensions too
    let site = startup.build_site(&ExtensionRegistry::with_builtins())?;
    let settings = site.settings();
    let languages = settings.languages().map(|l| l.join(", ")).unwrap_or_default();

    println!("Configuration OK");
    println!("  routes:     {} language(s)", settings.pages_available.languages().count());
    println!("  languages:  {}", if languages.is_empty() { "-" } else { &languages });
    println!(
        "  extensions: {}",
        site.extensions().names().collect::<Vec<_>>().join(", ")
    );
    Ok(())
}
