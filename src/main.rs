use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "lycon",
    about = "Lycon Planning landing page server and retirement projection calculator"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the landing page and its JSON API
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Print one projection the way the calculator modal shows it
    Project {
        #[arg(long, default_value_t = 45, help = "Starting age (20-64)")]
        start_age: u32,
        #[arg(
            long,
            default_value_t = 5000,
            help = "Initial lump sum in 만원 (ten-thousand won) units"
        )]
        initial_man: u64,
        #[arg(long, default_value_t = false, help = "Emit the API JSON instead")]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port } => {
            if let Err(e) = lycon::api::run_http_server(port).await {
                eprintln!("Server error: {e}");
                std::process::exit(1);
            }
        }
        Commands::Project {
            start_age,
            initial_man,
            json,
        } => {
            let rendered = if json {
                lycon::api::project_to_json(start_age, initial_man)
            } else {
                lycon::api::project_to_text(start_age, initial_man)
            };
            match rendered {
                Ok(output) => print!("{output}"),
                Err(msg) => {
                    eprintln!("{msg}");
                    std::process::exit(1);
                }
            }
        }
    }
}
