use colored::Colorize;

#[tokio::main]
async fn main() {
    if let Err(e) = vibeopsy_cli::run().await {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
