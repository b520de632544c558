use modelboot_core::logging;

mod cli;

#[tokio::main]
async fn main() {
    // Initialize logging as early as possible.
    logging::init_logging();

    let code = cli::run_from_args().await;
    std::process::exit(code);
}
