fn main() {
    if let Err(error) = domqueue_cli::run() {
        // The subscriber is installed inside run() once arguments are parsed.
        tracing::error!(error = %format!("{error:#}"), "CLI execution failed");
        std::process::exit(1);
    }
}
