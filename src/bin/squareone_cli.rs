use squareone::cli::run_cli;

fn main() {
    // run_cli installs tracing once the config's log filter is known.
    if let Err(err) = run_cli() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
