use std::process;

fn main() {
    if let Err(e) = aura::cli::run() {
        process::exit(e.exit_code());
    }
}
