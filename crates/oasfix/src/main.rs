//! `oasfix` binary entry point.

fn main() {
    std::process::exit(oasfix_cli::run_cli(std::env::args_os()));
}
