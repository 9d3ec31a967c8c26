fn main() {
    if let Err(e) = promogrid::app::run_cli() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
