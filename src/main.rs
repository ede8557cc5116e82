fn main() {
    if let Err(e) = achievement_explorer_lib::run() {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
