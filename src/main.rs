fn main() {
    if let Err(e) = chlorine_decay::adapters::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
