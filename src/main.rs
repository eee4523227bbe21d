fn main() {
    if let Err(err) = schema_layout::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
