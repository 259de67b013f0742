#![forbid(unsafe_code)]

fn main() {
    let json = std::env::args().any(|arg| arg == "--json");
    match folio_cli::run_from_env() {
        Ok(code) => std::process::exit(code),
        Err(error) => {
            if json {
                eprintln!(
                    "{}",
                    serde_json::json!({
                        "status": "error",
                        "error": error.to_string(),
                        "exit_code": error.exit_code(),
                    })
                );
            } else {
                eprintln!("folio: {error}");
            }
            std::process::exit(error.exit_code());
        }
    }
}
