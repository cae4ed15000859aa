pub fn run(host: &str, port: u16, tie_break: &str) {
    let config = super::engine_config(tie_break);
    let base = format!("http://{host}:{port}");

    println!("Conjugacy Server v{}", conjugacy_core::VERSION);
    println!("   {base}");
    println!("   default tie-break: {}", config.tie_break.as_str());
    println!();
    println!("   Endpoints:");
    println!("     GET  /                        API index (try: curl {base})");
    println!("     POST /api/v1/conjugacy        One paired sample {{\"x\": [...], \"y\": [...]}}");
    println!("     POST /api/v1/conjugacy/batch  Many samples {{\"datasets\": [...]}}");
    println!("     GET  /health                  Health check");
    println!();
    println!("   Example:");
    println!(
        "     curl -X POST -H 'content-type: application/json' \\\n       -d '{{\"x\":[1,2,3,4,5,6],\"y\":[6,5,4,3,2,1]}}' {base}/api/v1/conjugacy"
    );
    println!();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Could not start the async runtime: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = rt.block_on(conjugacy_server::run_server(config, host, port)) {
        eprintln!("Server error on {host}:{port}: {e}");
        std::process::exit(1);
    }
}
