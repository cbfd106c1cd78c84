//! Replay entry point (native).

#[cfg(feature = "native")]
fn main() {
    env_logger::init();
    log::info!("Starting Layercraft");

    if let Err(e) = run() {
        log::error!("{}", e);
        eprintln!("layercraft: {}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "native")]
fn run() -> Result<(), layercraft_app::AppError> {
    let path = std::env::args()
        .nth(1)
        .ok_or_else(|| layercraft_app::AppError::Usage("layercraft <script.json>".to_string()))?;
    let script = layercraft_app::Script::load(&path)?;
    let report = layercraft_app::replay(&script)?;
    println!("{}", report.to_json()?);
    Ok(())
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
