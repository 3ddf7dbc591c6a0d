//! Main application entry point (native).

#[cfg(feature = "native")]
fn main() {
    use clap::Parser;

    env_logger::init();
    log::info!("Starting SketchMotion");

    let options = sketchmotion_app::Options::parse();
    let result = sketchmotion_app::App::new(options)
        .and_then(|mut app| pollster::block_on(app.run()));

    match result {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
