use anyhow::Context;
use log::info;

use meshbind::{Generator, ManifestGenerator, Registry, register_all};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .target(env_logger::Target::Stderr)
        .parse_env("RUST_LOG")
        .init();

    // registration must complete before the generator reads anything
    register_all().context("failed to register the PMP library")?;
    let global = Registry::instance();
    global.seal();
    info!("registration complete, running generator");

    let args: Vec<String> = std::env::args().collect();
    let code = ManifestGenerator::new().run(&global.read(), &args);
    std::process::exit(code);
}
