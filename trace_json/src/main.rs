use fold_json::{deserialize_setup, serde_json, JsonSer};
use fold_parts::{setup_assembly, JsonExporter};

use std::{error::Error, fs::File, io::BufReader, path::Path};

/// Initialize the logger, `RUST_LOG` overrides the default `info` level
fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

fn run(setup_path: &str, scene_path: Option<&str>) -> Result<(), Box<dyn Error>> {
    let json: serde_json::Value =
        serde_json::from_reader(BufReader::new(File::open(setup_path)?))?;
    let setup = deserialize_setup(&json)?;

    log::info!("tracing {} mirrors from {setup_path}", setup.chain.len());

    let alignment = setup.evaluate()?;

    for (i, bounce) in alignment.path.iter().enumerate() {
        log::info!(
            "mirror {i}: hit at {:?}, leaving along {:?}",
            bounce.pos.as_slice(),
            bounce.dir.as_slice()
        );
    }

    println!("target hit at {:?}", alignment.hit.as_slice());
    println!(
        "angular deviation: {:.6} deg about X, {:.6} deg about Y",
        alignment.angle.x, alignment.angle.y
    );
    println!(
        "positional deviation: dx = {:.6}, dy = {:.6}",
        alignment.offset.dx, alignment.offset.dy
    );

    log::debug!("{}", serde_json::to_string_pretty(&alignment.to_json())?);

    if let Some(scene_path) = scene_path {
        setup_assembly(&setup, Some(&alignment)).write(
            &mut JsonExporter,
            Path::new(scene_path),
            true,
        )?;
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logger();

    let mut args = std::env::args().skip(1);

    let setup_path = args
        .next()
        .ok_or("expected a setup file path as a first argument.")?;

    let scene_path = args.next();

    run(&setup_path, scene_path.as_deref())
}
