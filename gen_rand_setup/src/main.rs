use std::{env, error::Error, fs::File};

use fold::Mirror;
use fold_json::{serde_json, serialize_setup};
use fold_random::*;

fn generate_random_setup(num_mirrors: usize) -> serde_json::Value {
    let mut rng = rand::thread_rng();

    let (chain, source, target) = random_setup(&mut rng, num_mirrors);
    let target = Mirror::new(target, fold::Extent::random(&mut rng));

    serialize_setup(&source, &chain, &target)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = env::args().skip(1);

    let file_path = args
        .next()
        .ok_or("please provide a path to serialize the setup json data")?;

    let num_mirrors = args.next().and_then(|arg| arg.parse().ok()).unwrap_or(3);

    let json = generate_random_setup(num_mirrors);

    serde_json::to_writer_pretty(File::create(&file_path)?, &json)?;

    log::info!("wrote a random setup with {num_mirrors} mirrors to {file_path}");

    Ok(())
}
