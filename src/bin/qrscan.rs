// Scan image files for QR codes and print what decodes
use std::path::Path;
use std::process::ExitCode;

use rust_qr_engine::{Engine, EngineConfig, status_str};

fn main() -> ExitCode {
    env_logger::init();

    let paths: Vec<String> = std::env::args().skip(1).collect();
    if paths.is_empty() {
        eprintln!("usage: qrscan <image>...");
        return ExitCode::FAILURE;
    }

    let config = *EngineConfig::global();
    let mut engine = Engine::with_config(config);
    let mut found = 0usize;

    for path in &paths {
        let img = match image::open(Path::new(path)) {
            Ok(img) => img.to_luma8(),
            Err(err) => {
                eprintln!("{}: {}", path, err);
                continue;
            }
        };
        let (width, height) = (img.width() as usize, img.height() as usize);

        if engine.width() != width || engine.height() != height {
            if let Err(err) = engine.resize(width, height) {
                eprintln!("{}: {}", path, err);
                continue;
            }
        }
        engine.begin().copy_from_slice(img.as_raw());
        engine.end(config.find_inverted);

        println!("{}: {} grid(s)", path, engine.count());
        for (i, result) in engine.decode_all().iter().enumerate() {
            match result {
                Ok(symbol) => {
                    found += 1;
                    println!(
                        "  [{}] version={} ecc={} mask={} type={} eci={} len={}",
                        i,
                        symbol.version,
                        symbol.ecc_level,
                        symbol.mask.number(),
                        symbol.data_type,
                        symbol.eci,
                        symbol.payload_len()
                    );
                    println!("      {}", symbol.text());
                }
                Err(_) => println!("  [{}] {}", i, status_str(result)),
            }
        }
    }

    if found > 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
