use anyhow::Result;
use g16_circuit::square::{X, Y};
use g16_pipeline::config::parse_seed;
use g16_pipeline::{config_path, PipelineConfig};

use crate::output;

const ALLOWED_KEYS: &[&str] = &["curve", "seed", "x", "y"];

fn load_file() -> Result<PipelineConfig> {
    let path = config_path()?;
    Ok(if path.exists() {
        PipelineConfig::load_from(&path)?
    } else {
        PipelineConfig::default()
    })
}

pub fn set(key: &str, value: &str) -> Result<()> {
    if !ALLOWED_KEYS.contains(&key) {
        return Err(output::fail_with_hint(
            &format!("unknown config key: {key}"),
            &format!("allowed keys: {}", ALLOWED_KEYS.join(", ")),
        ));
    }

    // file values only; env overrides are applied at load time
    let mut config = load_file()?;
    match key {
        "curve" => config.curve = value.parse()?,
        "seed" if value == "none" => config.seed = None,
        "seed" => config.seed = Some(parse_seed(value)?),
        "x" => config.assignment.set(X, value),
        "y" => config.assignment.set(Y, value),
        _ => unreachable!(),
    }
    let path = config.save()?;

    if output::is_json() {
        output::json_output(serde_json::json!({ "key": key, "value": value }));
    } else {
        output::success(&format!("{key} updated"));
        output::label("config", &path.display().to_string());
    }
    Ok(())
}

pub fn show() -> Result<()> {
    let config = PipelineConfig::load()?;
    let path = config_path()?;
    let seed = config.seed.map_or("none (os entropy)".to_string(), |s| s.to_string());

    if output::is_json() {
        output::json_output(serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": config,
        }));
    } else {
        output::label("path", &path.display().to_string());
        if !path.exists() {
            output::info("(no config file, showing defaults)");
        }
        output::label("curve", config.curve.as_str());
        output::label("seed", &seed);
        for (name, value) in config.assignment.iter() {
            output::label(name, value);
        }
    }
    Ok(())
}

pub fn path() -> Result<()> {
    let path = config_path()?;
    if output::is_json() {
        output::json_output(serde_json::json!({ "path": path.display().to_string() }));
    } else {
        println!("{}", path.display());
    }
    Ok(())
}
