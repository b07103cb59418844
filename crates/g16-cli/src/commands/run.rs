use std::path::PathBuf;

use anyhow::Result;
use g16_circuit::square::{X, Y};
use g16_pipeline::{run_pipeline, CancelToken, Curve, ErrorKind, PipelineConfig, RunError};
use tracing::{debug, info};

use crate::output;

pub struct RunArgs {
    pub x: Option<String>,
    pub y: Option<String>,
    pub curve: Option<Curve>,
    pub seed: Option<u64>,
    pub export: Option<PathBuf>,
}

fn hint_for(err: &RunError) -> anyhow::Error {
    let hint = match err.kind() {
        ErrorKind::Prove => "Y must equal X * X",
        ErrorKind::Witness => "values must be non-negative decimal integers below the field modulus",
        ErrorKind::Circuit | ErrorKind::Compile => "the circuit could not be lowered to R1CS",
        _ => return anyhow::anyhow!("{err}"),
    };
    output::fail_with_hint(&err.to_string(), hint)
}

pub fn run(args: RunArgs) -> Result<()> {
    let mut config = PipelineConfig::load()?;
    if let Some(curve) = args.curve {
        config.curve = curve;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(x) = args.x {
        config.assignment.set(X, x);
    }
    if let Some(y) = args.y {
        config.assignment.set(Y, y);
    }
    if config.seed.is_some() {
        output::warn("seeded randomness: keys are reproducible, do not use them for anything real");
    }

    debug!(curve = %config.curve, seeded = config.seed.is_some(), "resolved run config");

    let pb = output::spinner(&format!("proving X * X == Y on {}", config.curve));
    let result = run_pipeline(&config, &CancelToken::new());
    pb.finish_and_clear();

    let out = match result {
        Ok(out) => out,
        Err(e) => {
            if output::is_json() {
                output::json_output(serde_json::json!({
                    "status": "error",
                    "kind": e.kind().as_str(),
                    "stage": e.stage().map(|s| s.as_str()),
                    "message": e.to_string(),
                }));
            }
            return Err(hint_for(&e));
        }
    };

    info!(total_ms = out.report.total().as_millis() as u64, "run verified");
    if let Some(path) = &args.export {
        out.artifact.save(path)?;
        info!(path = %path.display(), "artifact written");
    }

    if output::is_json() {
        output::json_output(serde_json::json!({
            "status": "ok",
            "curve": config.curve.as_str(),
            "report": out.report,
            "artifact": args.export.as_ref().map(|p| p.display().to_string()),
        }));
    } else {
        output::success("proof verified");
        output::run_report(&out.report);
        if let Some(path) = &args.export {
            output::label("artifact", &path.display().to_string());
        }
    }
    Ok(())
}
