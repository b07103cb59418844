use std::path::Path;

use anyhow::{Context, Result};
use g16_pipeline::{ArtifactError, ProofArtifact, VerifyError};
use tracing::{debug, warn};

use crate::output;

pub fn run(file: &Path) -> Result<()> {
    let artifact = ProofArtifact::load(file)
        .with_context(|| format!("cannot load artifact {}", file.display()))?;

    debug!(
        path = %file.display(),
        curve = artifact.curve.as_str(),
        public_inputs = artifact.public_inputs.len(),
        "artifact loaded"
    );

    let pb = output::spinner("verifying proof");
    let result = artifact.verify();
    pb.finish_and_clear();

    let verified = match result {
        Ok(()) => true,
        Err(ArtifactError::Verify(VerifyError::Rejected)) => {
            warn!(path = %file.display(), "pairing check failed");
            false
        }
        Err(e) => {
            return Err(output::fail_with_hint(
                &e.to_string(),
                "was the artifact produced by `g16 run --export`?",
            ))
        }
    };

    if output::is_json() {
        output::json_output(serde_json::json!({
            "verified": verified,
            "curve": artifact.curve.as_str(),
            "public_inputs": artifact.public_inputs,
        }));
    } else if verified {
        output::success("proof valid");
        output::label("curve", artifact.curve.as_str());
        output::label("public inputs", &artifact.public_inputs.join(", "));
    }

    if !verified {
        anyhow::bail!("proof rejected");
    }
    Ok(())
}
