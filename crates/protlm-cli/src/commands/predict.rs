use anyhow::Context;
use protlm_plms::{device, init_global, predict_global, BundleConfig};

pub fn execute(config: &BundleConfig, sequence: &str, cpu: bool, pretty: bool) -> anyhow::Result<()> {
    let device = device(cpu)?;
    init_global(config, &device).with_context(|| {
        format!(
            "failed to load models from {}",
            config.organism_checkpoint.display()
        )
    })?;
    let response = predict_global(sequence)?;
    let json = if pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{json}");
    Ok(())
}
