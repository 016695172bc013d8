use anyhow::Context;
use fingerbox::{default_config_path, init_logging, Config, InMemoryKernel, BUILD_DATE, VERSION};
use std::path::PathBuf;
use tracing::{info, warn};

fn main() -> anyhow::Result<()> {
    init_logging()?;
    info!("Fingerbox {} (built {})", VERSION, BUILD_DATE);

    // Optional config path, otherwise the per-user default
    let path = match std::env::args_os().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => default_config_path()?,
    };
    let config = Config::load_or_default(&path)
        .with_context(|| format!("loading {}", path.display()))?;

    let mut kernel = InMemoryKernel::new(config.tolerance);
    let root = kernel.root();
    let assembled = config
        .assembler()
        .assemble(&mut kernel, root)
        .with_context(|| format!("assembling box '{}'", config.name))?;

    for skipped in &assembled.skipped_joints {
        warn!("Box is missing a joint: {}", skipped);
    }

    let d = &config.dimensions;
    println!(
        "{}: {} x {} x {} (thickness {})",
        config.name, d.width, d.length, d.height, d.material_thickness
    );
    println!(
        "  {} tabs of {:.4} per edge",
        assembled.layout.tab_count(),
        assembled.layout.tab_size()
    );
    for joint in &assembled.joints {
        println!(
            "  joint along {}: anchor ({:.4}, {:.4}, {:.4}), offset {}, flipped {}",
            joint.axis,
            joint.spec.anchor_a.x,
            joint.spec.anchor_a.y,
            joint.spec.anchor_a.z,
            joint.spec.offset,
            joint.spec.flipped
        );
    }

    Ok(())
}
