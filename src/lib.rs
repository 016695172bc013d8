//! # Fingerbox
//!
//! Parametric slot-and-tab ("finger joint") box enclosures. From a width,
//! length, height and material thickness Fingerbox lays out the tabs of each
//! jointed edge, decides which sketch regions of every panel become solid,
//! and finds the coincident edges that rigidly join the panels.
//!
//! ## Architecture
//!
//! Fingerbox is organized as a workspace with multiple crates:
//!
//! 1. **fingerbox-core** - Geometry value types and the shared tolerance
//! 2. **fingerbox-joinery** - Tab layout, panel partitioning, edge matching,
//!    the geometry kernel traits and the box assembler
//! 3. **fingerbox-settings** - Box configuration files
//! 4. **fingerbox** - Binary that assembles a configured box on the
//!    in-memory kernel

pub use fingerbox_core::{Axis, DirectedEdge, GeometryError, Point2, Point3, Tolerance};
pub use fingerbox_joinery::{
    compute_tab_layout, edges_along_axis, find_joint, select_solid_profiles, AssembledBox,
    BoxAssembler, BoxDimensions, BoxError, BoxResult, GeometryKernel, InMemoryKernel, JointSpec,
    KernelError, PanelPartitioner, PlanarProfile, TabLayout, TabSizing,
};
pub use fingerbox_settings::{default_config_path, Config, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting on stderr
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
