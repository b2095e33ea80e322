use tracing::info;

use super::resources::Resources;

/// Waits for the GPU to drain so no resource is released while in use.
pub fn on_destroy(resources: &mut Resources) -> eyre::Result<()> {
    resources.tracker.wait_for_idle()?;
    info!(
        completed = resources.tracker.completed_value(),
        "GPU idle, releasing resources"
    );
    Ok(())
}
