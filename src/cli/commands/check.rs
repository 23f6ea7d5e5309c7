use crate::config::Config;
use crate::state::SharedState;

pub async fn cmd_check(config: &Config) -> anyhow::Result<()> {
    println!("Checking {} ...", config.aviation.base_url);

    let state = SharedState::new(config.clone())?;
    let report = state.aviation.check_connectivity().await;

    if report.success {
        println!("✓ {}", report.message);
        Ok(())
    } else {
        anyhow::bail!("HTTP {}: {}", report.status, report.message)
    }
}
