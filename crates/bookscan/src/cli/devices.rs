//! The `bookscan devices` command: probe camera indices.

use bookscan_core::camera::{list_devices, native_opener};
use bookscan_core::Config;
use clap::Args;
use console::Style;

/// Arguments for the `devices` command.
#[derive(Args, Debug)]
pub struct DevicesArgs {
    /// Probe indices 0..N (defaults to camera.max_probe_index)
    #[arg(long)]
    pub max: Option<u32>,

    /// Print results as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

/// Execute the devices command.
pub async fn execute(args: DevicesArgs, config: &Config) -> anyhow::Result<()> {
    let max = args.max.unwrap_or(config.camera.max_probe_index);
    let camera_config = config.camera.clone();

    // device probing blocks on driver calls
    let probes = tokio::task::spawn_blocking(move || {
        let mut opener = native_opener(&camera_config);
        list_devices(max, opener.as_mut())
    })
    .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&probes)?);
        return Ok(());
    }

    let green = Style::new().green();
    let dim = Style::new().dim();
    for probe in &probes {
        match (&probe.description, &probe.error) {
            (Some(name), _) => println!("  {} {:>2}  {}", green.apply_to("✓"), probe.index, name),
            (None, Some(err)) => println!("  {} {:>2}  {}", dim.apply_to("·"), probe.index, dim.apply_to(err)),
            (None, None) => {}
        }
    }

    if !probes.iter().any(|p| p.is_usable()) {
        anyhow::bail!("No camera found (probed {max} device indices). Please check camera connection.");
    }
    Ok(())
}
