mod bootstrap;

use anyhow::Result;
use energy_core::settings::Settings;
use energy_data::pipeline::run_pipeline;
use energy_report::csv_out::{write_building_summary, write_cleaned_dataset};
use energy_report::dashboard::render_dashboard;
use energy_report::summary::{render_summary, write_summary, ExecutiveSummary};

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("Campus Energy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Data dir: {}, output dir: {}",
        settings.data_dir.display(),
        settings.output_dir.display()
    );

    bootstrap::ensure_output_dir(&settings.output_dir)?;

    let result = run_pipeline(&settings.data_dir);

    write_cleaned_dataset(
        &settings.output_dir.join("cleaned_energy_data.csv"),
        &result.dataset,
    )?;
    write_building_summary(
        &settings.output_dir.join("building_summary.csv"),
        &result.building_summary,
    )?;

    if settings.no_dashboard {
        tracing::info!("Dashboard rendering disabled");
    } else {
        render_dashboard(
            &settings.output_dir.join("dashboard.png"),
            &result.dataset,
            &result.building_summary,
        )?;
    }

    let summary = ExecutiveSummary::from_result(&result);
    let text = render_summary(&summary);
    write_summary(&settings.output_dir.join("summary.txt"), &text)?;

    println!("{}", text);
    println!("All tasks completed successfully!");

    Ok(())
}
