use pageview_plots::config::PlotConfig;
use pageview_plots::report;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = PlotConfig::default();
    let report = report::run(&config)?;

    log::info!(
        "Clip bounds {}: {} of {} rows kept",
        report.bounds,
        report.series.len(),
        report.rows_loaded
    );
    for file in report.files() {
        println!("{}", file.path.display());
    }
    Ok(())
}
