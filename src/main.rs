use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use notechart::io::{self, LoadedFile};
use notechart::model::Project;
use notechart::stage::StageConfig;
use notechart::util::logging::init_logging;

#[derive(Parser)]
#[command(name = "notechart", about = "Inspect and convert chart project files")]
struct Cli {
    /// Show debug logs.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a summary of a project or chart file.
    Info { file: PathBuf },

    /// Export one chart of a project to the JSON interchange format.
    ExportChart {
        project: PathBuf,
        /// Zero-based chart index.
        #[arg(long, default_value_t = 0)]
        chart: usize,
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(None, cli.verbose)?;

    let config = StageConfig::default();

    match cli.command {
        Command::Info { file } => {
            match io::load_file(&file, &config)? {
                Some(LoadedFile::Project(project)) => print_project_info(&project),
                Some(LoadedFile::Chart(data)) => {
                    let chart = notechart::model::Chart::new(data, &config);
                    print_chart_info(&chart);
                }
                None => bail!("{} is not a recognized project file", file.display()),
            }
            Ok(())
        }
        Command::ExportChart {
            project,
            chart,
            output,
        } => {
            let loaded = io::load_project(&project, &config)?
                .with_context(|| format!("{} is not a recognized project file", project.display()))?;
            let selected = loaded
                .charts
                .get(chart)
                .with_context(|| format!("project has no chart #{chart}"))?;
            io::save_chart(&output, &selected.data)?;
            println!("exported chart #{chart} to {}", output.display());
            Ok(())
        }
    }
}

fn print_project_info(project: &Project) {
    println!("music:    {}", project.music_name);
    println!("composer: {}", project.composer);
    println!("designer: {}", project.chart_designer);
    println!("charts:   {}", project.charts.len());
    for chart in &project.charts {
        print_chart_info(chart);
    }
    println!("tempos:   {}", project.tempos.len());
}

fn print_chart_info(chart: &notechart::model::Chart) {
    let projection = chart.projection();
    println!(
        "  [{:?} {}] {} notes ({} holds, {} background)",
        chart.difficulty,
        chart.level,
        projection.note_count(),
        projection.hold_count(),
        projection.background().len(),
    );
}
