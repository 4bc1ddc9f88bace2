use std::process;

use cybersjakk_core::openings::SICILIAN_NAJDORF;
use cybersjakk_core::{run_with_stockfish, AnalysisConfig, MoveReport};

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = AnalysisConfig::default();

    if let Err(e) = config.check_engine() {
        println!("[ERROR] {}", e);
        println!("Download Stockfish and place the binary at {}", config.engine_path.display());
        process::exit(1);
    }

    println!(
        "Cybersjakk analysis: {} ({})",
        SICILIAN_NAJDORF.name, SICILIAN_NAJDORF.eco
    );
    println!("Diagrams are saved in '{}'", config.output_dir.display());
    println!();

    let code = match run_with_stockfish(&config, print_report) {
        Ok(summary) => {
            println!();
            println!("[OK] {} diagram(s) written", summary.reports.len());
            0
        }
        Err(e) => {
            println!("[ERROR] {}", e);
            1
        }
    };

    println!();
    println!("Analysis complete.");
    process::exit(code);
}

fn print_report(report: &MoveReport) {
    println!(
        "Generated: {} | Evaluation: {} ({})",
        report.diagram.display(),
        report.analysis.evaluation,
        report.analysis.evaluation.verdict()
    );
}
