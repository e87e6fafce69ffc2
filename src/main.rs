use clap::{Parser, Subcommand};
use pest_identifier::data_io::table_io::{
    read_candidates_json, read_label_aliases_json, read_labels_txt_file,
    read_question_catalog_json,
};
use pest_identifier::data_io::tensor_io::read_tensor_json;
use pest_identifier::{
    AppConfig, BoundingBoxGeometry, DetectionPipeline, DiagnosisOutcome, LabelAliases,
    NextQuestion, SessionRegistry,
};
use serde::Serialize;
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pest-id", about = "Pest detection post-processing and guided diagnosis")]
struct Cli {
    /// JSON configuration file. Defaults are used for anything it leaves out.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Turn a dumped detector output tensor into detections, printed as JSON.
    Detect {
        /// JSON file with `shape` and flat `data` of the output tensor.
        #[arg(long)]
        tensor: PathBuf,
        /// Class names, one per line, in class id order.
        #[arg(long, default_value = "./data/model_metadata/labels.txt")]
        labels: PathBuf,
        /// Width of the original image in pixels.
        #[arg(long)]
        width: u32,
        /// Height of the original image in pixels.
        #[arg(long)]
        height: u32,
        /// JSON object mapping detector labels to pest ids.
        #[arg(long)]
        aliases: Option<PathBuf>,
    },
    /// Identify a pest by answering yes/no questions on stdin.
    Diagnose {
        #[arg(long, default_value = "./data/tables/candidates.json")]
        candidates: PathBuf,
        #[arg(long, default_value = "./data/tables/questions.json")]
        questions: PathBuf,
    },
}

#[derive(Serialize)]
struct DetectionReport<'a> {
    label: &'a str,
    pest_id: &'a str,
    confidence: f32,
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;
    match cli.command {
        Command::Detect {
            tensor,
            labels,
            width,
            height,
            aliases,
        } => run_detect(&config, &tensor, &labels, width, height, aliases.as_deref()),
        Command::Diagnose {
            candidates,
            questions,
        } => run_diagnose(&config, &candidates, &questions),
    }
}

fn run_detect(
    config: &AppConfig,
    tensor_path: &Path,
    labels_path: &Path,
    width: u32,
    height: u32,
    aliases_path: Option<&Path>,
) -> Result<(), Box<dyn Error>> {
    let labels = read_labels_txt_file(labels_path)?;
    let aliases = match aliases_path {
        Some(path) => read_label_aliases_json(path)?,
        None => LabelAliases::default(),
    };
    let dump = read_tensor_json(tensor_path)?;
    let pipeline = DetectionPipeline::new(config.detection);
    let detections = pipeline.detect(&dump.data, dump.tensor_shape()?, width, height, &labels)?;
    log::info!("Found {} detections", detections.len());

    let report: Vec<DetectionReport> = detections
        .iter()
        .map(|detection| DetectionReport {
            label: detection.label(),
            pest_id: aliases.resolve(detection.label()),
            confidence: detection.confidence,
            left: detection.annotation.left(),
            top: detection.annotation.top(),
            right: detection.annotation.right(),
            bottom: detection.annotation.bottom(),
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run_diagnose(
    config: &AppConfig,
    candidates_path: &Path,
    questions_path: &Path,
) -> Result<(), Box<dyn Error>> {
    let candidates = read_candidates_json(candidates_path)?;
    let catalog = read_question_catalog_json(questions_path)?;
    let mut registry = SessionRegistry::new(catalog, config.diagnosis);
    let session_id = registry.start(candidates)?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut stdout = io::stdout();
    while let NextQuestion::Ask(question) = registry.next_question(session_id)? {
        let session = registry.session(session_id)?;
        if let Some((leader, probability)) = session.top_candidates(1).first() {
            log::debug!("Leading: {} ({:.0}%)", leader.display_name, probability * 100.0);
        }
        let answer = loop {
            write!(
                stdout,
                "Question {} of {}: {} [y/n] ",
                session.asked_count() + 1,
                session.question_budget(),
                question.text
            )?;
            stdout.flush()?;
            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                return Err("stdin closed before the diagnosis finished".into());
            }
            match line.trim().to_lowercase().as_str() {
                "y" | "yes" => break true,
                "n" | "no" => break false,
                _ => writeln!(stdout, "Please answer y or n.")?,
            }
        };
        registry.answer(session_id, answer)?;
    }

    let session = registry.session(session_id)?;
    match registry.result(session_id)? {
        DiagnosisOutcome::Identified {
            candidate_id,
            probability,
        } => match session.candidate(&candidate_id) {
            Some(candidate) => println!(
                "Most likely: {} ({}) with probability {:.1}%",
                candidate.display_name,
                candidate.scientific_name,
                probability * 100.0
            ),
            None => println!("Most likely: {candidate_id} with probability {:.1}%", probability * 100.0),
        },
        DiagnosisOutcome::NoConfidentResult => {
            println!("Could not identify the pest with enough confidence.")
        }
    }
    for (candidate, probability) in session.top_candidates(3).iter().skip(1) {
        println!("  also possible: {} ({:.1}%)", candidate.display_name, probability * 100.0);
    }
    registry.end(session_id);
    Ok(())
}
