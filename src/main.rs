//! Grouper command-line entrypoint.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use grouper::{
    AnswerId, AssignmentId, Config, DirectoryAssignmentSource, FileArtifactStore, HashEmbedder,
    InferenceGenerator, InferenceService, LexicalExtractor,
};

type Service =
    InferenceService<DirectoryAssignmentSource, FileArtifactStore, LexicalExtractor, HashEmbedder>;

#[derive(Debug, Parser)]
#[command(name = "grouper")]
#[command(about = "Answer-span inference and similarity grouping for assignment answers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Computes and stores inferences for every answer and question.
    Generate {
        #[arg(long)]
        assignment: AssignmentId,
        /// Repeat once per question.
        #[arg(long = "question", required = true)]
        questions: Vec<String>,
    },
    /// Prints the stored inferences.
    Show {
        #[arg(long)]
        assignment: AssignmentId,
    },
    /// Groups answers by similarity to a baseline answer.
    Group {
        #[arg(long)]
        assignment: AssignmentId,
        #[arg(long)]
        question: String,
        /// Baseline answer id.
        #[arg(long)]
        answer: AnswerId,
        /// Strict lower bound on cosine similarity.
        #[arg(long, allow_negative_numbers = true)]
        similarity: f64,
    },
    /// Deletes the stored inferences.
    Delete {
        #[arg(long)]
        assignment: AssignmentId,
    },
    /// Lists assignments that have stored inferences.
    List,
}

#[derive(Debug, Serialize)]
struct Deleted {
    deleted: AssignmentId,
}

#[derive(Debug, Serialize)]
struct Failure<'a> {
    error: &'a str,
    message: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        let failure = match e.downcast_ref::<grouper::Error>() {
            Some(op) => Failure {
                error: op.kind().as_str(),
                message: op.to_string(),
            },
            None => Failure {
                error: "startup",
                message: format!("{:#}", e),
            },
        };
        eprintln!(
            "{}",
            serde_json::to_string(&failure).unwrap_or_else(|_| failure.message.clone())
        );
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::from_env().context("load configuration")?;
    config.validate().context("validate configuration")?;

    tracing::info!(
        storage_path = %config.storage_path.display(),
        assignments_path = %config.assignments_path.display(),
        workers = config.workers,
        embedding_dim = config.embedding_dim,
        "Grouper starting"
    );

    let service = build_service(&config)?;

    match cli.command {
        Commands::Generate {
            assignment,
            questions,
        } => print_json(&service.generate_inferences(assignment, questions).await?),
        Commands::Show { assignment } => print_json(&service.get_inferences(assignment).await?),
        Commands::Group {
            assignment,
            question,
            answer,
            similarity,
        } => print_json(
            &service
                .group_answers(assignment, &question, answer, similarity)
                .await?,
        ),
        Commands::Delete { assignment } => {
            service.delete_inferences(assignment).await?;
            print_json(&Deleted {
                deleted: assignment,
            })
        }
        Commands::List => print_json(&service.list_inferences().await?),
    }
}

fn build_service(config: &Config) -> Result<Service> {
    let extractor = LexicalExtractor::new(config.max_span_chars)?;
    let embedder = HashEmbedder::new(config.embedding_dim)?;
    let generator = InferenceGenerator::new(extractor, embedder).with_workers(config.workers);

    Ok(InferenceService::new(
        DirectoryAssignmentSource::new(config.assignments_path.clone()),
        FileArtifactStore::new(config.storage_path.clone()),
        generator,
    ))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{}", out);
    Ok(())
}
