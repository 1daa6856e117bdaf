//Copyright 2024 Felix Engl
//
//Licensed under the Apache License, Version 2.0 (the "License");
//you may not use this file except in compliance with the License.
//You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
//Unless required by applicable law or agreed to in writing, software
//distributed under the License is distributed on an "AS IS" BASIS,
//WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//See the License for the specific language governing permissions and
//limitations under the License.


use std::io::{BufReader, Write};
use std::path::PathBuf;
use clap::Parser;
use env_logger::Target;
use log::LevelFilter;
use thiserror::Error;
use plsa_topicmodel::corpus::DocumentStore;
use plsa_topicmodel::errors::PlsaError;
use plsa_topicmodel::io::read_corpus;
use plsa_topicmodel::train::PlsaConfigBuilderError;
use plsa_topicmodel::{ParallelCorpus, Plsa, PlsaConfigBuilder, PlsaModel, SequentialCorpus};

/// Trains a PLSA topic model on a corpus with one document per line.
#[derive(Debug, Parser)]
#[command(name = "plsa", version)]
struct Cli {
    /// The corpus, one document per line, tokens separated by single spaces.
    /// Blank lines are skipped, so line n of the document topic output is the n-th non blank line
    input: PathBuf,

    /// Number of latent topics
    #[arg(short = 'k', long)]
    topics: usize,

    /// Maximum number of iterations
    #[arg(short = 'i', long, default_value_t = 1000)]
    max_iterations: usize,

    /// Stop as soon as the relative improvement of the log likelihood falls below this
    #[arg(short, long, default_value_t = 1e-6)]
    eta: f64,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Output file for P(word | topic)
    #[arg(long, default_value = "word_topic.txt")]
    word_topic: PathBuf,

    /// Output file for P(topic | document)
    #[arg(long, default_value = "doc_topic.txt")]
    doc_topic: PathBuf,

    /// Train on the calling thread only
    #[arg(long)]
    sequential: bool,

    /// Print the n most probable words per topic
    #[arg(long, value_name = "N")]
    show: Option<usize>,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Plsa(#[from] PlsaError),
    #[error(transparent)]
    Config(#[from] PlsaConfigBuilderError),
}

fn main() {
    let cli = Cli::parse();
    let _ = env_logger::builder()
        .target(Target::Stdout)
        .filter_level(if cli.verbose { LevelFilter::Debug } else { LevelFilter::Info })
        .try_init();

    if let Err(e) = run(cli) {
        log::error!("{e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mut builder = PlsaConfigBuilder::default();
    builder
        .topics(cli.topics)
        .max_iterations(cli.max_iterations)
        .eta(cli.eta);
    if let Some(seed) = cli.seed {
        builder.seed(seed);
    }
    let plsa = Plsa::new(builder.build()?)?;

    let documents = read_corpus(BufReader::new(plsa_toolkit::fs::open_input_file(&cli.input)?))?;
    log::info!("Train {} topics on {} documents from {}.", cli.topics, documents.len(), cli.input.display());

    if cli.sequential {
        finish(&cli, plsa.train(&SequentialCorpus::new(documents))?)
    } else {
        finish(&cli, plsa.train(&ParallelCorpus::new(documents))?)
    }
}

fn finish<D: DocumentStore>(cli: &Cli, model: PlsaModel<D>) -> Result<(), CliError> {
    log::info!(
        "{} after {} iterations, seed {}.",
        model.state(),
        model.history().iterations(),
        model.seed()
    );
    model.save(&cli.word_topic, &cli.doc_topic)?;
    if let Some(n) = cli.show {
        let mut out = std::io::stdout().lock();
        model.show_to(n, &mut out)?;
        writeln!(out)?;
    }
    Ok(())
}
