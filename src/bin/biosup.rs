//! biosup - distant-supervision labeling CLI
//!
//! # Usage
//!
//! ```bash
//! # Label a scraped corpus (vocabulary caches built on first run)
//! biosup supervise -i person.json -o labeled.json --vocab-dir vocab/
//!
//! # Build one vocabulary cache by hand
//! biosup vocab -i person.json -o country.json --key-pattern '国家|国籍'
//!
//! # Score model predictions against gold infoboxes
//! biosup eval -i pairs.json
//!
//! # Training-data exports
//! biosup export-bio -i labeled.json -o train.txt
//! biosup export-mrc -i labeled.json --out-dir mrc/
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};

use biosup::attrs::{registry, VocabularyStore};
use biosup::corpus::{filter_by_attribute_count, load_eval_records, load_records, save_json};
use biosup::export::{export_mrc, render_bio, TagScheme};
use biosup::record::PersonRecord;
use biosup::supervise::{Supervisor, SupervisorConfig};
use biosup::vocab::{collect_values, VocabConfig, Vocabulary};
use biosup::{Evaluator, Result};

#[derive(Parser)]
#[command(name = "biosup", version, about = "Distant-supervision labeling for person-attribute extraction")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Label a raw corpus by aligning infobox values with text
    Supervise(SuperviseArgs),
    /// Build a vocabulary cache from raw corpus values
    Vocab(VocabArgs),
    /// Score predicted infoboxes against gold
    Eval(EvalArgs),
    /// Export labeled records as char-level BIO/BIOES training data
    ExportBio(ExportBioArgs),
    /// Export labeled records as question/passage training data
    ExportMrc(ExportMrcArgs),
    /// Keep only records rich enough in recognized attributes
    Filter(FilterArgs),
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum SchemeArg {
    /// Begin/Inside tags only
    Bio,
    /// Begin/Inside/End/Single tags
    #[default]
    Bioes,
}

impl From<SchemeArg> for TagScheme {
    fn from(s: SchemeArg) -> Self {
        match s {
            SchemeArg::Bio => TagScheme::Bio,
            SchemeArg::Bioes => TagScheme::Bioes,
        }
    }
}

#[derive(Parser)]
struct SuperviseArgs {
    /// Raw person records (JSON array)
    #[arg(short, long)]
    input: PathBuf,
    /// Labeled records output (JSON array)
    #[arg(short, long)]
    output: PathBuf,
    /// Per-attribute counters output
    #[arg(long)]
    stats: Option<PathBuf>,
    /// Directory of vocabulary caches, built from the input on first run
    #[arg(long)]
    vocab_dir: Option<PathBuf>,
    /// Minimum matched attributes for a record to be retained
    #[arg(long, default_value_t = 1)]
    min_attributes: usize,
    /// Fall back to free-text extraction when no infobox key matches
    #[arg(long)]
    infer_from_text: bool,
}

#[derive(Parser)]
struct VocabArgs {
    /// Raw person records (JSON array)
    #[arg(short, long)]
    input: PathBuf,
    /// Vocabulary cache output (JSON string array)
    #[arg(short, long)]
    output: PathBuf,
    /// Regex selecting the infobox keys to harvest values from
    #[arg(long)]
    key_pattern: String,
    /// Minimum occurrences for a value to be kept
    #[arg(long, default_value_t = 2)]
    min_count: usize,
    /// Minimum length in characters for a value to be kept
    #[arg(long, default_value_t = 2)]
    min_len: usize,
    /// Characters stripped from the end of each raw value first
    #[arg(long)]
    strip_trailing: Option<String>,
}

#[derive(Parser)]
struct EvalArgs {
    /// Gold/predicted record pairs (JSON array)
    #[arg(short, long)]
    input: PathBuf,
    /// Score report output; stdout when omitted
    #[arg(long)]
    report: Option<PathBuf>,
    /// Side file receiving every non-matching (gold, predicted) pair
    #[arg(long)]
    mismatches: Option<PathBuf>,
    /// Directory of vocabulary caches for the fuzzy comparisons
    #[arg(long)]
    vocab_dir: Option<PathBuf>,
}

#[derive(Parser)]
struct ExportBioArgs {
    /// Labeled records (JSON array)
    #[arg(short, long)]
    input: PathBuf,
    /// Tagged text output
    #[arg(short, long)]
    output: PathBuf,
    /// Tagging scheme
    #[arg(long, value_enum, default_value_t = SchemeArg::Bioes)]
    scheme: SchemeArg,
}

#[derive(Parser)]
struct ExportMrcArgs {
    /// Labeled records (JSON array)
    #[arg(short, long)]
    input: PathBuf,
    /// Directory receiving train.txt / test.txt / dev.txt
    #[arg(long)]
    out_dir: PathBuf,
    /// Tagging scheme
    #[arg(long, value_enum, default_value_t = SchemeArg::Bioes)]
    scheme: SchemeArg,
    /// Shuffle seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

#[derive(Parser)]
struct FilterArgs {
    /// Raw person records (JSON array)
    #[arg(short, long)]
    input: PathBuf,
    /// Filtered records output, richest first
    #[arg(short, long)]
    output: PathBuf,
    /// Minimum recognized attributes for a record to be kept
    #[arg(long, default_value_t = 6)]
    min_attributes: usize,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Supervise(args) => cmd_supervise(args),
        Commands::Vocab(args) => cmd_vocab(args),
        Commands::Eval(args) => cmd_eval(args),
        Commands::ExportBio(args) => cmd_export_bio(args),
        Commands::ExportMrc(args) => cmd_export_mrc(args),
        Commands::Filter(args) => cmd_filter(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// The cache file and key regex backing each built-in vocabulary.
const VOCAB_SOURCES: &[(&str, &str)] = &[
    ("country.json", "国家|国籍"),
    ("nation.json", "民族"),
    ("birthplace.json", "出生地|籍贯|祖籍"),
    ("school.json", "毕业院校|院校"),
];

/// Load the four built-in vocabularies from a cache directory, building
/// each missing one from the records. No directory means empty
/// vocabularies (membership tests never hit).
fn load_vocab_store(dir: Option<&Path>, records: &[PersonRecord]) -> Result<VocabularyStore> {
    let Some(dir) = dir else {
        return Ok(VocabularyStore::default());
    };
    fs::create_dir_all(dir)?;
    let build = |(file, key_pattern): (&str, &str)| -> Result<Arc<Vocabulary>> {
        let pattern = regex::Regex::new(key_pattern).expect("invalid built-in pattern");
        let vocab = Vocabulary::load_or_build(
            dir.join(file),
            || collect_values(records, &pattern),
            VocabConfig::default(),
        )?;
        Ok(Arc::new(vocab))
    };
    Ok(VocabularyStore {
        country: build(VOCAB_SOURCES[0])?,
        nation: build(VOCAB_SOURCES[1])?,
        birthplace: build(VOCAB_SOURCES[2])?,
        school: build(VOCAB_SOURCES[3])?,
    })
}

/// Read-only variant for scoring paths: existing caches load, missing
/// ones fall back to empty vocabularies without being written.
fn load_cached_vocab_store(dir: Option<&Path>) -> Result<VocabularyStore> {
    let Some(dir) = dir else {
        return Ok(VocabularyStore::default());
    };
    let load = |file: &str| -> Result<Arc<Vocabulary>> {
        Ok(Arc::new(Vocabulary::load_or_empty(dir.join(file))?))
    };
    Ok(VocabularyStore {
        country: load(VOCAB_SOURCES[0].0)?,
        nation: load(VOCAB_SOURCES[1].0)?,
        birthplace: load(VOCAB_SOURCES[2].0)?,
        school: load(VOCAB_SOURCES[3].0)?,
    })
}

fn cmd_supervise(args: SuperviseArgs) -> Result<()> {
    let records = load_records(&args.input)?;
    log::info!("loaded {} records from {}", records.len(), args.input.display());

    let vocabs = load_vocab_store(args.vocab_dir.as_deref(), &records)?;
    let supervisor = Supervisor::new(
        registry(&vocabs),
        SupervisorConfig {
            min_attributes: args.min_attributes,
            infer_from_text: args.infer_from_text,
        },
    );
    let report = supervisor.run(&records);

    save_json(&args.output, &report.records)?;
    if let Some(stats_path) = &args.stats {
        save_json(stats_path, &report.stats)?;
    }
    Ok(())
}

fn cmd_vocab(args: VocabArgs) -> Result<()> {
    let records = load_records(&args.input)?;
    let pattern = regex::Regex::new(&args.key_pattern)
        .map_err(|e| biosup::Error::invalid_input(format!("bad key pattern: {e}")))?;

    let mut values = collect_values(&records, &pattern);
    if let Some(strip) = &args.strip_trailing {
        let trailing: Vec<char> = strip.chars().collect();
        values = values
            .into_iter()
            .map(|v| v.trim_end_matches(&trailing[..]).to_string())
            .collect();
    }

    let vocab = Vocabulary::build(
        &values,
        VocabConfig {
            min_count: args.min_count,
            min_len: args.min_len,
        },
    );
    log::info!("kept {} of {} raw values", vocab.len(), values.len());
    vocab.save(&args.output)
}

fn cmd_eval(args: EvalArgs) -> Result<()> {
    let records = load_eval_records(&args.input)?;
    let vocabs = load_cached_vocab_store(args.vocab_dir.as_deref())?;
    let report = Evaluator::new(registry(&vocabs)).evaluate(&records);

    for (attribute, score) in &report.scores {
        log::info!(
            "{attribute}: gold={} predicted={} right={} P={} R={} F={}",
            score.gold_count,
            score.predicted_count,
            score.right_count,
            score.p.render(),
            score.r.render(),
            score.f.render()
        );
    }
    if let Some(path) = &args.mismatches {
        save_json(path, &report.mismatches)?;
    }
    match &args.report {
        Some(path) => save_json(path, &report),
        None => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
    }
}

fn cmd_export_bio(args: ExportBioArgs) -> Result<()> {
    let records: Vec<biosup::LabeledRecord> = {
        let file = fs::File::open(&args.input)?;
        serde_json::from_reader(std::io::BufReader::new(file))?
    };
    let doc = render_bio(&records, args.scheme.into());
    fs::write(&args.output, doc)?;
    log::info!("wrote {} records to {}", records.len(), args.output.display());
    Ok(())
}

fn cmd_export_mrc(args: ExportMrcArgs) -> Result<()> {
    let records: Vec<biosup::LabeledRecord> = {
        let file = fs::File::open(&args.input)?;
        serde_json::from_reader(std::io::BufReader::new(file))?
    };
    let split = export_mrc(&records, args.scheme.into(), args.seed);
    fs::create_dir_all(&args.out_dir)?;
    fs::write(args.out_dir.join("train.txt"), &split.train)?;
    fs::write(args.out_dir.join("test.txt"), &split.test)?;
    fs::write(args.out_dir.join("dev.txt"), &split.dev)?;
    Ok(())
}

fn cmd_filter(args: FilterArgs) -> Result<()> {
    let records = load_records(&args.input)?;
    let total = records.len();
    let vocabs = VocabularyStore::default();
    let kept = filter_by_attribute_count(records, &registry(&vocabs), args.min_attributes);
    log::info!("kept {} of {total} records", kept.len());
    save_json(&args.output, &kept)
}
