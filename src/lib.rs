//! Distant-supervision labeling for Chinese person-attribute extraction.
//!
//! Given scraped biography records (a semi-structured infobox plus free
//! text), `biosup` cleans the infobox values through a per-attribute
//! taxonomy, locates them verbatim in the person's text, and emits
//! labeled records ready for sequence-labeling (BIO/BIOES) or
//! machine-reading-comprehension training exports. A matching evaluator
//! scores model predictions against gold infoboxes with per-attribute
//! fuzzy equality.
//!
//! # Quick start
//!
//! ```no_run
//! use biosup::attrs::{registry, VocabularyStore};
//! use biosup::supervise::{Supervisor, SupervisorConfig};
//!
//! # fn main() -> biosup::Result<()> {
//! let records = biosup::corpus::load_records("person.json".as_ref())?;
//! let supervisor = Supervisor::new(
//!     registry(&VocabularyStore::default()),
//!     SupervisorConfig::default(),
//! );
//! let report = supervisor.run(&records);
//! println!("labeled {} records", report.records.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Evaluation metric naming
//!
//! The evaluator's `P`/`R` fields are swapped relative to the usual
//! precision/recall definitions and are kept that way for comparability
//! with prior reported numbers. See [`eval`] before quoting scores.

pub mod attrs;
pub mod corpus;
pub mod error;
pub mod eval;
pub mod export;
pub mod record;
pub mod supervise;
pub mod text;
pub mod vocab;

pub use attrs::{registry, AttributeSpec, VocabularyStore};
pub use error::{Error, Result};
pub use eval::{EvalReport, Evaluator};
pub use export::{export_mrc, render_bio, MrcSplit, TagScheme};
pub use record::{AttributeValue, EvalRecord, Infobox, LabeledRecord, PersonRecord, RawValue};
pub use supervise::{RunReport, Supervisor, SupervisorConfig};
pub use vocab::{VocabConfig, Vocabulary};
