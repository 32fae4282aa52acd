//! Report AI Common Library
//!
//! CLIとビューアで共有される型とユーティリティ

pub mod codec;
pub mod error;
pub mod parser;
pub mod prompts;
pub mod store;
pub mod types;

pub use codec::{decode_record, encode_record};
pub use error::{Error, Result};
pub use parser::{extract_json, parse_report_response};
pub use prompts::EXTRACTION_INSTRUCTION;
pub use store::{RecordStore, ReviewEntry, ReviewStore};
pub use types::{ExtractionRecord, TestResult};
