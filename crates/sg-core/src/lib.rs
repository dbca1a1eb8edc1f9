//! Course schedule expansion.
//!
//! This crate turns recurring course rules into concrete dated sessions:
//! - Rule normalization: reading field-keyed spreadsheet rows into [`RuleRecord`]s
//! - Date walking: day-by-day iteration over a course interval
//! - Pattern matching: once, weekly, biweekly and monthly repetition
//! - Session generation and aggregation across a whole rule set

mod aggregate;
pub mod calendar;
pub mod repetition;
pub mod rule;
pub mod session;

pub use aggregate::{EmptyRule, Expansion, SkipReason, SkippedRule, expand_all, expand_rows};
pub use calendar::{DateCursor, DateRange};
pub use repetition::{RepetitionKind, matches};
pub use rule::{ColumnMap, RuleDefect, RuleRecord, RuleRow, open_end, parse_date};
pub use session::{ExpansionOptions, SessionGenerator, SessionRecord, expand};
