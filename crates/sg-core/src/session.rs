//! Session generation: walking one rule's course interval.
//!
//! The generator is a small state machine driven by [`Iterator::next`]:
//!
//! 1. `Scanning`: advance the date cursor and test each day against the rule.
//! 2. On a match, synthesize a [`SessionRecord`], bump the occurrence counter
//!    and hand the record out.
//! 3. `Done` once the interval is exhausted, the session cap is reached, or a
//!    `Once` rule has produced its single session.
//!
//! The occurrence counter lives inside the generator, so two rules that share
//! a topic never see each other's numbering.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calendar::DateCursor;
use crate::repetition::{RepetitionKind, matches};
use crate::rule::RuleRecord;

/// Options that shape emitted session records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionOptions {
    /// Word placed before the occurrence number in `session_label`.
    pub label_prefix: String,
}

impl Default for ExpansionOptions {
    fn default() -> Self {
        Self {
            label_prefix: "session".to_string(),
        }
    }
}

/// One concrete, dated course session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub teacher: String,
    pub topic: String,
    /// Human label such as `session 3`.
    pub session_label: String,
    /// 1-based occurrence number within the owning rule.
    pub session_index: u32,
    pub course_start: NaiveDate,
    pub course_end: NaiveDate,
    pub session_start: NaiveDate,
    /// Inclusive; equals `session_start` for one-day sessions.
    pub session_end: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Scanning,
    Done,
}

/// Lazily expands a single rule into its sessions, in date order.
#[derive(Debug, Clone)]
pub struct SessionGenerator<'a> {
    rule: &'a RuleRecord,
    options: &'a ExpansionOptions,
    cursor: DateCursor,
    emitted: u32,
    state: State,
}

impl<'a> SessionGenerator<'a> {
    pub fn new(rule: &'a RuleRecord, options: &'a ExpansionOptions) -> Self {
        Self {
            rule,
            options,
            cursor: rule.course_range().iter(),
            emitted: 0,
            state: State::Scanning,
        }
    }

    /// Number of sessions produced so far.
    pub const fn emitted(&self) -> u32 {
        self.emitted
    }

    fn cap_reached(&self) -> bool {
        self.rule
            .total_sessions
            .is_some_and(|cap| self.emitted >= cap)
    }

    fn emit(&mut self, session_start: NaiveDate) -> SessionRecord {
        self.emitted += 1;
        let rule = self.rule;
        let extra_days = u64::from(rule.session_duration_days.saturating_sub(1));
        let session_end = session_start
            .checked_add_days(Days::new(extra_days))
            .unwrap_or(NaiveDate::MAX);

        SessionRecord {
            teacher: rule.teacher.clone(),
            topic: rule.topic.clone(),
            session_label: format!("{} {}", self.options.label_prefix, self.emitted),
            session_index: self.emitted,
            course_start: rule.course_start,
            course_end: rule.course_end,
            session_start,
            session_end,
        }
    }
}

impl Iterator for SessionGenerator<'_> {
    type Item = SessionRecord;

    fn next(&mut self) -> Option<Self::Item> {
        while self.state == State::Scanning {
            if self.cap_reached() {
                self.state = State::Done;
                break;
            }

            let Some(candidate) = self.cursor.next() else {
                self.state = State::Done;
                break;
            };

            let rule = self.rule;
            if !matches(
                &rule.repetition_kind,
                &rule.repetition_detail,
                candidate,
                rule.course_start,
            ) {
                continue;
            }

            if rule.repetition_kind == RepetitionKind::Once {
                self.state = State::Done;
            }
            return Some(self.emit(candidate));
        }
        None
    }
}

impl std::iter::FusedIterator for SessionGenerator<'_> {}

/// Expands one rule into its sessions.
pub fn expand(rule: &RuleRecord, options: &ExpansionOptions) -> Vec<SessionRecord> {
    SessionGenerator::new(rule, options).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::rule::open_end;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rule(kind: RepetitionKind, detail: &[u32], start: NaiveDate, end: NaiveDate) -> RuleRecord {
        RuleRecord {
            topic: "Algebra".to_string(),
            teacher: "Li".to_string(),
            repetition_kind: kind,
            repetition_detail: detail.to_vec(),
            course_start: start,
            course_end: end,
            total_sessions: None,
            session_duration_days: 1,
        }
    }

    fn starts(sessions: &[SessionRecord]) -> Vec<NaiveDate> {
        sessions.iter().map(|s| s.session_start).collect()
    }

    #[test]
    fn weekly_mondays_and_wednesdays() {
        let rule = rule(
            RepetitionKind::Weekly,
            &[1, 3],
            date(2025, 1, 6),
            date(2025, 1, 17),
        );
        let sessions = expand(&rule, &ExpansionOptions::default());

        assert_eq!(
            starts(&sessions),
            vec![
                date(2025, 1, 6),
                date(2025, 1, 8),
                date(2025, 1, 13),
                date(2025, 1, 15),
            ]
        );
        assert!(sessions.iter().all(|s| s.session_end == s.session_start));
        assert!(sessions.iter().all(|s| s.course_end == date(2025, 1, 17)));
        assert_eq!(sessions[3].session_label, "session 4");
        assert_eq!(sessions[3].session_index, 4);
    }

    #[test]
    fn once_ignores_course_end() {
        let start = date(2025, 1, 6);
        let rule = rule(RepetitionKind::Once, &[], start, open_end());
        let options = ExpansionOptions::default();
        let mut generator = SessionGenerator::new(&rule, &options);

        let first = generator.next().unwrap();
        assert_eq!(first.session_start, start);
        assert_eq!(generator.next(), None);
        assert_eq!(generator.emitted(), 1);
    }

    #[test]
    fn once_stops_scanning_after_match() {
        let start = date(2025, 1, 6);
        let rule = rule(RepetitionKind::Once, &[], start, date(2025, 12, 31));
        let options = ExpansionOptions::default();
        let mut generator = SessionGenerator::new(&rule, &options);
        generator.next();

        // The cursor is left just past the start date.
        assert_eq!(generator.cursor.next(), Some(date(2025, 1, 7)));
    }

    #[test]
    fn biweekly_skips_alternate_mondays() {
        let rule = rule(
            RepetitionKind::Biweekly,
            &[1],
            date(2025, 1, 6),
            date(2025, 2, 3),
        );
        let sessions = expand(&rule, &ExpansionOptions::default());

        assert_eq!(
            starts(&sessions),
            vec![date(2025, 1, 6), date(2025, 1, 20), date(2025, 2, 3)]
        );
    }

    #[test]
    fn monthly_day_31_skips_short_months() {
        let rule = rule(
            RepetitionKind::Monthly,
            &[31],
            date(2025, 2, 1),
            date(2025, 4, 30),
        );
        let sessions = expand(&rule, &ExpansionOptions::default());

        assert_eq!(starts(&sessions), vec![date(2025, 3, 31)]);
    }

    #[test]
    fn total_sessions_caps_output() {
        let mut rule = rule(
            RepetitionKind::Weekly,
            &[1, 2, 3, 4, 5, 6, 7],
            date(2025, 1, 1),
            open_end(),
        );
        rule.total_sessions = Some(5);
        let sessions = expand(&rule, &ExpansionOptions::default());

        assert_eq!(sessions.len(), 5);
        assert_eq!(sessions[4].session_start, date(2025, 1, 5));
    }

    #[test]
    fn cap_larger_than_matches_is_harmless() {
        let mut rule = rule(
            RepetitionKind::Weekly,
            &[1],
            date(2025, 1, 6),
            date(2025, 1, 19),
        );
        rule.total_sessions = Some(10);

        assert_eq!(expand(&rule, &ExpansionOptions::default()).len(), 2);
    }

    #[test]
    fn duration_extends_session_end() {
        let mut rule = rule(
            RepetitionKind::Weekly,
            &[5],
            date(2025, 1, 6),
            date(2025, 1, 12),
        );
        rule.session_duration_days = 3;
        let sessions = expand(&rule, &ExpansionOptions::default());

        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].session_start, date(2025, 1, 10));
        assert_eq!(sessions[0].session_end, date(2025, 1, 12));
    }

    #[test]
    fn inverted_range_yields_nothing() {
        let rule = rule(
            RepetitionKind::Weekly,
            &[1, 2, 3, 4, 5, 6, 7],
            date(2025, 2, 1),
            date(2025, 1, 1),
        );
        assert!(expand(&rule, &ExpansionOptions::default()).is_empty());
    }

    #[test]
    fn once_after_inverted_range_yields_nothing() {
        let rule = rule(RepetitionKind::Once, &[], date(2025, 2, 1), date(2025, 1, 1));
        assert!(expand(&rule, &ExpansionOptions::default()).is_empty());
    }

    #[test]
    fn label_prefix_is_configurable() {
        let rule = rule(RepetitionKind::Once, &[], date(2025, 1, 6), date(2025, 1, 6));
        let options = ExpansionOptions {
            label_prefix: "lesson".to_string(),
        };

        assert_eq!(expand(&rule, &options)[0].session_label, "lesson 1");
    }

    #[test]
    fn generator_is_fused_after_done() {
        let rule = rule(
            RepetitionKind::Weekly,
            &[1],
            date(2025, 1, 6),
            date(2025, 1, 6),
        );
        let options = ExpansionOptions::default();
        let mut generator = SessionGenerator::new(&rule, &options);

        assert!(generator.next().is_some());
        assert_eq!(generator.next(), None);
        assert_eq!(generator.next(), None);
    }
}
