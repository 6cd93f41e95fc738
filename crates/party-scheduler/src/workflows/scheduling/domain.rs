use std::collections::BTreeMap;
use std::fmt;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Days offered by default after the poll opens.
const DEFAULT_RANGE_DAYS: i64 = 7;
/// Days participants get to answer by default.
const DEFAULT_DEADLINE_DAYS: i64 = 3;

/// Participant seniority tier, ordered from most junior to most senior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Staff,
    TeamLead,
    Manager,
    Director,
    Executive,
}

impl Role {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Staff,
            Self::TeamLead,
            Self::Manager,
            Self::Director,
            Self::Executive,
        ]
    }

    /// Stable machine key, also used in stored response files.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Staff => "staff",
            Self::TeamLead => "team_lead",
            Self::Manager => "manager",
            Self::Director => "director",
            Self::Executive => "executive",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Staff => "Staff",
            Self::TeamLead => "Team Lead",
            Self::Manager => "Manager",
            Self::Director => "Director",
            Self::Executive => "Executive",
        }
    }

    /// Label shown on the Japanese participant form.
    pub const fn localized_label(self) -> &'static str {
        match self {
            Self::Staff => "一般",
            Self::TeamLead => "リーダークラス",
            Self::Manager => "部長クラス",
            Self::Director => "本部長クラス",
            Self::Executive => "社長クラス",
        }
    }

    /// Resolve a key, display label, or localized label.
    pub fn from_label(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::ordered().into_iter().find(|role| {
            trimmed.eq_ignore_ascii_case(role.key())
                || trimmed.eq_ignore_ascii_case(role.label())
                || trimmed == role.localized_label()
        })
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A participant's stated willingness to attend, most favorable first.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceLevel {
    DefinitelyCan,
    ProbablyCan,
    #[default]
    Undecided,
    ProbablyCannot,
    DefinitelyCannot,
}

impl PreferenceLevel {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::DefinitelyCan,
            Self::ProbablyCan,
            Self::Undecided,
            Self::ProbablyCannot,
            Self::DefinitelyCannot,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::DefinitelyCan => "definitely_can",
            Self::ProbablyCan => "probably_can",
            Self::Undecided => "undecided",
            Self::ProbablyCannot => "probably_cannot",
            Self::DefinitelyCannot => "definitely_cannot",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::DefinitelyCan => "Definitely can",
            Self::ProbablyCan => "Probably can",
            Self::Undecided => "Undecided",
            Self::ProbablyCannot => "Probably cannot",
            Self::DefinitelyCannot => "Definitely cannot",
        }
    }

    pub const fn localized_label(self) -> &'static str {
        match self {
            Self::DefinitelyCan => "絶対行ける",
            Self::ProbablyCan => "たぶん行ける",
            Self::Undecided => "未定",
            Self::ProbablyCannot => "たぶん行けない",
            Self::DefinitelyCannot => "絶対行けない",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::ordered().into_iter().find(|level| {
            trimmed.eq_ignore_ascii_case(level.key())
                || trimmed.eq_ignore_ascii_case(level.label())
                || trimmed == level.localized_label()
        })
    }
}

impl fmt::Display for PreferenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Setup defects that make a scoring run meaningless.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("candidate date set is empty")]
    EmptyDateSet,
    #[error("date range ends on {end} before it starts on {start}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
    #[error("candidate date {0} is listed more than once")]
    DuplicateDate(NaiveDate),
    #[error("candidate dates are not chronological at {0}")]
    UnorderedDates(NaiveDate),
    #[error("no weight configured for role {0}")]
    UnknownRole(Role),
    #[error("weight for role {0} must be a positive integer")]
    NonPositiveWeight(Role),
}

/// Non-empty, duplicate-free, chronological list of dates under consideration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<NaiveDate>", into = "Vec<NaiveDate>")]
pub struct CandidateDates(Vec<NaiveDate>);

impl CandidateDates {
    pub fn new(dates: Vec<NaiveDate>) -> Result<Self, ConfigurationError> {
        if dates.is_empty() {
            return Err(ConfigurationError::EmptyDateSet);
        }

        for pair in dates.windows(2) {
            if pair[0] == pair[1] {
                return Err(ConfigurationError::DuplicateDate(pair[1]));
            }
            if pair[0] > pair[1] {
                return Err(ConfigurationError::UnorderedDates(pair[1]));
            }
        }

        Ok(Self(dates))
    }

    /// Every day from `start` through `end`, inclusive.
    pub fn from_range(start: NaiveDate, end: NaiveDate) -> Result<Self, ConfigurationError> {
        if end < start {
            return Err(ConfigurationError::InvertedRange { start, end });
        }

        let dates = start.iter_days().take_while(|day| *day <= end).collect();
        Ok(Self(dates))
    }

    pub fn as_slice(&self) -> &[NaiveDate] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.0.iter().copied()
    }

    pub fn first(&self) -> NaiveDate {
        self.0[0]
    }

    pub fn last(&self) -> NaiveDate {
        self.0[self.0.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.0.binary_search(&date).is_ok()
    }
}

impl TryFrom<Vec<NaiveDate>> for CandidateDates {
    type Error = ConfigurationError;

    fn try_from(value: Vec<NaiveDate>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CandidateDates> for Vec<NaiveDate> {
    fn from(value: CandidateDates) -> Self {
        value.0
    }
}

/// One participant's submission. Never mutated after it is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantResponse {
    pub role: Role,
    #[serde(default)]
    pub preferences: BTreeMap<NaiveDate, PreferenceLevel>,
}

impl ParticipantResponse {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            preferences: BTreeMap::new(),
        }
    }

    pub fn with_preference(mut self, date: NaiveDate, level: PreferenceLevel) -> Self {
        self.preferences.insert(date, level);
        self
    }

    /// Unanswered dates read as `Undecided`.
    pub fn preference(&self, date: NaiveDate) -> PreferenceLevel {
        self.preferences.get(&date).copied().unwrap_or_default()
    }
}

/// Admin configuration for one poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSetup {
    pub dates: CandidateDates,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub comment: String,
}

impl ScheduleSetup {
    pub fn new(
        start: NaiveDate,
        end: NaiveDate,
        deadline: NaiveDate,
        comment: impl Into<String>,
    ) -> Result<Self, ConfigurationError> {
        Ok(Self {
            dates: CandidateDates::from_range(start, end)?,
            deadline,
            comment: comment.into(),
        })
    }

    /// A week of candidate dates from `today`, answers due in three days.
    pub fn opening_on(today: NaiveDate) -> Self {
        let dates = (0..=DEFAULT_RANGE_DAYS)
            .map(|offset| today + Duration::days(offset))
            .collect();

        Self {
            dates: CandidateDates(dates),
            deadline: today + Duration::days(DEFAULT_DEADLINE_DAYS),
            comment: String::new(),
        }
    }

    pub fn deadline_passed(&self, today: NaiveDate) -> bool {
        today > self.deadline
    }
}

/// Parse a `YYYY-MM-DD` calendar date, ignoring surrounding whitespace.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, d).expect("valid date")
    }

    #[test]
    fn range_is_inclusive_and_chronological() {
        let dates = CandidateDates::from_range(day(1), day(3)).expect("range");
        assert_eq!(dates.as_slice(), &[day(1), day(2), day(3)]);
        assert_eq!(dates.first(), day(1));
        assert_eq!(dates.last(), day(3));
    }

    #[test]
    fn single_day_range_is_allowed() {
        let dates = CandidateDates::from_range(day(5), day(5)).expect("range");
        assert_eq!(dates.len(), 1);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = CandidateDates::from_range(day(4), day(2)).expect_err("inverted");
        assert_eq!(
            err,
            ConfigurationError::InvertedRange {
                start: day(4),
                end: day(2)
            }
        );
    }

    #[test]
    fn explicit_lists_must_be_unique_and_ordered() {
        assert_eq!(
            CandidateDates::new(Vec::new()),
            Err(ConfigurationError::EmptyDateSet)
        );
        assert_eq!(
            CandidateDates::new(vec![day(1), day(1)]),
            Err(ConfigurationError::DuplicateDate(day(1)))
        );
        assert_eq!(
            CandidateDates::new(vec![day(2), day(1)]),
            Err(ConfigurationError::UnorderedDates(day(1)))
        );
    }

    #[test]
    fn candidate_dates_deserialize_through_validation() {
        let parsed: Result<CandidateDates, _> = serde_json::from_str("[]");
        assert!(parsed.is_err());

        let parsed: CandidateDates =
            serde_json::from_str(r#"["2025-10-01","2025-10-03"]"#).expect("valid list");
        assert!(parsed.contains(day(3)));
        assert!(!parsed.contains(day(2)));
    }

    #[test]
    fn labels_resolve_in_every_form() {
        assert_eq!(Role::from_label("team_lead"), Some(Role::TeamLead));
        assert_eq!(Role::from_label(" Team Lead "), Some(Role::TeamLead));
        assert_eq!(Role::from_label("部長クラス"), Some(Role::Manager));
        assert_eq!(Role::from_label("intern"), None);

        assert_eq!(
            PreferenceLevel::from_label("たぶん行ける"),
            Some(PreferenceLevel::ProbablyCan)
        );
        assert_eq!(
            PreferenceLevel::from_label("DEFINITELY_CANNOT"),
            Some(PreferenceLevel::DefinitelyCannot)
        );
        assert_eq!(PreferenceLevel::from_label("maybe"), None);
    }

    #[test]
    fn missing_preferences_default_to_undecided() {
        let response =
            ParticipantResponse::new(Role::Staff).with_preference(day(1), PreferenceLevel::ProbablyCan);
        assert_eq!(response.preference(day(1)), PreferenceLevel::ProbablyCan);
        assert_eq!(response.preference(day(2)), PreferenceLevel::Undecided);
    }

    #[test]
    fn default_setup_spans_a_week_with_three_day_deadline() {
        let setup = ScheduleSetup::opening_on(day(1));
        assert_eq!(setup.dates.len(), 8);
        assert_eq!(setup.dates.last(), day(8));
        assert_eq!(setup.deadline, day(4));
        assert!(!setup.deadline_passed(day(4)));
        assert!(setup.deadline_passed(day(5)));
    }
}
