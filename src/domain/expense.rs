//! Expense records and the validated values they are built from.

use std::{collections::BTreeSet, fmt, str::FromStr};

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::errors::{MooLahError, Result};
use crate::domain::category::Category;
use crate::domain::common::{Displayable, Identifiable};

const DESCRIPTION_MAX_LEN: usize = 100;
const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d-%m-%Y"];

pub const MESSAGE_DESCRIPTION_CONSTRAINTS: &str =
    "Descriptions must not be blank and are limited to 100 characters";
pub const MESSAGE_PRICE_CONSTRAINTS: &str =
    "Prices must be non-negative numbers with at most two decimal places";
pub const MESSAGE_TIMESTAMP_CONSTRAINTS: &str =
    "Timestamps must look like YYYY-MM-DD, DD-MM-YYYY, or YYYY-MM-DD HH:MM";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Description(String);

impl Description {
    pub fn new(text: impl AsRef<str>) -> Result<Self> {
        let trimmed = text.as_ref().trim();
        if trimmed.is_empty() || trimmed.chars().count() > DESCRIPTION_MAX_LEN {
            return Err(MooLahError::InvalidInput(
                MESSAGE_DESCRIPTION_CONSTRAINTS.to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Description {
    type Error = MooLahError;

    fn try_from(value: String) -> Result<Self> {
        Description::new(value)
    }
}

impl From<Description> for String {
    fn from(description: Description) -> Self {
        description.0
    }
}

/// Non-negative amount with two-digit fixed precision, stored in cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Price {
    cents: u64,
}

impl Price {
    pub const ZERO: Price = Price { cents: 0 };

    pub fn from_cents(cents: u64) -> Self {
        Self { cents }
    }

    pub fn cents(self) -> u64 {
        self.cents
    }

    pub fn as_f64(self) -> f64 {
        self.cents as f64 / 100.0
    }

    /// Saturates instead of overflowing; totals that large are not meaningful.
    pub fn saturating_add(self, other: Price) -> Price {
        Price {
            cents: self.cents.saturating_add(other.cents),
        }
    }
}

impl FromStr for Price {
    type Err = MooLahError;

    fn from_str(raw: &str) -> Result<Self> {
        let invalid = || MooLahError::InvalidInput(format!("`{raw}`: {MESSAGE_PRICE_CONSTRAINTS}"));
        let trimmed = raw.trim();
        let (whole, fraction) = match trimmed.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (trimmed, ""),
        };
        if whole.is_empty()
            || fraction.len() > 2
            || !whole.chars().all(|ch| ch.is_ascii_digit())
            || !fraction.chars().all(|ch| ch.is_ascii_digit())
            || (trimmed.contains('.') && fraction.is_empty())
        {
            return Err(invalid());
        }
        let whole: u64 = whole.parse().map_err(|_| invalid())?;
        let fraction_cents: u64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<u64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse().map_err(|_| invalid())?,
        };
        let cents = whole
            .checked_mul(100)
            .and_then(|value| value.checked_add(fraction_cents))
            .ok_or_else(invalid)?;
        Ok(Self { cents })
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.cents / 100, self.cents % 100)
    }
}

impl TryFrom<String> for Price {
    type Error = MooLahError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Price> for String {
    fn from(price: Price) -> Self {
        price.to_string()
    }
}

/// Local wall-clock instant at which an expense happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    pub fn now() -> Self {
        Self(Local::now().naive_local())
    }

    pub fn new(value: NaiveDateTime) -> Self {
        Self(value)
    }

    /// Midnight at the start of `date`.
    pub fn start_of_day(date: NaiveDate) -> Self {
        Self(date.and_time(NaiveTime::default()))
    }

    pub fn date(self) -> NaiveDate {
        self.0.date()
    }

    pub fn value(self) -> NaiveDateTime {
        self.0
    }

    pub fn is_before(self, other: Timestamp) -> bool {
        self.0 < other.0
    }
}

impl FromStr for Timestamp {
    type Err = MooLahError;

    fn from_str(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        TIMESTAMP_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
            .map(Timestamp)
            .or_else(|| {
                DATE_FORMATS
                    .iter()
                    .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
                    .map(Timestamp::start_of_day)
            })
            .ok_or_else(|| {
                MooLahError::InvalidInput(format!("`{raw}`: {MESSAGE_TIMESTAMP_CONSTRAINTS}"))
            })
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M"))
    }
}

/// Opaque token that tells apart expenses with identical visible fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UniqueIdentifier(Uuid);

impl UniqueIdentifier {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn uuid(self) -> Uuid {
        self.0
    }
}

impl fmt::Display for UniqueIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Expense@{}", self.0)
    }
}

/// Immutable expense record.
///
/// `==` is strong equality over every field. [`Expense::is_same_expense`] is the
/// weaker identity check used to locate an expense across edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    id: UniqueIdentifier,
    description: Description,
    price: Price,
    timestamp: Timestamp,
    #[serde(default)]
    categories: BTreeSet<Category>,
}

impl Expense {
    pub fn new(
        description: Description,
        price: Price,
        categories: impl IntoIterator<Item = Category>,
        timestamp: Timestamp,
        id: UniqueIdentifier,
    ) -> Self {
        Self {
            id,
            description,
            price,
            timestamp,
            categories: categories.into_iter().collect(),
        }
    }

    /// Records a new expense happening now with a fresh identifier.
    pub fn create(
        description: Description,
        price: Price,
        categories: impl IntoIterator<Item = Category>,
    ) -> Self {
        Self::new(
            description,
            price,
            categories,
            Timestamp::now(),
            UniqueIdentifier::generate(),
        )
    }

    pub fn unique_identifier(&self) -> UniqueIdentifier {
        self.id
    }

    pub fn description(&self) -> &Description {
        &self.description
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn categories(&self) -> &BTreeSet<Category> {
        &self.categories
    }

    pub fn has_category(&self, category: &Category) -> bool {
        self.categories.contains(category)
    }

    pub fn is_same_expense(&self, other: &Expense) -> bool {
        self.id == other.id
    }

    /// Builds the replacement value for an edit, keeping the identifier.
    pub fn edited(
        &self,
        description: Option<Description>,
        price: Option<Price>,
        categories: Option<BTreeSet<Category>>,
        timestamp: Option<Timestamp>,
    ) -> Expense {
        Expense {
            id: self.id,
            description: description.unwrap_or_else(|| self.description.clone()),
            price: price.unwrap_or(self.price),
            timestamp: timestamp.unwrap_or(self.timestamp),
            categories: categories.unwrap_or_else(|| self.categories.clone()),
        }
    }
}

impl Identifiable for Expense {
    fn id(&self) -> Uuid {
        self.id.uuid()
    }
}

impl Displayable for Expense {
    fn display_label(&self) -> String {
        format!("{} ({})", self.description, self.price)
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Price: {} Date: {} Categories: ",
            self.description, self.price, self.timestamp
        )?;
        for category in &self.categories {
            f.write_str(&category.display_label())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chicken_rice() -> Expense {
        Expense::new(
            Description::new("Chicken Rice").unwrap(),
            "3.50".parse().unwrap(),
            [Category::new("Food").unwrap()],
            "2024-03-01 12:30".parse().unwrap(),
            UniqueIdentifier::generate(),
        )
    }

    #[test]
    fn price_parses_fixed_precision() {
        assert_eq!("3.5".parse::<Price>().unwrap().cents(), 350);
        assert_eq!("3.50".parse::<Price>().unwrap().cents(), 350);
        assert_eq!("12".parse::<Price>().unwrap().cents(), 1200);
        assert_eq!("0.05".parse::<Price>().unwrap().to_string(), "0.05");
    }

    #[test]
    fn price_rejects_negative_and_overly_precise_values() {
        for raw in ["-1", "1.234", "abc", "", "3.", ".5", "1e3"] {
            assert!(raw.parse::<Price>().is_err(), "`{raw}` should be rejected");
        }
    }

    #[test]
    fn description_rejects_blank_text() {
        assert!(Description::new("   ").is_err());
        assert_eq!(Description::new(" Taxi ").unwrap().as_str(), "Taxi");
        assert!(Description::new("x".repeat(101)).is_err());
    }

    #[test]
    fn timestamp_accepts_dates_and_date_times() {
        let date_only: Timestamp = "2024-03-01".parse().unwrap();
        assert_eq!(date_only.to_string(), "2024-03-01 00:00");
        let day_first: Timestamp = "01-03-2024".parse().unwrap();
        assert_eq!(date_only, day_first);
        assert!("next tuesday".parse::<Timestamp>().is_err());
    }

    #[test]
    fn weak_and_strong_equality_differ() {
        let original = chicken_rice();
        let edited = original.edited(None, Some(Price::from_cents(400)), None, None);
        assert!(original.is_same_expense(&edited));
        assert_ne!(original, edited);

        let lookalike = Expense::new(
            original.description().clone(),
            original.price(),
            original.categories().iter().cloned(),
            original.timestamp(),
            UniqueIdentifier::generate(),
        );
        assert!(!original.is_same_expense(&lookalike));
        assert_ne!(original, lookalike);
    }

    #[test]
    fn serde_roundtrip_preserves_strong_equality() {
        let expense = chicken_rice();
        let json = serde_json::to_string(&expense).unwrap();
        assert!(json.contains("\"price\":\"3.50\""));
        let restored: Expense = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, expense);
    }
}
