// src/ingredient.rs

//! Ingredients and ingredient collections
//!
//! An ingredient is identified by its name only. Names keep their case when
//! stored but are compared case-insensitively when checking whether a recipe
//! can be made.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;

/// How two ingredient names are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaseSensitivity {
    /// Exact, byte-for-byte comparison
    #[default]
    Sensitive,
    /// Unicode lowercase comparison
    Insensitive,
}

impl CaseSensitivity {
    pub fn names_equal(self, a: &str, b: &str) -> bool {
        match self {
            CaseSensitivity::Sensitive => a == b,
            CaseSensitivity::Insensitive => a == b || a.to_lowercase() == b.to_lowercase(),
        }
    }
}

/// Where ingredients without an expiration end up when sorting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NullExpirationPolicy {
    First,
    #[default]
    Last,
    /// Drop them from the sorted result entirely
    Exclude,
}

impl std::str::FromStr for NullExpirationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first" => Ok(NullExpirationPolicy::First),
            "last" => Ok(NullExpirationPolicy::Last),
            "exclude" => Ok(NullExpirationPolicy::Exclude),
            _ => Err(format!("Invalid null expiration policy: {}", s)),
        }
    }
}

/// Something in the kitchen, and when it stops being usable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<DateTime<Utc>>,
}

impl Ingredient {
    pub fn perishable(name: impl Into<String>, expiration: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            expiration: Some(expiration),
        }
    }

    pub fn non_perishable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expiration: None,
        }
    }

    /// Create an ingredient that expires `days` days after `now`
    ///
    /// Fails with `InvalidExpiration` when the date falls outside the calendar range.
    pub fn expiring_in_days(
        name: impl Into<String>,
        days: i64,
        now: DateTime<Utc>,
    ) -> crate::Result<Self> {
        let name = name.into();
        let expiration =
            Duration::try_days(days).and_then(|offset| now.checked_add_signed(offset));
        match expiration {
            Some(expiration) => Ok(Self::perishable(name, expiration)),
            None => Err(crate::Error::InvalidExpiration { name, days }),
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiration.is_some_and(|exp| exp < now)
    }

    /// Human readable description relative to `now`
    pub fn describe_at(&self, now: DateTime<Utc>) -> String {
        let Some(expiration) = self.expiration else {
            return format!("{} (does not expire)", self.name);
        };

        let minutes = (expiration - now).num_minutes();
        let days = (minutes.abs() as f64 / (24.0 * 60.0)).round() as i64;

        match (minutes < 0, days) {
            (_, 0) if minutes < 0 => format!("{} expired today", self.name),
            (_, 0) => format!("{} expires today", self.name),
            (true, 1) => format!("{} expired 1 day ago", self.name),
            (true, n) => format!("{} expired {} days ago", self.name, n),
            (false, 1) => format!("{} expires in 1 day", self.name),
            (false, n) => format!("{} expires in {} days", self.name, n),
        }
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe_at(Utc::now()))
    }
}

/// An ordered collection of ingredients
///
/// Duplicates are allowed; "contains" means any element has the name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ingredients(Vec<Ingredient>);

impl Ingredients {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// True if any ingredient has this name, ignoring case
    pub fn contains(&self, name: &str) -> bool {
        self.0
            .iter()
            .any(|i| CaseSensitivity::Insensitive.names_equal(&i.name, name))
    }

    /// Stable sort by expiration, soonest first
    ///
    /// Ingredients with equal expirations keep their relative order.
    pub fn sort_by_expiration(mut self, policy: NullExpirationPolicy) -> Self {
        if policy == NullExpirationPolicy::Exclude {
            self.0.retain(|i| i.expiration.is_some());
        }

        self.0
            .sort_by(|a, b| match (a.expiration, b.expiration) {
                (Some(x), Some(y)) => x.cmp(&y),
                (None, None) => Ordering::Equal,
                (None, Some(_)) if policy == NullExpirationPolicy::First => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) if policy == NullExpirationPolicy::First => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
            });
        self
    }

    /// Only the ingredients that have not expired at `now`
    pub fn fresh_at(self, now: DateTime<Utc>) -> Self {
        self.0.into_iter().filter(|i| !i.is_expired_at(now)).collect()
    }

    pub fn push(&mut self, ingredient: Ingredient) {
        self.0.push(ingredient);
    }

    pub fn into_vec(self) -> Vec<Ingredient> {
        self.0
    }
}

impl Deref for Ingredients {
    type Target = [Ingredient];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Ingredient>> for Ingredients {
    fn from(v: Vec<Ingredient>) -> Self {
        Self(v)
    }
}

impl FromIterator<Ingredient> for Ingredients {
    fn from_iter<I: IntoIterator<Item = Ingredient>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Ingredients {
    type Item = Ingredient;
    type IntoIter = std::vec::IntoIter<Ingredient>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Ingredients {
    type Item = &'a Ingredient;
    type IntoIter = std::slice::Iter<'a, Ingredient>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn names(ingredients: &Ingredients) -> Vec<&str> {
        ingredients.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn test_contains_ignores_case() {
        let ingredients: Ingredients = vec![Ingredient::non_perishable("Milk")].into();
        assert!(ingredients.contains("milk"));
        assert!(ingredients.contains("MILK"));
        assert!(!ingredients.contains("cheese"));
    }

    #[test]
    fn test_sort_by_expiration() {
        let ingredients: Ingredients = vec![
            Ingredient::perishable("Milk", now() + Duration::hours(72)),
            Ingredient::perishable("Cheese", now() + Duration::hours(48)),
            Ingredient::perishable("Pasta", now() + Duration::hours(2000)),
        ]
        .into();

        let sorted = ingredients.sort_by_expiration(NullExpirationPolicy::Last);
        assert_eq!(names(&sorted), vec!["Cheese", "Milk", "Pasta"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_expirations() {
        let same = now() + Duration::hours(24);
        let ingredients: Ingredients = vec![
            Ingredient::perishable("Bread", same),
            Ingredient::perishable("Eggs", now() + Duration::hours(1)),
            Ingredient::perishable("Butter", same),
            Ingredient::perishable("Apples", same),
        ]
        .into();

        let sorted = ingredients.sort_by_expiration(NullExpirationPolicy::Last);
        assert_eq!(names(&sorted), vec!["Eggs", "Bread", "Butter", "Apples"]);
    }

    #[test]
    fn test_null_expiration_policies() {
        let ingredients: Ingredients = vec![
            Ingredient::non_perishable("Salt"),
            Ingredient::perishable("Milk", now() + Duration::hours(72)),
            Ingredient::non_perishable("Pepper"),
            Ingredient::perishable("Cheese", now() + Duration::hours(48)),
        ]
        .into();

        let last = ingredients.clone().sort_by_expiration(NullExpirationPolicy::Last);
        assert_eq!(names(&last), vec!["Cheese", "Milk", "Salt", "Pepper"]);

        let first = ingredients.clone().sort_by_expiration(NullExpirationPolicy::First);
        assert_eq!(names(&first), vec!["Salt", "Pepper", "Cheese", "Milk"]);

        let excluded = ingredients.sort_by_expiration(NullExpirationPolicy::Exclude);
        assert_eq!(names(&excluded), vec!["Cheese", "Milk"]);
    }

    #[test]
    fn test_fresh_at_drops_expired() {
        let ingredients: Ingredients = vec![
            Ingredient::perishable("Old milk", now() - Duration::hours(1)),
            Ingredient::perishable("Milk", now() + Duration::hours(1)),
            Ingredient::non_perishable("Salt"),
        ]
        .into();

        assert_eq!(names(&ingredients.fresh_at(now())), vec!["Milk", "Salt"]);
    }

    #[test]
    fn test_describe_at() {
        let milk = Ingredient::expiring_in_days("Milk", 3, now()).unwrap();
        assert_eq!(milk.describe_at(now()), "Milk expires in 3 days");

        let cheese = Ingredient::perishable("Cheese", now() + Duration::hours(30));
        assert_eq!(cheese.describe_at(now()), "Cheese expires in 1 day");

        let eggs = Ingredient::perishable("Eggs", now() + Duration::hours(2));
        assert_eq!(eggs.describe_at(now()), "Eggs expires today");

        let bread = Ingredient::expiring_in_days("Bread", -2, now()).unwrap();
        assert_eq!(bread.describe_at(now()), "Bread expired 2 days ago");

        let salt = Ingredient::non_perishable("Salt");
        assert_eq!(salt.describe_at(now()), "Salt (does not expire)");
    }

    #[test]
    fn test_expiring_in_days_out_of_range() {
        let err = Ingredient::expiring_in_days("Milk", 1_000_000_000, now()).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::InvalidExpiration { days: 1_000_000_000, .. }
        ));

        let err = Ingredient::expiring_in_days("Milk", -1_000_000_000, now()).unwrap_err();
        assert!(matches!(err, crate::Error::InvalidExpiration { .. }));

        assert!(Ingredient::expiring_in_days("Milk", i64::MAX, now()).is_err());
        assert!(Ingredient::expiring_in_days("Milk", i64::MIN, now()).is_err());
    }

    #[test]
    fn test_names_equal() {
        assert!(CaseSensitivity::Sensitive.names_equal("Milk", "Milk"));
        assert!(!CaseSensitivity::Sensitive.names_equal("Milk", "milk"));
        assert!(CaseSensitivity::Insensitive.names_equal("Milk", "mILK"));
    }

    #[test]
    fn test_serialized_form() {
        let milk = Ingredient::perishable("Milk", now());
        let json = serde_json::to_string(&milk).unwrap();
        assert_eq!(json, r#"{"name":"Milk","expiration":"2024-03-01T12:00:00Z"}"#);

        let salt: Ingredient = serde_json::from_str(r#"{"name":"Salt"}"#).unwrap();
        assert_eq!(salt, Ingredient::non_perishable("Salt"));
    }
}
