use sea_orm::{ColumnTrait, Condition};
use serde::{Deserialize, Serialize};

use common::{QueryPattern, WILDCARD};
use models::config;

/// Equality constraints on the scoping columns; `None` matches any value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendFilter {
    pub set: Option<String>,
    pub schema: Option<String>,
    pub key: Option<String>,
}

fn literal(field: &str) -> Option<String> {
    (field != WILDCARD).then(|| field.to_string())
}

impl From<&QueryPattern> for BackendFilter {
    fn from(p: &QueryPattern) -> Self {
        Self { set: literal(&p.set), schema: literal(&p.schema), key: literal(&p.key) }
    }
}

impl BackendFilter {
    /// True when no field is constrained.
    pub fn is_unconstrained(&self) -> bool {
        self.set.is_none() && self.schema.is_none() && self.key.is_none()
    }

    pub fn matches(&self, row: &config::Model) -> bool {
        let eq = |want: &Option<String>, have: &str| want.as_deref().map_or(true, |w| w == have);
        eq(&self.set, &row.set) && eq(&self.schema, &row.schema) && eq(&self.key, &row.key)
    }

    /// AND of the present constraints; an unconstrained filter renders as TRUE.
    pub fn condition(&self) -> Condition {
        let mut cond = Condition::all();
        if let Some(s) = &self.set { cond = cond.add(config::Column::Set.eq(s.as_str())); }
        if let Some(s) = &self.schema { cond = cond.add(config::Column::Schema.eq(s.as_str())); }
        if let Some(k) = &self.key { cond = cond.add(config::Column::Key.eq(k.as_str())); }
        cond
    }
}

/// One filter per pattern. Callers OR the result together.
pub fn adapt_query(patterns: &[QueryPattern]) -> Vec<BackendFilter> {
    patterns.iter().map(BackendFilter::from).collect()
}

/// OR of `filters`. A filter without constraints makes the whole condition
/// match every row. Backends answer an empty slice themselves.
pub fn any_of(filters: &[BackendFilter]) -> Condition {
    if filters.iter().any(BackendFilter::is_unconstrained) {
        return Condition::all();
    }
    filters.iter().fold(Condition::any(), |acc, f| acc.add(f.condition()))
}

/// In-memory evaluation of the OR of `filters`.
pub fn matches_any(filters: &[BackendFilter], row: &config::Model) -> bool {
    filters.iter().any(|f| f.matches(row))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, EntityTrait, QueryFilter, QueryTrait};

    fn row(set: &str, schema: &str, key: &str) -> config::Model {
        config::Model { id: String::new(), set: set.into(), schema: schema.into(), key: key.into(), value: "v".into() }
    }

    #[test]
    fn wildcard_fields_are_dropped() {
        let f = adapt_query(&[QueryPattern::new("*", "prod", "*")]);
        assert_eq!(f, vec![BackendFilter { set: None, schema: Some("prod".into()), key: None }]);
    }

    #[test]
    fn literal_pattern_keeps_every_field() {
        let f = BackendFilter::from(&QueryPattern::new("env", "svc", "K"));
        assert_eq!(f.set.as_deref(), Some("env"));
        assert_eq!(f.schema.as_deref(), Some("svc"));
        assert_eq!(f.key.as_deref(), Some("K"));
    }

    #[test]
    fn full_wildcard_adapts_to_unconstrained_filter() {
        let f = adapt_query(&[QueryPattern::all()]);
        assert_eq!(f.len(), 1);
        assert!(f[0].is_unconstrained());
        assert!(f[0].matches(&row("anything", "at", "all")));
    }

    #[test]
    fn star_inside_a_value_is_literal() {
        let f = BackendFilter::from(&QueryPattern::new("prod-*", "*", "*"));
        assert_eq!(f.set.as_deref(), Some("prod-*"));
        assert!(!f.matches(&row("prod-eu", "s", "k")));
    }

    #[test]
    fn filters_combine_with_or() {
        let filters = adapt_query(&[QueryPattern::new("a", "*", "*"), QueryPattern::new("*", "*", "K")]);
        assert!(matches_any(&filters, &row("a", "x", "y")));
        assert!(matches_any(&filters, &row("b", "x", "K")));
        assert!(!matches_any(&filters, &row("b", "x", "y")));
        assert!(!matches_any(&[], &row("a", "x", "y")));
    }

    #[test]
    fn sql_condition_mentions_only_constrained_columns() {
        let filters = adapt_query(&[QueryPattern::new("*", "prod", "*")]);
        let sql = config::Entity::find().filter(any_of(&filters)).build(DbBackend::Postgres).to_string();
        assert!(sql.contains(r#""config"."schema" = 'prod'"#), "{sql}");
        assert!(!sql.contains(r#""config"."set" ="#), "{sql}");
        assert!(!sql.contains(r#""config"."key" ="#), "{sql}");
    }

    #[test]
    fn any_unconstrained_filter_turns_into_full_scan() {
        let filters = adapt_query(&[QueryPattern::new("a", "b", "c"), QueryPattern::all()]);
        let sql = config::Entity::find().filter(any_of(&filters)).build(DbBackend::Sqlite).to_string();
        assert!(!sql.contains("'a'"), "{sql}");
        assert!(!sql.contains("OR"), "{sql}");
    }
}
