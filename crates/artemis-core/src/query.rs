//! Search facets and their translation into a job-search query string.
//!
//! Facets are emitted in a fixed precedence (time, geography by name,
//! geography by id, distance, feature flags). A raw query override
//! replaces all of them.

use url::form_urlencoded;

use crate::error::AppError;
use crate::models::QueryPair;

pub const TIME_KEY: &str = "f_TPR";
pub const GEO_KEY: &str = "geoId";
pub const DISTANCE_KEY: &str = "distance";
pub const FEATURE_KEY: &str = "f_FLAGS";

const PAST_DAY: &str = "r86400";
const PAST_WEEK: &str = "r604800";

/// Recognized city names (lowercase) and their geography ids.
pub const CITIES: &[(&str, u64)] = &[
    ("berlin", 103035651),
    ("london", 102257491),
    ("new york", 105080838),
    ("san francisco", 102277331),
    ("singapore", 102454443),
    ("sydney", 104769905),
    ("toronto", 100025096),
];

/// Boolean search filters, listed in the order their tokens are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    FairChanceEmployer,
    JobsInYourNetwork,
}

impl Feature {
    pub const ALL: [Feature; 2] = [Feature::FairChanceEmployer, Feature::JobsInYourNetwork];

    pub fn token(&self) -> &'static str {
        match self {
            Feature::FairChanceEmployer => "FCE",
            Feature::JobsInYourNetwork => "JIYN",
        }
    }
}

pub fn time_to_pair(time: &str) -> QueryPair {
    let value = match time {
        "day" => PAST_DAY,
        "week" => PAST_WEEK,
        raw => raw,
    };
    QueryPair::new(TIME_KEY, value)
}

/// Resolve a city name or a numeric geography id.
pub fn geo_to_pair(geo: &str) -> Result<QueryPair, AppError> {
    let needle = geo.trim().to_lowercase();
    if let Some((_, id)) = CITIES.iter().find(|(name, _)| *name == needle) {
        return Ok(QueryPair::new(GEO_KEY, id.to_string()));
    }

    let id: u64 = needle.parse().map_err(|_| {
        AppError::InvalidInput(format!(
            "Unknown geography '{geo}': expected a known city or a numeric geography id"
        ))
    })?;
    Ok(QueryPair::new(GEO_KEY, id.to_string()))
}

pub fn geo_id_to_pair(geo_id: u64) -> QueryPair {
    QueryPair::new(GEO_KEY, geo_id.to_string())
}

pub fn distance_to_pair(distance: u32) -> QueryPair {
    QueryPair::new(DISTANCE_KEY, distance.to_string())
}

/// Join the active feature tokens; `None` when no flag is set.
pub fn feature_pair(features: &[Feature]) -> Option<QueryPair> {
    let tokens: Vec<&str> = Feature::ALL
        .iter()
        .filter(|f| features.contains(f))
        .map(Feature::token)
        .collect();

    if tokens.is_empty() {
        None
    } else {
        Some(QueryPair::new(FEATURE_KEY, tokens.join(",")))
    }
}

/// Structured search options collected from the caller.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub raw_query: Option<String>,
    pub time: Option<String>,
    pub geo: Option<String>,
    pub geo_id: Option<u64>,
    pub distance: Option<u32>,
    pub features: Vec<Feature>,
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw_query(mut self, query: impl Into<String>) -> Self {
        self.raw_query = Some(query.into());
        self
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn with_geo(mut self, geo: impl Into<String>) -> Self {
        self.geo = Some(geo.into());
        self
    }

    pub fn with_geo_id(mut self, geo_id: u64) -> Self {
        self.geo_id = Some(geo_id);
        self
    }

    pub fn with_distance(mut self, distance: u32) -> Self {
        self.distance = Some(distance);
        self
    }

    pub fn with_feature(mut self, feature: Feature) -> Self {
        if !self.features.contains(&feature) {
            self.features.push(feature);
        }
        self
    }

    /// Facet pairs in precedence order. Ignores `raw_query`.
    ///
    /// Both geography facets may be present; each emits its own `geoId` pair.
    pub fn pairs(&self) -> Result<Vec<QueryPair>, AppError> {
        let mut pairs = Vec::new();
        if let Some(time) = &self.time {
            pairs.push(time_to_pair(time));
        }
        if let Some(geo) = &self.geo {
            pairs.push(geo_to_pair(geo)?);
        }
        if let Some(geo_id) = self.geo_id {
            pairs.push(geo_id_to_pair(geo_id));
        }
        if let Some(distance) = self.distance {
            pairs.push(distance_to_pair(distance));
        }
        if let Some(pair) = feature_pair(&self.features) {
            pairs.push(pair);
        }
        Ok(pairs)
    }

    /// The encoded query, or `None` if the caller gave nothing to search for.
    pub fn query_string(&self) -> Result<Option<String>, AppError> {
        if let Some(raw) = &self.raw_query {
            return Ok(Some(raw.clone()));
        }

        let pairs = self.pairs()?;
        if pairs.is_empty() {
            return Ok(None);
        }
        Ok(Some(encode_pairs(&pairs)))
    }
}

pub fn encode_pairs(pairs: &[QueryPair]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for pair in pairs {
        serializer.append_pair(pair.key, &pair.value);
    }
    serializer.finish()
}
