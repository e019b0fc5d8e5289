//! Address lookup service
//!
//! Business logic for the four gateway operations: count, paginated
//! request, great-circle distance and cached city lookup. Validation
//! always runs before any upstream call, and every failure path is
//! classified into exactly one error variant before it leaves this module.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::cache::CityCache;
use crate::errors::{AddrGateError, Result};
use crate::services::geo::{self, Distance, DistanceUnit};
use crate::upstream::UpstreamClient;

/// 5-digit US postal code.
static US_ZIP: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{5}$").expect("hardcoded pattern"));

/// Canadian postal code: letter-digit-letter, optional space or hyphen,
/// digit-letter-digit.
static CA_POSTAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]\d[A-Za-z][ -]?\d[A-Za-z]\d$").expect("hardcoded pattern"));

// ============ Request/Response DTOs ============

/// Result of a count operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountResult {
    pub count: usize,
    /// Present only when the query matched nothing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Validated coordinate quadruple plus the requested output unit.
#[derive(Debug, Clone)]
pub struct DistanceQuery {
    pub lat1: String,
    pub lon1: String,
    pub lat2: String,
    pub lon2: String,
    pub unit: Option<DistanceUnit>,
}

impl DistanceQuery {
    /// Extract coordinates from a request body. A coordinate that is
    /// missing, null or an empty string is a validation error; numeric
    /// JSON values are coerced to their string form. An unrecognized
    /// unit silently falls back to "both units", it is not an error.
    fn from_body(body: &Value) -> Result<Self> {
        let coordinate = |field: &str| -> Result<String> {
            match body.get(field) {
                Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
                Some(Value::Number(n)) => Ok(n.to_string()),
                _ => Err(AddrGateError::validation(
                    "Missing coordinates. Required: lat1, lon1, lat2, lon2.",
                )),
            }
        };

        Ok(Self {
            lat1: coordinate("lat1")?,
            lon1: coordinate("lon1")?,
            lat2: coordinate("lat2")?,
            lon2: coordinate("lon2")?,
            unit: body
                .get("unit")
                .and_then(Value::as_str)
                .and_then(DistanceUnit::parse),
        })
    }
}

// ============ Service ============

/// Orchestrates the gateway operations over the upstream provider and
/// owns the city name cache.
pub struct AddressService {
    upstream: Arc<dyn UpstreamClient>,
    city_cache: CityCache,
}

impl AddressService {
    pub fn new(upstream: Arc<dyn UpstreamClient>) -> Self {
        Self::with_cache(upstream, CityCache::new())
    }

    /// Construct with an externally built cache so tests can inspect or
    /// pre-seed it.
    pub fn with_cache(upstream: Arc<dyn UpstreamClient>, city_cache: CityCache) -> Self {
        Self {
            upstream,
            city_cache,
        }
    }

    pub fn city_cache(&self) -> &CityCache {
        &self.city_cache
    }

    /// Count the addresses matching the search criteria.
    ///
    /// Requires at least one of `city` / `zip`; delegates the actual
    /// lookup to [`AddressService::request`] so pagination fields are
    /// honored the same way on both routes.
    pub async fn count(&self, body: &Value) -> Result<CountResult> {
        if !has_search_field(body) {
            warn!("Count request missing city and zip");
            return Err(AddrGateError::validation(
                "Missing required search field. Please provide at least a city or zip.",
            ));
        }

        let records = self.request(body).await?;

        if records.is_empty() {
            debug!("Count query returned no results");
            return Ok(CountResult {
                count: 0,
                note: Some("No results found for this query.".to_string()),
            });
        }

        info!("Count query returned {} result(s)", records.len());
        Ok(CountResult {
            count: records.len(),
            note: None,
        })
    }

    /// Forward the query to the upstream provider, then paginate.
    ///
    /// The provider filters server-side, so the body goes out exactly as
    /// received. The slice is applied only after the full response has
    /// been received; an out-of-range page yields an empty sequence, and
    /// upstream order is preserved.
    pub async fn request(&self, body: &Value) -> Result<Vec<Value>> {
        let payload = self.upstream.query(body.clone()).await?;

        let Value::Array(records) = payload else {
            warn!("Non-array response from address provider");
            return Err(AddrGateError::upstream_contract(
                "Unexpected response from address provider",
            ));
        };

        let limit = pagination_param(body, "limit");
        let page = match (pagination_param(body, "page"), limit) {
            (None, Some(_)) => {
                debug!("Page value not provided; defaulting to page 1");
                Some(1)
            }
            (page, _) => page,
        };

        let Some((page, limit)) = page.zip(limit) else {
            info!("Request returning {} total record(s)", records.len());
            return Ok(records);
        };

        let start = (page - 1).saturating_mul(limit);
        let sliced: Vec<Value> = records.into_iter().skip(start).take(limit).collect();

        info!(
            "Paginated result: page {}, limit {}, returning {} record(s)",
            page,
            limit,
            sliced.len()
        );
        Ok(sliced)
    }

    /// Great-circle distance between two coordinate pairs.
    ///
    /// Purely local; never touches the upstream provider.
    pub fn distance(&self, body: &Value) -> Result<Distance> {
        let query = DistanceQuery::from_body(body)?;

        let lat1 = parse_coordinate(&query.lat1)?;
        let lon1 = parse_coordinate(&query.lon1)?;
        let lat2 = parse_coordinate(&query.lat2)?;
        let lon2 = parse_coordinate(&query.lon2)?;

        let result = geo::distance(lat1, lon1, lat2, lon2, query.unit);
        if result.km.is_some_and(|v| !v.is_finite()) || result.mi.is_some_and(|v| !v.is_finite()) {
            warn!("Distance calculation produced a non-finite value");
            return Err(AddrGateError::computation("Distance calculation failed"));
        }

        debug!("Distance calculated successfully");
        Ok(result)
    }

    /// Resolve a postal code to a city name, memoizing successes.
    ///
    /// Accepts a body with exactly one field: a US or Canadian postal
    /// code under `zip`. A cache hit never reaches the provider.
    pub async fn city_lookup(&self, body: &Value) -> Result<String> {
        let zip = validate_city_query(body)?;

        if let Some(city) = self.city_cache.get(&zip) {
            debug!("City cache hit for zip {}", zip);
            return Ok(city);
        }

        let payload = self.upstream.query(json!({ "zipcode": zip })).await?;

        let city = payload
            .as_array()
            .and_then(|records| records.first())
            .and_then(|record| record.get("city"))
            .and_then(Value::as_str)
            .filter(|city| !city.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                warn!("No city found for zip {}", zip);
                AddrGateError::not_found("City not found")
            })?;

        // Written only after a successful, non-empty resolution; keyed by
        // the zip exactly as the client sent it.
        self.city_cache.insert(zip.clone(), city.clone());
        info!("City '{}' resolved for zip {}", city, zip);
        Ok(city)
    }
}

// ============ Validation helpers ============

/// A search field counts when it is present, non-null and not an empty
/// string.
fn has_search_field(body: &Value) -> bool {
    ["city", "zip"].iter().any(|field| match body.get(*field) {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    })
}

/// Read a pagination field. Integer JSON numbers and numeric strings are
/// both accepted; anything else, including values below 1, is treated as
/// absent rather than an error.
fn pagination_param(body: &Value, field: &str) -> Option<usize> {
    let raw = match body.get(field)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }?;

    if raw >= 1 {
        usize::try_from(raw).ok()
    } else {
        warn!("Ignoring out-of-range {} value: {}", field, raw);
        None
    }
}

fn parse_coordinate(raw: &str) -> Result<f64> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => {
            warn!("Invalid coordinate value: {:?}", raw);
            Err(AddrGateError::computation("Distance calculation failed"))
        }
    }
}

/// The city lookup accepts exactly one field: a valid US or Canadian
/// postal code under `zip`.
fn validate_city_query(body: &Value) -> Result<String> {
    let invalid = || {
        AddrGateError::validation(
            "Zip code is required (5-digit U.S. or 6-character Canadian) and no additional fields are allowed.",
        )
    };

    let Some(fields) = body.as_object() else {
        return Err(invalid());
    };
    if fields.len() != 1 {
        return Err(invalid());
    }

    let zip = fields.get("zip").and_then(Value::as_str).ok_or_else(invalid)?;
    if !US_ZIP.is_match(zip) && !CA_POSTAL.is_match(zip) {
        warn!("Rejected zip {:?}: not a US or Canadian postal code", zip);
        return Err(invalid());
    }

    Ok(zip.to_string())
}
