//! Natural-language query parsing.
//!
//! A [`QueryParser`] turns free text such as "white sneakers under $100,
//! no leather" into a refined positive query, a negative query and
//! structured filters. Parsers are usually backed by a language model whose
//! reply is a JSON object, possibly wrapped in a markdown code fence.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use stylematch_core::{parse_price, Category, Error, Result, SearchFilters};
use tracing::{debug, warn};

/// Structured form of a shopper's query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedQuery {
    pub refined_query: String,
    pub negative_query: Option<String>,
    pub category: Option<Category>,
    pub color: Option<String>,
    pub max_price: Option<f64>,
}

pub trait QueryParser: Send + Sync {
    fn parse(&self, text: &str) -> Result<ParsedQuery>;
}

impl ParsedQuery {
    /// Unparsed fallback: the whole text is the positive query
    pub fn raw(text: &str) -> Self {
        Self {
            refined_query: text.trim().to_string(),
            ..Default::default()
        }
    }

    /// Parse a model reply. Fields may be missing or loosely typed; anything
    /// unusable is dropped rather than failing the whole parse.
    pub fn from_response_text(response: &str, original: &str) -> Result<Self> {
        let body = strip_code_fence(response);
        let value: Value = serde_json::from_str(body)
            .map_err(|e| Error::Parse(format!("query parser reply is not JSON: {}", e)))?;
        let object = value
            .as_object()
            .ok_or_else(|| Error::Parse("query parser reply is not a JSON object".to_string()))?;

        let refined_query = non_blank(object.get("refined_query"))
            .unwrap_or_else(|| original.trim().to_string());

        let negative_query = match object.get("negative_query") {
            Some(Value::Array(terms)) => {
                let joined = terms
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .collect::<Vec<_>>()
                    .join(", ");
                (!joined.is_empty()).then_some(joined)
            }
            other => non_blank(other),
        };

        let category = non_blank(object.get("category")).and_then(|c| match c.parse::<Category>() {
            Ok(category) => Some(category),
            Err(_) => {
                debug!("Dropping unknown category {:?} from parsed query", c);
                None
            }
        });

        let max_price = match object.get("max_price") {
            Some(Value::Number(n)) => n.as_f64().filter(|p| p.is_finite() && *p > 0.0),
            Some(Value::String(s)) => parse_price(s).ok(),
            _ => None,
        };

        Ok(Self {
            refined_query,
            negative_query,
            category,
            color: non_blank(object.get("color")),
            max_price,
        })
    }

    pub fn filters(&self) -> SearchFilters {
        SearchFilters {
            category: self.category.map(|c| c.as_str().to_string()),
            brand: None,
            color: self.color.clone(),
            max_price: self.max_price,
        }
    }
}

/// Parse with `parser` when available, falling back to the raw text on any
/// parser failure.
pub fn parse_or_fallback(parser: Option<&dyn QueryParser>, text: &str) -> ParsedQuery {
    match parser {
        Some(parser) => match parser.parse(text) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Query parser failed, using raw text: {}", e);
                ParsedQuery::raw(text)
            }
        },
        None => ParsedQuery::raw(text),
    }
}

fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();
    let inner = if let Some((_, rest)) = trimmed.split_once("```json") {
        rest
    } else if let Some((_, rest)) = trimmed.split_once("```") {
        rest
    } else {
        return trimmed;
    };
    inner.split("```").next().unwrap_or(inner).trim()
}

fn non_blank(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
