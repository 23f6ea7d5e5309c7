use regex::Regex;
use std::sync::OnceLock;

use crate::constants::request::DEBUG_PARAM;
use crate::domain::Params;

/// What a free-text search box entry is taken to mean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    /// `"LHR-JFK"`
    Route { dep_iata: String, arr_iata: String },
    /// `"123"`
    FlightNumber(String),
    /// `"BA123"`
    FlightCode(String),
}

fn whitespace() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("Invalid regex pattern defined in code"))
}

fn normalize_code(token: &str) -> String {
    whitespace().replace_all(token.trim(), "").to_uppercase()
}

/// Infers query parameters from the shape of the input. Returns `None` for
/// blank input.
#[must_use]
pub fn parse_search_query(input: &str) -> Option<SearchQuery> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if input.contains('-') {
        let mut tokens = input.split('-');
        let dep_iata = normalize_code(tokens.next().unwrap_or_default());
        let arr_iata = normalize_code(tokens.next().unwrap_or_default());
        return Some(SearchQuery::Route { dep_iata, arr_iata });
    }

    if input.chars().all(|c| c.is_ascii_digit()) {
        return Some(SearchQuery::FlightNumber(input.to_string()));
    }

    Some(SearchQuery::FlightCode(normalize_code(input)))
}

impl SearchQuery {
    /// Parameters for the `flights` endpoint. Empty route legs are left out.
    #[must_use]
    pub fn to_params(&self) -> Params {
        let mut params = Params::new();
        match self {
            Self::Route { dep_iata, arr_iata } => {
                if !dep_iata.is_empty() {
                    params.insert("dep_iata".to_string(), dep_iata.clone());
                }
                if !arr_iata.is_empty() {
                    params.insert("arr_iata".to_string(), arr_iata.clone());
                }
            }
            Self::FlightNumber(number) => {
                params.insert("flight_number".to_string(), number.clone());
            }
            Self::FlightCode(code) => {
                params.insert("flight_iata".to_string(), code.clone());
            }
        }
        params
    }

    /// Interactive searches always ask for fresh data.
    #[must_use]
    pub fn to_interactive_params(&self) -> Params {
        let mut params = self.to_params();
        params.insert(DEBUG_PARAM.to_string(), "1".to_string());
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_route_query() {
        let query = parse_search_query("LHR-JFK").unwrap();
        assert_eq!(
            query,
            SearchQuery::Route {
                dep_iata: "LHR".to_string(),
                arr_iata: "JFK".to_string()
            }
        );
        assert_eq!(
            query.to_params(),
            params(&[("dep_iata", "LHR"), ("arr_iata", "JFK")])
        );
    }

    #[test]
    fn test_route_query_is_normalized() {
        let query = parse_search_query(" lhr - jfk ").unwrap();
        assert_eq!(
            query.to_params(),
            params(&[("dep_iata", "LHR"), ("arr_iata", "JFK")])
        );
    }

    #[test]
    fn test_route_with_missing_leg() {
        let query = parse_search_query("LHR-").unwrap();
        assert_eq!(query.to_params(), params(&[("dep_iata", "LHR")]));
    }

    #[test]
    fn test_flight_code_query() {
        let query = parse_search_query("BA123").unwrap();
        assert_eq!(query, SearchQuery::FlightCode("BA123".to_string()));
        assert_eq!(query.to_params(), params(&[("flight_iata", "BA123")]));

        let spaced = parse_search_query("ba 123").unwrap();
        assert_eq!(spaced.to_params(), params(&[("flight_iata", "BA123")]));
    }

    #[test]
    fn test_flight_number_query() {
        let query = parse_search_query("123").unwrap();
        assert_eq!(query.to_params(), params(&[("flight_number", "123")]));
    }

    #[test]
    fn test_blank_query() {
        assert_eq!(parse_search_query(""), None);
        assert_eq!(parse_search_query("   "), None);
    }

    #[test]
    fn test_interactive_params_force_refresh() {
        let query = parse_search_query("BA123").unwrap();
        assert_eq!(
            query.to_interactive_params(),
            params(&[("flight_iata", "BA123"), ("debug", "1")])
        );
    }
}
