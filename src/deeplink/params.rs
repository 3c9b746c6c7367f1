use std::collections::HashMap;

use url::Url;

/// Query parameters of a single request, in parse order.
///
/// Each name maps to every non-blank value it was given. Blank values
/// (`?tx_ref=`) are dropped while parsing, but the name is still listed by
/// [`QueryParams::keys`] so diagnostics can report what the caller sent.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    values: HashMap<String, Vec<String>>,
    order: Vec<String>,
}

impl QueryParams {
    /// Parses the query component of a request URL.
    pub fn from_url(url: &Url) -> Self {
        Self::from_query(url.query().unwrap_or_default())
    }

    /// Parses a raw `application/x-www-form-urlencoded` query string
    /// (without the leading `?`).
    pub fn from_query(query: &str) -> Self {
        url::form_urlencoded::parse(query.as_bytes()).collect()
    }

    fn insert(&mut self, name: String, value: String) {
        if !self.values.contains_key(&name) {
            self.order.push(name.clone());
        }
        let slot = self.values.entry(name).or_default();
        if !value.is_empty() {
            slot.push(value);
        }
    }

    /// First value given for `name`, if any.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.all(name).first().map(String::as_str)
    }

    /// Every value given for `name`, in parse order.
    pub fn all(&self, name: &str) -> &[String] {
        self.values.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Parameter names in the order they first appeared.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Name/value pairs in parse order, blank values omitted.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.order.iter().flat_map(move |name| {
            self.all(name)
                .iter()
                .map(move |value| (name.as_str(), value.as_str()))
        })
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::default();
        for (name, value) in iter {
            params.insert(name.into(), value.into());
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_names_keep_parse_order() {
        let params = QueryParams::from_query("tx_ref=abc&status=successful&tx_ref=def");
        assert_eq!(params.all("tx_ref"), ["abc", "def"]);
        assert_eq!(params.first("tx_ref"), Some("abc"));
        assert_eq!(params.keys().collect::<Vec<_>>(), ["tx_ref", "status"]);
    }

    #[test]
    fn blank_values_are_dropped_but_name_is_kept() {
        let params = QueryParams::from_query("tx_ref=&tx_ref=abc&status=");
        assert_eq!(params.first("tx_ref"), Some("abc"));
        assert_eq!(params.first("status"), None);
        assert_eq!(params.keys().count(), 2);
    }

    #[test]
    fn values_are_percent_decoded() {
        let params = QueryParams::from_query("tx_ref=TX-2024+%28ref%231%29");
        assert_eq!(params.first("tx_ref"), Some("TX-2024 (ref#1)"));
    }

    #[test]
    fn from_url_reads_query_component() {
        let url = Url::parse("https://pay.example.com/api/redirect?status=cancelled&tx_ref=x1&transaction_id=99")
            .unwrap();
        let params = QueryParams::from_url(&url);
        assert_eq!(params.first("transaction_id"), Some("99"));
        assert_eq!(
            params.pairs().collect::<Vec<_>>(),
            [("status", "cancelled"), ("tx_ref", "x1"), ("transaction_id", "99")]
        );
    }

    #[test]
    fn missing_name_is_empty() {
        let params = QueryParams::default();
        assert_eq!(params.keys().count(), 0);
        assert!(params.all("tx_ref").is_empty());
        assert_eq!(params.first("tx_ref"), None);
    }
}
