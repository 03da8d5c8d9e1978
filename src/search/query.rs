//! Search requests, response envelopes, and result shaping.

use std::io::{self, Write};

use log::info;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value, json};

use crate::error::ToolError;

/// Index patterns searched by EQL queries unless configured otherwise.
pub const EQL_DEFAULT_INDEX: &str = ".alerts-security.alerts-default,apm-*-transaction*,logs-*";

/// Index patterns searched by Lucene queries unless configured otherwise.
pub const LUCENE_DEFAULT_INDEX: &str = "logs-*,metrics-*";

/// Earliest time filter, in date math.
pub const DEFAULT_SINCE: &str = "now-30d/d";

/// Latest time filter, in date math.
pub const DEFAULT_BEFORE: &str = "now";

/// Maximum number of results requested.
pub const DEFAULT_SIZE: u64 = 100;

/// The query language of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// Event Query Language.
    Eql,
    /// Lucene query string.
    Lucene,
}

impl QueryKind {
    /// Returns the index searched when nothing else is configured.
    pub fn default_index(self) -> &'static str {
        match self {
            QueryKind::Eql => EQL_DEFAULT_INDEX,
            QueryKind::Lucene => LUCENE_DEFAULT_INDEX,
        }
    }
}

/// A query ready to hand to a [`SearchBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Query language.
    pub kind: QueryKind,
    /// The query text.
    pub query: String,
    /// Comma separated index patterns.
    pub index: String,
    /// `@timestamp` lower bound (inclusive).
    pub since: String,
    /// `@timestamp` upper bound (exclusive).
    pub before: String,
    /// Fields to project from each hit; empty means whole hits.
    pub fields: Vec<String>,
    /// Maximum number of results.
    pub size: u64,
}

impl SearchRequest {
    fn new(kind: QueryKind, query: impl Into<String>) -> Self {
        Self {
            kind,
            query: query.into(),
            index: kind.default_index().to_string(),
            since: DEFAULT_SINCE.to_string(),
            before: DEFAULT_BEFORE.to_string(),
            fields: Vec::new(),
            size: DEFAULT_SIZE,
        }
    }

    /// An EQL query over the default EQL indices.
    pub fn eql(query: impl Into<String>) -> Self {
        Self::new(QueryKind::Eql, query)
    }

    /// A Lucene query over the default Lucene indices.
    pub fn lucene(query: impl Into<String>) -> Self {
        Self::new(QueryKind::Lucene, query)
    }

    /// Sets the index patterns.
    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = index.into();
        self
    }

    /// Sets the time range.
    pub fn with_range(mut self, since: impl Into<String>, before: impl Into<String>) -> Self {
        self.since = since.into();
        self.before = before.into();
        self
    }

    /// Sets the projected fields from a comma separated list.
    pub fn with_fields(mut self, csv: &str) -> Self {
        self.fields = csv
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect();
        self
    }

    /// Sets the maximum number of results.
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    fn time_filter(&self) -> Value {
        json!({ "range": { "@timestamp": { "gte": self.since, "lt": self.before } } })
    }

    /// Builds the JSON request body.
    pub fn body(&self) -> Value {
        let mut body = match self.kind {
            QueryKind::Eql => json!({
                "query": self.query,
                "filter": self.time_filter(),
            }),
            QueryKind::Lucene => json!({
                "query": {
                    "bool": {
                        "must": [{
                            "query_string": {
                                "query": self.query,
                                "analyze_wildcard": true,
                                "allow_leading_wildcard": true,
                            }
                        }],
                        "filter": [self.time_filter()],
                    }
                },
            }),
        };
        body["size"] = json!(self.size);
        if !self.fields.is_empty() {
            body["fields"] = json!(self.fields);
        }
        body
    }
}

/// The parts of a search response the query tools print.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResponse {
    /// `hits.total.value`, when the backend reports it.
    pub total: Option<u64>,
    /// Events, sequences, or hits, in response order.
    pub hits: Vec<Value>,
}

impl SearchResponse {
    /// Extracts the hit list for `kind` from a raw response body.
    ///
    /// EQL responses carry `hits.events`, or `hits.sequences` for sequence
    /// queries; Lucene responses carry `hits.hits`.
    pub fn from_value(kind: QueryKind, mut value: Value) -> Result<Self, ToolError> {
        let hits = value.get_mut("hits").ok_or_else(|| ToolError::Backend {
            message: "response has no 'hits' object".into(),
        })?;

        let total = hits.pointer("/total/value").and_then(Value::as_u64);
        let keys: &[&str] = match kind {
            QueryKind::Eql => &["events", "sequences"],
            QueryKind::Lucene => &["hits"],
        };

        let list = keys
            .iter()
            .find_map(|key| hits.get_mut(*key).map(Value::take))
            .unwrap_or(Value::Array(Vec::new()));

        match list {
            Value::Array(hits) => Ok(Self { total, hits }),
            other => Err(ToolError::Backend {
                message: format!("expected a list of hits, got {}", other),
            }),
        }
    }
}

fn lookup<'a>(mut value: &'a Value, path: &str) -> Option<&'a Value> {
    for key in path.split('.') {
        value = value.as_object()?.get(key)?;
    }
    Some(value)
}

fn insert_path(target: &mut Map<String, Value>, path: &str, leaf: Value) {
    let mut keys = path.split('.').peekable();
    let mut map = target;
    while let Some(key) = keys.next() {
        if keys.peek().is_none() {
            map.entry(key).or_insert(leaf);
            return;
        }
        let next = map.entry(key).or_insert_with(|| Value::Object(Map::new()));
        match next {
            Value::Object(inner) => map = inner,
            // An earlier field already put a leaf here.
            _ => return,
        }
    }
}

/// Projects dotted `fields` from a hit's `_source` into a new document.
///
/// Missing and null values are skipped; with no fields the hit is returned
/// whole.
pub fn project(document: &Value, fields: &[String]) -> Value {
    if fields.is_empty() {
        return document.clone();
    }

    let mut view = Map::new();
    if let Some(source) = document.get("_source") {
        for field in fields {
            match lookup(source, field) {
                None | Some(Value::Null) => {}
                Some(value) => insert_path(&mut view, field, value.clone()),
            }
        }
    }
    Value::Object(view)
}

/// Renders a document as JSON with sorted keys: one line when `compact`,
/// otherwise indented by four spaces.
pub fn render(value: &Value, compact: bool) -> Result<String, ToolError> {
    // serde_json maps are ordered by key, so output is sorted.
    if compact {
        return serde_json::to_string(value).map_err(|e| ToolError::Io(e.into()));
    }

    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| ToolError::Io(e.into()))?;
    let text = String::from_utf8(out).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(text)
}

/// Runs a request. Network clients implement this; none ships here.
pub trait SearchBackend {
    /// Sends `request` and returns the raw response body.
    fn search(&mut self, request: &SearchRequest) -> Result<Value, ToolError>;
}

/// Runs `request` and writes one rendered document per hit to `writer`.
///
/// Returns the number of documents written.
pub fn run_query<B, W>(
    backend: &mut B,
    request: &SearchRequest,
    compact: bool,
    writer: &mut W,
) -> Result<usize, ToolError>
where
    B: SearchBackend + ?Sized,
    W: Write + ?Sized,
{
    let response = SearchResponse::from_value(request.kind, backend.search(request)?)?;
    match response.total {
        Some(total) => info!("found {} results", total),
        None => info!("found {} results", response.hits.len()),
    }

    for hit in &response.hits {
        let view = project(hit, &request.fields);
        writeln!(writer, "{}", render(&view, compact)?)?;
    }
    writer.flush()?;
    Ok(response.hits.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CannedBackend {
        response: Value,
        seen: Vec<Value>,
    }

    impl SearchBackend for CannedBackend {
        fn search(&mut self, request: &SearchRequest) -> Result<Value, ToolError> {
            self.seen.push(request.body());
            Ok(self.response.clone())
        }
    }

    struct DownBackend;

    impl SearchBackend for DownBackend {
        fn search(&mut self, _request: &SearchRequest) -> Result<Value, ToolError> {
            Err(ToolError::Backend {
                message: "connection refused".into(),
            })
        }
    }

    fn event(source: Value) -> Value {
        json!({ "_index": "logs-endpoint", "_id": "1", "_source": source })
    }

    #[test]
    fn test_defaults() {
        let eql = SearchRequest::eql("process where true");
        assert_eq!(eql.index, EQL_DEFAULT_INDEX);
        assert_eq!(eql.since, "now-30d/d");
        assert_eq!(eql.before, "now");
        assert_eq!(eql.size, 100);
        assert_eq!(SearchRequest::lucene("*").index, "logs-*,metrics-*");
    }

    #[test]
    fn test_eql_body() {
        let body = SearchRequest::eql("process where true")
            .with_fields("host.name, process.name")
            .with_size(5)
            .body();
        assert_eq!(
            body,
            json!({
                "query": "process where true",
                "filter": { "range": { "@timestamp": { "gte": "now-30d/d", "lt": "now" } } },
                "fields": ["host.name", "process.name"],
                "size": 5,
            })
        );
    }

    #[test]
    fn test_lucene_body() {
        let body = SearchRequest::lucene("event.code:4624")
            .with_range("now-1h", "now-5m")
            .body();
        assert_eq!(
            body["query"]["bool"]["must"][0]["query_string"]["query"],
            "event.code:4624"
        );
        assert_eq!(
            body["query"]["bool"]["filter"][0]["range"]["@timestamp"]["gte"],
            "now-1h"
        );
        assert_eq!(body["size"], 100);
        assert!(body.get("fields").is_none());
    }

    #[test]
    fn test_response_envelopes() {
        let eql = json!({ "hits": { "total": { "value": 2 }, "events": [{"a": 1}, {"a": 2}] } });
        let response = SearchResponse::from_value(QueryKind::Eql, eql).unwrap();
        assert_eq!(response.total, Some(2));
        assert_eq!(response.hits.len(), 2);

        let sequences = json!({ "hits": { "sequences": [{"events": []}] } });
        let response = SearchResponse::from_value(QueryKind::Eql, sequences).unwrap();
        assert_eq!(response.total, None);
        assert_eq!(response.hits.len(), 1);

        let lucene = json!({ "hits": { "total": { "value": 0 }, "hits": [] } });
        let response = SearchResponse::from_value(QueryKind::Lucene, lucene).unwrap();
        assert!(response.hits.is_empty());

        assert!(SearchResponse::from_value(QueryKind::Lucene, json!({ "error": "x" })).is_err());
    }

    #[test]
    fn test_project_nested_fields() {
        let doc = event(json!({
            "host": { "name": "ws-01", "ip": null },
            "process": { "name": "cmd.exe", "pid": 4 },
            "message": "hi",
        }));
        let fields: Vec<String> = "process.name,host.name,host.ip,user.name,message"
            .split(',')
            .map(str::to_string)
            .collect();

        assert_eq!(
            project(&doc, &fields),
            json!({
                "host": { "name": "ws-01" },
                "process": { "name": "cmd.exe" },
                "message": "hi",
            })
        );
    }

    #[test]
    fn test_project_without_fields_is_identity() {
        let doc = event(json!({ "a": 1 }));
        assert_eq!(project(&doc, &[]), doc);
    }

    #[test]
    fn test_project_keeps_first_value_on_conflict() {
        let doc = event(json!({ "a": { "b": 1 } }));
        let fields = vec!["a".to_string(), "a.b".to_string()];
        assert_eq!(project(&doc, &fields), json!({ "a": { "b": 1 } }));
    }

    #[test]
    fn test_render() {
        let value = json!({ "b": 1, "a": { "d": true, "c": null } });
        let compact = render(&value, true).unwrap();
        assert_eq!(compact, r#"{"a":{"c":null,"d":true},"b":1}"#);
        assert_eq!(
            render(&value, false).unwrap(),
            "{\n    \"a\": {\n        \"c\": null,\n        \"d\": true\n    },\n    \"b\": 1\n}"
        );
    }

    #[test]
    fn test_run_query_projects_each_hit() {
        let mut backend = CannedBackend {
            response: json!({ "hits": { "total": { "value": 2 }, "events": [
                event(json!({ "host": { "name": "a" } })),
                event(json!({ "host": { "name": "b" } })),
            ] } }),
            seen: Vec::new(),
        };
        let request = SearchRequest::eql("any where true").with_fields("host.name");

        let mut out = Vec::new();
        let n = run_query(&mut backend, &request, true, &mut out).unwrap();

        assert_eq!(n, 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\"host\":{\"name\":\"a\"}}\n{\"host\":{\"name\":\"b\"}}\n"
        );
        assert_eq!(backend.seen.len(), 1);
    }

    #[test]
    fn test_run_query_propagates_backend_errors() {
        let mut out = Vec::new();
        let request = SearchRequest::lucene("*");
        let err = run_query(&mut DownBackend, &request, false, &mut out).unwrap_err();
        assert!(matches!(err, ToolError::Backend { .. }));
        assert!(out.is_empty());
    }
}
