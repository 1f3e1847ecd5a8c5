use crate::contract;

/// A parsed resource uri: path segments plus query parameters. No
/// percent-decoding is applied; resource ids are plain identifiers.
#[derive(Debug, Clone)]
pub struct ResourceUri {
    path: String,
    segments: Vec<String>,
    query: Vec<(String, String)>,
}

impl ResourceUri {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim_start_matches('/');
        let (path, query) = match raw.split_once('?') {
            Some((path, query)) => (path, parse_query(query)),
            None => (raw, Vec::new()),
        };
        let path = path.trim_end_matches('/');
        let segments = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            path: path.to_string(),
            segments,
            query,
        }
    }

    /// The path portion, without query parameters. This is the identity
    /// change notifications are keyed on.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the caller identified itself as the background sync agent.
    pub fn is_sync_adapter(&self) -> bool {
        self.query_param(contract::IS_SYNCADAPTER).is_some()
    }
}

fn parse_query(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (k.to_string(), v.to_string()),
            None => (pair.to_string(), String::new()),
        })
        .collect()
}

/// The closed set of resources the provider serves. Item variants carry
/// the identifier segments extracted from the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceMatch {
    Ohmlets,
    OhmletId { id: String },
    Surveys,
    SurveyId { id: String, version: Option<i64> },
    Streams,
    StreamId { id: String, version: i64 },
    Reminders,
}

#[derive(Debug, Clone, Copy)]
enum Tag {
    Ohmlets,
    OhmletId,
    Surveys,
    SurveyId,
    Streams,
    StreamId,
    Reminders,
}

#[derive(Debug, Clone, Copy)]
enum Segment {
    Literal(&'static str),
    Wildcard,
}

struct Template {
    segments: Vec<Segment>,
    tag: Tag,
}

impl Template {
    /// Returns the wildcard captures when the path matches this template.
    fn captures<'a>(&self, path: &'a [String]) -> Option<Vec<&'a str>> {
        if path.len() != self.segments.len() {
            return None;
        }

        let mut captured = Vec::new();
        for (pattern, segment) in self.segments.iter().zip(path) {
            match pattern {
                Segment::Literal(lit) => {
                    if segment != lit {
                        return None;
                    }
                }
                Segment::Wildcard => captured.push(segment.as_str()),
            }
        }
        Some(captured)
    }
}

/// Immutable path-template table, built once at provider construction and
/// shared by reference. Templates are tried in registration order.
pub struct UriMatcher {
    templates: Vec<Template>,
}

impl UriMatcher {
    pub fn new() -> Self {
        let mut matcher = Self {
            templates: Vec::new(),
        };
        matcher.add("ohmlets", Tag::Ohmlets);
        matcher.add("ohmlets/*", Tag::OhmletId);
        matcher.add("surveys", Tag::Surveys);
        matcher.add("surveys/*", Tag::SurveyId);
        matcher.add("surveys/*/*", Tag::SurveyId);
        matcher.add("streams", Tag::Streams);
        matcher.add("streams/*/*", Tag::StreamId);
        matcher.add("reminders", Tag::Reminders);
        matcher
    }

    fn add(&mut self, pattern: &'static str, tag: Tag) {
        let segments = pattern
            .split('/')
            .map(|s| match s {
                "*" => Segment::Wildcard,
                lit => Segment::Literal(lit),
            })
            .collect();
        self.templates.push(Template { segments, tag });
    }

    /// Classify a uri. `None` is a routing failure the boundary must
    /// surface as an unsupported-resource error.
    pub fn match_uri(&self, uri: &ResourceUri) -> Option<ResourceMatch> {
        self.templates
            .iter()
            .find_map(|template| {
                let captured = template.captures(uri.segments())?;
                build_match(template.tag, &captured)
            })
    }
}

impl Default for UriMatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn build_match(tag: Tag, captured: &[&str]) -> Option<ResourceMatch> {
    match tag {
        Tag::Ohmlets => Some(ResourceMatch::Ohmlets),
        Tag::OhmletId => Some(ResourceMatch::OhmletId {
            id: captured.first()?.to_string(),
        }),
        Tag::Surveys => Some(ResourceMatch::Surveys),
        Tag::SurveyId => {
            let id = captured.first()?.to_string();
            // A malformed version segment fails the match rather than the
            // parse, so the caller sees a routing failure.
            let version = match captured.get(1) {
                Some(raw) => Some(raw.parse().ok()?),
                None => None,
            };
            Some(ResourceMatch::SurveyId { id, version })
        }
        Tag::Streams => Some(ResourceMatch::Streams),
        Tag::StreamId => Some(ResourceMatch::StreamId {
            id: captured.first()?.to_string(),
            version: captured.get(1)?.parse().ok()?,
        }),
        Tag::Reminders => Some(ResourceMatch::Reminders),
    }
}
