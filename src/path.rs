use crate::parser::{ParseError, Parser};
use crate::value::Value;
use itertools::Itertools;
use serde_json::Value as Json;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Key(String), // object member, or array index when all digits
    Wildcard,    // #
}

/// A parsed dotted path such as `friends.#.name`.
///
/// A path that fails to parse is still a `Path`: it remembers its source
/// text and resolves to [`Resolved::Absent`] against every document, so a
/// rule carrying it fails closed instead of failing to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    raw: String,
    segments: Option<Vec<Segment>>,
}

/// Outcome of resolving a path against a document.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    /// Some segment did not exist.
    Absent,
    /// The path addressed one location.
    One(Value),
    /// The path fanned out over an array. Members are never `Absent`; a
    /// member is itself `Many` when a later wildcard fanned out again.
    Many(Vec<Resolved>),
}

impl Resolved {
    pub fn is_absent(&self) -> bool {
        matches!(self, Resolved::Absent)
    }
}

impl Path {
    /// Parse `raw`, keeping it even when it is malformed.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let segments = match parse_path(&raw) {
            Ok(segments) => Some(segments),
            Err(e) => {
                tracing::debug!(path = %raw, error = ?e, "unparseable path never resolves");
                None
            }
        };
        Self { raw, segments }
    }

    /// Parse `raw`, rejecting malformed input.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let segments = parse_path(raw)?;
        Ok(Self {
            raw: raw.to_string(),
            segments: Some(segments),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> Option<&[Segment]> {
        self.segments.as_deref()
    }

    pub fn has_wildcard(&self) -> bool {
        self.segments()
            .map(|s| s.contains(&Segment::Wildcard))
            .unwrap_or(false)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.segments {
            Some(segments) => write!(f, "{}", segments.iter().map(escape_segment).join(".")),
            None => f.write_str(&self.raw),
        }
    }
}

fn escape_segment(seg: &Segment) -> String {
    match seg {
        Segment::Wildcard => "#".to_string(),
        Segment::Key(k) if k == "#" => r"\#".to_string(),
        Segment::Key(k) => k
            .chars()
            .flat_map(|c| match c {
                '.' | '\\' => vec!['\\', c],
                _ => vec![c],
            })
            .collect(),
    }
}

fn parse_path(input: &str) -> Result<Vec<Segment>, ParseError> {
    let mut p = Parser::new(input);
    let mut segments = Vec::new();
    if p.eof() {
        return Err(ParseError::InvalidSyntax("empty path".into()));
    }
    loop {
        let (text, escaped) = p.parse_segment()?;
        if text == "#" && !escaped {
            segments.push(Segment::Wildcard);
        } else {
            segments.push(Segment::Key(text));
        }
        if p.eof() {
            break;
        }
        p.expect('.')?;
        if p.eof() {
            return Err(ParseError::InvalidSyntax("trailing '.'".into()));
        }
    }
    Ok(segments)
}

/// Resolve `path` against `document`.
///
/// A wildcard produces [`Resolved::Many`], unless no element of a non-empty
/// array has the rest of the path, which is `Absent`. Scalar elements stand
/// for themselves whatever follows the wildcard. Without a wildcard, a path
/// ending on an array also produces `Many`, one member per element. Arrays
/// reached below a wildcard stay whole values.
pub fn resolve(document: &Json, path: &Path) -> Resolved {
    let Some(segments) = path.segments() else {
        return Resolved::Absent;
    };
    match walk(document, segments) {
        Resolved::One(Value::Array(items)) => {
            Resolved::Many(items.into_iter().map(Resolved::One).collect())
        }
        other => other,
    }
}

fn walk(node: &Json, segments: &[Segment]) -> Resolved {
    let Some((head, rest)) = segments.split_first() else {
        return Resolved::One(Value::from(node));
    };
    match head {
        Segment::Key(k) => child(node, k).map_or(Resolved::Absent, |c| walk(c, rest)),
        Segment::Wildcard => match node {
            Json::Array(items) => {
                let members: Vec<Resolved> = items
                    .iter()
                    .map(|item| match item {
                        // Fields below a wildcard are identity on scalars.
                        Json::Object(_) | Json::Array(_) => walk(item, rest),
                        scalar => Resolved::One(Value::from(scalar)),
                    })
                    .filter(|r| !r.is_absent())
                    .collect();
                if members.is_empty() && !items.is_empty() {
                    Resolved::Absent
                } else {
                    Resolved::Many(members)
                }
            }
            _ => Resolved::Absent,
        },
    }
}

fn child<'a>(node: &'a Json, key: &str) -> Option<&'a Json> {
    match node {
        Json::Object(map) => map.get(key),
        Json::Array(items) if !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit()) => {
            key.parse::<usize>().ok().and_then(|i| items.get(i))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn doc() -> Json {
        json!({
            "name": {"first": "anakin"},
            "age": 22,
            "children": ["luke", "leia"],
            "friends": [
                {"first": "r2d2", "episodes": [1, 2, 3]},
                {"first": "ben", "episodes": [4]},
                {"nickname": "jar jar"}
            ],
            "a.b": true,
            "#": "hash"
        })
    }

    fn one(v: impl Into<Value>) -> Resolved {
        Resolved::One(v.into())
    }

    #[test]
    fn resolves_nested_key() {
        assert_eq!(resolve(&doc(), &Path::new("name.first")), one("anakin"));
        assert_eq!(resolve(&doc(), &Path::new("age")), one(22_i64));
    }

    #[test]
    fn missing_segments_are_absent() {
        assert!(resolve(&doc(), &Path::new("name.middle")).is_absent());
        assert!(resolve(&doc(), &Path::new("age.years")).is_absent());
        assert!(resolve(&doc(), &Path::new("age.#")).is_absent());
    }

    #[test]
    fn plain_array_becomes_a_sequence() {
        assert_eq!(
            resolve(&doc(), &Path::new("children")),
            Resolved::Many(vec![one("luke"), one("leia")])
        );
    }

    #[test]
    fn numeric_segment_indexes_arrays() {
        assert_eq!(resolve(&doc(), &Path::new("children.1")), one("leia"));
        assert!(resolve(&doc(), &Path::new("children.9")).is_absent());
    }

    #[test]
    fn wildcard_maps_field_and_skips_missing() {
        assert_eq!(
            resolve(&doc(), &Path::new("friends.#.first")),
            Resolved::Many(vec![one("r2d2"), one("ben")])
        );
    }

    #[test]
    fn fields_below_a_wildcard_are_identity_on_scalars() {
        assert_eq!(
            resolve(&doc(), &Path::new("children.#.name")),
            Resolved::Many(vec![one("luke"), one("leia")])
        );
    }

    #[test]
    fn wildcard_with_no_matching_member_is_absent() {
        assert!(resolve(&doc(), &Path::new("friends.#.middle")).is_absent());
        assert_eq!(
            resolve(&json!({"tags": []}), &Path::new("tags.#.name")),
            Resolved::Many(vec![])
        );
    }

    #[test]
    fn arrays_below_a_wildcard_stay_whole() {
        let got = resolve(&doc(), &Path::new("friends.#.episodes"));
        let expected = Resolved::Many(vec![
            Resolved::One(Value::from(json!([1, 2, 3]))),
            Resolved::One(Value::from(json!([4]))),
        ]);
        assert_eq!(got, expected);
    }

    #[test]
    fn nested_wildcards_nest_sequences() {
        let got = resolve(&doc(), &Path::new("friends.#.episodes.#"));
        let expected = Resolved::Many(vec![
            Resolved::Many(vec![one(1_i64), one(2_i64), one(3_i64)]),
            Resolved::Many(vec![one(4_i64)]),
        ]);
        assert_eq!(got, expected);
    }

    #[test]
    fn escaped_keys() {
        assert_eq!(resolve(&doc(), &Path::new(r"a\.b")), one(true));
        assert_eq!(resolve(&doc(), &Path::new(r"\#")), one("hash"));
    }

    #[test]
    fn malformed_paths_never_resolve() {
        for raw in ["", "a..b", "a.", ".a", "a\\"] {
            assert!(Path::parse(raw).is_err(), "{raw:?} should not parse");
            assert!(resolve(&doc(), &Path::new(raw)).is_absent());
        }
    }

    #[test]
    fn display_round_trips_escapes() {
        let p = Path::parse(r"a\.b.#.\#").unwrap();
        assert_eq!(p.to_string(), r"a\.b.#.\#");
        assert!(p.has_wildcard());
    }
}
