//! Front-matter parsing and validation

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, Offset,
    TimeZone,
};
use chrono_tz::Tz;
use serde::Deserialize;
use serde_yaml::Value;
use std::collections::HashMap;
use std::path::Path;

use super::{ContentKind, ContentRecord};
use crate::error::ValidationError;

const DELIMITER: &str = "---";

/// A content file split into its metadata block and body
#[derive(Debug, Clone, Copy)]
pub struct RawContentFile<'a> {
    pub path: &'a Path,
    pub metadata: &'a str,
    pub body: &'a str,
}

impl<'a> RawContentFile<'a> {
    /// Split file text at the `---` delimiters
    pub fn split(path: &'a Path, text: &'a str) -> Result<Self, ValidationError> {
        let text = text.trim_start_matches('\u{feff}').trim_start();
        let rest = text
            .strip_prefix(DELIMITER)
            .ok_or(ValidationError::MissingFrontMatter)?;

        // The opening line must hold nothing but the delimiter
        let (opening, rest) = match rest.find('\n') {
            Some(pos) => (&rest[..pos], &rest[pos + 1..]),
            None => (rest, ""),
        };
        if !opening.trim().is_empty() {
            return Err(ValidationError::MissingFrontMatter);
        }

        let mut offset = 0;
        for line in rest.split_inclusive('\n') {
            if line.trim_end() == DELIMITER {
                let body = &rest[offset + line.len()..];
                return Ok(Self {
                    path,
                    metadata: &rest[..offset],
                    body: body.trim_start_matches(['\n', '\r']),
                });
            }
            offset += line.len();
        }

        Err(ValidationError::UnterminatedFrontMatter)
    }

    /// Parse and validate the metadata block into a record
    pub fn record(
        &self,
        slug: &str,
        kind: ContentKind,
        tz: Tz,
    ) -> Result<ContentRecord, ValidationError> {
        FrontMatter::parse(self.metadata)?.validate(slug, kind, tz)
    }
}

/// Front-matter as written in the file, before validation
///
/// Known keys stay untyped so that a value of the wrong shape is reported
/// against its field instead of as a YAML error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<Value>,
    pub date: Option<Value>,
    pub description: Option<Value>,
    pub cover: Option<Value>,

    /// Keys outside the schema, ignored
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl FrontMatter {
    /// Parse a YAML metadata block
    pub fn parse(block: &str) -> Result<Self, ValidationError> {
        if block.trim().is_empty() {
            return Ok(FrontMatter::default());
        }
        serde_yaml::from_str(block).map_err(|e| ValidationError::Yaml(e.to_string()))
    }

    /// Check the schema and build a record for `slug`
    pub fn validate(
        self,
        slug: &str,
        kind: ContentKind,
        tz: Tz,
    ) -> Result<ContentRecord, ValidationError> {
        let title = optional_string("title", self.title)?
            .ok_or(ValidationError::MissingField("title"))?;

        let date = match self.date {
            None | Some(Value::Null) => return Err(ValidationError::MissingField("date")),
            Some(Value::String(s)) => parse_date(&s, tz).ok_or_else(|| {
                ValidationError::invalid("date", format!("`{}` is not a recognizable timestamp", s))
            })?,
            Some(other) => {
                return Err(ValidationError::invalid(
                    "date",
                    format!("must be a timestamp string, found {}", describe(&other)),
                ))
            }
        };

        let description = optional_string("description", self.description)?;

        let cover = optional_string("cover", self.cover)?;
        if let Some(cover) = &cover {
            check_cover(cover)?;
        }

        Ok(ContentRecord {
            slug: slug.to_string(),
            title,
            date,
            description,
            cover,
            kind,
        })
    }
}

/// Blank strings count as absent
fn optional_string(
    field: &'static str,
    value: Option<Value>,
) -> Result<Option<String>, ValidationError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
        Some(other) => Err(ValidationError::invalid(
            field,
            format!("must be a string, found {}", describe(&other)),
        )),
    }
}

fn check_cover(cover: &str) -> Result<(), ValidationError> {
    if cover.starts_with('/') && !cover.starts_with("//") {
        return Ok(());
    }
    match url::Url::parse(cover) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => Err(ValidationError::invalid(
            "cover",
            format!("`{}` is not an http(s) URL or a site-rooted path", cover),
        )),
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// Parse a front-matter timestamp
///
/// Values without an offset are read as local time in `tz`. Years outside
/// 0..=9999 are rejected since RFC 2822 cannot represent them.
pub fn parse_date(s: &str, tz: Tz) -> Option<DateTime<FixedOffset>> {
    parse_any_date(s.trim(), tz).filter(|dt| (0..=9999).contains(&dt.year()))
}

fn parse_any_date(s: &str, tz: Tz) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt);
    }

    let with_offset = [
        "%Y-%m-%d %H:%M:%S%z",
        "%Y-%m-%d %H:%M:%S%:z",
        "%Y-%m-%d %H:%M:%S %z",
        "%Y-%m-%d %H:%M:%S%.f%z",
        "%Y-%m-%d %H:%M:%S%.f%:z",
        "%Y-%m-%dT%H:%M:%S%z",
        "%Y-%m-%d %H:%M%z",
        "%Y-%m-%d %H:%M%:z",
        "%Y-%m-%dT%H:%M%z",
        "%Y-%m-%dT%H:%M%:z",
        "%Y/%m/%d %H:%M:%S %z",
    ];
    for fmt in with_offset {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    let naive = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
    ];
    for fmt in naive {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return localize(dt, tz);
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return localize(d.and_hms_opt(0, 0, 0)?, tz);
        }
    }

    None
}

fn localize(dt: NaiveDateTime, tz: Tz) -> Option<DateTime<FixedOffset>> {
    match tz.from_local_datetime(&dt) {
        LocalResult::Single(local) | LocalResult::Ambiguous(local, _) => {
            Some(local.fixed_offset())
        }
        LocalResult::None => {
            // Wall time skipped by a DST jump: read it with the offset in
            // effect before the jump, which lands it after the gap
            let before = tz.offset_from_utc_datetime(&(dt - Duration::days(1))).fix();
            before
                .from_local_datetime(&dt)
                .single()
                .map(|fixed| fixed.with_timezone(&tz).fixed_offset())
        }
    }
}
