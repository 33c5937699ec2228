//! Commit object
//!
//! Commits record a tree snapshot, the commit it follows, who made it and why.
//!
//! ## Format
//!
//! ```text
//! commit <size>\0
//! tree <tree-sha>
//! parent <parent-sha>        (absent for a root commit)
//! author <name> <email> <timestamp> <timezone>
//! committer <name> <email> <timestamp> <timezone>
//!
//! <commit message>
//! ```

use crate::artifacts::objects::object::{Object, Packable, Unpackable, envelope};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::RepositoryError;
use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset, TimeZone};
use std::io::BufRead;

pub const AUTHOR_NAME_VAR: &str = "GIT_AUTHOR_NAME";
pub const AUTHOR_EMAIL_VAR: &str = "GIT_AUTHOR_EMAIL";
pub const AUTHOR_DATE_VAR: &str = "GIT_AUTHOR_DATE";

/// Author or committer: name, email and a timestamp with its original offset.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Author {
    name: String,
    email: String,
    timestamp: DateTime<FixedOffset>,
}

impl Author {
    pub fn new(name: String, email: String, timestamp: DateTime<FixedOffset>) -> Self {
        Author {
            name,
            email,
            timestamp,
        }
    }

    /// Read the identity from `GIT_AUTHOR_NAME`/`GIT_AUTHOR_EMAIL`; `GIT_AUTHOR_DATE` is
    /// optional (RFC 2822 or `%Y-%m-%d %H:%M:%S %z`) and defaults to now.
    pub fn load_from_env() -> anyhow::Result<Self> {
        let name = std::env::var(AUTHOR_NAME_VAR).with_context(|| format!("{AUTHOR_NAME_VAR} not set"))?;
        let email =
            std::env::var(AUTHOR_EMAIL_VAR).with_context(|| format!("{AUTHOR_EMAIL_VAR} not set"))?;

        let timestamp = match std::env::var(AUTHOR_DATE_VAR) {
            Ok(date) => DateTime::parse_from_rfc2822(&date)
                .or_else(|_| DateTime::parse_from_str(&date, "%Y-%m-%d %H:%M:%S %z"))
                .with_context(|| format!("Invalid {AUTHOR_DATE_VAR}: {date}"))?,
            Err(_) => chrono::Local::now().fixed_offset(),
        };

        Ok(Author::new(name, email, timestamp))
    }

    /// `Name <email> <unix-seconds> <+hhmm>`
    pub fn display(&self) -> String {
        format!(
            "{} <{}> {} {}",
            self.name,
            self.email,
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    pub fn short_date(&self) -> String {
        self.timestamp.format("%Y-%m-%d").to_string()
    }
}

fn parse_offset(offset: &str) -> Option<FixedOffset> {
    let (sign, digits) = match offset.split_at_checked(1)? {
        ("+", digits) => (1, digits),
        ("-", digits) => (-1, digits),
        _ => return None,
    };
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

impl TryFrom<&str> for Author {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let invalid = || RepositoryError::MalformedObject(format!("invalid author line '{value}'"));

        let mut parts = value.rsplitn(3, ' ');
        let offset = parts.next().and_then(parse_offset).ok_or_else(invalid)?;
        let seconds = parts
            .next()
            .and_then(|seconds| seconds.parse::<i64>().ok())
            .ok_or_else(invalid)?;
        let identity = parts.next().ok_or_else(invalid)?;

        let (name, email) = identity
            .strip_suffix('>')
            .and_then(|identity| identity.rsplit_once('<'))
            .ok_or_else(invalid)?;
        let timestamp = offset
            .timestamp_opt(seconds, 0)
            .single()
            .ok_or_else(invalid)?;

        Ok(Author::new(
            name.trim_end().to_string(),
            email.to_string(),
            timestamp,
        ))
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    parent: Option<ObjectId>,
    tree_oid: ObjectId,
    author: Author,
    committer: Author,
    message: String,
}

impl Commit {
    /// A commit whose committer is its author.
    pub fn new(parent: Option<ObjectId>, tree_oid: ObjectId, author: Author, message: String) -> Self {
        Commit {
            parent,
            tree_oid,
            committer: author.clone(),
            author,
            message,
        }
    }

    /// First line of the message.
    pub fn title(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parent.as_ref()
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn committer(&self) -> &Author {
        &self.committer
    }

    fn payload(&self) -> String {
        let mut headers = vec![format!("tree {}", self.tree_oid)];
        if let Some(parent) = &self.parent {
            headers.push(format!("parent {parent}"));
        }
        headers.push(format!("author {}", self.author.display()));
        headers.push(format!("committer {}", self.committer.display()));

        format!("{}\n\n{}", headers.join("\n"), self.message)
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        Ok(envelope(ObjectType::Commit, self.payload().as_bytes()))
    }
}

impl Unpackable for Commit {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut content = String::new();
        reader
            .read_to_string(&mut content)
            .map_err(|_| RepositoryError::MalformedObject("commit is not UTF-8".into()))?;

        let (headers, message) = content
            .split_once("\n\n")
            .ok_or_else(|| RepositoryError::MalformedObject("commit has no message separator".into()))?;

        let mut tree_oid = None;
        let mut parent = None;
        let mut author = None;
        let mut committer = None;
        for line in headers.lines() {
            let (key, value) = line.split_once(' ').unwrap_or((line, ""));
            match key {
                "tree" => tree_oid = Some(ObjectId::try_parse(value.to_string())?),
                "parent" => parent = Some(ObjectId::try_parse(value.to_string())?),
                "author" => author = Some(Author::try_from(value)?),
                "committer" => committer = Some(Author::try_from(value)?),
                _ => {}
            }
        }

        let missing = |field: &str| RepositoryError::MalformedObject(format!("commit has no {field}"));
        let author = author.ok_or_else(|| missing("author"))?;

        Ok(Commit {
            parent,
            tree_oid: tree_oid.ok_or_else(|| missing("tree"))?,
            committer: committer.unwrap_or_else(|| author.clone()),
            author,
            message: message.to_string(),
        })
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn display(&self) -> String {
        self.payload()
    }
}
