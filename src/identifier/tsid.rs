//! TSID and GTID value types
//!
//! - `Tsid` names a sequence-number space: (UUID, Tag)
//! - `Gtid` names one transaction: (Tsid, Gno)
//!
//! Both have a canonical text form: `uuid`, `uuid:tag`, and
//! `uuid[:tag]:gno` respectively. UUIDs print in lowercase 8-4-4-4-12 form.

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use super::errors::{IdentifierError, IdentifierResult};
use super::gno::{check_gno, Gno};
use super::tag::Tag;

/// Parse a UUID, mapping failures to an identifier error.
pub fn parse_uuid(text: &str) -> IdentifierResult<Uuid> {
    Uuid::parse_str(text.trim()).map_err(|_| IdentifierError::MalformedUuid(text.to_string()))
}

/// Tagged source identifier.
///
/// Ordered by raw UUID bytes, then by tag.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Tsid {
    uuid: Uuid,
    tag: Tag,
}

impl Tsid {
    pub fn new(uuid: Uuid, tag: Tag) -> Self {
        Self { uuid, tag }
    }

    /// TSID with the empty tag.
    pub fn untagged(uuid: Uuid) -> Self {
        Self {
            uuid,
            tag: Tag::empty(),
        }
    }

    pub fn uuid(&self) -> &Uuid {
        &self.uuid
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }
}

impl fmt::Display for Tsid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uuid.hyphenated())?;
        if !self.tag.is_empty() {
            write!(f, ":{}", self.tag)?;
        }
        Ok(())
    }
}

impl FromStr for Tsid {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (uuid_text, tag_text) = match s.split_once(':') {
            Some((uuid, tag)) => (uuid, tag.trim()),
            None => (s, ""),
        };
        Ok(Self::new(parse_uuid(uuid_text)?, Tag::new(tag_text)?))
    }
}

/// Globally unique transaction identifier.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Gtid {
    tsid: Tsid,
    gno: Gno,
}

impl Gtid {
    /// Create a GTID, validating the gno range.
    pub fn new(tsid: Tsid, gno: Gno) -> IdentifierResult<Self> {
        check_gno(gno)?;
        Ok(Self { tsid, gno })
    }

    pub fn tsid(&self) -> &Tsid {
        &self.tsid
    }

    pub fn gno(&self) -> Gno {
        self.gno
    }
}

impl fmt::Display for Gtid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tsid, self.gno)
    }
}

impl FromStr for Gtid {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (tsid_text, gno_text) = s
            .trim()
            .rsplit_once(':')
            .ok_or_else(|| IdentifierError::malformed_text(s, "expected 'uuid[:tag]:gno'"))?;
        let gno: Gno = gno_text
            .trim()
            .parse()
            .map_err(|_| IdentifierError::malformed_text(gno_text, "expected a gno"))?;
        Self::new(tsid_text.parse()?, gno)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UUID_A: &str = "aaaaaaaa-aaaa-aaaa-aaaa-aaaaaaaaaaaa";

    #[test]
    fn test_tsid_display_omits_empty_tag() {
        let tsid: Tsid = UUID_A.parse().unwrap();
        assert_eq!(tsid.to_string(), UUID_A);
        assert!(tsid.tag().is_empty());

        let tagged: Tsid = format!("{}:cc", UUID_A).parse().unwrap();
        assert_eq!(tagged.to_string(), format!("{}:cc", UUID_A));
    }

    #[test]
    fn test_tsid_uppercase_uuid_is_canonicalised() {
        let tsid: Tsid = UUID_A.to_uppercase().parse().unwrap();
        assert_eq!(tsid.to_string(), UUID_A);
    }

    #[test]
    fn test_tsid_rejects_bad_parts() {
        assert!(matches!(
            "not-a-uuid".parse::<Tsid>(),
            Err(IdentifierError::MalformedUuid(_))
        ));
        assert!(matches!(
            format!("{}:bad-tag", UUID_A).parse::<Tsid>(),
            Err(IdentifierError::MalformedTag(_))
        ));
    }

    #[test]
    fn test_tsid_order_is_uuid_then_tag() {
        let a: Tsid = "00000000-0000-0000-0000-000000000001:zz".parse().unwrap();
        let b: Tsid = "00000000-0000-0000-0000-000000000002".parse().unwrap();
        let c: Tsid = "00000000-0000-0000-0000-000000000002:aa".parse().unwrap();
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_gtid_parse_and_display() {
        let gtid: Gtid = format!("{}:cc:42", UUID_A).parse().unwrap();
        assert_eq!(gtid.gno(), 42);
        assert_eq!(gtid.tsid().tag().as_str(), "cc");
        assert_eq!(gtid.to_string(), format!("{}:cc:42", UUID_A));

        let untagged: Gtid = format!("{}:7", UUID_A).parse().unwrap();
        assert_eq!(untagged.to_string(), format!("{}:7", UUID_A));
    }

    #[test]
    fn test_gtid_rejects_out_of_range_gno() {
        assert_eq!(
            format!("{}:0", UUID_A).parse::<Gtid>(),
            Err(IdentifierError::GnoOutOfRange(0))
        );
        assert!(format!("{}:abc", UUID_A).parse::<Gtid>().is_err());
    }
}
