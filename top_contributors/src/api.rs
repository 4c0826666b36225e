use std::str::FromStr;

use async_trait::async_trait;
use derive_more::Constructor;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};
use thiserror::Error;

/// Largest page the upstream search API serves.
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Error, Debug)]
pub enum Error {
    #[error("count parameter not valid: {0} (expected 50, 100 or 150)")]
    InvalidCount(u32),
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("missing parameter: {0}")]
    MissingParameter(&'static str),
    #[error("upstream responded with HTTP {0}")]
    UpstreamStatus(u16),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// True for errors raised before any upstream call was made.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::InvalidCount(_) | Error::InvalidParameter(_) | Error::MissingParameter(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Externally visible contributor.
#[derive(Debug, Clone, PartialEq, Eq, Constructor)]
pub struct Contributor {
    pub id: i64,
    pub username: String,
}

/// User record as the upstream platform names it.
#[derive(Debug, Clone, PartialEq, Eq, Constructor)]
pub struct UpstreamUser {
    pub id: i64,
    pub login: String,
}

impl From<UpstreamUser> for Contributor {
    fn from(user: UpstreamUser) -> Self {
        Contributor {
            id: user.id,
            username: user.login,
        }
    }
}

/// One decoded page of a user search.
#[derive(Debug, Clone, PartialEq, Eq, Constructor)]
pub struct SearchEnvelope {
    pub total_count: u64,
    pub incomplete: bool,
    pub items: Vec<UpstreamUser>,
}

impl SearchEnvelope {
    pub fn into_contributors(self) -> impl Iterator<Item = Contributor> {
        self.items.into_iter().map(Contributor::from)
    }
}

/// Number of contributors a caller may ask for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumIter)]
pub enum CountTier {
    #[default]
    #[strum(serialize = "50")]
    Fifty = 50,
    #[strum(serialize = "100")]
    Hundred = 100,
    #[strum(serialize = "150")]
    HundredFifty = 150,
}

impl CountTier {
    pub fn count(self) -> u32 {
        self as u32
    }

    /// Size of the first upstream page for this tier.
    pub fn page_limit(self) -> u32 {
        std::cmp::min(self.count(), MAX_PAGE_SIZE)
    }
}

impl TryFrom<u32> for CountTier {
    type Error = Error;

    fn try_from(count: u32) -> Result<Self> {
        CountTier::iter()
            .find(|tier| tier.count() == count)
            .ok_or(Error::InvalidCount(count))
    }
}

impl FromStr for CountTier {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let count = value
            .trim()
            .parse::<u32>()
            .map_err(|err| Error::InvalidParameter(format!("count '{}': {}", value, err)))?;
        CountTier::try_from(count)
    }
}

/// Narrow view of the upstream user search.
#[async_trait]
pub trait Client: Send + Sync {
    async fn search_users(&self, location: &str, per_page: u32, page: u32) -> Result<SearchEnvelope>;
}

#[test]
fn tier_from_count_test() {
    assert_eq!(CountTier::try_from(50).unwrap(), CountTier::Fifty);
    assert_eq!(CountTier::try_from(100).unwrap(), CountTier::Hundred);
    assert_eq!(CountTier::try_from(150).unwrap(), CountTier::HundredFifty);
    for count in [0, 1, 49, 51, 99, 101, 149, 151, 200, 333] {
        assert!(matches!(CountTier::try_from(count), Err(Error::InvalidCount(c)) if c == count));
    }
}

#[test]
fn tier_from_str_test() {
    assert_eq!("150".parse::<CountTier>().unwrap(), CountTier::HundredFifty);
    assert_eq!(CountTier::HundredFifty.to_string(), "150");
    let err = "fifty".parse::<CountTier>().unwrap_err();
    assert!(matches!(err, Error::InvalidParameter(_)));
    assert!(err.is_validation());
    assert!(matches!("333".parse::<CountTier>(), Err(Error::InvalidCount(333))));
}

#[test]
fn tier_page_limit_test() {
    assert_eq!(CountTier::Fifty.page_limit(), 50);
    assert_eq!(CountTier::Hundred.page_limit(), 100);
    assert_eq!(CountTier::HundredFifty.page_limit(), 100);
}

#[test]
fn upstream_user_mapping_test() {
    let contributor = Contributor::from(UpstreamUser::new(7, "alice".to_string()));
    assert_eq!(contributor, Contributor::new(7, "alice".to_string()));
}

#[test]
fn upstream_status_is_not_validation_test() {
    assert!(!Error::UpstreamStatus(502).is_validation());
    assert!(Error::MissingParameter("location").is_validation());
}
