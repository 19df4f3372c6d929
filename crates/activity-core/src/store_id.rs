use std::fmt;
use std::str::FromStr;

/// A logical, slash-delimited store identifier.
///
/// Parsing is exhaustive: every variant below is the only way a string
/// is accepted, and `to_string()` always round-trips back to the same
/// string a given variant was parsed from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StoreId {
    /// `raw/<platform>/<account>` — legacy unified raw store.
    Raw { platform: String, account: String },
    /// `timeline/<user>`
    Timeline { user: String },
    /// `github/<account>/meta`
    GithubMeta { account: String },
    /// `github/<account>/commits/<owner>/<repo>`
    GithubCommits {
        account: String,
        owner: String,
        repo: String,
    },
    /// `github/<account>/prs/<owner>/<repo>`
    GithubPrs {
        account: String,
        owner: String,
        repo: String,
    },
    /// `reddit/<account>/meta`
    RedditMeta { account: String },
    /// `reddit/<account>/posts`
    RedditPosts { account: String },
    /// `reddit/<account>/comments`
    RedditComments { account: String },
    /// `twitter/<account>/meta`
    TwitterMeta { account: String },
    /// `twitter/<account>/tweets`
    TwitterTweets { account: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreIdParseError(pub String);

impl fmt::Display for StoreIdParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not a valid store id: {}", self.0)
    }
}

impl std::error::Error for StoreIdParseError {}

impl StoreId {
    pub fn parse(s: &str) -> Result<Self, StoreIdParseError> {
        let parts: Vec<&str> = s.split('/').collect();
        let bad = || StoreIdParseError(s.to_string());

        match parts.as_slice() {
            ["raw", platform, account] if !platform.is_empty() && !account.is_empty() => {
                Ok(StoreId::Raw {
                    platform: platform.to_string(),
                    account: account.to_string(),
                })
            }
            ["timeline", user] if !user.is_empty() => Ok(StoreId::Timeline {
                user: user.to_string(),
            }),
            ["github", account, "meta"] if !account.is_empty() => Ok(StoreId::GithubMeta {
                account: account.to_string(),
            }),
            ["github", account, "commits", owner, repo]
                if !account.is_empty() && !owner.is_empty() && !repo.is_empty() =>
            {
                Ok(StoreId::GithubCommits {
                    account: account.to_string(),
                    owner: owner.to_string(),
                    repo: repo.to_string(),
                })
            }
            ["github", account, "prs", owner, repo]
                if !account.is_empty() && !owner.is_empty() && !repo.is_empty() =>
            {
                Ok(StoreId::GithubPrs {
                    account: account.to_string(),
                    owner: owner.to_string(),
                    repo: repo.to_string(),
                })
            }
            ["reddit", account, "meta"] if !account.is_empty() => Ok(StoreId::RedditMeta {
                account: account.to_string(),
            }),
            ["reddit", account, "posts"] if !account.is_empty() => Ok(StoreId::RedditPosts {
                account: account.to_string(),
            }),
            ["reddit", account, "comments"] if !account.is_empty() => {
                Ok(StoreId::RedditComments {
                    account: account.to_string(),
                })
            }
            ["twitter", account, "meta"] if !account.is_empty() => Ok(StoreId::TwitterMeta {
                account: account.to_string(),
            }),
            ["twitter", account, "tweets"] if !account.is_empty() => Ok(StoreId::TwitterTweets {
                account: account.to_string(),
            }),
            _ => Err(bad()),
        }
    }

    /// The store's account, for store ids that are account-scoped.
    pub fn account(&self) -> Option<&str> {
        match self {
            StoreId::Raw { account, .. } => Some(account),
            StoreId::Timeline { .. } => None,
            StoreId::GithubMeta { account }
            | StoreId::GithubCommits { account, .. }
            | StoreId::GithubPrs { account, .. }
            | StoreId::RedditMeta { account }
            | StoreId::RedditPosts { account }
            | StoreId::RedditComments { account }
            | StoreId::TwitterMeta { account }
            | StoreId::TwitterTweets { account } => Some(account),
        }
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreId::Raw { platform, account } => write!(f, "raw/{platform}/{account}"),
            StoreId::Timeline { user } => write!(f, "timeline/{user}"),
            StoreId::GithubMeta { account } => write!(f, "github/{account}/meta"),
            StoreId::GithubCommits {
                account,
                owner,
                repo,
            } => write!(f, "github/{account}/commits/{owner}/{repo}"),
            StoreId::GithubPrs {
                account,
                owner,
                repo,
            } => write!(f, "github/{account}/prs/{owner}/{repo}"),
            StoreId::RedditMeta { account } => write!(f, "reddit/{account}/meta"),
            StoreId::RedditPosts { account } => write!(f, "reddit/{account}/posts"),
            StoreId::RedditComments { account } => write!(f, "reddit/{account}/comments"),
            StoreId::TwitterMeta { account } => write!(f, "twitter/{account}/meta"),
            StoreId::TwitterTweets { account } => write!(f, "twitter/{account}/tweets"),
        }
    }
}

impl FromStr for StoreId {
    type Err = StoreIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StoreId::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_shape() {
        let ids = [
            "raw/github/acct-1",
            "timeline/user-alice",
            "github/acct-1/meta",
            "github/acct-1/commits/alice/work-project",
            "github/acct-1/prs/alice/work-project",
            "reddit/acct-2/meta",
            "reddit/acct-2/posts",
            "reddit/acct-2/comments",
            "twitter/acct-3/meta",
            "twitter/acct-3/tweets",
        ];
        for id in ids {
            let parsed = StoreId::parse(id).unwrap();
            assert_eq!(parsed.to_string(), id);
        }
    }

    #[test]
    fn rejects_unknown_shapes() {
        for bad in [
            "github/acct-1",
            "github/acct-1/commits/onlyowner",
            "reddit/acct-1/unknown",
            "",
            "bluesky/acct-1/meta",
        ] {
            assert!(StoreId::parse(bad).is_err(), "expected {bad} to be rejected");
        }
    }

    #[test]
    fn account_extraction() {
        assert_eq!(
            StoreId::parse("github/acct-1/meta").unwrap().account(),
            Some("acct-1")
        );
        assert_eq!(StoreId::parse("timeline/user-1").unwrap().account(), None);
    }
}
