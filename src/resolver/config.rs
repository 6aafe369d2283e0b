use std::net::Ipv4Addr;
use std::time::Duration;

/// a.root-servers.net through m.root-servers.net, tried in this order.
pub const ROOT_SERVERS: [Ipv4Addr; 13] = [
    Ipv4Addr::new(198, 41, 0, 4),
    Ipv4Addr::new(199, 9, 14, 201),
    Ipv4Addr::new(192, 33, 4, 12),
    Ipv4Addr::new(199, 7, 91, 13),
    Ipv4Addr::new(192, 203, 230, 10),
    Ipv4Addr::new(192, 5, 5, 241),
    Ipv4Addr::new(192, 112, 36, 4),
    Ipv4Addr::new(198, 97, 190, 53),
    Ipv4Addr::new(192, 36, 148, 17),
    Ipv4Addr::new(192, 58, 128, 30),
    Ipv4Addr::new(193, 0, 14, 129),
    Ipv4Addr::new(199, 7, 83, 42),
    Ipv4Addr::new(202, 12, 27, 33),
];

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);
pub const DEFAULT_MAX_DEPTH: usize = 16;
pub const DEFAULT_MAX_REFERRALS: usize = 16;

/// What to do when the root server being tried does not answer at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RootFailurePolicy {
    /// Give up on the lookup and return an empty response.
    #[default]
    FailFast,
    /// Move on to the next root server.
    TryNextRoot,
}

#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub root_servers: Vec<Ipv4Addr>,
    /// Applied to every single exchange.
    pub timeout: Duration,
    /// How many lookups may nest below a top-level lookup, through CNAME
    /// targets and name server names. Zero still runs the top-level lookup.
    pub max_depth: usize,
    /// How many referrals one walk follows below the server it started at,
    /// so a walk sends at most `max_referrals + 1` queries down one path.
    pub max_referrals: usize,
    pub root_failure: RootFailurePolicy,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            root_servers: ROOT_SERVERS.to_vec(),
            timeout: DEFAULT_TIMEOUT,
            max_depth: DEFAULT_MAX_DEPTH,
            max_referrals: DEFAULT_MAX_REFERRALS,
            root_failure: RootFailurePolicy::default(),
        }
    }
}
