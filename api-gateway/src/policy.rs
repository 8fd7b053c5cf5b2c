//! Static path-prefix policy consulted for every proxied request.

use common_auth::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Secured,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePolicy {
    pub prefix: &'static str,
    pub visibility: Visibility,
    pub required_role: Option<Role>,
}

impl RoutePolicy {
    pub const fn public(prefix: &'static str) -> Self {
        Self {
            prefix,
            visibility: Visibility::Public,
            required_role: None,
        }
    }

    pub const fn secured(prefix: &'static str, required_role: Option<Role>) -> Self {
        Self {
            prefix,
            visibility: Visibility::Secured,
            required_role,
        }
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }
}

/// Applies to any path no entry matches: token required, no role.
const FALLBACK: RoutePolicy = RoutePolicy::secured("", None);

/// Ordered table; the first entry whose prefix matches wins.
#[derive(Debug, Clone)]
pub struct RoutePolicyTable {
    entries: Vec<RoutePolicy>,
}

impl RoutePolicyTable {
    pub fn new(entries: Vec<RoutePolicy>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[RoutePolicy] {
        &self.entries
    }

    pub fn classify(&self, path: &str) -> &RoutePolicy {
        self.entries
            .iter()
            .find(|entry| path.starts_with(entry.prefix))
            .unwrap_or(&FALLBACK)
    }
}

/// True when `path` has no empty or dot segments, so prefix matching here
/// and segment routing in the proxy read it the same way. A single
/// trailing slash is allowed.
pub fn is_canonical(path: &str) -> bool {
    let Some(rest) = path.strip_prefix('/') else {
        return false;
    };
    let segments: Vec<&str> = rest.split('/').collect();
    let last = segments.len() - 1;
    segments.iter().enumerate().all(|(i, segment)| {
        if segment.is_empty() {
            return i == last;
        }
        let lowered = segment.to_ascii_lowercase().replace("%2e", ".");
        lowered != "." && lowered != ".."
    })
}

impl Default for RoutePolicyTable {
    fn default() -> Self {
        Self::new(vec![
            RoutePolicy::public("/users/register"),
            RoutePolicy::public("/users/login"),
            RoutePolicy::secured("/clients/", Some(Role::Client)),
            RoutePolicy::secured("/freelancers/", Some(Role::Freelancer)),
            RoutePolicy::secured("/projects/getProject/", Some(Role::Freelancer)),
            RoutePolicy::secured("/quiz/create", Some(Role::Teacher)),
        ])
    }
}
