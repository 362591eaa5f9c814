/// Name of the cache generation this build of the worker owns. Bump it whenever
/// the asset set changes so the next activation throws the old one away
pub const CACHE_NAME: &str = "RE-cache-v1.0";

/// Path prefix the app shell lives under
pub const SCOPE: &str = "/";

/// App shell assets, relative to [`SCOPE`]
pub const ASSET_MANIFEST: [&str; 5] = [
    "",
    "index.html",
    "manifest.json",
    "icon-192.png",
    "icon-512.png",
];

pub const DEFAULT_NOTIFICATION_TITLE: &str = "FixFlow Notification";
pub const DEFAULT_NOTIFICATION_BODY: &str = "You have a new update.";
pub const NOTIFICATION_ICON: &str = "icon-192.png";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    pub cache_name: String,
    pub scope: String,
    /// Asset paths relative to the scope
    pub manifest: Vec<String>,
    pub default_title: String,
    pub default_body: String,
    /// Icon path relative to the scope, also used as the badge
    pub icon: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            cache_name: CACHE_NAME.to_string(),
            scope: SCOPE.to_string(),
            manifest: ASSET_MANIFEST.iter().map(|a| a.to_string()).collect(),
            default_title: DEFAULT_NOTIFICATION_TITLE.to_string(),
            default_body: DEFAULT_NOTIFICATION_BODY.to_string(),
            icon: NOTIFICATION_ICON.to_string(),
        }
    }
}

impl AgentConfig {
    /// The scope with exactly one trailing slash
    pub fn scope_root(&self) -> String {
        format!("{}/", self.scope.trim_end_matches('/'))
    }

    pub fn asset_url(&self, path: &str) -> String {
        format!("{}{}", self.scope_root(), path.trim_start_matches('/'))
    }

    pub fn asset_urls(&self) -> impl Iterator<Item = String> + '_ {
        self.manifest.iter().map(|p| self.asset_url(p))
    }

    pub fn icon_url(&self) -> String {
        self.asset_url(&self.icon)
    }
}
