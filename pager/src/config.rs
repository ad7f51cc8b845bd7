use payloads::DEFAULT_PAGE_LIMIT;
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_ROOT_MARGIN: &str = "200px";
pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Endpoint must not be empty")]
    EmptyEndpoint,
    #[error("Page limit must be greater than zero")]
    ZeroLimit,
    #[error("Invalid root margin {0:?}: expected 1-4 lengths in px or %")]
    RootMargin(String),
}

/// Messages shown for failures whose server text is not shown verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMessages {
    pub unauthorized: String,
    pub forbidden: String,
    pub network: String,
}

impl Default for ErrorMessages {
    fn default() -> Self {
        Self {
            unauthorized: "Unauthorized. Please sign in again.".into(),
            forbidden: "Access denied. You do not have permission to access \
                        this resource."
                .into(),
            network: "Network error. Please check your connection.".into(),
        }
    }
}

/// How far outside the viewport the sentinel counts as visible, in CSS
/// margin syntax (`"200px"`, `"0px 0px 50%"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootMargin(String);

impl RootMargin {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RootMargin {
    fn default() -> Self {
        Self(DEFAULT_ROOT_MARGIN.to_string())
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RootMargin {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lengths: Vec<&str> = s.split_whitespace().collect();
        let valid = (1..=4).contains(&lengths.len())
            && lengths.iter().all(|length| {
                length
                    .strip_suffix("px")
                    .or_else(|| length.strip_suffix('%'))
                    .is_some_and(|number| number.parse::<f64>().is_ok())
            });

        if valid {
            Ok(Self(lengths.join(" ")))
        } else {
            Err(ConfigError::RootMargin(s.to_string()))
        }
    }
}

/// Settings for one list loader.
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderConfig {
    /// Absolute path of the list endpoint, e.g. `/api/players`.
    pub endpoint: String,
    pub limit: NonZeroU32,
    pub root_margin: RootMargin,
    /// Minimum time between the starts of two fetches.
    pub throttle: Duration,
    pub messages: ErrorMessages,
}

impl LoaderConfig {
    /// A config with the default limit, margin and throttle.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            limit: DEFAULT_PAGE_LIMIT,
            root_margin: RootMargin::default(),
            throttle: DEFAULT_THROTTLE,
            messages: ErrorMessages::default(),
        }
    }

    pub fn builder(endpoint: impl Into<String>) -> LoaderConfigBuilder {
        LoaderConfigBuilder {
            endpoint: endpoint.into(),
            limit: DEFAULT_PAGE_LIMIT.get(),
            root_margin: DEFAULT_ROOT_MARGIN.to_string(),
            throttle_ms: DEFAULT_THROTTLE.as_millis() as u64,
            messages: ErrorMessages::default(),
        }
    }
}

/// Unvalidated loader settings, checked by [`LoaderConfigBuilder::build`].
#[derive(Debug, Clone)]
pub struct LoaderConfigBuilder {
    endpoint: String,
    limit: u32,
    root_margin: String,
    throttle_ms: u64,
    messages: ErrorMessages,
}

impl LoaderConfigBuilder {
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn root_margin(mut self, root_margin: impl Into<String>) -> Self {
        self.root_margin = root_margin.into();
        self
    }

    /// Zero disables throttling.
    pub fn throttle_ms(mut self, throttle_ms: u64) -> Self {
        self.throttle_ms = throttle_ms;
        self
    }

    pub fn messages(mut self, messages: ErrorMessages) -> Self {
        self.messages = messages;
        self
    }

    pub fn build(self) -> Result<LoaderConfig, ConfigError> {
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::EmptyEndpoint);
        }
        Ok(LoaderConfig {
            endpoint: self.endpoint,
            limit: NonZeroU32::new(self.limit).ok_or(ConfigError::ZeroLimit)?,
            root_margin: self.root_margin.parse()?,
            throttle: Duration::from_millis(self.throttle_ms),
            messages: self.messages,
        })
    }
}
