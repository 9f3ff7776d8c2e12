use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Where the media lives and how to walk it.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    pub root: String,
    pub follow_symlinks: bool,
    pub include_hidden: bool,
    pub sort_entries: bool,
    pub max_depth: Option<u32>,
    pub excludes: Vec<String>,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SecurityConfig {
    pub enable_hsts: Option<bool>,
    pub hsts_max_age: Option<u64>,
    pub hsts_include_subdomains: Option<bool>,
    pub csp: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub media: MediaConfig,
    pub security: Option<SecurityConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        // Fallback: parse the embedded default TOML
        let defaults: &str = include_str!("../config/default.toml");
        match ::config::Config::builder()
            .add_source(::config::File::from_str(defaults, ::config::FileFormat::Toml))
            .build()
        {
            Ok(cfg) => match cfg.try_deserialize() {
                Ok(app_cfg) => app_cfg,
                Err(e) => {
                    eprintln!("FATAL: Failed to deserialize default config: {}", e);
                    panic!("Failed to deserialize default config: {}", e);
                }
            },
            Err(e) => {
                eprintln!("FATAL: Failed to parse default config: {}", e);
                panic!("Failed to parse default config: {}", e);
            }
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        // Mirror defaults from config/default.toml
        Self {
            root: "media".to_string(),
            follow_symlinks: false,
            include_hidden: true,
            sort_entries: true,
            max_depth: Some(64),
            excludes: Vec::new(),
            timeout_ms: 10_000,
        }
    }
}

pub fn load() -> anyhow::Result<AppConfig> {
    // Load .env first (optional)
    let _ = dotenvy::dotenv();

    let defaults: &str = include_str!("../config/default.toml");
    let mut builder = ::config::Config::builder()
        .add_source(::config::File::from_str(defaults, ::config::FileFormat::Toml))
        // Optional local file: mediatree.toml (in CWD)
        .add_source(::config::File::with_name("mediatree").required(false));

    if let Ok(custom_path) = std::env::var("MEDIATREE_CONFIG") {
        builder = builder.add_source(::config::File::with_name(&custom_path).required(false));
    }
    // Environment variables last to have highest precedence
    builder = builder.add_source(
        ::config::Environment::with_prefix("MEDIATREE")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("media.excludes")
            .try_parsing(true),
    );

    let cfg = builder.build()?;
    let app_cfg: AppConfig = cfg.try_deserialize()?;
    validate(&app_cfg)?;
    Ok(app_cfg)
}

// The walk recurses once per directory level on the blocking pool's stack.
const MAX_DEPTH_LIMIT: u32 = 1024;

pub(crate) fn validate(cfg: &AppConfig) -> anyhow::Result<()> {
    // Server
    if cfg.server.port == 0 {
        return Err(anyhow::anyhow!("invalid server.port: {}", cfg.server.port));
    }
    #[cfg(unix)]
    if cfg.server.port < 1024 {
        tracing::warn!("Using privileged port {} - may require elevated permissions", cfg.server.port);
    }

    // Media
    if cfg.media.root.trim().is_empty() {
        return Err(anyhow::anyhow!("media.root must not be empty"));
    }
    if cfg.media.root.contains('\0') {
        return Err(anyhow::anyhow!("media.root contains null characters"));
    }
    if cfg.media.timeout_ms == 0 {
        return Err(anyhow::anyhow!("media.timeout_ms must be > 0"));
    }
    if let Some(d) = cfg.media.max_depth {
        if d == 0 || d > MAX_DEPTH_LIMIT {
            return Err(anyhow::anyhow!("media.max_depth must be in 1..={}", MAX_DEPTH_LIMIT));
        }
    }
    crate::tree::build_globset(&cfg.media.excludes)
        .map_err(|e| anyhow::anyhow!("media.excludes contains an invalid pattern: {}", e))?;

    Ok(())
}
