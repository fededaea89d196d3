use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::Deserialize;
use spdlog::info;

pub const DEFAULT_PAGE_SIZE: u32 = 6;
pub const CFG_FILE_NAME: &str = "blogpad.toml";

#[derive(Deserialize, Clone, Debug)]
pub struct Server {
    pub address: String,
    pub port: u16,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct Store {
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct Client {
    pub base_url: String,
    pub page_size: Option<u32>,
}

impl Client {
    pub fn page_size(&self) -> u32 {
        match self.page_size {
            Some(0) | None => DEFAULT_PAGE_SIZE,
            Some(x) => x,
        }
    }
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct Session {
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Copy, Clone, Debug, PartialEq)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub server: Server,
    #[serde(default)]
    pub store: Store,
    pub client: Option<Client>,
    #[serde(default)]
    pub session: Session,
    pub log: Option<Log>,
}

impl Config {
    /// Client settings, falling back to the local server address.
    pub fn client(&self) -> Client {
        match self.client {
            Some(ref client) => client.clone(),
            None => Client {
                base_url: format!("http://{}:{}", self.server.address, self.server.port),
                page_size: None,
            },
        }
    }
}

fn parse_path(path: PathBuf) -> PathBuf {
    if !path.starts_with("${exe_dir}") {
        return path;
    }

    let exe_dir = env::current_exe().ok()
        .and_then(|exe| exe.parent().map(|p| p.to_path_buf()));
    match (exe_dir, path.to_str()) {
        (Some(exe_dir), Some(str_path)) => {
            PathBuf::from(str_path.replace("${exe_dir}", &exe_dir.to_string_lossy()))
        }
        _ => path,
    }
}

pub fn parse_config(cfg_content: &str) -> io::Result<Config> {
    let mut cfg: Config = match toml::from_str::<Config>(cfg_content) {
        Ok(cfg) => cfg,
        Err(e) => return Err(io::Error::new(
            ErrorKind::InvalidData, format!("Error parsing configuration file: {}", e))),
    };

    cfg.store.location = cfg.store.location.map(parse_path);
    cfg.session.location = cfg.session.location.map(parse_path);
    if let Some(ref mut log) = cfg.log {
        log.location = log.location.take().map(parse_path);
    }

    Ok(cfg)
}

pub fn read_config(cfg_path: &Path) -> io::Result<Config> {
    let cfg_content = match fs::read_to_string(cfg_path) {
        Ok(content) => content,
        Err(e) => return Err(io::Error::new(e.kind(), format!("Error opening configuration file {}: {}", cfg_path.display(), e))),
    };

    parse_config(&cfg_content)
}

fn find_config_path() -> Option<PathBuf> {
    let exe_dir = env::current_exe().ok()
        .and_then(|exe| exe.parent().map(|p| p.to_path_buf()));
    let candidates = [
        exe_dir,
        env::current_dir().ok(),
        dirs::config_dir(),
    ];

    candidates.into_iter()
        .flatten()
        .map(|dir| dir.join(CFG_FILE_NAME))
        .find(|path| path.exists())
}

fn cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(env::temp_dir)
        .join("Blogpad")
}

/// Reads the configuration from `cfg_path`, or from the first `blogpad.toml`
/// found next to the executable, in the current dir or in the user config dir.
/// Log and session locations get their defaults under the user cache dir.
pub fn open_config(cfg_path: Option<PathBuf>) -> Result<Config, String> {
    let config_path = match cfg_path.or_else(find_config_path) {
        None => return Err("Could not find Blogpad configuration".to_string()),
        Some(x) => x,
    };

    info!("Reading config from {}", config_path.display());
    let mut config = match read_config(&config_path) {
        Ok(config) => config,
        Err(e) => return Err(e.to_string()),
    };

    if let Some(ref mut log) = config.log {
        let location = log.location.take()
            .unwrap_or_else(|| cache_dir().join("log").join("server.log"));
        info!("Log enabled. Files will be written in {}", location.display());
        log.location = Some(location);
    } else {
        info!("Log disabled. Using stdout");
    }

    if config.session.location.is_none() {
        config.session.location = Some(cache_dir().join("session.json"));
    }

    Ok(config)
}
