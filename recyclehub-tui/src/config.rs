//! Layered configuration: defaults, global file, project file, environment.

use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use recyclehub_backend::DEFAULT_BASE_URL;
use recyclehub_core::{CarbonQuery, GeoPoint};
use serde::{Deserialize, Serialize};

const PROJECT_FILE: &str = "recyclehub.toml";
const ENV_PREFIX: &str = "RECYCLEHUB_";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct Config {
    pub backend: BackendConfig,
    pub location: LocationConfig,
    pub carbon: CarbonConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct BackendConfig {
    pub base_url: String,
    /// Separate host for recycle point lookups; `base_url` when unset.
    pub points_base_url: Option<String>,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            points_base_url: None,
            user_agent: "recyclehub/0.1".to_owned(),
            timeout_secs: 30,
        }
    }
}

/// Stand-in for the device location service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub(crate) struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        // Bengaluru city centre
        Self {
            latitude: 12.9716,
            longitude: 77.5946,
        }
    }
}

impl From<LocationConfig> for GeoPoint {
    fn from(location: LocationConfig) -> Self {
        GeoPoint::new(location.latitude, location.longitude)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CarbonConfig {
    pub cluster_name: String,
    pub vehicle_type: String,
    pub fuel_type: String,
    pub include_wtt: bool,
}

impl Default for CarbonConfig {
    fn default() -> Self {
        let query = CarbonQuery::default();
        Self {
            cluster_name: query.cluster_name,
            vehicle_type: query.vehicle_type,
            fuel_type: query.fuel_type,
            include_wtt: query.include_wtt,
        }
    }
}

impl CarbonConfig {
    pub(crate) fn query(&self, distance_km: f64) -> CarbonQuery {
        CarbonQuery {
            cluster_name: self.cluster_name.clone(),
            vehicle_type: self.vehicle_type.clone(),
            fuel_type: self.fuel_type.clone(),
            include_wtt: self.include_wtt,
            ..CarbonQuery::for_distance_km(distance_km)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct LogConfig {
    /// Default filter when `RUST_LOG` is unset.
    pub level: String,
    /// Directory for `recyclehub.log`; falls back to the platform cache dir.
    pub directory: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            directory: None,
        }
    }
}

impl LogConfig {
    pub(crate) fn resolved_directory(&self) -> PathBuf {
        self.directory.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .map_or_else(std::env::temp_dir, |dir| dir.join("recyclehub"))
        })
    }
}

impl Config {
    /// Load configuration, highest priority last:
    /// defaults, `$XDG_CONFIG_HOME/recyclehub/config.toml`, `./recyclehub.toml`,
    /// then `RECYCLEHUB_*` variables (`__` separates sections).
    pub(crate) fn load() -> Result<Self, Box<figment::Error>> {
        Self::figment().extract().map_err(Box::new)
    }

    fn figment() -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        figment
            .merge(Toml::file(PROJECT_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}

fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("recyclehub").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_production_backend() {
        let config = Config::default();
        assert_eq!(config.backend.base_url, DEFAULT_BASE_URL);
        assert!(config.backend.points_base_url.is_none());
        assert_eq!(config.log.level, "info");
        assert!(!config.carbon.include_wtt);
    }

    #[test]
    fn env_and_file_override_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                PROJECT_FILE,
                r#"
                [backend]
                base_url = "http://localhost:5000/api"

                [location]
                latitude = 48.1
                longitude = 11.5
                "#,
            )?;
            jail.set_env("RECYCLEHUB_CARBON__FUEL_TYPE", "diesel");
            jail.set_env(
                "RECYCLEHUB_BACKEND__POINTS_BASE_URL",
                "https://points.example.com/api",
            );

            let config: Config = Config::figment().extract()?;
            assert_eq!(config.backend.base_url, "http://localhost:5000/api");
            assert_eq!(config.backend.timeout_secs, 30);
            assert_eq!(
                config.backend.points_base_url.as_deref(),
                Some("https://points.example.com/api")
            );
            assert!((config.location.latitude - 48.1).abs() < 1e-9);
            assert_eq!(config.carbon.fuel_type, "diesel");
            Ok(())
        });
    }

    #[test]
    fn carbon_query_uses_configured_vehicle() {
        let carbon = CarbonConfig {
            vehicle_type: "Car-Type-Large".to_owned(),
            ..CarbonConfig::default()
        };
        let query = carbon.query(12.0);
        assert_eq!(query.vehicle_type, "Car-Type-Large");
        assert!((query.distance_value - 12.0).abs() < f64::EPSILON);
        assert_eq!(query.distance_unit, "km");
    }
}
