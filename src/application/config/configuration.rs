use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::agency::content::Content;
use crate::agency::sync::AgencySettings;
use crate::agency::types::Region;
use crate::rctogether::types::Position;
use crate::scheduler::update_queues::QueueSettings;

/// Where new pets show up, relative to the genie
const SPAWN_OFFSETS: [(i64, i64); 7] = [(-2, -2), (0, -2), (2, -2), (-2, 0), (2, 0), (0, 2), (2, 2)];

#[derive(Serialize, Deserialize, Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Configuration {
    #[clap(long, env = "RC_ENDPOINT", default_value_t = default_endpoint())]
    #[serde(default = "default_endpoint")]
    /// Host of the RC Together instance
    pub endpoint: String,

    #[clap(long, env = "RC_APP_ID")]
    #[serde(default)]
    pub app_id: String,

    #[clap(long, env = "RC_APP_SECRET", hide_env_values = true)]
    #[serde(default)]
    pub app_secret: String,

    #[clap(long, env = "GENIE_NAME", default_value_t = default_genie_name())]
    #[serde(default = "default_genie_name")]
    /// Name of the bot people talk to
    pub genie_name: String,

    #[clap(long, env = "GENIE_HOME", default_value_t = default_genie_home())]
    #[serde(default = "default_genie_home")]
    /// Where the genie stands, pets spawn around it
    pub genie_home: Position,

    #[clap(long, default_value_t = default_corral())]
    #[serde(default = "default_corral")]
    /// Where bored pets wander off to
    pub corral: Region,

    #[clap(long, default_value_t = default_day_care_center())]
    #[serde(default = "default_day_care_center")]
    pub day_care_center: Region,

    #[clap(long, default_value_t = default_boredom_min_secs())]
    #[serde(default = "default_boredom_min_secs")]
    pub boredom_min_secs: u64,

    #[clap(long, default_value_t = default_boredom_max_secs())]
    #[serde(default = "default_boredom_max_secs")]
    pub boredom_max_secs: u64,

    #[clap(long, default_value_t = default_lure_seconds(), allow_negative_numbers = true)]
    #[serde(default = "default_lure_seconds")]
    /// How long a petted pet follows its petter
    pub lure_seconds: i64,

    #[clap(long, default_value_t = default_update_cooldown_ms())]
    #[serde(default = "default_update_cooldown_ms")]
    /// Pause between two writes to the same pet
    pub update_cooldown_ms: u64,

    #[clap(long, default_value_os_t = default_log_dir())]
    #[serde(default = "default_log_dir")]
    /// Directory the daily log files go to
    pub log_dir: PathBuf,
}

impl Configuration {
    pub fn spawn_points(&self) -> Vec<Position> {
        SPAWN_OFFSETS
            .iter()
            .map(|(dx, dy)| self.genie_home.offset(*dx, *dy))
            .collect()
    }

    pub fn agency_settings(&self) -> AgencySettings {
        AgencySettings {
            genie_name: self.genie_name.to_owned(),
            genie_home: self.genie_home,
            spawn_points: self.spawn_points(),
            day_care_center: self.day_care_center,
            corral: self.corral,
            lure_duration: chrono::Duration::seconds(self.lure_seconds),
            content: Content::default(),
        }
    }

    pub fn queue_settings(&self) -> QueueSettings {
        QueueSettings {
            boredom_min: Duration::from_secs(self.boredom_min_secs),
            boredom_max: Duration::from_secs(self.boredom_max_secs),
            cooldown: Duration::from_millis(self.update_cooldown_ms),
        }
    }
}

fn default_endpoint() -> String {
    "recurse.rctogether.com".to_owned()
}

fn default_genie_name() -> String {
    "Pet Agency Genie".to_owned()
}

fn default_genie_home() -> Position {
    Position::new(60, 15)
}

fn default_corral() -> Region {
    Region::new(Position::new(0, 40), Position::new(19, 58))
}

fn default_day_care_center() -> Region {
    Region::new(Position::new(0, 62), Position::new(11, 74))
}

const fn default_boredom_min_secs() -> u64 {
    3600
}

const fn default_boredom_max_secs() -> u64 {
    5400
}

const fn default_lure_seconds() -> i64 {
    600
}

const fn default_update_cooldown_ms() -> u64 {
    1
}

fn default_log_dir() -> PathBuf {
    match directories::ProjectDirs::from("com", "rctogether", "pet_agency") {
        Some(dirs) => dirs.data_dir().join("logs"),
        None => "pet_agency_logs".into(),
    }
}
