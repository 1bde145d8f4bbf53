//! ClickBench-style web-analytics hits.
//!
//! Every hit first draws a device mode. Resolution, OS, user agent, phone
//! model and window size are then drawn from that mode's sets, and the
//! window is bounded by the drawn resolution.

use super::words::{
    MOBILE_MODELS, PAGE_PATHS, PAGE_TOPICS, SEARCH_ENGINES, SEARCH_TERMS, SITES, SOCIAL_SITES,
    TABLET_MODELS,
};
use super::Synthesizer;
use crate::pool::{pool_size, IdPool};
use crate::samplers::{
    bell_curve, chance, int_range, long_tail, pick, pick_distinct, positive_i64, skewed_index,
    timestamp_between, weighted_pick,
};
use rand::RngCore;
use serde::Serialize;
use stager_core::LongTailTier;

/// 2013-07-01T00:00:00Z
const EVENT_WINDOW_START: i64 = 1_372_636_800;
/// 2013-08-01T00:00:00Z
const EVENT_WINDOW_END: i64 = 1_375_315_200;

const REGION_COUNT: usize = 12_000;

/// Site ids: a few large counters carry most of the traffic.
const COUNTER_TIERS: [LongTailTier; 3] = [
    LongTailTier {
        upto: 0.70,
        min: 1,
        max: 50,
    },
    LongTailTier {
        upto: 0.95,
        min: 51,
        max: 2_000,
    },
    LongTailTier {
        upto: 1.00,
        min: 2_001,
        max: 100_000,
    },
];

const DESKTOP_RESOLUTIONS: &[(u16, u16)] = &[
    (1920, 1080),
    (1366, 768),
    (1280, 1024),
    (1440, 900),
    (1600, 900),
    (1680, 1050),
    (1280, 800),
    (1024, 768),
    (2560, 1440),
];

const MOBILE_RESOLUTIONS: &[(u16, u16)] = &[
    (320, 480),
    (320, 568),
    (360, 640),
    (375, 667),
    (414, 736),
    (480, 800),
    (720, 1280),
];

const TABLET_RESOLUTIONS: &[(u16, u16)] = &[(768, 1024), (800, 1280), (1024, 768), (1280, 800)];

const DESKTOP_OS: &[u8] = &[2, 3, 4, 5, 6, 16];
const MOBILE_OS: &[u8] = &[44, 56, 57];
const TABLET_OS: &[u8] = &[44, 56];

const DESKTOP_AGENTS: &[u8] = &[2, 3, 4, 6, 7, 9];
const MOBILE_AGENTS: &[u8] = &[22, 44, 49];

/// Browsing device; drives every device-dependent field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceMode {
    Desktop,
    Mobile,
    Tablet,
}

impl DeviceMode {
    const ALL: [DeviceMode; 3] = [DeviceMode::Desktop, DeviceMode::Mobile, DeviceMode::Tablet];
    const WEIGHTS: [f64; 3] = [0.62, 0.32, 0.06];

    pub fn resolutions(&self) -> &'static [(u16, u16)] {
        match self {
            DeviceMode::Desktop => DESKTOP_RESOLUTIONS,
            DeviceMode::Mobile => MOBILE_RESOLUTIONS,
            DeviceMode::Tablet => TABLET_RESOLUTIONS,
        }
    }

    fn operating_systems(&self) -> &'static [u8] {
        match self {
            DeviceMode::Desktop => DESKTOP_OS,
            DeviceMode::Mobile => MOBILE_OS,
            DeviceMode::Tablet => TABLET_OS,
        }
    }

    fn user_agents(&self) -> &'static [u8] {
        match self {
            DeviceMode::Desktop => DESKTOP_AGENTS,
            DeviceMode::Mobile | DeviceMode::Tablet => MOBILE_AGENTS,
        }
    }
}

/// Traffic source codes as used by `TraficSourceID`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Traffic {
    Internal = -1,
    Direct = 0,
    Link = 1,
    Search = 2,
    Advertising = 3,
    Social = 8,
}

impl Traffic {
    const ALL: [Traffic; 6] = [
        Traffic::Internal,
        Traffic::Direct,
        Traffic::Link,
        Traffic::Search,
        Traffic::Advertising,
        Traffic::Social,
    ];
    const WEIGHTS: [f64; 6] = [0.30, 0.25, 0.15, 0.20, 0.05, 0.05];
}

/// One hit event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Hit {
    #[serde(rename = "WatchID")]
    pub watch_id: i64,
    pub java_enable: u8,
    pub title: String,
    pub good_event: u8,
    pub event_time: String,
    pub event_date: String,
    #[serde(rename = "CounterID")]
    pub counter_id: i64,
    #[serde(rename = "ClientIP")]
    pub client_ip: i64,
    #[serde(rename = "RegionID")]
    pub region_id: i64,
    #[serde(rename = "UserID")]
    pub user_id: i64,
    #[serde(rename = "URL")]
    pub url: String,
    pub referer: String,
    pub is_refresh: u8,
    #[serde(rename = "TraficSourceID")]
    pub trafic_source_id: i8,
    #[serde(rename = "SearchEngineID")]
    pub search_engine_id: u16,
    pub search_phrase: String,
    #[serde(rename = "AdvEngineID")]
    pub adv_engine_id: u8,
    pub is_link: u8,
    pub is_download: u8,
    pub dont_count_hits: u8,
    #[serde(rename = "DNSTiming")]
    pub dns_timing: i64,
    pub connect_timing: i64,
    pub send_timing: i64,
    pub response_start_timing: i64,
    pub response_end_timing: i64,
    pub fetch_timing: i64,
    pub resolution_width: u16,
    pub resolution_height: u16,
    pub is_mobile: u8,
    pub mobile_phone: u8,
    pub mobile_phone_model: String,
    #[serde(rename = "OS")]
    pub os: u8,
    pub user_agent: u8,
    pub window_client_width: u16,
    pub window_client_height: u16,
}

/// Synthesizes hits clustered over a bounded pool of users.
#[derive(Debug, Clone)]
pub struct HitSynthesizer {
    users: IdPool<i64>,
}

impl HitSynthesizer {
    /// Draws the user pool (`max(100, count / 10)` ids) from `rng`.
    pub fn new<R: RngCore + ?Sized>(count: u64, rng: &mut R) -> Self {
        let users = IdPool::generate("hits.users", pool_size(count), rng, |r| positive_i64(r));
        Self { users }
    }

    pub fn users(&self) -> &IdPool<i64> {
        &self.users
    }
}

fn flag<R: RngCore + ?Sized>(p: f64, rng: &mut R) -> u8 {
    u8::from(chance(p, rng))
}

fn timing<R: RngCore + ?Sized>(mean: f64, stddev: f64, rng: &mut R) -> i64 {
    bell_curve(mean, stddev, 0.0, mean * 20.0, rng).round() as i64
}

impl Synthesizer for HitSynthesizer {
    type Record = Hit;

    fn synthesize<R: RngCore + ?Sized>(&self, _index: u64, rng: &mut R) -> Hit {
        // Device first; everything device-shaped follows from it.
        let mode = *weighted_pick(&DeviceMode::ALL, &DeviceMode::WEIGHTS, rng);
        let (width, height) = *pick(mode.resolutions(), rng);
        let os = *pick(mode.operating_systems(), rng);
        let user_agent = *pick(mode.user_agents(), rng);
        let (mobile_phone, mobile_phone_model) = match mode {
            DeviceMode::Desktop => (0, String::new()),
            DeviceMode::Mobile => {
                let idx = int_range(0, MOBILE_MODELS.len() as i64 - 1, rng) as usize;
                (idx as u8 + 1, MOBILE_MODELS[idx].to_string())
            }
            DeviceMode::Tablet => {
                let idx = int_range(0, TABLET_MODELS.len() as i64 - 1, rng) as usize;
                (idx as u8 + 50, TABLET_MODELS[idx].to_string())
            }
        };
        let (window_client_width, window_client_height) = match mode {
            DeviceMode::Desktop => (
                int_range(i64::from(width) / 2, i64::from(width), rng) as u16,
                int_range(i64::from(height) / 2, i64::from(height), rng) as u16,
            ),
            DeviceMode::Mobile | DeviceMode::Tablet => (
                width,
                int_range(i64::from(height) * 3 / 4, i64::from(height), rng) as u16,
            ),
        };

        let user_id = *self.users.pick(rng);
        let watch_id = positive_i64(rng);
        let event = timestamp_between(EVENT_WINDOW_START, EVENT_WINDOW_END, rng);
        let counter_id = long_tail(&COUNTER_TIERS, rng);
        let region_id = skewed_index(REGION_COUNT, 2.5, rng) as i64 + 1;
        let client_ip = int_range(i64::from(i32::MIN), i64::from(i32::MAX), rng);

        let traffic = *weighted_pick(&Traffic::ALL, &Traffic::WEIGHTS, rng);
        let (search_engine_id, search_phrase, engine_host) = if traffic == Traffic::Search {
            let (engine_id, host) = *pick(SEARCH_ENGINES, rng);
            let words = int_range(1, 3, rng) as usize;
            let phrase = pick_distinct(SEARCH_TERMS, words, rng)
                .into_iter()
                .copied()
                .collect::<Vec<_>>()
                .join(" ");
            (engine_id, phrase, host)
        } else {
            (0, String::new(), "")
        };
        let adv_engine_id = if traffic == Traffic::Advertising {
            int_range(1, 30, rng) as u8
        } else {
            0
        };

        let site = SITES[(counter_id as usize) % SITES.len()];
        let path = *pick(PAGE_PATHS, rng);
        let url = format!("http://{site}/{path}");
        let title = format!("{} - {}", pick(PAGE_TOPICS, rng), site);

        let referer = match traffic {
            Traffic::Direct => String::new(),
            Traffic::Internal => format!("http://{site}/{}", pick(PAGE_PATHS, rng)),
            Traffic::Search => format!(
                "http://{engine_host}/search?text={}",
                search_phrase.replace(' ', "+")
            ),
            Traffic::Link | Traffic::Advertising => {
                format!("http://{}/{}", pick(SITES, rng), pick(PAGE_PATHS, rng))
            }
            Traffic::Social => format!("http://{}/", pick(SOCIAL_SITES, rng)),
        };

        let java_enable = flag(if mode == DeviceMode::Desktop { 0.4 } else { 0.05 }, rng);
        let is_refresh = flag(0.08, rng);
        let is_link = flag(if traffic == Traffic::Link { 0.5 } else { 0.01 }, rng);
        let is_download = flag(0.01, rng);
        let dont_count_hits = flag(0.02, rng);
        let good_event = flag(0.999, rng);

        let dns_timing = timing(15.0, 10.0, rng);
        let connect_timing = timing(40.0, 20.0, rng);
        let send_timing = timing(5.0, 3.0, rng);
        let response_start_timing = timing(150.0, 70.0, rng);
        let response_end_timing = response_start_timing + timing(60.0, 40.0, rng);
        let fetch_timing = dns_timing + connect_timing + send_timing + response_end_timing;

        Hit {
            watch_id,
            java_enable,
            title,
            good_event,
            event_time: event.datetime(),
            event_date: event.date(),
            counter_id,
            client_ip,
            region_id,
            user_id,
            url,
            referer,
            is_refresh,
            trafic_source_id: traffic as i8,
            search_engine_id,
            search_phrase,
            adv_engine_id,
            is_link,
            is_download,
            dont_count_hits,
            dns_timing,
            connect_timing,
            send_timing,
            response_start_timing,
            response_end_timing,
            fetch_timing,
            resolution_width: width,
            resolution_height: height,
            is_mobile: u8::from(mode != DeviceMode::Desktop),
            mobile_phone,
            mobile_phone_model,
            os,
            user_agent,
            window_client_width,
            window_client_height,
        }
    }

    fn record_id(&self, record: &Hit) -> Option<String> {
        Some(record.watch_id.to_string())
    }
}
