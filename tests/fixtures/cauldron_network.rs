//! A twelve-cauldron network around a single market.
//!
//! Coordinates are spread around Richardson, TX; road travel times are
//! hand-assigned to resemble surface-street driving between neighbours.

/// A named site with coordinates and, for cauldrons, a capacity.
#[derive(Debug, Clone)]
pub struct Site {
    pub id: &'static str,
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
    pub max_volume: f64,
}

impl Site {
    pub const fn new(id: &'static str, name: &'static str, lat: f64, lng: f64, max_volume: f64) -> Self {
        Self {
            id,
            name,
            lat,
            lng,
            max_volume,
        }
    }
}

pub const MARKET: Site = Site::new("market_001", "Enchanted Market", 32.9857, -96.7502, 0.0);

pub const CAULDRONS: &[Site] = &[
    Site::new("cauldron_001", "Crimson Brew", 32.9921, -96.7611, 1000.0),
    Site::new("cauldron_002", "Amber Elixir", 32.9790, -96.7384, 800.0),
    Site::new("cauldron_003", "Jade Draught", 32.9954, -96.7447, 1200.0),
    Site::new("cauldron_004", "Cobalt Tonic", 32.9712, -96.7563, 900.0),
    Site::new("cauldron_005", "Violet Philter", 33.0043, -96.7702, 1000.0),
    Site::new("cauldron_006", "Golden Nectar", 32.9702, -96.7271, 750.0),
    Site::new("cauldron_007", "Silver Mist", 33.0088, -96.7396, 1100.0),
    Site::new("cauldron_008", "Obsidian Syrup", 32.9618, -96.7650, 950.0),
    Site::new("cauldron_009", "Rose Cordial", 33.0151, -96.7788, 1000.0),
    Site::new("cauldron_010", "Saffron Spirit", 32.9597, -96.7190, 850.0),
    Site::new("cauldron_011", "Azure Essence", 33.0203, -96.7335, 1300.0),
    Site::new("cauldron_012", "Emerald Potion", 32.9531, -96.7742, 1000.0),
];

/// Undirected roads with travel time in minutes.
pub const ROADS: &[(&str, &str, f64)] = &[
    ("market_001", "cauldron_001", 12.0),
    ("market_001", "cauldron_002", 18.0),
    ("market_001", "cauldron_003", 9.0),
    ("market_001", "cauldron_004", 22.0),
    ("cauldron_001", "cauldron_005", 14.0),
    ("cauldron_002", "cauldron_006", 11.0),
    ("cauldron_003", "cauldron_007", 16.0),
    ("cauldron_004", "cauldron_008", 13.0),
    ("cauldron_005", "cauldron_009", 10.0),
    ("cauldron_006", "cauldron_010", 17.0),
    ("cauldron_007", "cauldron_011", 12.0),
    ("cauldron_008", "cauldron_012", 19.0),
    ("cauldron_001", "cauldron_002", 15.0),
    ("cauldron_003", "cauldron_004", 20.0),
    ("cauldron_009", "cauldron_010", 21.0),
    ("cauldron_011", "cauldron_012", 8.0),
    ("cauldron_005", "cauldron_006", 9.0),
    ("cauldron_007", "cauldron_008", 14.0),
];

/// Per cauldron: level one hour ago, fill rate in liters per minute, and
/// whether a five-minute collection happens half way through the hour.
pub const FILL_PROFILES: &[(&str, f64, f64, bool)] = &[
    ("cauldron_001", 700.0, 4.0, false),
    ("cauldron_002", 300.0, 1.5, true),
    ("cauldron_003", 1000.0, 2.5, false),
    ("cauldron_004", 200.0, 0.5, false),
    ("cauldron_005", 400.0, 3.0, true),
    ("cauldron_006", 650.0, 0.8, false),
    ("cauldron_007", 100.0, 6.0, false),
    ("cauldron_008", 850.0, 1.0, false),
    ("cauldron_009", 500.0, 2.0, false),
    ("cauldron_010", 120.0, 0.0, false),
    ("cauldron_011", 900.0, 5.0, true),
    ("cauldron_012", 980.0, 0.2, false),
];
