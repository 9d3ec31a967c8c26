use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{DataSource, FetchContext, SourceError};
use crate::model::PromotionRecord;

pub const DEFAULT_MOCK_COUNT: usize = 100;

pub const SAMPLE_TITLES: [&str; 9] = [
    "Travelling abroad? Don't forget your data roaming plan",
    "Alphonse Mucha, master of Art Nouveau: 40% off",
    "Asiana Airlines special fares collection",
    "All the Sanrio characters! Tokyo & Kyushu Hello Kitty Land",
    "Tokyo hot spots deal: 10% off Skytree",
    "Fukuoka premium rail journey, first come 50% off",
    "Caribbean paradise: Scarlet Arte Resort member rates",
    "Up to 30,000 won off for everyone at the stay sale festa",
    "Days to spare? Japan flights only!",
];

const IMAGE_URL_BASE: &str =
    "https://images.unsplash.com/photo-1542051841857-5f90071e7989?w=400&h=200&fit=crop&q=80";
const DATE_WINDOW_DAYS: i64 = 10;

pub fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 28).unwrap_or_default()
}

/// Synthetic inventory: `count` records spread over the ten days ending at
/// [`reference_date`], ten records per `order_seq` bucket.
#[derive(Clone, Debug)]
pub struct MockSource {
    count: usize,
    seed: Option<u64>,
}

impl Default for MockSource {
    fn default() -> Self {
        Self {
            count: DEFAULT_MOCK_COUNT,
            seed: None,
        }
    }
}

impl MockSource {
    pub fn new(count: usize, seed: Option<u64>) -> Self {
        Self { count, seed }
    }

    pub fn generate(&self) -> Vec<PromotionRecord> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let newest = reference_date();
        (1..=self.count)
            .map(|i| {
                let offset = rng.gen_range(0..DATE_WINDOW_DAYS);
                PromotionRecord {
                    title: SAMPLE_TITLES[i % SAMPLE_TITLES.len()].to_string(),
                    image_url: format!("{IMAGE_URL_BASE}&seed={i}"),
                    link_url: "#".to_string(),
                    create_date: newest - Duration::days(offset),
                    order_seq: (i / 10) as i64 + 1,
                }
            })
            .collect()
    }
}

impl DataSource for MockSource {
    async fn fetch_all(&self, _ctx: &FetchContext) -> Result<Vec<PromotionRecord>, SourceError> {
        tracing::info!(count = self.count, "using mock promotion data");
        Ok(self.generate())
    }
}
