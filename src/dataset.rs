use std::collections::BTreeSet;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_ROWS: usize = 1800;

pub const FIRST_YEAR: u16 = 2017;
pub const LAST_YEAR: u16 = 2024;
pub const GAMES_RANGE: (u8, u8) = (3, 5);
pub const POINTS_RANGE: (u8, u8) = (5, 11);
pub const KEY_POINT_RANGE: (f64, f64) = (35.0, 85.0);

pub const PLAYERS: [&str; 19] = [
    // China, men
    "樊振东",
    "马龙",
    "王楚钦",
    "梁靖崑",
    "林高远",
    // China, women
    "孙颖莎",
    "陈梦",
    "王曼昱",
    "王艺迪",
    // Japan
    "张本智和",
    "伊藤美诚",
    "早田希娜",
    // Korea
    "张禹珍",
    "安宰贤",
    "申裕斌",
    "田志希",
    // Europe
    "Timo Boll",
    "Dimitrij Ovtcharov",
    "Mattias Falck",
];

pub const OPPONENTS: [&str; 12] = [
    "Fan Zhendong",
    "Ma Long",
    "Wang Chuqin",
    "Lin Gaoyuan",
    "Tomokazu Harimoto",
    "Mima Ito",
    "Hina Hayata",
    "Jang Woojin",
    "An Jaehyun",
    "Timo Boll",
    "Dimitrij Ovtcharov",
    "Mattias Falck",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    WttChampions,
    WttGrandSmash,
    WorldChampionships,
    AsianGames,
    WorldCup,
}

impl Tier {
    pub const ALL: [Tier; 5] = [
        Tier::WttChampions,
        Tier::WttGrandSmash,
        Tier::WorldChampionships,
        Tier::AsianGames,
        Tier::WorldCup,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tier::WttChampions => "WTT 冠军赛",
            Tier::WttGrandSmash => "WTT 大满贯",
            Tier::WorldChampionships => "世界锦标赛",
            Tier::AsianGames => "亚运会",
            Tier::WorldCup => "世界杯",
        }
    }

    pub fn parse(raw: &str) -> Option<Tier> {
        let raw = raw.trim();
        Tier::ALL.into_iter().find(|tier| {
            tier.label() == raw || tier.key().eq_ignore_ascii_case(raw)
        })
    }

    pub fn key(self) -> &'static str {
        match self {
            Tier::WttChampions => "wtt_champions",
            Tier::WttGrandSmash => "wtt_grand_smash",
            Tier::WorldChampionships => "world_championships",
            Tier::AsianGames => "asian_games",
            Tier::WorldCup => "world_cup",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stroke {
    ForehandAttack,
    BackhandFlick,
    ServeAttack,
    ReceiveFlick,
    MidDistanceRally,
    ShortGame,
    PivotAttack,
}

impl Stroke {
    pub const ALL: [Stroke; 7] = [
        Stroke::ForehandAttack,
        Stroke::BackhandFlick,
        Stroke::ServeAttack,
        Stroke::ReceiveFlick,
        Stroke::MidDistanceRally,
        Stroke::ShortGame,
        Stroke::PivotAttack,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Stroke::ForehandAttack => "正手强攻",
            Stroke::BackhandFlick => "反手拧拉",
            Stroke::ServeAttack => "发球抢攻",
            Stroke::ReceiveFlick => "接发挑打",
            Stroke::MidDistanceRally => "中远台对拉",
            Stroke::ShortGame => "台内小球",
            Stroke::PivotAttack => "侧身进攻",
        }
    }
}

// Win sorts before Loss, matching the breakdown ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win,
    Loss,
}

impl Outcome {
    pub fn from_points(points_for: u8, points_against: u8) -> Self {
        if points_for > points_against {
            Outcome::Win
        } else {
            Outcome::Loss
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Outcome::Win => "胜",
            Outcome::Loss => "负",
        }
    }
}

// `Shared` draws games/points once and reuses them for every row, so every
// row gets the same outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScalarDraws {
    #[default]
    PerRow,
    Shared,
}

impl ScalarDraws {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "per-row" | "per_row" | "perrow" | "row" => Some(ScalarDraws::PerRow),
            "shared" | "single" => Some(ScalarDraws::Shared),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub player: String,
    pub year: u16,
    pub tier: Tier,
    pub opponent: String,
    pub games_played: u8,
    pub points_for: u8,
    pub points_against: u8,
    pub key_point_rate: f64,
    pub stroke: Stroke,
    pub outcome: Outcome,
}

impl MatchRecord {
    pub fn is_win(&self) -> bool {
        self.outcome == Outcome::Win
    }
}

#[derive(Debug, Clone, Copy)]
struct ScalarRow {
    games_played: u8,
    points_for: u8,
    points_against: u8,
}

impl ScalarRow {
    fn draw(rng: &mut impl Rng) -> Self {
        Self {
            games_played: rng.gen_range(GAMES_RANGE.0..=GAMES_RANGE.1),
            points_for: rng.gen_range(POINTS_RANGE.0..=POINTS_RANGE.1),
            points_against: rng.gen_range(POINTS_RANGE.0..=POINTS_RANGE.1),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Dataset {
    pub seed: Option<u64>,
    pub scalar_draws: ScalarDraws,
    pub records: Vec<MatchRecord>,
}

impl Dataset {
    pub fn seeded(seed: u64, rows: usize, scalar_draws: ScalarDraws) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut dataset = generate(&mut rng, rows, scalar_draws);
        dataset.seed = Some(seed);
        dataset
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn years(&self) -> Vec<u16> {
        self.records
            .iter()
            .map(|r| r.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    // Order of first appearance.
    pub fn tiers(&self) -> Vec<Tier> {
        let mut out = Vec::new();
        for record in &self.records {
            if !out.contains(&record.tier) {
                out.push(record.tier);
                if out.len() == Tier::ALL.len() {
                    break;
                }
            }
        }
        out
    }
}

pub fn players_sorted() -> Vec<&'static str> {
    let mut players = PLAYERS.to_vec();
    players.sort_unstable();
    players
}

pub fn generate(rng: &mut impl Rng, rows: usize, scalar_draws: ScalarDraws) -> Dataset {
    let shared = match scalar_draws {
        ScalarDraws::Shared => Some(ScalarRow::draw(rng)),
        ScalarDraws::PerRow => None,
    };

    let mut records = Vec::with_capacity(rows);
    for _ in 0..rows {
        let player = pick(rng, &PLAYERS);
        let year = rng.gen_range(FIRST_YEAR..=LAST_YEAR);
        let tier = pick(rng, &Tier::ALL);
        let opponent = pick(rng, &OPPONENTS);
        let scalars = match shared {
            Some(row) => row,
            None => ScalarRow::draw(rng),
        };
        let key_point_rate = round_to(rng.gen_range(KEY_POINT_RANGE.0..KEY_POINT_RANGE.1), 2);
        let stroke = pick(rng, &Stroke::ALL);

        records.push(MatchRecord {
            player: player.to_string(),
            year,
            tier,
            opponent: opponent.to_string(),
            games_played: scalars.games_played,
            points_for: scalars.points_for,
            points_against: scalars.points_against,
            key_point_rate,
            stroke,
            outcome: Outcome::from_points(scalars.points_for, scalars.points_against),
        });
    }

    Dataset {
        seed: None,
        scalar_draws,
        records,
    }
}

fn pick<T: Copy>(rng: &mut impl Rng, items: &[T]) -> T {
    items[rng.gen_range(0..items.len())]
}

// Halves go to the even neighbour, so 6.25 shows as 6.2.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
