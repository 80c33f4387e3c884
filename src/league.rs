//! League tiers
//!
//! Total points (best infinite memory score + best infinite attention score)
//! place the player in one of seven tiers. Recomputed on every profile render,
//! so everything here is a pure function of the point total.

use serde::Serialize;

/// A league tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct League {
    pub name: &'static str,
    /// CSS hex color used for the badge
    pub color: &'static str,
    pub points_required: u32,
}

/// Tiers in ascending threshold order; the first starts at 0
pub const LEAGUES: [League; 7] = [
    League { name: "Plastic", color: "#8B4513", points_required: 0 },
    League { name: "Bronze", color: "#CD7F32", points_required: 20 },
    League { name: "Silver", color: "#C0C0C0", points_required: 40 },
    League { name: "Gold", color: "#FFD700", points_required: 60 },
    League { name: "Platinum", color: "#E5E4E2", points_required: 80 },
    League { name: "Diamond", color: "#B9F2FF", points_required: 100 },
    League { name: "Emerald", color: "#50C878", points_required: 120 },
];

/// Where a point total sits in the league table
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueStanding {
    pub name: &'static str,
    pub color: &'static str,
    /// Percent of the way to the next tier, in [0, 100]. 100 in the top tier.
    pub progress: f64,
    /// Points still needed for the next tier, `None` in the top tier
    pub points_to_next: Option<u32>,
}

impl LeagueStanding {
    pub fn is_max_league(&self) -> bool {
        self.points_to_next.is_none()
    }
}

/// Map a point total to its league and progress
pub fn lookup_league(total_points: u32) -> LeagueStanding {
    let top = LEAGUES[LEAGUES.len() - 1];
    if total_points >= top.points_required {
        return LeagueStanding {
            name: top.name,
            color: top.color,
            progress: 100.0,
            points_to_next: None,
        };
    }

    let (current, next) = LEAGUES
        .windows(2)
        .map(|pair| (pair[0], pair[1]))
        .find(|(cur, next)| {
            cur.points_required <= total_points && total_points < next.points_required
        })
        .unwrap_or((LEAGUES[0], LEAGUES[1]));

    let span = f64::from(next.points_required - current.points_required);
    let progress = 100.0 * (f64::from(total_points) - f64::from(current.points_required)) / span;

    LeagueStanding {
        name: current.name,
        color: current.color,
        progress: progress.clamp(0.0, 100.0),
        points_to_next: Some(next.points_required - total_points),
    }
}
