use crate::model::{
    Activity, AnalyticsSample, Charger, ChargingSample, Profile, Recommendation, Reward,
    SuggestedRoute, Vehicle,
};
use crate::Error;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

const BUILTIN: &str = include_str!("../resources/catalog.json");

/// Read-only sample data every screen renders from.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Catalog {
    pub profile: Profile,
    pub vehicle: Vehicle,
    pub chargers: Vec<Charger>,
    pub recommendations: Vec<Recommendation>,
    pub insights: Vec<String>,
    pub rewards: Vec<Reward>,
    pub routes: Vec<SuggestedRoute>,
    pub activities: Vec<Activity>,
    pub voice_phrases: Vec<String>,
    pub charging: ChargingSample,
    pub analytics: AnalyticsSample,
}

impl Catalog {
    /// The sample data compiled into the binary.
    pub fn builtin() -> Result<Catalog, Error> {
        Catalog::from_json(BUILTIN)
    }

    pub fn from_json(json: &str) -> Result<Catalog, Error> {
        serde_json::from_str(json).map_err(|e| Error::Catalog(e.to_string()))
    }

    pub fn charger(&self, id: u32) -> Result<&Charger, Error> {
        self.chargers
            .iter()
            .find(|c| c.id == id)
            .ok_or(Error::UnknownCharger(id))
    }

    pub fn reward(&self, id: u32) -> Result<&Reward, Error> {
        self.rewards
            .iter()
            .find(|r| r.id == id)
            .ok_or(Error::UnknownReward(id))
    }

    /// Chargers whose name contains `query` (case-insensitive) and that pass
    /// `filter`, in catalog order.
    pub fn search<'a>(&'a self, query: &str, filter: SearchFilter) -> Vec<&'a Charger> {
        let query = query.trim().to_lowercase();
        self.chargers
            .iter()
            .filter(|c| query.is_empty() || c.name.to_lowercase().contains(&query))
            .filter(|c| match filter {
                SearchFilter::All => true,
                SearchFilter::Fast => c.fast_charge,
                SearchFilter::Available => c.is_available(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFilter {
    All,
    Fast,
    Available,
}

impl Default for SearchFilter {
    fn default() -> Self {
        SearchFilter::All
    }
}

impl fmt::Display for SearchFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SearchFilter::All => "all",
            SearchFilter::Fast => "fast",
            SearchFilter::Available => "available",
        })
    }
}

impl FromStr for SearchFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(SearchFilter::All),
            "fast" => Ok(SearchFilter::Fast),
            "available" => Ok(SearchFilter::Available),
            other => Err(Error::InvalidChoice(other.to_string())),
        }
    }
}
