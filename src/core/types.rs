use serde::Serialize;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ContributionCadence {
    PerMonth,
    PerYear,
}

#[derive(Debug, Clone)]
pub struct Inputs {
    pub start_capital: f64,
    pub periodic_contribution: f64,
    pub contribution_cadence: ContributionCadence,
    pub duration_years: u32,
    pub annual_growth_percent: f64,
    pub annual_inflation_percent: f64,
    pub takeout_start_year: u32,
    pub takeout_amount_per_year: f64,
    pub adjust_takeout_for_inflation: bool,
}

impl Inputs {
    pub fn annual_contribution(&self) -> f64 {
        match self.contribution_cadence {
            ContributionCadence::PerMonth => self.periodic_contribution * 12.0,
            ContributionCadence::PerYear => self.periodic_contribution,
        }
    }

    pub fn net_growth_percent(&self) -> f64 {
        self.annual_growth_percent - self.annual_inflation_percent
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub years: Vec<u32>,
    pub contributed: Vec<f64>,
    pub capital: Vec<f64>,
    pub withdrawn: Vec<f64>,
}
