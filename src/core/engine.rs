use super::types::{Inputs, Projection};

#[derive(Debug, Clone, Copy)]
enum TakeoutPhase {
    NotYetActive,
    Active { current_withdrawal: f64 },
}

pub fn run_projection(inputs: &Inputs) -> Projection {
    let len = inputs.duration_years as usize + 1;
    let annual_contribution = inputs.annual_contribution();
    let growth_factor = 1.0 + inputs.net_growth_percent() / 100.0;
    let inflation_factor = 1.0 + inputs.annual_inflation_percent / 100.0;

    let mut years = Vec::with_capacity(len);
    let mut contributed = Vec::with_capacity(len);
    let mut capital = Vec::with_capacity(len);
    let mut withdrawn = Vec::with_capacity(len);

    years.push(0);
    contributed.push(inputs.start_capital);
    capital.push(inputs.start_capital);
    withdrawn.push(0.0);

    let mut phase = TakeoutPhase::NotYetActive;
    let mut prev_capital = inputs.start_capital;
    let mut prev_contributed = inputs.start_capital;

    for year in 1..=inputs.duration_years {
        years.push(year);

        let takeout_due =
            year >= inputs.takeout_start_year && inputs.takeout_amount_per_year > 0.0;

        if takeout_due {
            let withdrawal = match phase {
                // The first active year takes the configured flat amount;
                // indexing compounds from the second active year on.
                TakeoutPhase::NotYetActive => inputs.takeout_amount_per_year,
                TakeoutPhase::Active { current_withdrawal } => {
                    if inputs.adjust_takeout_for_inflation {
                        current_withdrawal * inflation_factor
                    } else {
                        current_withdrawal
                    }
                }
            };
            phase = TakeoutPhase::Active {
                current_withdrawal: withdrawal,
            };

            // Withdrawal comes out before growth compounds; no new
            // contributions once the takeout phase has started.
            prev_capital = (prev_capital - withdrawal) * growth_factor;
            capital.push(prev_capital);
            contributed.push(prev_contributed);
            withdrawn.push(withdrawal);
        } else {
            prev_capital = prev_capital * growth_factor + annual_contribution;
            prev_contributed = inputs.start_capital + annual_contribution * year as f64;
            capital.push(prev_capital);
            contributed.push(prev_contributed);
            withdrawn.push(0.0);
        }
    }

    Projection {
        years,
        contributed,
        capital,
        withdrawn,
    }
}
