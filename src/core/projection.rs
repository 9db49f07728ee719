use super::types::Projection;

#[derive(Debug, Clone, Copy)]
pub struct PlanParams {
    pub target_age: u32,
    pub target_amount: f64,
    pub annual_rate: f64,
}

impl Default for PlanParams {
    // 10억원 by 65 at 7%/yr, the plan shown on the landing page.
    fn default() -> Self {
        Self {
            target_age: 65,
            target_amount: 1_000_000_000.0,
            annual_rate: 0.07,
        }
    }
}

impl PlanParams {
    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate / 12.0
    }

    // FV = PV * (1+r)^n + PMT * ((1+r)^n - 1) / r, solved for PMT.
    //
    // Total over its domain: degenerate inputs (no time horizon, or a lump sum
    // that already covers the target) map to a zero-payment result, never an
    // error. Callers clamp to sane ranges (age 20-64, lump sum >= 0);
    // out-of-range input is undefined but does not panic.
    pub fn project(&self, start_age: u32, initial_investment: f64) -> Projection {
        let months = (self.target_age as i64 - start_age as i64) * 12;

        if months <= 0 {
            return Projection {
                monthly_payment: 0.0,
                monthly_total: 0.0,
                initial_growth: 0.0,
                profit: 0.0,
                initial_investment,
            };
        }

        let monthly_rate = self.monthly_rate();
        let growth_factor = (1.0 + monthly_rate).powi(months as i32);
        let initial_fv = initial_investment * growth_factor;
        let remaining_target = self.target_amount - initial_fv;

        // Lump sum alone compounds past the target: no monthly payment needed.
        if remaining_target <= 0.0 {
            return Projection {
                monthly_payment: 0.0,
                monthly_total: 0.0,
                initial_growth: initial_fv,
                profit: self.target_amount - initial_investment,
                initial_investment,
            };
        }

        let monthly_payment = remaining_target * monthly_rate / (growth_factor - 1.0);
        let monthly_total = monthly_payment * months as f64;
        let profit = self.target_amount - (initial_investment + monthly_total);

        Projection {
            monthly_payment,
            monthly_total,
            initial_growth: initial_fv,
            profit,
            initial_investment,
        }
    }
}
