#![deny(warnings)]

//! Monthly time-stepped herd lifecycle simulation.
//!
//! A [`HerdSim`] owns every piece of mutable run state: the parity ledger of
//! the breeding herd, the pool of matured replacement heifers, the stage
//! pipelines, the breeding cycle and the running [`HerdLedger`]. Each call to
//! [`HerdSim::step`] simulates one month in a fixed order:
//!
//! 1. accrue maintenance cost for the head count at the start of the month
//! 2. advance the pipelines youngest stage first, so a cohort can complete
//!    and enter the next stage in the same month, routing evaluated females
//!    through the capacity router
//! 3. count the breeding cycle down and run the handler of any phase entered
//! 4. append a [`MonthRecord`] to the trace
//!
//! The step function never fails; parameters are validated once when the
//! simulation is built.

use herd_core::{validate_horizon, validate_params, ParityLedger, Params, ValidationError};
use herd_econ::{EconError, RevenueBreakdown};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, trace};

pub mod breeding;
pub mod ledger;
pub mod pipelines;
pub mod router;
pub mod scenario;

pub use breeding::{round_heads, BreedingCycle, BreedingPhase};
pub use ledger::{month_date, HerdLedger, MonthRecord, Sex};
pub use pipelines::{Stage, StagePipelines};
pub use router::{CapacityRouter, Routing};
pub use scenario::{compare, run_scenarios, Scenario, ScenarioOutcome, ScenarioSet, SummaryDelta};

/// Errors surfaced at the boundary of a run.
#[derive(Debug, Error, PartialEq)]
pub enum SimError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Econ(#[from] EconError),
}

/// End-of-run snapshot of the ledger with derived revenue and profit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimSummary {
    pub months_run: u32,
    pub heads: HerdLedger,
    /// Retired cows plus finished animals of both sexes.
    pub total_shipped: u64,
    pub breeding_herd: u64,
    /// Breeding cows per parity, parity 0 first.
    pub cows_by_parity: Vec<u64>,
    pub ready_replacements: u64,
    /// Heads held in each pipeline stage at the end of the run.
    pub stage_heads: Vec<(Stage, u64)>,
    pub total_head_count: u64,
    pub revenue: RevenueBreakdown,
    pub maintenance_cost: Decimal,
    pub net_profit: Decimal,
    pub annual_replacement_rate_pct: Option<Decimal>,
}

/// One simulation instance.
#[derive(Clone, Debug)]
pub struct HerdSim {
    params: Params,
    month: u32,
    parity: ParityLedger,
    ready_replacements: u64,
    pipelines: StagePipelines,
    cycle: BreedingCycle,
    router: CapacityRouter,
    ledger: HerdLedger,
    trace: Vec<MonthRecord>,
}

impl HerdSim {
    /// Build a simulation at month 0 with the whole herd at parity 0.
    pub fn new(params: Params) -> Result<Self, SimError> {
        validate_params(&params)?;
        Ok(Self {
            month: 0,
            parity: ParityLedger::new(params.max_parity, params.herd_size),
            ready_replacements: 0,
            pipelines: StagePipelines::default(),
            cycle: BreedingCycle::new(&params),
            router: CapacityRouter::new(params.max_total_capacity),
            ledger: HerdLedger::default(),
            trace: Vec::new(),
            params,
        })
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Months simulated so far.
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn parity(&self) -> &ParityLedger {
        &self.parity
    }

    pub fn ready_replacements(&self) -> u64 {
        self.ready_replacements
    }

    pub fn pipelines(&self) -> &StagePipelines {
        &self.pipelines
    }

    pub fn cycle(&self) -> &BreedingCycle {
        &self.cycle
    }

    pub fn ledger(&self) -> &HerdLedger {
        &self.ledger
    }

    pub fn trace(&self) -> &[MonthRecord] {
        &self.trace
    }

    pub fn breeding_herd(&self) -> u64 {
        self.parity.total()
    }

    /// Animals present: breeding herd, replacement pool and every pipeline.
    pub fn head_count(&self) -> u64 {
        self.parity
            .total()
            .saturating_add(self.ready_replacements)
            .saturating_add(self.pipelines.head_count())
    }

    /// Simulate one month and return its trace record.
    pub fn step(&mut self) -> MonthRecord {
        self.month += 1;
        let opening = self.head_count();
        self.ledger.accrue_cost(herd_econ::monthly_maintenance(
            opening,
            self.params.cost_monthly_per_head,
        ));

        self.advance_pipelines();

        if let Some(phase) = self.cycle.tick(&self.params) {
            self.enter_phase(phase);
        }

        let record = MonthRecord {
            month: self.month,
            total_head_count: self.head_count(),
            breeding_herd: self.breeding_herd(),
            phase: self.cycle.phase(),
            cumulative_cost: self.ledger.maintenance_cost,
        };
        trace!(
            month = record.month,
            heads = record.total_head_count,
            phase = ?record.phase,
            "month simulated"
        );
        self.trace.push(record.clone());
        record
    }

    /// Simulate `months` further months.
    pub fn run_months(&mut self, months: u32) {
        info!(
            from = self.month,
            months,
            herd = self.params.herd_size,
            "running herd simulation"
        );
        for _ in 0..months {
            self.step();
        }
        info!(
            month = self.month,
            heads = self.head_count(),
            breeding_herd = self.breeding_herd(),
            "simulation finished"
        );
    }

    /// Snapshot of the ledger so far with revenue and profit.
    pub fn summary(&self) -> Result<SimSummary, SimError> {
        let revenue = herd_econ::revenue(&self.ledger.sales(), &self.params)?;
        let maintenance_cost = self.ledger.maintenance_cost;
        let net_profit = herd_econ::net_profit(revenue.total, maintenance_cost);
        Ok(SimSummary {
            months_run: self.month,
            heads: self.ledger.clone(),
            total_shipped: self.ledger.total_shipped(),
            breeding_herd: self.breeding_herd(),
            cows_by_parity: self.parity.by_parity().to_vec(),
            ready_replacements: self.ready_replacements,
            stage_heads: self.pipelines.breakdown(),
            total_head_count: self.head_count(),
            revenue,
            maintenance_cost,
            net_profit,
            annual_replacement_rate_pct: herd_econ::annual_replacement_rate_pct(
                self.params.replacement_n_each_mating,
                self.params.herd_size,
                self.params.cycle_months(),
            ),
        })
    }

    /// Consume the simulation into its summary and trace.
    pub fn finish(self) -> Result<(SimSummary, Vec<MonthRecord>), SimError> {
        let summary = self.summary()?;
        Ok((summary, self.trace))
    }

    fn advance_pipelines(&mut self) {
        let reared = self.pipelines.female_rearing.advance();
        self.pipelines
            .female_evaluation
            .push(reared, self.params.female_eval_months);

        let evaluated = self.pipelines.female_evaluation.advance();
        if evaluated > 0 {
            self.select_and_route_females(evaluated);
        }

        self.ready_replacements += self.pipelines.replacement_maturation.advance();
        let finished_f = self.pipelines.female_finishing.advance();
        self.ledger.record_finished(Sex::Female, finished_f);
        let consigned = self.pipelines.male_consignment.advance();
        self.ledger.record_consigned(consigned);
        let finished_m = self.pipelines.male_finishing.advance();
        self.ledger.record_finished(Sex::Male, finished_m);
    }

    /// Keep up to the replacement quota of evaluated females as heifers; the
    /// rest go to finishing or are sold, depending on space.
    fn select_and_route_females(&mut self, evaluated: u64) {
        let selected = self.params.replacement_n_each_mating.min(evaluated);
        let routing = self.router.route(evaluated - selected, self.head_count());
        if routing.to_sell > 0 {
            debug!(
                month = self.month,
                sold = routing.to_sell,
                "no space to finish weaned females"
            );
        }
        self.pipelines
            .female_finishing
            .push(routing.to_fatten, self.params.female_finishing_months());
        self.ledger.record_calf_sale(Sex::Female, routing.to_sell);
        self.pipelines
            .replacement_maturation
            .push(selected, self.params.replacement_maturation_months());
    }

    fn enter_phase(&mut self, phase: BreedingPhase) {
        match phase {
            BreedingPhase::Mating => self.intake_replacements(),
            BreedingPhase::Gestation => {
                let pregnant = self
                    .cycle
                    .conceive(self.parity.total(), self.params.conception_rate);
                debug!(month = self.month, pregnant, "mating closed");
            }
            BreedingPhase::Open => self.calve(),
        }
    }

    /// Swap matured heifers into the herd, retiring as many of the oldest
    /// cows. A shortfall against the quota is not carried forward.
    fn intake_replacements(&mut self) {
        let enter = self
            .params
            .replacement_n_each_mating
            .min(self.ready_replacements);
        if enter == 0 {
            return;
        }
        self.ready_replacements -= enter;
        let retired = self.parity.replace(enter);
        self.ledger.record_intake(enter, retired);
        debug!(month = self.month, enter, retired, "replacements entered");
    }

    fn calve(&mut self) {
        let births = self.cycle.deliver();
        let outcome = self.parity.calve(births);
        self.ledger.record_calving(births, outcome.aged_out);

        let female = round_heads(births, self.params.female_ratio);
        let male = births - female;
        self.pipelines
            .female_rearing
            .push(female, self.params.female_common_rearing_months);

        let consign = self.params.consignment_per_calving.min(male);
        let routing = self.router.route(male - consign, self.head_count());
        self.pipelines
            .male_consignment
            .push(consign, self.params.male_consignment_age_months);
        self.pipelines
            .male_finishing
            .push(routing.to_fatten, self.params.beef_ship_age_months);
        self.ledger.record_calf_sale(Sex::Male, routing.to_sell);
        debug!(
            month = self.month,
            births,
            female,
            male,
            consign,
            fattened = routing.to_fatten,
            sold = routing.to_sell,
            aged_out = outcome.aged_out,
            "calving resolved"
        );
    }
}

/// Run `total_months` months of a fresh simulation.
pub fn simulate(
    total_months: u32,
    params: Params,
) -> Result<(SimSummary, Vec<MonthRecord>), SimError> {
    validate_horizon(total_months)?;
    let mut sim = HerdSim::new(params)?;
    sim.run_months(total_months);
    let (summary, trace) = sim.finish()?;
    info!(
        months = summary.months_run,
        net_profit = %summary.net_profit,
        "run complete"
    );
    Ok((summary, trace))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn scenario_params() -> Params {
        Params {
            herd_size: 100,
            conception_rate: Decimal::new(70, 2),
            female_ratio: Decimal::new(50, 2),
            max_parity: 10,
            open_months: 2,
            mating_months: 2,
            gestation_months: 10,
            replacement_n_each_mating: 3,
            ..Params::default()
        }
    }

    fn conserved(sim: &HerdSim) -> bool {
        sim.params().herd_size + sim.ledger().calves_born
            == sim.head_count() + sim.ledger().total_exited()
    }

    #[test]
    fn rejects_invalid_params() {
        let p = Params {
            female_ratio: Decimal::new(2, 0),
            ..Params::default()
        };
        assert!(matches!(HerdSim::new(p), Err(SimError::Invalid(_))));
        assert_eq!(
            simulate(0, Params::default()).unwrap_err(),
            SimError::Invalid(ValidationError::ZeroHorizon)
        );
    }

    #[test]
    fn conception_snapshot_at_end_of_mating() {
        let mut sim = HerdSim::new(scenario_params()).unwrap();
        for _ in 0..3 {
            sim.step();
            assert_eq!(sim.cycle().pregnant_this_cycle(), 0);
        }
        let rec = sim.step();
        assert_eq!(rec.month, 4);
        assert_eq!(rec.phase, BreedingPhase::Gestation);
        assert_eq!(sim.cycle().pregnant_this_cycle(), 70);
    }

    #[test]
    fn calving_splits_births_at_end_of_gestation() {
        let mut sim = HerdSim::new(scenario_params()).unwrap();
        sim.run_months(13);
        assert_eq!(sim.ledger().calves_born, 0);
        let rec = sim.step();
        assert_eq!(rec.month, 14);
        assert_eq!(rec.phase, BreedingPhase::Open);
        assert_eq!(sim.ledger().calves_born, 70);
        assert_eq!(sim.pipelines().female_rearing.head_count(), 35);
        assert_eq!(sim.pipelines().male_consignment.head_count(), 5);
        assert_eq!(sim.pipelines().male_finishing.head_count(), 30);
        assert_eq!(sim.parity().by_parity()[1], 70);
        assert_eq!(rec.total_head_count, 170);
        assert_eq!(sim.cycle().pregnant_this_cycle(), 0);
    }

    #[test]
    fn every_month_conserves_animals() {
        let mut sim = HerdSim::new(Params {
            max_total_capacity: 160,
            ..scenario_params()
        })
        .unwrap();
        for _ in 0..240 {
            let rec = sim.step();
            assert!(conserved(&sim));
            assert_eq!(rec.total_head_count, sim.head_count());
        }
        assert!(sim.ledger().replacements_entered > 0);
        assert!(sim.ledger().calves_sold_male > 0);
    }

    #[test]
    fn zero_herd_stays_idle() {
        let p = Params {
            herd_size: 0,
            conception_rate: Decimal::ZERO,
            female_ratio: Decimal::ZERO,
            ..Params::default()
        };
        let (summary, trace) = simulate(60, p).unwrap();
        assert_eq!(summary.heads, HerdLedger::default());
        assert_eq!(summary.total_head_count, 0);
        assert_eq!(summary.net_profit, Decimal::ZERO);
        assert_eq!(trace.len(), 60);
        assert!(trace
            .iter()
            .all(|r| r.total_head_count == 0 && r.cumulative_cost == Decimal::ZERO));
    }

    #[test]
    fn cost_accrues_on_opening_head_count() {
        let p = Params {
            cost_monthly_per_head: Decimal::new(2, 0),
            ..scenario_params()
        };
        let (summary, trace) = simulate(14, p).unwrap();
        // 100 cows for 14 months; calves born in month 14 are charged from month 15.
        assert_eq!(summary.maintenance_cost, Decimal::new(2800, 0));
        assert_eq!(trace[0].cumulative_cost, Decimal::new(200, 0));
        assert_eq!(trace[13].total_head_count, 170);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn random_runs_conserve_and_never_shrink_counters(
            herd in 0u64..200,
            conception in 0i64..=100,
            female in 0i64..=100,
            quota in 0u64..10,
            capacity in 0u64..400,
            max_parity in 1usize..12,
        ) {
            let mut sim = HerdSim::new(Params {
                herd_size: herd,
                conception_rate: Decimal::new(conception, 2),
                female_ratio: Decimal::new(female, 2),
                replacement_n_each_mating: quota,
                max_total_capacity: capacity,
                max_parity,
                cost_monthly_per_head: Decimal::ONE,
                ..Params::default()
            }).unwrap();
            let mut prev = sim.ledger().clone();
            for _ in 0..96 {
                sim.step();
                let cur = sim.ledger().clone();
                prop_assert!(conserved(&sim));
                prop_assert!(cur.cows_aged_out >= prev.cows_aged_out);
                prop_assert!(cur.total_exited() >= prev.total_exited());
                prop_assert!(cur.maintenance_cost >= prev.maintenance_cost);
                prop_assert!(cur.cows_culled_for_replacement <= cur.replacements_entered);
                prev = cur;
            }
        }
    }
}
