//! The `Person` agent: SIR disease states plus voluntary vaccination.
//!
//! | Phase | Flag              | Behavior                 |
//! |-------|-------------------|--------------------------|
//! | 0     | `decide_vaccine`  | `decide_vaccination`     |
//! | 1     | `update_state`    | `update_disease_state`   |

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{OnceLock, Weak};

use ps_core::{AgentId, AgentRng};
use ps_phase::{BehaviorError, BehaviorResult, PhaseRegistryBuilder, PhaseResult, PhaseScheduled};

// ── Health ────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Health {
    Susceptible = 0,
    Infected    = 1,
    Vaccinated  = 2,
    Recovered   = 3,
}

impl Health {
    pub const ALL: [Health; 4] = [
        Health::Susceptible,
        Health::Infected,
        Health::Vaccinated,
        Health::Recovered,
    ];

    fn from_u8(v: u8) -> Health {
        match v {
            1 => Health::Infected,
            2 => Health::Vaccinated,
            3 => Health::Recovered,
            _ => Health::Susceptible,
        }
    }
}

// ── Disease parameters ────────────────────────────────────────────────────────

/// Per-round transition probabilities.
#[derive(Clone, Copy, Debug)]
pub struct DiseaseParams {
    /// Chance that one infected neighbor infects a susceptible person.
    pub infection_rate:   f64,
    pub vaccination_rate: f64,
    pub recovery_rate:    f64,
    /// Chance that a vaccinated person becomes susceptible again.
    pub waning_rate:      f64,
}

impl Default for DiseaseParams {
    fn default() -> Self {
        Self {
            infection_rate:   0.05,
            vaccination_rate: 0.1,
            recovery_rate:    0.1,
            waning_rate:      0.01,
        }
    }
}

/// Probability of catching the disease from `infected` independent contacts.
pub fn infection_probability(rate: f64, infected: usize) -> f64 {
    1.0 - (1.0 - rate).powi(infected.min(i32::MAX as usize) as i32)
}

// ── Person ────────────────────────────────────────────────────────────────────

pub struct Person {
    pub id:         AgentId,
    health:         AtomicU8,
    decide_vaccine: AtomicBool,
    update_state:   AtomicBool,
    rng:            AgentRng,
    params:         DiseaseParams,
    /// Set once after the relationship graph is built.
    neighbors:      OnceLock<Vec<Weak<Person>>>,
}

impl Person {
    pub fn new(id: AgentId, seed: u64, params: DiseaseParams) -> Self {
        Self {
            id,
            health:         AtomicU8::new(Health::Susceptible as u8),
            decide_vaccine: AtomicBool::new(true),
            update_state:   AtomicBool::new(true),
            rng:            AgentRng::new(seed, id),
            params,
            neighbors:      OnceLock::new(),
        }
    }

    pub fn health(&self) -> Health {
        Health::from_u8(self.health.load(Ordering::Acquire))
    }

    pub fn set_health(&self, h: Health) {
        self.health.store(h as u8, Ordering::Release);
    }

    /// Install the contact list.  Returns `false` if already wired.
    pub fn connect(&self, neighbors: Vec<Weak<Person>>) -> bool {
        self.neighbors.set(neighbors).is_ok()
    }

    pub fn neighbor_count(&self) -> usize {
        self.neighbors.get().map_or(0, Vec::len)
    }

    /// Neighbors currently infected.  Values written by other agents in the
    /// same phase may or may not be visible yet.
    fn infected_neighbors(&self) -> usize {
        self.neighbors
            .get()
            .into_iter()
            .flatten()
            .filter_map(Weak::upgrade)
            .filter(|n| n.health() == Health::Infected)
            .count()
    }

    // ── Phase 0 ───────────────────────────────────────────────────────────

    fn wants_to_decide(&self) -> bool {
        self.decide_vaccine.load(Ordering::Relaxed)
    }

    fn decide_vaccination(&self) -> BehaviorResult {
        if self.health() == Health::Susceptible && self.rng.gen_bool(self.params.vaccination_rate) {
            self.set_health(Health::Vaccinated);
            self.decide_vaccine.store(false, Ordering::Relaxed);
            self.update_state.store(true, Ordering::Relaxed);
        }
        Ok(())
    }

    // ── Phase 1 ───────────────────────────────────────────────────────────

    fn wants_to_update(&self) -> bool {
        self.update_state.load(Ordering::Relaxed)
    }

    fn update_disease_state(&self) -> BehaviorResult {
        match self.health() {
            Health::Infected => {
                if self.rng.gen_bool(self.params.recovery_rate) {
                    self.set_health(Health::Recovered);
                }
            }
            Health::Susceptible => {
                if self.neighbors.get().is_none() {
                    return Err(BehaviorError::failed(format!("{} has no contact list", self.id)));
                }
                let p = infection_probability(self.params.infection_rate, self.infected_neighbors());
                if self.rng.gen_bool(p) {
                    self.set_health(Health::Infected);
                }
            }
            Health::Vaccinated => {
                if self.rng.gen_bool(self.params.waning_rate) {
                    self.set_health(Health::Susceptible);
                    // Waned immunity puts the vaccination choice back on the table.
                    self.decide_vaccine.store(true, Ordering::Relaxed);
                }
            }
            Health::Recovered => {}
        }
        self.update_state.store(true, Ordering::Relaxed);
        Ok(())
    }
}

impl PhaseScheduled for Person {
    fn register_phases(reg: &mut PhaseRegistryBuilder<Self>) -> PhaseResult<()> {
        reg.phase(0, Person::wants_to_decide, Person::decide_vaccination)?
            .phase(1, Person::wants_to_update, Person::update_disease_state)?;
        Ok(())
    }
}

/// Head count per health state, in [`Health::ALL`] order.
pub fn census<'a, I>(people: I) -> [usize; 4]
where
    I: IntoIterator<Item = &'a std::sync::Arc<Person>>,
{
    let mut counts = [0usize; 4];
    for p in people {
        counts[p.health() as usize] += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn person(i: u32, params: DiseaseParams) -> Arc<Person> {
        Arc::new(Person::new(AgentId(i), 7, params))
    }

    #[test]
    fn probability_grows_with_infected_contacts() {
        assert_eq!(infection_probability(0.5, 0), 0.0);
        assert!((infection_probability(0.5, 1) - 0.5).abs() < 1e-12);
        assert!((infection_probability(0.5, 2) - 0.75).abs() < 1e-12);
        assert_eq!(infection_probability(1.0, 3), 1.0);
    }

    #[test]
    fn certain_infection_spreads_to_susceptible() {
        let params = DiseaseParams { infection_rate: 1.0, ..DiseaseParams::default() };
        let sick = person(0, params);
        let well = person(1, params);
        sick.set_health(Health::Infected);
        assert!(well.connect(vec![Arc::downgrade(&sick)]));
        assert!(!well.connect(vec![]));

        well.update_disease_state().unwrap();
        assert_eq!(well.health(), Health::Infected);
    }

    #[test]
    fn vaccination_clears_decision_flag() {
        let params = DiseaseParams { vaccination_rate: 1.0, ..DiseaseParams::default() };
        let p = person(3, params);
        p.decide_vaccination().unwrap();
        assert_eq!(p.health(), Health::Vaccinated);
        assert!(!p.wants_to_decide());
        assert!(p.wants_to_update());
    }

    #[test]
    fn unwired_susceptible_reports_failure() {
        let p = person(4, DiseaseParams::default());
        assert!(p.update_disease_state().is_err());
    }

    #[test]
    fn census_counts_states() {
        let people: Vec<_> = (0..4).map(|i| person(i, DiseaseParams::default())).collect();
        people[1].set_health(Health::Infected);
        people[2].set_health(Health::Recovered);
        assert_eq!(census(&people), [2, 1, 0, 1]);
    }
}
