//! SARSA agent: the observe, act, update loop
//!
//! Each step the agent observes, selects an action ε-greedily, executes it,
//! drains the events the simulator queued meanwhile into one reward,
//! observes again and applies the SARSA update. The loop only ends when the
//! simulator reports the battle is over; the table is then persisted.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    Result,
    action::{self, Action},
    arena::CombatEvent,
    observation::{Discretizer, Observation, ScanBuffer},
    policy::{Choice, EpsilonGreedy},
    ports::{BattleReport, Observer, Robot, RoundOutcome, Simulator},
    reward::RewardAccumulator,
    sarsa::{
        builder::SarsaAgentBuilder,
        knowledge::{Knowledge, KnowledgeStore},
        serialization::KnowledgeMetadata,
        table::{ActionValueTable, TdParams},
    },
};

/// Which observation the bootstrap action a' is selected for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bootstrap {
    /// a' is chosen for the observation the step started from, s.
    ///
    /// Matches the tables this robot has always saved; differs from
    /// textbook SARSA.
    #[default]
    PriorObservation,
    /// a' is chosen for the observation the step ended in, s' (canonical SARSA).
    NextObservation,
}

/// One learning transition, as reported to observers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Step index within the battle (0-based)
    pub step: u64,
    pub action: Action,
    pub choice: Choice,
    pub reward: f64,
    /// Action used for Q(s', a')
    pub bootstrap_action: Action,
    pub value_before: f64,
    pub value_after: f64,
    pub saw_opponent: bool,
}

/// On-policy TD agent controlling one robot.
///
/// The agent owns the table for the whole process, so learning accumulates
/// across every battle it runs.
#[derive(Debug)]
pub struct SarsaAgent {
    knowledge: Knowledge,
    params: TdParams,
    bootstrap: Bootstrap,
    policy: EpsilonGreedy,
    rewards: RewardAccumulator,
    scans: ScanBuffer,
    store: Option<KnowledgeStore>,
}

impl SarsaAgent {
    pub fn builder() -> SarsaAgentBuilder {
        SarsaAgentBuilder::new()
    }

    pub(crate) fn from_parts(
        knowledge: Knowledge,
        params: TdParams,
        bootstrap: Bootstrap,
        policy: EpsilonGreedy,
        rewards: RewardAccumulator,
        store: Option<KnowledgeStore>,
    ) -> Self {
        Self {
            knowledge,
            params,
            bootstrap,
            policy,
            rewards,
            scans: ScanBuffer::new(),
            store,
        }
    }

    pub fn table(&self) -> &ActionValueTable {
        &self.knowledge.table
    }

    pub fn metadata(&self) -> &KnowledgeMetadata {
        &self.knowledge.metadata
    }

    pub fn into_knowledge(self) -> Knowledge {
        self.knowledge
    }

    pub fn policy_mut(&mut self) -> &mut EpsilonGreedy {
        &mut self.policy
    }

    pub fn bootstrap(&self) -> Bootstrap {
        self.bootstrap
    }

    /// Write the table to the configured store, if any.
    pub fn persist(&self) -> Result<()> {
        match &self.store {
            Some(store) => store.save(&self.knowledge.table, &self.knowledge.metadata),
            None => Ok(()),
        }
    }

    /// Route queued events; returns whether the battle has ended.
    fn dispatch_events(
        &mut self,
        events: Vec<CombatEvent>,
        report: &mut BattleReport,
        observer: &mut dyn Observer,
    ) -> Result<bool> {
        let mut battle_ended = false;
        for event in events {
            match event {
                CombatEvent::ScannedRobot(scan) => self.scans.push(scan),
                CombatEvent::BattleEnded => battle_ended = true,
                _ if event.ends_round() => {
                    let outcome = if event == CombatEvent::Win {
                        RoundOutcome::Win
                    } else {
                        RoundOutcome::Death
                    };
                    report.record_round(outcome);
                    observer.on_round_end(outcome)?;
                    self.rewards.on_event(&event);
                }
                _ => {
                    self.rewards.on_event(&event);
                }
            }
        }
        Ok(battle_ended)
    }

    /// One-time setup at the start of a battle.
    fn prepare<S: Simulator + ?Sized>(&mut self, sim: &mut S) -> Result<()> {
        sim.configure_radar()?;
        let buckets = self.knowledge.table.discretizer().buckets();
        let discretizer = Discretizer::new(sim.arena(), buckets);
        if discretizer != *self.knowledge.table.discretizer() {
            debug!(?discretizer, "re-indexing table for new arena");
            self.knowledge.table.rebucket(discretizer);
        }
        // leftovers from a battle that ended mid-command
        self.rewards.drain_reward();
        self.scans.take_nearest();
        for event in sim.drain_events() {
            if let CombatEvent::ScannedRobot(scan) = event {
                self.scans.push(scan);
            }
        }
        Ok(())
    }

    /// Run the learning loop until the simulator ends the battle.
    pub fn run<S: Simulator + ?Sized>(
        &mut self,
        sim: &mut S,
        observer: &mut dyn Observer,
    ) -> Result<BattleReport> {
        self.prepare(sim)?;

        let mut report = BattleReport::default();
        let mut observation = self.scans.observe(&sim.telemetry());

        loop {
            let (action, choice) = self.policy.choose(&self.knowledge.table, &observation);

            action::apply(&action, sim)?;
            let battle_ended = self.dispatch_events(sim.drain_events(), &mut report, observer)?;
            let reward = self.rewards.drain_reward();

            let next_observation = self.scans.observe(&sim.telemetry());
            let bootstrap_action = match self.bootstrap {
                Bootstrap::PriorObservation => {
                    self.policy.select(&self.knowledge.table, &observation)
                }
                Bootstrap::NextObservation => {
                    self.policy.select(&self.knowledge.table, &next_observation)
                }
            };

            let value_before = self.knowledge.table.value(&observation, &action);
            let value_after = self.knowledge.table.sarsa_update(
                &self.params,
                observation,
                action,
                reward,
                &next_observation,
                &bootstrap_action,
            );

            debug!(action = %action, ?choice, reward, value_after, "step completed");
            let record = StepRecord {
                step: report.steps,
                action,
                choice,
                reward,
                bootstrap_action,
                value_before,
                value_after,
                saw_opponent: observation.has_opponent(),
            };
            observer.on_step(&record)?;

            report.steps += 1;
            report.total_reward += reward;
            self.knowledge.metadata.steps += 1;

            if battle_ended {
                self.knowledge.metadata.battles += 1;
                info!(
                    wins = report.wins,
                    deaths = report.deaths,
                    steps = report.steps,
                    total_reward = report.total_reward,
                    observations = self.knowledge.table.len(),
                    "battle ended"
                );
                self.persist()?;
                return Ok(report);
            }

            observation = next_observation;
        }
    }
}

impl Robot for SarsaAgent {
    fn name(&self) -> &str {
        "SARSA"
    }

    fn run_battle(
        &mut self,
        sim: &mut dyn Simulator,
        observer: &mut dyn Observer,
    ) -> Result<BattleReport> {
        self.run(sim, observer)
    }
}
