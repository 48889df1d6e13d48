//! SARSA temporal difference learning for a combat robot
//!
//! The agent learns Q(s, a) over raw robot observations and parameterized
//! actions, updating after every executed command:
//!
//! Q(s,a) ← Q(s,a) + α[r + γ Q(s',a') - Q(s,a)]
//!
//! ## Components
//!
//! - [`ActionValueTable`]: observations indexed by bucket, compared by raw value
//! - [`SarsaAgent`]: the observe, act, update loop driven by a simulator
//! - [`KnowledgeStore`]: loads the table at startup, saves it when a battle ends
//!
//! ## Usage Example
//!
//! ```no_run
//! use robosarsa::sarsa::{Bootstrap, SarsaAgent};
//!
//! let agent = SarsaAgent::builder()
//!     .seed(7)
//!     .epsilon(0.1)
//!     .bootstrap(Bootstrap::PriorObservation)
//!     .build();
//! assert!(agent.table().is_empty());
//! ```

pub mod agent;
pub mod builder;
pub mod knowledge;
pub mod serialization;
pub mod table;

// Public re-exports
pub use agent::{Bootstrap, SarsaAgent, StepRecord};
pub use builder::SarsaAgentBuilder;
pub use knowledge::{Knowledge, KnowledgeStore};
pub use serialization::{KnowledgeMetadata, SavedTable};
pub use table::{ActionValueTable, ActionValues, TableStats, TdParams};
