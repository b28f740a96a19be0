//! Workflow orchestration for entity resolution investigations
//!
//! The [`WorkflowController`] owns one run and drives it through five
//! phases: entity input, parallel search, network risk analysis,
//! streaming classification, and case investigation. Each stage talks
//! to a collaborator service behind a trait from `caseflow-services`;
//! the classification stage streams through
//! `caseflow-stream`'s consumer.
//!
//! # Example
//!
//! ```no_run
//! use caseflow_core::{WorkflowConfig, WorkflowController};
//! use caseflow_services::EntityInput;
//! # use std::sync::Arc;
//! # async fn run(
//! #     search: Arc<dyn caseflow_services::SearchService>,
//! #     network: Arc<dyn caseflow_services::NetworkService>,
//! #     classification: Arc<dyn caseflow_services::ClassificationService>,
//! #     investigation: Arc<dyn caseflow_services::InvestigationService>,
//! # ) -> Result<(), caseflow_core::WorkflowError> {
//! let mut controller = WorkflowController::new(
//!     WorkflowConfig::default(),
//!     search,
//!     network,
//!     classification,
//!     investigation,
//! );
//!
//! let input = EntityInput::new("Samantha Miller")
//!     .with_attribute("address", "456 Oak Ave");
//! controller.submit_entity(input).await?;
//! controller.run_network_analysis().await?;
//! controller.start_classification().await?;
//! controller.run_classification().await?;
//! let case = controller.build_investigation().await?;
//! println!("created {}", case.case_id);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod controller;
pub mod error;
pub mod fanout;
pub mod investigation;
pub mod phase;
pub mod search;
pub mod state;

pub use config::{RiskWeights, TransactionRiskTiers, WorkflowConfig};
pub use controller::WorkflowController;
pub use error::WorkflowError;
pub use fanout::NetworkRiskFanOut;
pub use investigation::CaseInvestigationBuilder;
pub use phase::{allowed_transitions, validate_transition, PendingStage, WorkflowPhase};
pub use search::ParallelSearchCoordinator;
pub use state::{RunId, WorkflowState};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
